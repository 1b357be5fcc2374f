//! Apply stamps and export chunk heightmaps

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use terrastamp_terrain::Heightmap;

use super::{build_grid, open_world};

pub struct ApplyArgs {
    pub world: String,
    pub output: String,
    pub stitched: bool,
}

pub fn run(args: ApplyArgs) -> Result<()> {
    let mut world = open_world(&args.world)?;
    let grid = build_grid(&mut world)?;

    let out_dir = Path::new(&args.output);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", args.output))?;

    println!(
        "Applied {} stamp(s) to {} x {} chunks",
        world.stamps.len(),
        grid.size().0,
        grid.size().1
    );

    let mut written = 0;
    for chunk in grid.chunks() {
        let resource = chunk.resource();
        if resource.commit_calls() == 0 {
            continue;
        }
        let path = out_dir.join(format!("{}.png", chunk.coord()));
        Heightmap::from_grid(resource.committed())?
            .save_png(&path)
            .with_context(|| format!("Failed to export chunk {}", chunk.coord()))?;
        println!(
            "  {} -> {} ({} stamp(s), hash {})",
            chunk.coord(),
            path.display(),
            chunk.contribution_count(),
            resource.content_hash()
        );
        written += 1;
    }
    log::info!("Wrote {} chunk heightmap(s) to {}", written, out_dir.display());

    if args.stitched {
        let (size_x, size_z) = grid.size();
        let steps = grid.config().samples_per_chunk();
        let heights = grid.read_heights(0, 0, size_x * steps + 1, size_z * steps + 1)?;
        let path = out_dir.join("world.png");
        Heightmap::from_grid(&heights)?
            .save_png(&path)
            .context("Failed to export stitched world")?;
        println!("  stitched -> {}", path.display());
    }

    Ok(())
}
