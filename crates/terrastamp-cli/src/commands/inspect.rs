//! World inspection command

use anyhow::Result;
use terrastamp_terrain::RESOLUTION_PRESETS;

use super::{build_grid, open_world};

pub fn run(path: &str) -> Result<()> {
    let mut world = open_world(path)?;
    let grid = build_grid(&mut world)?;
    let config = grid.config();

    println!("World: {}", path);
    println!(
        "Grid: {} x {} chunks, {} world units each",
        config.chunk_count_x, config.chunk_count_z, config.chunk_width
    );
    println!(
        "Heightmap resolution: {} (presets: {:?})",
        config.heightmap_resolution, RESOLUTION_PRESETS
    );
    println!("Alphamap resolution: {}", config.alphamap_resolution);
    println!("Chunk height: {}", config.chunk_height);
    println!("Resolution size scale: {}", grid.resolution_size_scale());
    println!();

    if world.stamps.is_empty() {
        println!("No stamps");
        return Ok(());
    }

    println!("Stamps:");
    for stamp in world.stamps.iter() {
        let footprint = stamp.footprint();
        println!("  {} (id {})", stamp.name(), stamp.id());
        println!(
            "    footprint: ({:.2}, {:.2}) .. ({:.2}, {:.2})",
            footprint.min.x, footprint.min.z, footprint.max.x, footprint.max.z
        );
        println!(
            "    samples: {} x {}, height {}",
            stamp.width.round(),
            stamp.length.round(),
            stamp.height
        );

        let chunks = grid.affected_chunks(stamp.id());
        if chunks.is_empty() {
            println!("    chunks: none (outside grid or zero area)");
        } else {
            let names: Vec<String> = chunks.iter().map(|c| c.to_string()).collect();
            println!("    chunks: {}", names.join(", "));
        }
    }

    Ok(())
}
