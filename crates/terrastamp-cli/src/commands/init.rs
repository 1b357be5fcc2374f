//! World file initialization command

use anyhow::Result;
use std::fs;
use std::path::Path;

const SAMPLE_WORLD: &str = r#"# Terrastamp world file

[grid]
chunk_count_x = 2
chunk_count_z = 2
heightmap_resolution = 129
alphamap_resolution = 129
chunk_width = 128
chunk_height = 64

# A cone straddling all four chunks around the centre vertex
[stamps.peak]
position = [128.0, 0.0, 128.0]
scale = [96.0, 48.0, 96.0]
source = { kind = "cone" }

[stamps.mesa]
position = [60.0, 0.0, 190.0]
scale = [40.0, 16.0, 30.0]
source = { kind = "flat", value = 1.0 }

[stamps.hill]
position = [200.0, 0.0, 50.0]
scale = [70.0, 24.0, 70.0]
source = { kind = "dome" }

# Grayscale PNG stamps resolve relative to this file:
# [stamps.crater]
# position = [64.0, 0.0, 64.0]
# scale = [32.0, 8.0, 32.0]
# source = { kind = "heightmap", path = "stamps/crater.png" }
"#;

pub fn run(path: &str) -> Result<()> {
    let file = Path::new(path);

    if file.exists() {
        anyhow::bail!("File '{}' already exists", path);
    }
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(file, SAMPLE_WORLD)?;

    println!("Created world file '{}'", path);
    println!();
    println!("Next steps:");
    println!("  terrastamp inspect {}", path);
    println!("  terrastamp apply {} --output chunks", path);

    Ok(())
}
