//! World file format: grid geometry plus placed stamps, in TOML

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terrastamp_core::{Result, Transform, Vec3};

use crate::config::GridGeometryConfig;
use crate::heightmap::Heightmap;
use crate::registry::StampRegistry;
use crate::source::{Shape, SourceHeightField};
use crate::stamp::Stamp;

/// Root structure of a world TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldFile {
    #[serde(default)]
    pub grid: GridGeometryConfig,
    #[serde(default)]
    pub stamps: BTreeMap<String, StampDef>,
}

/// A stamp entry: placement plus where its heights come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDef {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub source: SourceDef,
}

/// Height source of a stamp entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceDef {
    /// Grayscale PNG, path relative to the world file
    Heightmap { path: String },
    Flat { value: f32 },
    Cone,
    Dome,
}

/// A loaded world: geometry and a populated registry
pub struct World {
    pub grid: GridGeometryConfig,
    pub stamps: StampRegistry,
}

/// Load a world from a TOML file. Heightmap paths resolve against the file's directory.
pub fn load_world<P: AsRef<Path>>(path: P) -> Result<World> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    load_world_string(&content, &base_dir)
}

/// Load a world from a TOML string
pub fn load_world_string(content: &str, base_dir: &Path) -> Result<World> {
    let file: WorldFile = toml::from_str(content)?;
    file.into_world(base_dir)
}

impl WorldFile {
    pub fn into_world(self, base_dir: &Path) -> Result<World> {
        let mut stamps = StampRegistry::new();
        for (name, def) in self.stamps {
            let source = def.source.open(base_dir)?;
            let transform = Transform::from_position(Vec3::from_array(def.position))
                .with_scale(Vec3::from_array(def.scale));
            stamps.insert(Stamp::new(name, source, transform));
        }
        Ok(World {
            grid: self.grid,
            stamps,
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl SourceDef {
    fn open(&self, base_dir: &Path) -> Result<Box<dyn SourceHeightField>> {
        let shape = match self {
            SourceDef::Heightmap { path } => {
                let path: PathBuf = base_dir.join(path);
                return Ok(Box::new(Heightmap::from_png(&path)?));
            }
            SourceDef::Flat { value } => Shape::Flat { value: *value },
            SourceDef::Cone => Shape::Cone,
            SourceDef::Dome => Shape::Dome,
        };
        Ok(Box::new(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"
[grid]
chunk_count_x = 2
chunk_count_z = 3
heightmap_resolution = 65
chunk_width = 64

[stamps.hill]
position = [32.0, 0.0, 32.0]
scale = [16.0, 20.0, 16.0]
source = { kind = "cone" }

[stamps.plateau]
position = [80.0, 0.0, 40.0]
scale = [30.0, 10.0, 12.0]
source = { kind = "flat", value = 0.5 }
"#;

    #[test]
    fn loads_grid_and_stamps() {
        let world = load_world_string(WORLD, Path::new(".")).unwrap();
        assert_eq!(world.grid.chunk_count_z, 3);
        assert_eq!(world.grid.chunk_height, 64);
        assert_eq!(world.stamps.len(), 2);

        let hill = world.stamps.find_by_name("hill").unwrap();
        assert_eq!(hill.transform().scale, Vec3::new(16.0, 20.0, 16.0));
        assert!(hill.is_dirty());
    }

    #[test]
    fn parses_heightmap_reference() {
        let def: StampDef = toml::from_str(
            "position = [0.0, 0.0, 0.0]\nscale = [1.0, 1.0, 1.0]\nsource = { kind = \"heightmap\", path = \"a.png\" }",
        )
        .unwrap();
        assert_eq!(
            def.source,
            SourceDef::Heightmap {
                path: "a.png".to_string()
            }
        );
    }

    #[test]
    fn missing_heightmap_is_an_error() {
        let content = r#"
[stamps.bad]
position = [0.0, 0.0, 0.0]
scale = [1.0, 1.0, 1.0]
source = { kind = "heightmap", path = "does-not-exist.png" }
"#;
        assert!(load_world_string(content, Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let world = load_world_string("", Path::new(".")).unwrap();
        assert_eq!(world.grid, GridGeometryConfig::default());
        assert!(world.stamps.is_empty());
    }

    #[test]
    fn serializes_back_to_toml() {
        let file: WorldFile = toml::from_str(WORLD).unwrap();
        let text = file.to_toml_string().unwrap();
        let reparsed: WorldFile = toml::from_str(&text).unwrap();
        assert_eq!(reparsed.stamps.len(), 2);
        assert_eq!(reparsed.grid, file.grid);
    }
}
