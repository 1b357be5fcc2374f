//! Grid geometry configuration

use serde::{Deserialize, Serialize};
use terrastamp_core::{Result, TerrastampError, Vec3};

use crate::chunk::ChunkCoord;

/// Heightmap resolutions offered to users, all of the form 2^n + 1
pub const RESOLUTION_PRESETS: [u32; 8] = [65, 129, 257, 513, 1025, 2049, 4097, 8193];

/// Geometry of the chunk grid, read when the grid is built.
///
/// Changing any field requires `GridManager::rebuild`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometryConfig {
    /// Chunks along X
    pub chunk_count_x: u32,
    /// Chunks along Z
    pub chunk_count_z: u32,
    /// Height samples per chunk edge, expected to be 2^n + 1
    pub heightmap_resolution: u32,
    /// Splat/alpha samples per chunk edge, carried through to the resource
    pub alphamap_resolution: u32,
    /// World-space edge length of one chunk
    pub chunk_width: u32,
    /// World-space height that a normalised sample of 1.0 maps to
    pub chunk_height: u32,
}

impl Default for GridGeometryConfig {
    fn default() -> Self {
        Self {
            chunk_count_x: 1,
            chunk_count_z: 1,
            heightmap_resolution: 129,
            alphamap_resolution: 129,
            chunk_width: 128,
            chunk_height: 64,
        }
    }
}

impl GridGeometryConfig {
    /// World units per height-field index step
    pub fn resolution_size_scale(&self) -> f32 {
        self.chunk_width as f32 / (self.heightmap_resolution as f32 - 1.0)
    }

    /// Index steps per chunk edge (the seam sample is shared with the neighbour)
    pub fn samples_per_chunk(&self) -> usize {
        self.heightmap_resolution.saturating_sub(1) as usize
    }

    /// Check the caller-side contract. The grid itself never calls this.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_count_x == 0 || self.chunk_count_z == 0 {
            return Err(TerrastampError::InvalidConfig(format!(
                "chunk counts must be at least 1, got {}x{}",
                self.chunk_count_x, self.chunk_count_z
            )));
        }
        let steps = self.heightmap_resolution.wrapping_sub(1);
        if self.heightmap_resolution < 3 || !steps.is_power_of_two() {
            return Err(TerrastampError::InvalidConfig(format!(
                "heightmap_resolution must be 2^n + 1 (e.g. {:?}), got {}",
                RESOLUTION_PRESETS, self.heightmap_resolution
            )));
        }
        if self.alphamap_resolution == 0 {
            return Err(TerrastampError::InvalidConfig(
                "alphamap_resolution must be at least 1".to_string(),
            ));
        }
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(TerrastampError::InvalidConfig(format!(
                "chunk_width and chunk_height must be positive, got {} and {}",
                self.chunk_width, self.chunk_height
            )));
        }
        Ok(())
    }

    /// Settings for the chunk at `coord`
    pub fn chunk_settings(&self, coord: ChunkCoord) -> ChunkSettings {
        let width = self.chunk_width as f32;
        ChunkSettings {
            coord,
            resolution: self.heightmap_resolution as usize,
            alphamap_resolution: self.alphamap_resolution as usize,
            width,
            height: self.chunk_height as f32,
            origin: Vec3::new(coord.x as f32 * width, 0.0, coord.z as f32 * width),
        }
    }
}

/// Per-chunk parameters handed to the resource factory
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkSettings {
    pub coord: ChunkCoord,
    pub resolution: usize,
    pub alphamap_resolution: usize,
    pub width: f32,
    pub height: f32,
    /// World position of the chunk's minimum corner
    pub origin: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GridGeometryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution_size_scale(), 1.0);
        assert_eq!(config.samples_per_chunk(), 128);
    }

    #[test]
    fn presets_all_validate() {
        for res in RESOLUTION_PRESETS {
            let config = GridGeometryConfig {
                heightmap_resolution: res,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{} should be valid", res);
        }
    }

    #[test]
    fn rejects_bad_resolution_and_counts() {
        for res in [0, 1, 2, 100, 128] {
            let config = GridGeometryConfig {
                heightmap_resolution: res,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} should be rejected", res);
        }
        let config = GridGeometryConfig {
            chunk_count_z: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrastampError::InvalidConfig(_))
        ));
    }

    #[test]
    fn resolution_size_scale_tracks_geometry() {
        let config = GridGeometryConfig {
            heightmap_resolution: 65,
            chunk_width: 256,
            ..Default::default()
        };
        assert_eq!(config.resolution_size_scale(), 4.0);
    }

    #[test]
    fn chunk_settings_place_chunk_in_world() {
        let config = GridGeometryConfig {
            chunk_count_x: 3,
            chunk_count_z: 3,
            chunk_width: 100,
            ..Default::default()
        };
        let settings = config.chunk_settings(ChunkCoord::new(2, 1));
        assert_eq!(settings.origin, Vec3::new(200.0, 0.0, 100.0));
        assert_eq!(settings.resolution, 129);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: GridGeometryConfig =
            toml::from_str("chunk_count_x = 4\nheightmap_resolution = 257").unwrap();
        assert_eq!(config.chunk_count_x, 4);
        assert_eq!(config.chunk_count_z, 1);
        assert_eq!(config.heightmap_resolution, 257);
        assert_eq!(config.chunk_width, 128);
    }
}
