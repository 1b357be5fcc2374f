//! Heightmap loading, sampling and export

use std::path::Path;

use terrastamp_core::{Result, TerrastampError};

use crate::array::Array2;
use crate::source::SourceHeightField;

/// A grayscale heightmap with bilinear sampling
pub struct Heightmap {
    /// Row-major height values normalized to [0..1]
    heights: Vec<f32>,
    /// Width in pixels
    pub width: u32,
    /// Depth (height) in pixels
    pub depth: u32,
}

impl Heightmap {
    /// Load a heightmap from a grayscale PNG file.
    /// Values are normalized to [0..1] regardless of bit depth.
    pub fn from_png(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            TerrastampError::Heightmap(format!(
                "Failed to load heightmap '{}': {}",
                path.display(),
                e
            ))
        })?;

        let gray = img.into_luma16();
        let width = gray.width();
        let depth = gray.height();

        let heights: Vec<f32> = gray
            .pixels()
            .map(|p| p.0[0] as f32 / 65535.0)
            .collect();

        Self::from_raw(heights, width, depth)
    }

    /// Create a heightmap from raw float data
    pub fn from_raw(heights: Vec<f32>, width: u32, depth: u32) -> Result<Self> {
        if width == 0 || depth == 0 {
            return Err(TerrastampError::Heightmap(format!(
                "heightmap must be at least 1x1, got {}x{}",
                width, depth
            )));
        }
        if heights.len() != (width * depth) as usize {
            return Err(TerrastampError::DimensionMismatch {
                axis: 0,
                left: heights.len(),
                right: (width * depth) as usize,
            });
        }
        Ok(Self {
            heights,
            width,
            depth,
        })
    }

    /// Wrap a height grid (rows become depth, columns width)
    pub fn from_grid(grid: &Array2<f32>) -> Result<Self> {
        Self::from_raw(
            grid.as_slice().to_vec(),
            grid.len1() as u32,
            grid.len0() as u32,
        )
    }

    /// Write as a 16-bit grayscale PNG, clamping values to [0..1]
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let pixels: Vec<u16> = self
            .heights
            .iter()
            .map(|h| (h.clamp(0.0, 1.0) * 65535.0).round() as u16)
            .collect();
        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
            self.width,
            self.depth,
            pixels,
        )
        .ok_or_else(|| TerrastampError::Heightmap("pixel buffer size mismatch".to_string()))?;

        img.save(path).map_err(|e| {
            TerrastampError::Heightmap(format!(
                "Failed to write heightmap '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Bilinear sample at normalized UV coordinates (0..1, 0..1).
    /// Returns interpolated height in [0..1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;

        let x0 = (fx as u32).min(self.width.saturating_sub(2));
        let z0 = (fz as u32).min(self.depth.saturating_sub(2));
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;

        h0 * (1.0 - tz) + h1 * tz
    }

    fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(z * self.width + x) as usize]
    }
}

impl SourceHeightField for Heightmap {
    fn sample_bilinear(&self, u: f32, v: f32) -> f32 {
        self.sample(u, v)
    }
}
