//! Chunk grid orchestration: building, splicing stamps across chunks, flushing

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, trace};
use terrastamp_core::{Result, StampId, TerrastampError};

use crate::array::Array2;
use crate::chunk::{Chunk, ChunkCoord, Neighbors};
use crate::config::GridGeometryConfig;
use crate::registry::StampRegistry;
use crate::resource::{HeightGridResource, ResourceFactory};

/// What a recompute pass did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlushReport {
    /// Stamps whose contributions were recomputed
    pub stamps_recomputed: Vec<StampId>,
    /// Chunks flushed, each exactly once, in grid order
    pub flushed: Vec<ChunkCoord>,
}

/// Owns the chunk grid and keeps it in sync with a stamp registry.
///
/// Chunks live in a flat array indexed by `z * chunk_count_x + x`;
/// neighbour links are indices into that array.
pub struct GridManager<F: ResourceFactory> {
    config: GridGeometryConfig,
    resolution_size_scale: f32,
    factory: F,
    chunks: Vec<Chunk<F::Resource>>,
    size_x: usize,
    size_z: usize,
    affected: HashMap<StampId, Vec<usize>>,
    flush_requested: bool,
    built: bool,
}

impl<F: ResourceFactory> GridManager<F> {
    /// Create a manager. The grid is empty until `rebuild` is called.
    pub fn new(config: GridGeometryConfig, factory: F) -> Self {
        let resolution_size_scale = config.resolution_size_scale();
        Self {
            config,
            resolution_size_scale,
            factory,
            chunks: Vec::new(),
            size_x: 0,
            size_z: 0,
            affected: HashMap::new(),
            flush_requested: false,
            built: false,
        }
    }

    pub fn config(&self) -> &GridGeometryConfig {
        &self.config
    }

    /// Replace the geometry. Takes effect on the next `rebuild`.
    pub fn set_config(&mut self, config: GridGeometryConfig) {
        self.config = config;
    }

    pub fn resolution_size_scale(&self) -> f32 {
        self.resolution_size_scale
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Grid dimensions in chunks (x, z)
    pub fn size(&self) -> (usize, usize) {
        (self.size_x, self.size_z)
    }

    pub fn chunk_index(&self, x: usize, z: usize) -> Option<usize> {
        (x < self.size_x && z < self.size_z).then(|| z * self.size_x + x)
    }

    pub fn chunk(&self, x: usize, z: usize) -> Option<&Chunk<F::Resource>> {
        self.chunk_index(x, z).map(|i| &self.chunks[i])
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk<F::Resource>> {
        self.chunks.iter()
    }

    /// Chunks the stamp currently contributes to
    pub fn affected_chunks(&self, stamp: StampId) -> Vec<ChunkCoord> {
        self.affected
            .get(&stamp)
            .map(|indices| indices.iter().map(|&i| self.chunks[i].coord()).collect())
            .unwrap_or_default()
    }

    /// Destroy all chunks and forget every stamp's affected set.
    pub fn clear(&mut self) {
        if self.built {
            info!("Clearing {}x{} terrain grid", self.size_x, self.size_z);
        }
        self.chunks.clear();
        self.affected.clear();
        self.size_x = 0;
        self.size_z = 0;
        self.flush_requested = false;
        self.built = false;
    }

    /// Recreate every chunk from the current config, wire neighbours and
    /// force-recompute all stamps.
    pub fn rebuild(&mut self, registry: &mut StampRegistry) -> Result<FlushReport> {
        self.clear();
        self.resolution_size_scale = self.config.resolution_size_scale();
        self.size_x = self.config.chunk_count_x as usize;
        self.size_z = self.config.chunk_count_z as usize;

        self.chunks.reserve(self.size_x * self.size_z);
        for z in 0..self.size_z {
            for x in 0..self.size_x {
                let coord = ChunkCoord::new(x as u32, z as u32);
                let settings = self.config.chunk_settings(coord);
                let resource = self.factory.create(&settings);
                self.chunks.push(Chunk::new(coord, resource));
            }
        }

        for z in 0..self.size_z {
            for x in 0..self.size_x {
                let neighbors = Neighbors {
                    left: x.checked_sub(1).and_then(|l| self.chunk_index(l, z)),
                    top: self.chunk_index(x, z + 1),
                    right: self.chunk_index(x + 1, z),
                    bottom: z.checked_sub(1).and_then(|b| self.chunk_index(x, b)),
                };
                self.chunks[z * self.size_x + x].set_neighbors(neighbors);
            }
        }

        self.built = true;
        info!(
            "Built {}x{} terrain grid (resolution {}, {} world units per sample)",
            self.size_x, self.size_z, self.config.heightmap_resolution, self.resolution_size_scale
        );
        self.recompute(registry, true)
    }

    /// Ask for a pass on the next tick even if no stamp is dirty
    pub fn request_flush(&mut self) {
        self.flush_requested = true;
    }

    /// Per-frame entry point: runs a pass when a stamp is dirty or a flush
    /// was requested, otherwise does nothing.
    pub fn on_tick(&mut self, registry: &mut StampRegistry) -> Result<FlushReport> {
        if !self.flush_requested && !registry.any_dirty() {
            return Ok(FlushReport::default());
        }
        self.recompute(registry, false)
    }

    /// Recompute dirty stamps (all stamps when `force_all`) and flush every
    /// chunk whose contributions changed, once each.
    pub fn recompute(&mut self, registry: &mut StampRegistry, force_all: bool) -> Result<FlushReport> {
        self.flush_requested = false;
        if !self.built {
            return Ok(FlushReport::default());
        }

        let mut report = FlushReport::default();
        let mut pending = BTreeSet::new();

        for stamp in registry.iter_mut() {
            if !force_all && !stamp.is_dirty() {
                continue;
            }
            let id = stamp.id();
            report.stamps_recomputed.push(id);

            for index in self.affected.remove(&id).unwrap_or_default() {
                self.chunks[index].remove_stamp(id);
                pending.insert(index);
            }

            stamp.refresh(self.resolution_size_scale);
            if let Some(heights) = stamp.height_data(self.config.chunk_height as f32) {
                let min = stamp.footprint().min;
                let x_base = (min.x / self.resolution_size_scale) as i32;
                let y_base = (min.z / self.resolution_size_scale) as i32;

                let touched = self.splice(id, x_base, y_base, heights)?;
                pending.extend(touched.iter().copied());
                if !touched.is_empty() {
                    self.affected.insert(id, touched);
                }
            }
            stamp.mark_clean();
        }

        for &index in &pending {
            self.chunks[index].flush()?;
            report.flushed.push(self.chunks[index].coord());
        }

        debug!(
            "Recompute pass: {} stamp(s), {} chunk(s) flushed",
            report.stamps_recomputed.len(),
            report.flushed.len()
        );
        Ok(report)
    }

    /// Remove a stamp from the registry and from every chunk it touched,
    /// flushing those chunks.
    pub fn remove_stamp(&mut self, registry: &mut StampRegistry, id: StampId) -> Result<FlushReport> {
        registry
            .remove(id)
            .ok_or(TerrastampError::StampNotFound(id))?;

        let mut report = FlushReport::default();
        let mut touched = self.affected.remove(&id).unwrap_or_default();
        touched.sort_unstable();
        touched.dedup();
        for index in touched {
            self.chunks[index].remove_stamp(id);
            self.chunks[index].flush()?;
            report.flushed.push(self.chunks[index].coord());
        }
        Ok(report)
    }

    /// Distribute `heights` (rows along z, columns along x) whose first
    /// sample sits at global grid index `(x_base, y_base)` across the
    /// chunks it covers. Returns the indices of every chunk that received
    /// a contribution.
    pub fn splice(
        &mut self,
        stamp: StampId,
        x_base: i32,
        y_base: i32,
        heights: Array2<f32>,
    ) -> Result<Vec<usize>> {
        let mut touched = Vec::new();
        let steps = self.config.samples_per_chunk() as i32;
        if !self.built || steps <= 0 {
            return Ok(touched);
        }

        if x_base / steps >= self.size_x as i32 || y_base / steps >= self.size_z as i32 {
            return Ok(touched);
        }

        let (mut x_base, mut y_base, mut heights) = (x_base, y_base, heights);
        if x_base < 0 || y_base < 0 {
            let skip_x = (-x_base).max(0) as usize;
            let skip_y = (-y_base).max(0) as usize;
            if skip_y >= heights.len0() || skip_x >= heights.len1() {
                return Ok(touched);
            }
            heights = heights.get_part(
                skip_y,
                skip_x,
                heights.len0() - skip_y,
                heights.len1() - skip_x,
            )?;
            x_base = x_base.max(0);
            y_base = y_base.max(0);
        }

        let start = (y_base / steps) as usize * self.size_x + (x_base / steps) as usize;
        self.splice_into(
            Some(start),
            stamp,
            heights,
            (x_base % steps) as usize,
            (y_base % steps) as usize,
            &mut touched,
        )?;
        touched.sort_unstable();
        touched.dedup();
        Ok(touched)
    }

    fn splice_into(
        &mut self,
        chunk: Option<usize>,
        stamp: StampId,
        heights: Array2<f32>,
        x_base: usize,
        y_base: usize,
        touched: &mut Vec<usize>,
    ) -> Result<()> {
        let Some(index) = chunk else {
            return Ok(());
        };
        if !self.chunks[index].resource().is_initialized() {
            return Ok(());
        }

        let edge = self.chunks[index].resolution() as i64 - 1;
        let (len0, len1) = (heights.len0(), heights.len1());
        let differ_x = x_base as i64 + len1 as i64 - edge;
        let differ_y = y_base as i64 + len0 as i64 - edge;
        let neighbors = self.chunks[index].neighbors();
        touched.push(index);

        if differ_x <= 0 && differ_y <= 0 {
            self.record(index, stamp, x_base, y_base, heights);
            return Ok(());
        }

        let dx = differ_x.max(0) as usize;
        let dy = differ_y.max(0) as usize;

        if dy == 0 {
            // Right overflow; the +1 column is the seam shared with the right neighbour
            let local = heights.get_part(0, 0, len0, len1 - dx + 1)?;
            let right = heights.get_part(0, len1 - dx, len0, dx)?;
            self.record(index, stamp, x_base, y_base, local);
            self.splice_into(neighbors.right, stamp, right, 0, y_base, touched)
        } else if dx == 0 {
            let local = heights.get_part(0, 0, len0 - dy + 1, len1)?;
            let top = heights.get_part(len0 - dy, 0, dy, len1)?;
            self.record(index, stamp, x_base, y_base, local);
            self.splice_into(neighbors.top, stamp, top, x_base, 0, touched)
        } else {
            let local = heights.get_part(0, 0, len0 - dy + 1, len1 - dx + 1)?;
            let right = heights.get_part(0, len1 - dx, len0 - dy + 1, dx)?;
            let top = heights.get_part(len0 - dy, 0, dy, len1 - dx + 1)?;
            let corner = heights.get_part(len0 - dy, len1 - dx, dy, dx)?;
            // The right and top pieces each spill their seam into the diagonal
            // chunk; the corner block is recorded last and replaces those.
            let top_right = neighbors
                .top
                .and_then(|t| self.chunks[t].neighbors().right);

            self.record(index, stamp, x_base, y_base, local);
            self.splice_into(neighbors.right, stamp, right, 0, y_base, touched)?;
            self.splice_into(neighbors.top, stamp, top, x_base, 0, touched)?;
            self.splice_into(top_right, stamp, corner, 0, 0, touched)
        }
    }

    fn record(&mut self, index: usize, stamp: StampId, x_base: usize, y_base: usize, heights: Array2<f32>) {
        let chunk = &mut self.chunks[index];
        trace!(
            "Stamp {} -> chunk {} at ({}, {}) [{}x{}]",
            stamp,
            chunk.coord(),
            x_base,
            y_base,
            heights.len1(),
            heights.len0()
        );
        chunk.set_stamp_data(stamp, x_base, y_base, heights);
    }

    /// Read committed heights for the global index-space window starting at
    /// `(x, y)`, stitching across chunk boundaries. Seam samples appear once.
    pub fn read_heights(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Array2<f32>> {
        if !self.built {
            return Err(TerrastampError::GridNotBuilt);
        }
        let steps = self.config.samples_per_chunk();
        if self.chunks.is_empty() || steps == 0 {
            return Err(TerrastampError::InvalidConfig(format!(
                "cannot read from a {}x{} grid of resolution {}",
                self.size_x, self.size_z, self.config.heightmap_resolution
            )));
        }
        let cx = (x / steps).min(self.size_x - 1);
        let cz = (y / steps).min(self.size_z - 1);
        let start = cz * self.size_x + cx;
        self.read_from(start, x - cx * steps, y - cz * steps, width, height)
    }

    fn read_from(&self, index: usize, x: usize, y: usize, width: usize, height: usize) -> Result<Array2<f32>> {
        let chunk = &self.chunks[index];
        let steps = chunk.resolution() - 1;
        let neighbors = chunk.neighbors();
        let dx = (x + width).saturating_sub(steps);
        let dy = (y + height).saturating_sub(steps);

        let right = neighbors.right.filter(|_| dx > 0);
        let top = neighbors.top.filter(|_| dy > 0);

        match (right, top) {
            (None, None) => chunk.resource().heights(x, y, width, height),
            (Some(right), None) => {
                let local = chunk.resource().heights(x, y, width - dx, height)?;
                local.concat_axis1(&self.read_from(right, 0, y, dx, height)?)
            }
            (right, Some(top)) => {
                let lower = match right {
                    Some(right) => chunk
                        .resource()
                        .heights(x, y, width - dx, height - dy)?
                        .concat_axis1(&self.read_from(right, 0, y, dx, height - dy)?)?,
                    None => chunk.resource().heights(x, y, width, height - dy)?,
                };
                lower.concat_axis0(&self.read_from(top, x, 0, width, dy)?)
            }
        }
    }
}
