//! Height-grid resource contract and the in-memory implementation

use terrastamp_core::{ContentHash, Result};

use crate::array::Array2;
use crate::config::ChunkSettings;

/// The storage a chunk flushes its composited heights into.
///
/// Writes staged with `set_heights` become visible through `heights` only
/// after `commit`.
pub trait HeightGridResource {
    /// Samples per edge of the (square) height grid
    fn resolution(&self) -> usize;

    /// Whether the resource can accept data. Splicing skips chunks whose
    /// resource reports `false`.
    fn is_initialized(&self) -> bool {
        true
    }

    /// Read a committed `height x width` window (rows are y, columns x)
    fn heights(&self, x_offset: usize, y_offset: usize, width: usize, height: usize)
        -> Result<Array2<f32>>;

    /// Stage `values` at `(x_offset, y_offset)`
    fn set_heights(&mut self, x_offset: usize, y_offset: usize, values: &Array2<f32>) -> Result<()>;

    /// Publish staged writes
    fn commit(&mut self);
}

/// Creates the resource owned by each chunk when the grid is built
pub trait ResourceFactory {
    type Resource: HeightGridResource;

    fn create(&mut self, settings: &ChunkSettings) -> Self::Resource;
}

impl<R, F> ResourceFactory for F
where
    R: HeightGridResource,
    F: FnMut(&ChunkSettings) -> R,
{
    type Resource = R;

    fn create(&mut self, settings: &ChunkSettings) -> R {
        self(settings)
    }
}

/// Height grid held in memory, counting writes so callers can observe
/// how often a chunk was flushed.
#[derive(Clone, Debug)]
pub struct MemoryHeightGrid {
    resolution: usize,
    initialized: bool,
    staged: Array2<f32>,
    committed: Array2<f32>,
    set_calls: usize,
    commit_calls: usize,
}

impl MemoryHeightGrid {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            initialized: true,
            staged: Array2::filled(resolution, resolution, 0.0),
            committed: Array2::filled(resolution, resolution, 0.0),
            set_calls: 0,
            commit_calls: 0,
        }
    }

    /// A grid that has not been set up yet and must be skipped by splicing
    pub fn uninitialized(resolution: usize) -> Self {
        Self {
            initialized: false,
            ..Self::new(resolution)
        }
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls
    }

    /// The full committed buffer
    pub fn committed(&self) -> &Array2<f32> {
        &self.committed
    }

    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_heights(self.committed.as_slice())
    }
}

impl HeightGridResource for MemoryHeightGrid {
    fn resolution(&self) -> usize {
        self.resolution
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn heights(
        &self,
        x_offset: usize,
        y_offset: usize,
        width: usize,
        height: usize,
    ) -> Result<Array2<f32>> {
        self.committed.get_part(y_offset, x_offset, height, width)
    }

    fn set_heights(&mut self, x_offset: usize, y_offset: usize, values: &Array2<f32>) -> Result<()> {
        self.staged.copy_from(values, y_offset, x_offset)?;
        self.set_calls += 1;
        Ok(())
    }

    fn commit(&mut self) {
        self.committed = self.staged.clone();
        self.commit_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCoord;
    use crate::config::GridGeometryConfig;

    #[test]
    fn writes_visible_after_commit() {
        let mut grid = MemoryHeightGrid::new(3);
        let patch = Array2::filled(1, 2, 0.5);
        grid.set_heights(1, 2, &patch).unwrap();
        assert_eq!(grid.heights(1, 2, 2, 1).unwrap(), Array2::filled(1, 2, 0.0));

        grid.commit();
        assert_eq!(grid.heights(1, 2, 2, 1).unwrap(), patch);
        assert_eq!(grid.committed()[(2, 0)], 0.0);
        assert_eq!((grid.set_calls(), grid.commit_calls()), (1, 1));
    }

    #[test]
    fn out_of_range_write_fails() {
        let mut grid = MemoryHeightGrid::new(3);
        assert!(grid.set_heights(2, 0, &Array2::filled(1, 2, 1.0)).is_err());
        assert_eq!(grid.set_calls(), 0);
    }

    #[test]
    fn hash_tracks_committed_content() {
        let mut grid = MemoryHeightGrid::new(2);
        let before = grid.content_hash();
        grid.set_heights(0, 0, &Array2::filled(1, 1, 1.0)).unwrap();
        assert_eq!(grid.content_hash(), before);
        grid.commit();
        assert_ne!(grid.content_hash(), before);
    }

    #[test]
    fn closures_act_as_factories() {
        let mut factory = |s: &ChunkSettings| MemoryHeightGrid::new(s.resolution);
        let config = GridGeometryConfig {
            heightmap_resolution: 5,
            ..Default::default()
        };
        let settings = config.chunk_settings(ChunkCoord::new(0, 0));
        assert_eq!(factory.create(&settings).resolution(), 5);
        assert!(!MemoryHeightGrid::uninitialized(5).is_initialized());
    }
}
