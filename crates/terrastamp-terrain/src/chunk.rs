//! Terrain chunks and their pending stamp contributions

use std::collections::HashMap;
use std::fmt;

use terrastamp_core::{Result, StampId};

use crate::array::Array2;
use crate::resource::HeightGridResource;

/// Grid position (column, row) of a chunk
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ChunkCoord {
    pub x: u32,
    pub z: u32,
}

impl ChunkCoord {
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.z)
    }
}

/// Indices of adjacent chunks in the grid's chunk array. `None` at grid edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// x - 1
    pub left: Option<usize>,
    /// z + 1
    pub top: Option<usize>,
    /// x + 1
    pub right: Option<usize>,
    /// z - 1
    pub bottom: Option<usize>,
}

/// A stamp's height sub-array waiting to be composited into a chunk
#[derive(Clone, Debug, PartialEq)]
pub struct PendingContribution {
    /// Column of the first sample within the chunk
    pub x_base: usize,
    /// Row of the first sample within the chunk
    pub y_base: usize,
    pub heights: Array2<f32>,
}

impl PendingContribution {
    pub fn width(&self) -> usize {
        self.heights.len1()
    }

    pub fn height(&self) -> usize {
        self.heights.len0()
    }
}

/// One fixed-resolution tile of the terrain
pub struct Chunk<R> {
    coord: ChunkCoord,
    resource: R,
    neighbors: Neighbors,
    contributions: HashMap<StampId, PendingContribution>,
}

impl<R: HeightGridResource> Chunk<R> {
    pub fn new(coord: ChunkCoord, resource: R) -> Self {
        Self {
            coord,
            resource,
            neighbors: Neighbors::default(),
            contributions: HashMap::new(),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resolution(&self) -> usize {
        self.resource.resolution()
    }

    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    pub fn set_neighbors(&mut self, neighbors: Neighbors) {
        self.neighbors = neighbors;
    }

    /// Record (or replace) a stamp's contribution
    pub fn set_stamp_data(&mut self, stamp: StampId, x_base: usize, y_base: usize, heights: Array2<f32>) {
        self.contributions.insert(
            stamp,
            PendingContribution {
                x_base,
                y_base,
                heights,
            },
        );
    }

    pub fn remove_stamp(&mut self, stamp: StampId) -> Option<PendingContribution> {
        self.contributions.remove(&stamp)
    }

    pub fn contribution(&self, stamp: StampId) -> Option<&PendingContribution> {
        self.contributions.get(&stamp)
    }

    pub fn contribution_count(&self) -> usize {
        self.contributions.len()
    }

    /// Max-composite every contribution into a zeroed `resolution x resolution` buffer
    pub fn composite(&self) -> Result<Array2<f32>> {
        let res = self.resource.resolution();
        let mut buffer = Array2::filled(res, res, 0.0f32);
        for contribution in self.contributions.values() {
            buffer.blit_with(
                &contribution.heights,
                contribution.y_base,
                contribution.x_base,
                |current, incoming| current.max(*incoming),
            )?;
        }
        Ok(buffer)
    }

    /// Write the composite to the resource in one bulk update and commit it
    pub fn flush(&mut self) -> Result<()> {
        let buffer = self.composite()?;
        self.resource.set_heights(0, 0, &buffer)?;
        self.resource.commit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryHeightGrid;

    fn chunk() -> Chunk<MemoryHeightGrid> {
        Chunk::new(ChunkCoord::new(0, 0), MemoryHeightGrid::new(4))
    }

    #[test]
    fn flush_places_contribution_at_offset() {
        let mut c = chunk();
        let patch = Array2::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        c.set_stamp_data(StampId::from_raw(1), 2, 1, patch);
        c.flush().unwrap();

        let out = c.resource().committed();
        assert_eq!(out.row(0), &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(out.row(1), &[0.0, 0.0, 1.0, 2.0]);
        assert_eq!(out.row(2), &[0.0, 0.0, 3.0, 4.0]);
        assert_eq!(out.row(3), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn composite_takes_maximum_in_any_order() {
        let low = Array2::filled(2, 2, 0.25f32);
        let high = Array2::from_rows(vec![vec![0.5, 0.1], vec![0.1, 0.5]]).unwrap();

        let mut a = chunk();
        a.set_stamp_data(StampId::from_raw(1), 0, 0, low.clone());
        a.set_stamp_data(StampId::from_raw(2), 0, 0, high.clone());
        let mut b = chunk();
        b.set_stamp_data(StampId::from_raw(2), 0, 0, high);
        b.set_stamp_data(StampId::from_raw(1), 0, 0, low);

        let ca = a.composite().unwrap();
        assert_eq!(ca, b.composite().unwrap());
        assert_eq!(ca.row(0)[..2], [0.5, 0.25]);
        assert_eq!(ca.row(1)[..2], [0.25, 0.5]);
    }

    #[test]
    fn set_stamp_data_replaces_previous_entry() {
        let mut c = chunk();
        let id = StampId::from_raw(7);
        c.set_stamp_data(id, 0, 0, Array2::filled(1, 1, 1.0));
        c.set_stamp_data(id, 3, 3, Array2::filled(1, 1, 0.5));
        assert_eq!(c.contribution_count(), 1);
        let data = c.contribution(id).unwrap();
        assert_eq!((data.x_base, data.y_base, data.width(), data.height()), (3, 3, 1, 1));

        assert!(c.remove_stamp(id).is_some());
        c.flush().unwrap();
        assert!(c.resource().committed().as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn flush_rejects_contribution_past_edge() {
        let mut c = chunk();
        c.set_stamp_data(StampId::from_raw(1), 3, 0, Array2::filled(1, 2, 1.0));
        assert!(c.flush().is_err());
        assert_eq!(c.resource().set_calls(), 0);
    }
}
