//! CLI command implementations

pub mod apply;
pub mod init;
pub mod inspect;

use anyhow::{Context, Result};
use terrastamp_terrain::{load_world, ChunkSettings, GridManager, MemoryHeightGrid, World};

/// Grid backed by in-memory height grids
pub type MemoryGrid = GridManager<fn(&ChunkSettings) -> MemoryHeightGrid>;

fn memory_grid(settings: &ChunkSettings) -> MemoryHeightGrid {
    MemoryHeightGrid::new(settings.resolution)
}

/// Load a world file and check its geometry before anything is built
pub fn open_world(path: &str) -> Result<World> {
    let world = load_world(path).with_context(|| format!("Failed to load world '{}'", path))?;
    world.grid.validate().context("Invalid grid geometry")?;
    Ok(world)
}

/// Build the grid for a loaded world, applying every stamp once
pub fn build_grid(world: &mut World) -> Result<MemoryGrid> {
    let factory: fn(&ChunkSettings) -> MemoryHeightGrid = memory_grid;
    let mut grid: MemoryGrid = GridManager::new(world.grid.clone(), factory);
    grid.rebuild(&mut world.stamps)
        .context("Failed to build terrain grid")?;
    Ok(grid)
}
