//! Terrastamp Terrain - Stamping height patches onto a chunked terrain grid
//!
//! Splits each stamp's sampled heights along chunk boundaries (sharing one
//! seam row/column with each neighbour), keeps per-chunk contributions keyed
//! by stamp, and max-composites them into each chunk's height-grid resource
//! when the chunk is flushed. Rendering and storage stay behind the
//! `HeightGridResource` trait.

pub mod array;
pub mod chunk;
pub mod config;
pub mod grid;
pub mod heightmap;
pub mod registry;
pub mod resource;
pub mod source;
pub mod stamp;
pub mod world;

pub use array::{Array2, Array3};
pub use chunk::{Chunk, ChunkCoord, Neighbors, PendingContribution};
pub use config::{ChunkSettings, GridGeometryConfig, RESOLUTION_PRESETS};
pub use grid::{FlushReport, GridManager};
pub use heightmap::Heightmap;
pub use registry::StampRegistry;
pub use resource::{HeightGridResource, MemoryHeightGrid, ResourceFactory};
pub use source::{Shape, SourceHeightField};
pub use stamp::{Footprint, Stamp};
pub use world::{load_world, load_world_string, World, WorldFile};
