//! Terrastamp Core - Foundational types for the stamp terrain workspace
//!
//! This crate provides the core types that the other Terrastamp crates depend on:
//! - `StampId` - Stable stamp identifiers used as contribution keys
//! - `ContentHash` - SHA-256 based hashing of height buffers
//! - `Transform`, `Vec3` - Spatial types
//! - Error types and Result alias

mod error;
mod hash;
mod id;
mod types;

pub use error::{Result, TerrastampError};
pub use hash::ContentHash;
pub use id::StampId;
pub use types::{Transform, Vec3};
