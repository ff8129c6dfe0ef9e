//! Mesh data structures for voxel rendering.
//!
//! # Architecture
//! - [`MeshBuffers`]: vertex, index and UV buffers of one chunk
//! - [`Face`]: the unit-cube face templates and their fixed winding

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
