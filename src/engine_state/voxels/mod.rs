//! # Voxel World Core
//!
//! Everything that describes the world itself, independent of how it is drawn.
//!
//! ## Architecture
//!
//! * **Block**: block types, the six face directions and the per-face UV catalog
//! * **Chunk**: one full-height column of blocks in a padded grid, its builder
//!   and the center-outward ring traversal
//! * **Terrain**: the banded noise field that decides what block a cell holds
//! * **World**: the streamed chunk set around the observer and the edit path
//!
//! ## Data Flow
//!
//! 1. The world asks for positions near the observer to be built
//! 2. Workers fill grids from the terrain field and mesh them
//! 3. The world takes the grids back and hands the meshes on
//! 4. Edits write into grids and mark them for remeshing

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;
