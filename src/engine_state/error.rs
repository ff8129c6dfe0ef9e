//! Error types shared by the engine.

use std::path::PathBuf;

use thiserror::Error;

use super::voxels::{block::block_type::BlockType, chunk::ChunkPosition};

/// Errors surfaced by engine construction and the edit path.
///
/// Generation itself never fails with an error: bad band thresholds only
/// produce odd terrain, and a fault inside one work item is logged and skipped
/// by the worker that hit it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The block catalog has no face UVs for a block type. Fatal at start-up.
    #[error("block type `{0}` is not registered in the block catalog")]
    UnregisteredBlockType(BlockType),

    /// A configuration or catalog file could not be read.
    #[error("failed to read {path}")]
    ConfigIo {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A configuration or catalog document is not valid JSON for its type.
    #[error("failed to parse configuration")]
    ConfigParse(#[from] serde_json::Error),

    /// The OS refused to start a worker thread.
    #[error("failed to spawn a chunk worker")]
    WorkerSpawn(#[source] std::io::Error),

    /// An edit addressed a column that is neither live nor cached.
    #[error("chunk {0:?} is not loaded")]
    ChunkNotLoaded(ChunkPosition),

    /// An edit addressed a cell above or below the fixed column height.
    #[error("block height {y} is outside the chunk column")]
    OutOfBounds {
        /// Requested world y
        y: i32,
    },
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
