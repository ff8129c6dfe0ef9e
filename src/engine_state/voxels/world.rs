//! # World Module
//!
//! The streaming manager and the edit path. `World` tracks every chunk near the
//! observer, decides what has to be built or remeshed each tick, takes worker
//! results back in, and applies block edits.
//!
//! ## Ownership
//!
//! A chunk's grid is owned by exactly one side at a time. While the world holds
//! it, edits write straight into it. While a worker holds it (a fresh build or
//! a remesh in flight) edits are buffered on the tracked chunk and replayed
//! once the grid comes back, after which the chunk is remeshed again. At most
//! one request per position is ever outstanding.
//!
//! ## Deactivation
//!
//! Chunks leaving the radius move into a bounded LRU cache instead of being
//! dropped, and come back without regeneration if the observer returns before
//! they are evicted.

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
};

use cgmath::{Point3, Vector3};
use log::{debug, warn};
use lru::LruCache;

use super::{
    block::{block_type::BlockType, Block},
    chunk::{
        chunk_iteration::{ring_distance, RingIterator},
        chunk_position_of, local_column_of, local_to_grid, Chunk, ChunkPosition, CHUNK_DIMENSION,
        CHUNK_HEIGHT,
    },
};
use crate::engine_state::{
    config::WorldConfig,
    error::{EngineError, Result},
    rendering::meshing::mesh::MeshBuffers,
    task_management::task::{GenerationOutcome, GenerationResult},
};

/// Where a tracked chunk is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// A fresh build was requested and has not come back yet
    Queued,
    /// The world owns the grid
    Ready,
    /// The grid is with a worker for remeshing
    InFlight,
    /// The fresh build panicked; the position is not retried
    Failed,
}

/// A grid cell write waiting for its grid to come back from a worker.
type PendingEdit = ((usize, usize, usize), Option<Block>);

#[derive(Debug)]
struct TrackedChunk {
    grid: Option<Box<Chunk>>,
    state: ChunkState,
    /// Edited since its last mesh was built
    dirty: bool,
    pending_edits: Vec<PendingEdit>,
}

impl TrackedChunk {
    fn queued() -> Self {
        TrackedChunk {
            grid: None,
            state: ChunkState::Queued,
            dirty: false,
            pending_edits: Vec::new(),
        }
    }

    fn is_outstanding(&self) -> bool {
        matches!(self.state, ChunkState::Queued | ChunkState::InFlight)
    }

    /// Hands the grid out for a remesh if it has unmeshed edits.
    fn take_for_regeneration(&mut self) -> Option<Box<Chunk>> {
        if self.state != ChunkState::Ready || !self.dirty {
            return None;
        }
        let grid = self.grid.take()?;
        self.state = ChunkState::InFlight;
        self.dirty = false;
        Some(grid)
    }

    /// Writes one cell, or buffers the write while the grid is away.
    fn write(&mut self, local: Point3<i32>, block_type: Option<BlockType>) -> bool {
        if self.state == ChunkState::Failed {
            return false;
        }
        let Some((gx, gy, gz)) = local_to_grid(local) else {
            return false;
        };
        let block = block_type.map(|block_type| {
            Block::new(
                block_type,
                Point3::new(local.x as i16, local.y as i16, local.z as i16),
            )
        });

        match self.grid.as_mut() {
            Some(grid) => grid.set(gx, gy, gz, block),
            None => self.pending_edits.push(((gx, gy, gz), block)),
        }
        self.dirty = true;
        true
    }

    /// Takes a grid back from a worker and replays buffered edits onto it.
    fn restore(&mut self, mut grid: Box<Chunk>) {
        if !self.pending_edits.is_empty() {
            for ((gx, gy, gz), block) in self.pending_edits.drain(..) {
                grid.set(gx, gy, gz, block);
            }
            self.dirty = true;
        }
        self.grid = Some(grid);
        self.state = ChunkState::Ready;
    }
}

/// What the driving side has to do after a streaming pass.
#[derive(Debug, Default)]
pub struct StreamingUpdate {
    /// Positions to submit as fresh builds, nearest first
    pub fresh: Vec<ChunkPosition>,
    /// Grids to submit for remeshing
    pub regenerate: Vec<Box<Chunk>>,
    /// Chunks that left the radius
    pub deactivated: Vec<ChunkPosition>,
    /// Cached chunks that came back into the radius
    pub reactivated: Vec<ChunkPosition>,
    /// Cached chunks dropped to make room
    pub evicted: Vec<ChunkPosition>,
}

/// What to do with a worker result once the world has taken it in.
#[derive(Debug)]
pub enum Integration {
    /// Show the mesh. `active` is false when the chunk was deactivated while
    /// its work was in flight.
    Display {
        /// The chunk the mesh belongs to
        position: ChunkPosition,
        /// Its surface
        mesh: MeshBuffers,
        /// Whether the chunk is inside the radius
        active: bool,
    },
    /// Nothing to show
    Discarded,
}

/// A ray hit on a block face, supplied by the input side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// Where the ray met the surface, in world units
    pub point: Point3<f32>,
    /// Outward unit normal of the face that was hit
    pub normal: Vector3<f32>,
}

impl RaycastHit {
    /// The block that was hit: half a cell behind the face.
    pub fn block_position(&self) -> Point3<i32> {
        floor_point(self.point - self.normal * 0.5)
    }

    /// The empty cell in front of the face that was hit.
    pub fn placement_position(&self) -> Point3<i32> {
        floor_point(self.point + self.normal * 0.5)
    }
}

fn floor_point(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// The set of chunks around the observer.
pub struct World {
    radius: i32,
    center: Option<ChunkPosition>,
    active: HashMap<ChunkPosition, TrackedChunk>,
    inactive: LruCache<ChunkPosition, TrackedChunk>,
    /// Evicted while a request was outstanding; re-entry waits for its result
    orphaned: HashSet<ChunkPosition>,
}

impl World {
    /// Creates an empty world with the configured radius and cache size.
    pub fn new(config: &WorldConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.inactive_cache_capacity).unwrap_or(NonZeroUsize::MIN);
        World {
            radius: config.radius.max(0),
            center: None,
            active: HashMap::new(),
            inactive: LruCache::new(capacity),
            orphaned: HashSet::new(),
        }
    }

    /// Streaming radius in chunks.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// The observer chunk of the last streaming pass.
    pub fn center(&self) -> Option<ChunkPosition> {
        self.center
    }

    /// Re-centres the tracked set on the observer's chunk.
    ///
    /// Chunks beyond the radius are deactivated. Then every position within
    /// the radius is visited nearest first: unseen positions get a placeholder
    /// and a fresh request, cached ones are reactivated, and edited ones hand
    /// their grid out for a remesh.
    pub fn update(&mut self, observer_chunk: ChunkPosition) -> StreamingUpdate {
        let mut update = StreamingUpdate::default();
        self.center = Some(observer_chunk);

        let mut leaving: Vec<ChunkPosition> = self
            .active
            .keys()
            .filter(|position| ring_distance(**position, observer_chunk) > self.radius)
            .copied()
            .collect();
        leaving.sort_by_key(|position| (position.x, position.y));
        for position in leaving {
            if let Some(tracked) = self.active.remove(&position) {
                self.cache(position, tracked, &mut update.evicted);
                update.deactivated.push(position);
            }
        }

        for position in RingIterator::new(observer_chunk, self.radius) {
            if let Some(tracked) = self.active.get_mut(&position) {
                update.regenerate.extend(tracked.take_for_regeneration());
                continue;
            }

            if let Some(mut tracked) = self.inactive.pop(&position) {
                update.regenerate.extend(tracked.take_for_regeneration());
                self.active.insert(position, tracked);
                update.reactivated.push(position);
                continue;
            }

            if self.orphaned.contains(&position) {
                continue;
            }

            self.active.insert(position, TrackedChunk::queued());
            update.fresh.push(position);
        }

        update
    }

    fn cache(
        &mut self,
        position: ChunkPosition,
        tracked: TrackedChunk,
        evicted: &mut Vec<ChunkPosition>,
    ) {
        if let Some((dropped, chunk)) = self.inactive.push(position, tracked) {
            if dropped != position {
                debug!("Evicting cached chunk {:?}", dropped);
                if chunk.is_outstanding() {
                    self.orphaned.insert(dropped);
                }
                evicted.push(dropped);
            }
        }
    }

    /// Takes a worker result back into the chunk it was made for.
    pub fn integrate(&mut self, result: GenerationResult) -> Integration {
        let GenerationResult { position, outcome } = result;

        let (tracked, active) = match self.active.get_mut(&position) {
            Some(tracked) => (tracked, true),
            None => match self.inactive.peek_mut(&position) {
                Some(tracked) => (tracked, false),
                None => {
                    if !self.orphaned.remove(&position) {
                        warn!("Dropping result for untracked chunk {:?}", position);
                    }
                    return Integration::Discarded;
                }
            },
        };

        match outcome {
            GenerationOutcome::Fresh { grid, mesh }
            | GenerationOutcome::Regenerated { grid, mesh } => {
                tracked.restore(grid);
                Integration::Display {
                    position,
                    mesh,
                    active,
                }
            }
            GenerationOutcome::Failed { grid: Some(grid) } => {
                tracked.restore(grid);
                Integration::Discarded
            }
            GenerationOutcome::Failed { grid: None } => {
                tracked.state = ChunkState::Failed;
                tracked.pending_edits.clear();
                Integration::Discarded
            }
        }
    }

    fn tracked_mut(&mut self, position: ChunkPosition) -> Option<&mut TrackedChunk> {
        match self.active.get_mut(&position) {
            Some(tracked) => Some(tracked),
            None => self.inactive.peek_mut(&position),
        }
    }

    fn tracked(&self, position: ChunkPosition) -> Option<&TrackedChunk> {
        self.active
            .get(&position)
            .or_else(|| self.inactive.peek(&position))
    }

    /// Writes one block, or air for `None`.
    ///
    /// A write on a horizontal chunk border is mirrored into the rim of every
    /// adjacent chunk that is tracked. Every chunk written is marked for a
    /// remesh; terrain is never recomputed.
    ///
    /// # Returns
    /// The positions of the chunks that were written, owner first.
    pub fn set_block(
        &mut self,
        world_position: Point3<i32>,
        block_type: Option<BlockType>,
    ) -> Result<Vec<ChunkPosition>> {
        if !(0..CHUNK_HEIGHT).contains(&world_position.y) {
            return Err(EngineError::OutOfBounds {
                y: world_position.y,
            });
        }

        let owner = chunk_position_of(world_position.x, world_position.z);
        let (x, z) = local_column_of(world_position.x, world_position.z);
        let y = world_position.y;

        let owner_chunk = self
            .tracked_mut(owner)
            .filter(|tracked| tracked.state != ChunkState::Failed)
            .ok_or(EngineError::ChunkNotLoaded(owner))?;
        owner_chunk.write(Point3::new(x, y, z), block_type);
        let mut touched = vec![owner];

        let last = CHUNK_DIMENSION - 1;
        let mut mirrors = Vec::with_capacity(2);
        if x == 0 {
            mirrors.push((Vector3::new(-1, 0, 0), Point3::new(CHUNK_DIMENSION, y, z)));
        }
        if x == last {
            mirrors.push((Vector3::new(1, 0, 0), Point3::new(-1, y, z)));
        }
        if z == 0 {
            mirrors.push((Vector3::new(0, 0, -1), Point3::new(x, y, CHUNK_DIMENSION)));
        }
        if z == last {
            mirrors.push((Vector3::new(0, 0, 1), Point3::new(x, y, -1)));
        }

        for (direction, rim) in mirrors {
            let neighbour = ChunkPosition::new(owner.x + direction.x, owner.y + direction.z);
            if let Some(tracked) = self.tracked_mut(neighbour) {
                if tracked.write(rim, block_type) {
                    touched.push(neighbour);
                }
            }
        }

        Ok(touched)
    }

    /// Clears one block. Same as [`set_block`](Self::set_block) with `None`.
    pub fn remove_block(&mut self, world_position: Point3<i32>) -> Result<Vec<ChunkPosition>> {
        self.set_block(world_position, None)
    }

    /// Removes the block a ray hit. Does nothing without a hit.
    pub fn break_targeted(&mut self, hit: Option<RaycastHit>) -> Result<Option<Point3<i32>>> {
        let Some(hit) = hit else {
            return Ok(None);
        };
        let position = hit.block_position();
        self.remove_block(position)?;
        Ok(Some(position))
    }

    /// Places a block against the face a ray hit. Does nothing without a hit.
    pub fn place_targeted(
        &mut self,
        hit: Option<RaycastHit>,
        block_type: BlockType,
    ) -> Result<Option<Point3<i32>>> {
        let Some(hit) = hit else {
            return Ok(None);
        };
        let position = hit.placement_position();
        self.set_block(position, Some(block_type))?;
        Ok(Some(position))
    }

    /// The block type at a world position, `None` for air.
    ///
    /// Fails with [`EngineError::ChunkNotLoaded`] when the owning chunk's grid
    /// is not held by the world right now.
    pub fn block_at(&self, world_position: Point3<i32>) -> Result<Option<BlockType>> {
        if !(0..CHUNK_HEIGHT).contains(&world_position.y) {
            return Err(EngineError::OutOfBounds {
                y: world_position.y,
            });
        }
        let owner = chunk_position_of(world_position.x, world_position.z);
        let (x, z) = local_column_of(world_position.x, world_position.z);
        let grid = self.chunk(owner).ok_or(EngineError::ChunkNotLoaded(owner))?;
        Ok(grid
            .get_local(Point3::new(x, world_position.y, z))
            .map(|block| block.block_type))
    }

    /// The grid of a tracked chunk, active or cached, if the world holds it.
    pub fn chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.tracked(position)?.grid.as_deref()
    }

    /// Lifecycle state of a tracked chunk.
    pub fn chunk_state(&self, position: ChunkPosition) -> Option<ChunkState> {
        self.tracked(position).map(|tracked| tracked.state)
    }

    /// Whether a chunk is inside the radius and tracked.
    pub fn is_active(&self, position: ChunkPosition) -> bool {
        self.active.contains_key(&position)
    }

    /// Whether a chunk sits in the inactive cache.
    pub fn is_cached(&self, position: ChunkPosition) -> bool {
        self.inactive.contains(&position)
    }

    /// Positions of the active chunks, sorted.
    pub fn tracked_positions(&self) -> Vec<ChunkPosition> {
        let mut positions: Vec<_> = self.active.keys().copied().collect();
        positions.sort_by_key(|position| (position.x, position.y));
        positions
    }

    /// Positions with edits that have not been meshed yet, sorted.
    pub fn pending_regenerations(&self) -> Vec<ChunkPosition> {
        let mut positions: Vec<_> = self
            .active
            .iter()
            .chain(self.inactive.iter())
            .filter(|(_, tracked)| tracked.dirty)
            .map(|(position, _)| *position)
            .collect();
        positions.sort_by_key(|position| (position.x, position.y));
        positions
    }

    /// Whether any tracked chunk is still waiting on a worker.
    pub fn has_outstanding_work(&self) -> bool {
        !self.orphaned.is_empty()
            || self
                .active
                .values()
                .chain(self.inactive.iter().map(|(_, tracked)| tracked))
                .any(TrackedChunk::is_outstanding)
    }

    /// Whether an active chunk has edits that were not handed out yet.
    pub fn has_unmeshed_edits(&self) -> bool {
        self.active.values().any(|tracked| tracked.dirty)
    }

    /// Number of chunks in the inactive cache.
    pub fn cached_count(&self) -> usize {
        self.inactive.len()
    }
}
