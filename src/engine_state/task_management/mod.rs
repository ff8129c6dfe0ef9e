//! # Task Management System
//!
//! A fixed pool of worker threads that build and remesh chunks off the driving
//! thread, under explicit back-pressure.
//!
//! ## Architecture Overview
//! - `WorkScheduler`: owns the workers, the request queues and the result sink
//! - `Gate`: one per worker; the driving side opens it once per tick, the
//!   worker closes it after its batch
//! - `GenerationRequest` / `GenerationResult`: the unit of work and its output
//!
//! ## Worker Loop
//! 1. Wait until the gate is open
//! 2. Leave if a stop was requested
//! 3. Service up to `batch_size` requests, each pop preferring a pending
//!    regeneration over a fresh request
//! 4. Publish every result into the shared sink
//! 5. Close the gate, leave if a stop was requested meanwhile, and wait again
//!
//! ## Synchronization
//! One lock guards both request structures so a pop from either is atomic.
//! A second lock guards the result sink. Neither is held while a worker builds
//! or meshes, and they are never nested. The driving thread never waits on a
//! worker except inside [`WorkScheduler::stop`].

mod gate;
pub mod task;

use std::{
    collections::{HashMap, VecDeque},
    mem,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use log::{info, warn};
use parking_lot::Mutex;

use self::{
    gate::Gate,
    task::{GenerationRequest, GenerationResult},
};
use crate::engine_state::{
    error::{EngineError, Result},
    voxels::{
        block::catalog::BlockTypeCatalog,
        chunk::{Chunk, ChunkPosition},
        terrain::TerrainGenerator,
    },
};

/// Pending work: a FIFO of fresh positions and a FIFO-ordered map of grids
/// awaiting a remesh, keyed by position.
#[derive(Debug, Default)]
struct RequestQueues {
    fresh: VecDeque<ChunkPosition>,
    regenerate_order: VecDeque<ChunkPosition>,
    regenerate: HashMap<ChunkPosition, Box<Chunk>>,
}

impl RequestQueues {
    fn pop(&mut self) -> Option<GenerationRequest> {
        while let Some(position) = self.regenerate_order.pop_front() {
            if let Some(grid) = self.regenerate.remove(&position) {
                return Some(GenerationRequest::Regenerate(grid));
            }
        }
        self.fresh.pop_front().map(GenerationRequest::Fresh)
    }
}

/// State shared between the scheduler handle and its workers.
struct Shared {
    requests: Mutex<RequestQueues>,
    results: Mutex<HashMap<ChunkPosition, GenerationResult>>,
    stop: AtomicBool,
    terrain: TerrainGenerator,
    catalog: Arc<BlockTypeCatalog>,
    batch_size: usize,
}

impl Shared {
    fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    fn pop_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().pop()
    }

    fn publish(&self, result: GenerationResult) {
        let position = result.position;
        if self.results.lock().insert(position, result).is_some() {
            warn!("Chunk {:?} published twice before integration", position);
        }
    }
}

/// A worker thread and its gate.
struct Worker {
    gate: Arc<Gate>,
    handle: Option<JoinHandle<()>>,
}

/// Gated multi-worker pipeline that builds and remeshes chunks.
///
/// Requests are admitted any time. Workers only pick them up after
/// [`open_gates`](Self::open_gates), at most `batch_size` each per opening.
pub struct WorkScheduler {
    shared: Arc<Shared>,
    workers: Vec<Worker>,
}

impl WorkScheduler {
    /// Starts `worker_count` workers, all waiting on closed gates.
    ///
    /// # Arguments
    /// * `worker_count` - Number of worker threads, at least one is started
    /// * `batch_size` - Requests a worker services per gate opening
    /// * `terrain` - The terrain field every fresh request is built from
    /// * `catalog` - UVs used when meshing
    ///
    /// # Returns
    /// The running scheduler, or [`EngineError::WorkerSpawn`] if the OS
    /// refused a thread. Workers started before the failure are stopped.
    pub fn new(
        worker_count: usize,
        batch_size: usize,
        terrain: TerrainGenerator,
        catalog: Arc<BlockTypeCatalog>,
    ) -> Result<Self> {
        let shared = Arc::new(Shared {
            requests: Mutex::new(RequestQueues::default()),
            results: Mutex::new(HashMap::new()),
            stop: AtomicBool::new(false),
            terrain,
            catalog,
            batch_size: batch_size.max(1),
        });

        info!(
            "Starting {} chunk workers, batch size {} (available parallelism: {:?})",
            worker_count.max(1),
            shared.batch_size,
            thread::available_parallelism()
        );

        let mut scheduler = WorkScheduler {
            shared,
            workers: Vec::with_capacity(worker_count.max(1)),
        };

        for index in 0..worker_count.max(1) {
            let gate = Arc::new(Gate::new());
            let handle = {
                let gate = gate.clone();
                let shared = scheduler.shared.clone();
                thread::Builder::new()
                    .name(format!("chunk-worker-{}", index))
                    .spawn(move || worker_loop(&shared, &gate))
                    .map_err(EngineError::WorkerSpawn)?
            };
            scheduler.workers.push(Worker {
                gate,
                handle: Some(handle),
            });
        }

        Ok(scheduler)
    }

    /// Queues a never-generated position.
    pub fn submit_fresh(&self, position: ChunkPosition) {
        self.shared.requests.lock().fresh.push_back(position);
    }

    /// Queues a grid for remeshing.
    ///
    /// A grid already pending for the same position is replaced and handed
    /// back; the newer grid keeps the older one's place in line.
    pub fn submit_regeneration(&self, grid: Box<Chunk>) -> Option<Box<Chunk>> {
        let position = grid.position;
        let mut requests = self.shared.requests.lock();
        let replaced = requests.regenerate.insert(position, grid);
        if replaced.is_none() {
            requests.regenerate_order.push_back(position);
        }
        replaced
    }

    /// Swaps the result sink for an empty one and returns what was in it.
    ///
    /// Results come back ordered by position so integration is reproducible.
    pub fn take_results(&self) -> Vec<GenerationResult> {
        let taken = mem::take(&mut *self.shared.results.lock());
        let mut results: Vec<_> = taken.into_values().collect();
        results.sort_by_key(|result| (result.position.x, result.position.y));
        results
    }

    /// Admits one more batch per worker.
    pub fn open_gates(&self) {
        for worker in &self.workers {
            worker.gate.open();
        }
    }

    /// Whether every worker has finished its batch and closed its gate.
    pub fn is_idle(&self) -> bool {
        self.workers.iter().all(|worker| !worker.gate.is_open())
    }

    /// Number of pending `(fresh, regeneration)` requests.
    pub fn pending_counts(&self) -> (usize, usize) {
        let requests = self.shared.requests.lock();
        (requests.fresh.len(), requests.regenerate.len())
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Asks every worker to leave and waits until all of them have.
    ///
    /// Items already being built are finished, not aborted. Requests still
    /// queued are dropped, including the rest of a batch in progress. Calling
    /// it again does nothing.
    pub fn stop(&mut self) {
        if self.workers.iter().all(|worker| worker.handle.is_none()) {
            return;
        }

        self.shared.stop.store(true, Ordering::Release);
        for worker in &self.workers {
            worker.gate.open();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    warn!("A chunk worker exited by panic");
                }
            }
        }
        info!("Chunk workers stopped");
    }
}

impl Drop for WorkScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: &Shared, gate: &Gate) {
    loop {
        gate.wait();
        if shared.is_stopping() {
            break;
        }

        for _ in 0..shared.batch_size {
            if shared.is_stopping() {
                break;
            }
            let Some(request) = shared.pop_request() else {
                break;
            };
            shared.publish(request.process(&shared.terrain, &shared.catalog));
        }

        gate.close();
        // A stop that reopened the gate mid-batch was just undone by `close`.
        if shared.is_stopping() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use cgmath::Point2;

    use super::{task::GenerationOutcome, *};
    use crate::engine_state::config::WorldConfig;

    fn scheduler(worker_count: usize, batch_size: usize) -> WorkScheduler {
        let config = WorldConfig {
            cave_generation_max: 4,
            ..Default::default()
        };
        let catalog =
            BlockTypeCatalog::atlas_grid(4, 4, |block_type, _| block_type.id() as u32).unwrap();
        WorkScheduler::new(
            worker_count,
            batch_size,
            TerrainGenerator::new(&config),
            Arc::new(catalog),
        )
        .unwrap()
    }

    fn run_until_idle(scheduler: &WorkScheduler) {
        scheduler.open_gates();
        while !scheduler.is_idle() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn nothing_runs_until_the_gates_open() {
        let scheduler = scheduler(2, 4);
        scheduler.submit_fresh(Point2::new(0, 0));
        thread::sleep(Duration::from_millis(20));
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.pending_counts(), (1, 0));
        assert!(scheduler.take_results().is_empty());

        run_until_idle(&scheduler);
        assert_eq!(scheduler.pending_counts(), (0, 0));
        assert_eq!(scheduler.take_results().len(), 1);
    }

    #[test]
    fn regeneration_is_serviced_before_fresh_work() {
        let scheduler = scheduler(1, 1);
        scheduler.submit_fresh(Point2::new(0, 0));
        scheduler.submit_regeneration(Box::new(Chunk::empty(Point2::new(5, 5))));

        run_until_idle(&scheduler);
        let results = scheduler.take_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, Point2::new(5, 5));
        assert!(matches!(
            results[0].outcome,
            GenerationOutcome::Regenerated { .. }
        ));
        assert_eq!(scheduler.pending_counts(), (1, 0));

        run_until_idle(&scheduler);
        let results = scheduler.take_results();
        assert_eq!(results[0].position, Point2::new(0, 0));
        assert!(matches!(results[0].outcome, GenerationOutcome::Fresh { .. }));
    }

    #[test]
    fn batch_size_bounds_work_per_opening() {
        let scheduler = scheduler(1, 2);
        for x in 0..5 {
            scheduler.submit_fresh(Point2::new(x, 0));
        }
        run_until_idle(&scheduler);
        assert_eq!(scheduler.take_results().len(), 2);
        assert_eq!(scheduler.pending_counts(), (3, 0));
    }

    #[test]
    fn resubmitting_a_pending_regeneration_replaces_it() {
        let scheduler = scheduler(1, 1);
        let position = Point2::new(1, 1);
        assert!(scheduler
            .submit_regeneration(Box::new(Chunk::empty(position)))
            .is_none());
        let replaced = scheduler.submit_regeneration(Box::new(Chunk::empty(position)));
        assert_eq!(replaced.map(|grid| grid.position), Some(position));
        assert_eq!(scheduler.pending_counts(), (0, 1));
    }

    #[test]
    fn stop_during_a_batch_returns_promptly() {
        let mut scheduler = scheduler(2, 4);
        for x in 0..16 {
            scheduler.submit_fresh(Point2::new(x, 0));
        }
        scheduler.open_gates();
        thread::sleep(Duration::from_millis(5));

        let (done, finished) = mpsc::channel();
        let stopper = thread::spawn(move || {
            scheduler.stop();
            done.send(scheduler.pending_counts()).unwrap();
        });
        let (fresh, _) = finished
            .recv_timeout(Duration::from_secs(30))
            .expect("stop did not return");
        stopper.join().unwrap();
        assert!(fresh > 0);
    }

    #[test]
    fn stop_between_batches_returns_promptly() {
        let mut scheduler = scheduler(3, 1);
        for round in 0..20 {
            scheduler.submit_fresh(Point2::new(round, 0));
            scheduler.open_gates();
        }
        let (done, finished) = mpsc::channel();
        thread::spawn(move || {
            scheduler.stop();
            done.send(()).unwrap();
        });
        finished
            .recv_timeout(Duration::from_secs(30))
            .expect("stop did not return");
    }

    #[test]
    fn stop_joins_every_worker() {
        let mut scheduler = scheduler(3, 1);
        scheduler.submit_fresh(Point2::new(0, 0));
        scheduler.stop();
        assert!(scheduler.workers.iter().all(|w| w.handle.is_none()));
        scheduler.stop();
        assert_eq!(scheduler.worker_count(), 3);
    }
}
