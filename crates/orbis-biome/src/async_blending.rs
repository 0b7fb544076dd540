//! Parallel chunk blending on a worker pool.
//!
//! Blend tasks are queued on a bounded channel, executed by worker threads
//! against a shared classifier, and delivered back through a second bounded
//! channel. Pending tasks can be cancelled.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;

use crate::blend::{BiomeBlender, WeightMap};
use crate::error::ClassifyError;
use crate::resolver::Classifier;

/// World position of a chunk's cell `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkOrigin {
    /// World x of the first cell.
    pub x: i64,
    /// World z of the first cell.
    pub z: i64,
}

impl ChunkOrigin {
    /// Origin at world `(x, z)`.
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }
}

/// A request to blend a single chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendTask {
    /// Chunk to blend.
    pub origin: ChunkOrigin,
    /// Scatter seed.
    pub seed: i64,
}

/// A finished blend.
#[derive(Debug)]
pub struct BlendedChunk {
    /// The chunk origin matching the original task.
    pub origin: ChunkOrigin,
    /// The weight map, or the classification error that aborted the chunk.
    pub result: Result<WeightMap, ClassifyError>,
    /// Blend time in microseconds.
    pub blend_time_us: u64,
}

struct QueuedTask {
    task: BlendTask,
    cancelled: Arc<AtomicBool>,
}

/// Blends chunks on a pool of background threads.
pub struct AsyncChunkBlender {
    task_sender: Sender<QueuedTask>,
    /// Finished chunks paired with the flag they were submitted under.
    result_receiver: Receiver<(BlendedChunk, Arc<AtomicBool>)>,
    /// Cancellation flag per queued or running chunk.
    active_tasks: Arc<DashMap<ChunkOrigin, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl AsyncChunkBlender {
    /// Spawn `thread_count` workers sharing `blender` and `classifier`.
    ///
    /// - `max_concurrent`: task queue holds up to twice this many tasks; further
    ///   submissions are rejected.
    /// - `result_capacity`: bounded capacity of the result channel.
    ///
    /// Workers exit once the pool is dropped and the queue drains.
    pub fn new(
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
        blender: Arc<BiomeBlender>,
        classifier: Arc<dyn Classifier>,
    ) -> io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<QueuedTask>(max_concurrent.max(1) * 2);
        let (result_sender, result_receiver) = bounded(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for index in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let blender = Arc::clone(&blender);
            let classifier = Arc::clone(&classifier);

            std::thread::Builder::new()
                .name(format!("biome-blend-worker-{index}"))
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        if queued.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let result = blend_chunk_sync(&blender, classifier.as_ref(), &queued.task);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if let Err(err) = &result {
                            tracing::warn!(
                                x = queued.task.origin.x,
                                z = queued.task.origin.z,
                                error = %err,
                                "chunk blend failed"
                            );
                        }

                        if !queued.cancelled.load(Ordering::Relaxed) {
                            let chunk = BlendedChunk {
                                origin: queued.task.origin,
                                result,
                                blend_time_us: elapsed,
                            };
                            let _ = sender.send((chunk, queued.cancelled));
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::debug!(threads = thread_count.max(1), max_concurrent, "blend workers started");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Create a pool sized to the machine, leaving two cores for the caller.
    pub fn with_defaults(
        blender: Arc<BiomeBlender>,
        classifier: Arc<dyn Classifier>,
    ) -> io::Result<Self> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(threads, 64, 128, blender, classifier)
    }

    /// Queue a chunk for blending.
    ///
    /// Resubmitting a pending origin makes the new task the one that
    /// [`cancel`](Self::cancel) and [`is_pending`](Self::is_pending) track.
    /// Returns `Err(task)` if the queue is full, leaving any earlier
    /// submission for the origin tracked.
    pub fn submit(&self, task: BlendTask) -> Result<(), BlendTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let previous = self.active_tasks.insert(task.origin, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedTask { task, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let QueuedTask { task, cancelled } = e.into_inner();
                match previous {
                    Some(flag) => {
                        self.active_tasks.insert(task.origin, flag);
                    }
                    None => {
                        self.active_tasks
                            .remove_if(&task.origin, |_, flag| Arc::ptr_eq(flag, &cancelled));
                    }
                }
                task
            })
    }

    /// Cancel a queued or running blend. No-op if it already finished.
    pub fn cancel(&self, origin: &ChunkOrigin) {
        if let Some((_, cancelled)) = self.active_tasks.remove(origin) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Take every finished chunk without blocking.
    pub fn drain_results(&self) -> Vec<BlendedChunk> {
        let mut results = Vec::new();
        while let Ok((chunk, flag)) = self.result_receiver.try_recv() {
            // A newer submission for the same origin keeps its entry.
            self.active_tasks
                .remove_if(&chunk.origin, |_, current| Arc::ptr_eq(current, &flag));
            results.push(chunk);
        }
        results
    }

    /// Number of tasks currently queued or running.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a blend for `origin` is queued or running.
    pub fn is_pending(&self, origin: &ChunkOrigin) -> bool {
        self.active_tasks.contains_key(origin)
    }
}

/// Blend one chunk on the calling thread. This is what the workers run.
pub fn blend_chunk_sync(
    blender: &BiomeBlender,
    classifier: &dyn Classifier,
    task: &BlendTask,
) -> Result<WeightMap, ClassifyError> {
    blender.blend_for_chunk(task.seed, task.origin.x, task.origin.z, |x, z| {
        classifier.classify(x, z)
    })
}
