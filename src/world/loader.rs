//! Background chunk generation pipeline.
//!
//! A single worker thread turns requested coordinates into `ChunkData`
//! via crossbeam channels: requests flow in, finished payloads flow back,
//! and a shared cancelled-coordinate set filters both sides. The worker
//! blocks on an empty queue instead of spinning, never touches entity
//! state, and holds no lock while generating.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use glam::IVec2;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::constants::RESULT_DRAIN_BATCH;
use crate::core::chunk_data::ChunkData;
use crate::core::config::WorldConfig;
use crate::world::generator;

/// One finished chunk handed back to the main thread.
pub struct GenerationResult {
    pub coord: IVec2,
    pub data: ChunkData,
}

/// Owns the worker thread and the channel pair. Dropping the handler
/// closes the request channel, which shuts the worker down.
pub struct AsyncGenerationHandler {
    request_tx: Sender<IVec2>,
    result_rx: Receiver<GenerationResult>,
    cancelled: Arc<Mutex<FxHashSet<IVec2>>>,
    pending: FxHashSet<IVec2>,
}

impl AsyncGenerationHandler {
    /// Spawn the worker with a read-only config snapshot. Config changes
    /// require building a fresh handler.
    pub fn new(config: Arc<WorldConfig>) -> Self {
        let (request_tx, request_rx) = unbounded::<IVec2>();
        let (result_tx, result_rx) = unbounded::<GenerationResult>();
        let cancelled: Arc<Mutex<FxHashSet<IVec2>>> = Arc::new(Mutex::new(FxHashSet::default()));

        let worker_cancelled = Arc::clone(&cancelled);
        thread::Builder::new()
            .name("terrain-gen".to_string())
            .spawn(move || {
                while let Ok(coord) = request_rx.recv() {
                    // Consume the cancellation mark; each cancel skips one request.
                    if worker_cancelled.lock().remove(&coord) {
                        continue;
                    }
                    let data = generator::generate_chunk_data(coord, &config);
                    if result_tx.send(GenerationResult { coord, data }).is_err() {
                        // Main thread is gone, exit
                        break;
                    }
                }
            })
            .expect("failed to spawn terrain generation worker");

        Self {
            request_tx,
            result_rx,
            cancelled,
            pending: FxHashSet::default(),
        }
    }

    /// Enqueue a coordinate. Idempotent: an already-pending coordinate is
    /// not queued twice. Clears any earlier cancellation mark so a
    /// re-requested chunk is delivered normally.
    pub fn request_chunk(&mut self, coord: IVec2) {
        if self.pending.contains(&coord) {
            return;
        }
        self.cancelled.lock().remove(&coord);
        self.pending.insert(coord);
        let _ = self.request_tx.send(coord);
    }

    /// Mark a pending coordinate cancelled. If the worker has not picked
    /// it up yet it is skipped; an in-flight result is dropped on drain.
    pub fn cancel_request(&mut self, coord: IVec2) {
        if self.pending.remove(&coord) {
            self.cancelled.lock().insert(coord);
        }
    }

    /// Cancel everything still pending.
    pub fn cancel_all(&mut self) {
        let mut cancelled = self.cancelled.lock();
        for coord in self.pending.drain() {
            cancelled.insert(coord);
        }
    }

    pub fn is_pending(&self, coord: IVec2) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_coords(&self) -> Vec<IVec2> {
        self.pending.iter().copied().collect()
    }

    /// Non-blocking drain of finished chunks, at most `RESULT_DRAIN_BATCH`
    /// per call so one huge wave cannot stall the frame. Results whose
    /// coordinate was cancelled are discarded here, so a cancelled chunk
    /// is never delivered.
    pub fn drain_results(&mut self) -> Vec<GenerationResult> {
        let mut results = Vec::new();
        while results.len() < RESULT_DRAIN_BATCH {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    let was_pending = self.pending.remove(&result.coord);
                    if self.cancelled.lock().remove(&result.coord) || !was_pending {
                        debug!(coord = ?result.coord, "discarding cancelled or duplicate chunk result");
                        continue;
                    }
                    results.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        results
    }
}
