//! Background worker for running grid searches off the caller's thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::error::{Error, Result};
use crate::optimize::{
    GridSearchConfig, GridSearchOutcome, ProgressFn, run_grid_search_with_cancel,
};
use crate::sim::StationParams;

/// Request sent to the background worker
#[derive(Debug)]
pub enum OptimizeRequest {
    /// Run a full grid search
    Run {
        params: StationParams,
        config: GridSearchConfig,
    },
    /// Graceful shutdown
    Shutdown,
}

/// Response from the background worker
#[derive(Debug)]
pub enum WorkerResponse {
    /// A grid point finished
    Progress { completed: usize, total: usize },
    /// The search finished, possibly cancelled part way (boxed to reduce enum size)
    Finished(Box<GridSearchOutcome>),
    /// Validation failed before any simulation ran
    Failed(String),
}

/// Background worker that runs grid searches on a separate thread.
///
/// Each `Run` request yields zero or more [`WorkerResponse::Progress`]
/// messages followed by exactly one `Finished` or `Failed`.
pub struct OptimizerWorker {
    request_tx: Sender<OptimizeRequest>,
    response_rx: Receiver<WorkerResponse>,
    cancel_flag: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
    progress: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl OptimizerWorker {
    /// Create a new worker with a background thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let closing = Arc::new(AtomicBool::new(false));
        let progress = Arc::new(AtomicUsize::new(0));

        let ctx = WorkerContext {
            response_tx,
            cancel_flag: cancel_flag.clone(),
            closing: closing.clone(),
            progress: progress.clone(),
        };

        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            response_rx,
            cancel_flag,
            closing,
            progress,
            thread: Some(thread),
        }
    }

    /// Queue a request.
    ///
    /// Cancellation and progress are reset when the worker picks the request
    /// up, so a `cancel()` issued before queueing still stops the run in
    /// flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerDisconnected`] if the worker thread has exited.
    pub fn send(&self, request: OptimizeRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .map_err(|_| Error::WorkerDisconnected)
    }

    /// Block until the next response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerDisconnected`] if the worker thread has exited
    /// and no responses remain.
    pub fn recv(&self) -> Result<WorkerResponse> {
        self.response_rx
            .recv()
            .map_err(|_| Error::WorkerDisconnected)
    }

    /// Try to receive a response (non-blocking)
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        self.response_rx.try_recv().ok()
    }

    /// Grid points completed in the current run
    pub fn progress(&self) -> usize {
        self.progress.load(Ordering::SeqCst)
    }

    /// Request cancellation of the run in flight
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// Ask the worker thread to exit after the current request
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(OptimizeRequest::Shutdown);
    }
}

impl Default for OptimizerWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OptimizerWorker {
    fn drop(&mut self) {
        self.closing.store(true, Ordering::SeqCst);
        self.cancel();
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Shared state for the background worker thread.
struct WorkerContext {
    response_tx: Sender<WorkerResponse>,
    cancel_flag: Arc<AtomicBool>,
    /// Set on drop; queued requests are skipped.
    closing: Arc<AtomicBool>,
    progress: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<OptimizeRequest>) {
        while let Ok(request) = request_rx.recv() {
            if self.closing.load(Ordering::SeqCst) {
                break;
            }
            match request {
                OptimizeRequest::Shutdown => break,
                OptimizeRequest::Run { params, config } => {
                    self.cancel_flag.store(false, Ordering::SeqCst);
                    self.progress.store(0, Ordering::SeqCst);
                    let response = self.run_search(&params, &config);
                    if self.response_tx.send(response).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("optimizer worker exiting");
    }

    fn run_search(&self, params: &StationParams, config: &GridSearchConfig) -> WorkerResponse {
        let tx = self.response_tx.clone();
        let progress = self.progress.clone();
        let on_progress: &ProgressFn = &move |completed: usize, total: usize| {
            progress.store(completed, Ordering::SeqCst);
            let _ = tx.send(WorkerResponse::Progress { completed, total });
        };

        match run_grid_search_with_cancel(params, config, Some(on_progress), &self.cancel_flag) {
            Ok(outcome) => WorkerResponse::Finished(Box::new(outcome)),
            Err(e) => WorkerResponse::Failed(e.to_string()),
        }
    }
}
