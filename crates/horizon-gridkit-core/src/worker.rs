//! Dedicated background thread for search and index work.
//!
//! A [`Worker`] owns one thread and a bounded task queue. Tasks run
//! sequentially in submission order, which is what the search controller
//! relies on: an index rebuild queued before a query is always finished
//! before that query runs.
//!
//! Each task carries a callback that receives its result on the worker
//! thread. Callers that need results on their own thread forward them
//! through a channel and drain it from there.
//!
//! A task that panics is logged and dropped. The worker keeps running and
//! the callback is never invoked for that task.
//!
//! # Example
//!
//! ```
//! use horizon_gridkit_core::{Worker, WorkerBuilder};
//!
//! let worker: Worker<usize> = WorkerBuilder::new()
//!     .name("gridkit-search")
//!     .queue_capacity(16)
//!     .build()
//!     .unwrap();
//!
//! let length = worker.send_sync(|| "hello".len());
//! assert_eq!(length, Some(5));
//!
//! worker.stop_and_join();
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::error::WorkerError;
use crate::logging::targets;
use crate::token::CancellationToken;

/// Default capacity for the worker's task queue.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// How often an idle worker re-checks for shutdown.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for creating a Worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name for the worker thread.
    pub name: String,
    /// Stack size for the worker thread in bytes. `None` uses the default.
    pub stack_size: Option<usize>,
    /// Capacity of the task queue.
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "gridkit-worker".to_string(),
            stack_size: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Create a new configuration with the given thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Builder for creating Workers with custom configuration.
#[derive(Debug, Default)]
pub struct WorkerBuilder {
    config: WorkerConfig,
}

impl WorkerBuilder {
    /// Create a new WorkerBuilder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the stack size for the worker thread.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Set the task queue capacity. Zero is raised to one.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity.max(1);
        self
    }

    /// Spawn the worker thread.
    pub fn build<T: Send + 'static>(self) -> Result<Worker<T>, WorkerError> {
        Worker::with_config(self.config)
    }
}

/// State shared between the Worker handle and its thread.
struct WorkerState {
    /// Whether the worker accepts new tasks.
    running: AtomicBool,
    /// Set by [`Worker::stop`]; an idle thread exits once it sees this.
    cancellation: CancellationToken,
    /// Tasks queued or executing.
    pending_tasks: AtomicUsize,
}

type Task<T> = Box<dyn FnOnce() -> T + Send>;
type Callback<T> = Box<dyn FnOnce(T) + Send>;

enum Message<T> {
    Run { task: Task<T>, callback: Callback<T> },
    Shutdown,
}

/// A dedicated worker thread with its own task queue.
///
/// `T` is the result type produced by tasks. Any thread may submit tasks.
pub struct Worker<T: Send + 'static> {
    sender: Sender<Message<T>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    state: Arc<WorkerState>,
}

impl<T: Send + 'static> Worker<T> {
    /// Spawn a worker with default configuration.
    pub fn new() -> Result<Self, WorkerError> {
        Self::with_config(WorkerConfig::default())
    }

    /// Spawn a worker with custom configuration.
    ///
    /// Fails with [`WorkerError::SpawnFailed`] when the thread cannot be
    /// created.
    pub fn with_config(config: WorkerConfig) -> Result<Self, WorkerError> {
        let (sender, receiver) = bounded(config.queue_capacity.max(1));
        let state = Arc::new(WorkerState {
            running: AtomicBool::new(true),
            cancellation: CancellationToken::new(),
            pending_tasks: AtomicUsize::new(0),
        });

        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let thread_state = Arc::clone(&state);
        let handle = builder
            .spawn(move || worker_loop(&receiver, &thread_state))
            .map_err(WorkerError::SpawnFailed)?;

        tracing::debug!(target: targets::WORKER, name = %config.name, "worker started");
        Ok(Self {
            sender,
            handle: Mutex::new(Some(handle)),
            state,
        })
    }

    /// Whether the worker still accepts tasks.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Number of tasks queued or currently executing.
    pub fn pending_tasks(&self) -> usize {
        self.state.pending_tasks.load(Ordering::Acquire)
    }

    /// Queue `task`; its result is handed to `callback` on the worker thread.
    ///
    /// Returns `false` if the worker has been stopped or the queue is full.
    pub fn send_with_callback<F, C>(&self, task: F, callback: C) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.try_send_with_callback(task, callback).is_ok()
    }

    /// Like [`send_with_callback`](Self::send_with_callback), reporting why a
    /// task was rejected.
    pub fn try_send_with_callback<F, C>(&self, task: F, callback: C) -> Result<(), WorkerError>
    where
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        if !self.is_running() {
            return Err(WorkerError::Stopped);
        }
        self.state.pending_tasks.fetch_add(1, Ordering::AcqRel);
        let message = Message::Run {
            task: Box::new(task),
            callback: Box::new(callback),
        };
        self.sender.try_send(message).map_err(|err| {
            self.state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
            match err {
                TrySendError::Full(_) => {
                    tracing::warn!(target: targets::WORKER, "worker queue full, task rejected");
                    WorkerError::QueueFull
                }
                TrySendError::Disconnected(_) => WorkerError::Stopped,
            }
        })
    }

    /// Run `task` on the worker and block until it completes.
    ///
    /// Returns `None` if the task was rejected or panicked.
    pub fn send_sync<F>(&self, task: F) -> Option<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_sender, result_receiver) = bounded(1);
        let queued = self.send_with_callback(task, move |result| {
            let _ = result_sender.send(result);
        });
        // A panicking task drops the callback, which disconnects the channel.
        queued.then(|| result_receiver.recv().ok()).flatten()
    }

    /// Stop accepting tasks. Already queued tasks still run.
    ///
    /// Does not block.
    pub fn stop(&self) {
        if self.state.running.swap(false, Ordering::AcqRel) {
            tracing::debug!(target: targets::WORKER, "worker stopping");
        }
        self.state.cancellation.cancel();
        let _ = self.sender.try_send(Message::Shutdown);
    }

    /// Wait for the worker thread to finish.
    ///
    /// Returns `true` if the thread was joined, `false` if it was already
    /// joined or panicked.
    pub fn join(&self) -> bool {
        let handle = self.handle.lock().take();
        handle.is_some_and(|h| h.join().is_ok())
    }

    /// Stop the worker and wait for it to finish.
    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }
}

impl<T: Send + 'static> Drop for Worker<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

static_assertions::assert_impl_all!(Worker<String>: Send, Sync);

fn worker_loop<T: Send + 'static>(receiver: &Receiver<Message<T>>, state: &WorkerState) {
    loop {
        match receiver.recv_timeout(IDLE_POLL_INTERVAL) {
            Ok(Message::Run { task, callback }) => run(task, callback, state),
            Ok(Message::Shutdown) => {
                // Drain what was queued before the shutdown request.
                while let Ok(message) = receiver.try_recv() {
                    if let Message::Run { task, callback } = message {
                        run(task, callback, state);
                    }
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if state.cancellation.is_cancelled() && state.pending_tasks.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!(target: targets::WORKER, "worker loop exited");
}

fn run<T>(task: Task<T>, callback: Callback<T>, state: &WorkerState) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(task));
    // Settle the count before delivery so a woken caller sees it.
    state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
    match outcome {
        Ok(result) => callback(result),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(target: targets::WORKER, %message, "worker task panicked");
        }
    }
}
