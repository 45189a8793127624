//! The worker thread and its FIFO queue.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, error, info};

use crate::error::PipelineError;
use crate::outcome::TaskOutcome;

type Job<S> = Box<dyn FnOnce(&mut S) -> TaskOutcome + Send>;

struct Task<S> {
    name: String,
    seq: u64,
    job: Job<S>,
}

/// A named worker thread that runs tasks against state `S`, one at a time,
/// in submission order.
///
/// The state is built on the worker thread and never leaves it, so `S` need
/// not be `Send`. Dropping the pipeline runs every queued task, then joins
/// the thread.
pub struct Pipeline<S> {
    name: String,
    sender: Option<Sender<Task<S>>>,
    handle: Option<JoinHandle<()>>,
    worker: ThreadId,
    next_seq: AtomicU64,
}

impl<S: 'static> Pipeline<S> {
    /// Starts the worker thread and builds its state with `init`.
    ///
    /// Blocks until `init` has run; its error is returned as
    /// [`PipelineError::Init`].
    pub fn spawn<I, E>(name: &str, init: I) -> Result<Self, PipelineError>
    where
        I: FnOnce() -> Result<S, E> + Send + 'static,
        E: fmt::Display,
    {
        let (sender, receiver) = unbounded::<Task<S>>();
        let (ready_tx, ready_rx) = bounded::<Result<(), String>>(1);
        let worker_name = name.to_string();

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let state = match init() {
                    Ok(state) => state,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run(&worker_name, state, receiver);
            })
            .map_err(|source| PipelineError::Spawn {
                name: name.to_string(),
                source,
            })?;

        let init_failure = match ready_rx.recv() {
            Ok(Ok(())) => None,
            Ok(Err(reason)) => Some(reason),
            Err(_) => Some("worker panicked during initialization".to_string()),
        };
        if let Some(reason) = init_failure {
            let _ = handle.join();
            return Err(PipelineError::Init {
                name: name.to_string(),
                reason,
            });
        }

        info!("pipeline {name} started");
        Ok(Self {
            name: name.to_string(),
            sender: Some(sender),
            worker: handle.thread().id(),
            handle: Some(handle),
            next_seq: AtomicU64::new(0),
        })
    }

    /// Queues a task and returns its sequence number.
    pub fn submit<F>(&self, name: &str, action: F) -> Result<u64, PipelineError>
    where
        F: FnOnce(&mut S) -> TaskOutcome + Send + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let task = Task {
            name: name.to_string(),
            seq,
            job: Box::new(action),
        };
        let sender = self.sender.as_ref().ok_or_else(|| self.stopped())?;
        sender.send(task).map_err(|_| self.stopped())?;
        debug!("task {name} #{seq} queued");
        Ok(seq)
    }

    /// Runs `f` on the worker after every task queued before it, and returns
    /// its result.
    pub fn call<R, F>(&self, name: &str, f: F) -> Result<R, PipelineError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        if thread::current().id() == self.worker {
            return Err(PipelineError::Reentrant {
                task: name.to_string(),
            });
        }
        let (result_tx, result_rx) = bounded(1);
        self.submit(name, move |state| {
            let _ = result_tx.send(f(state));
            TaskOutcome::Completed
        })?;
        result_rx.recv().map_err(|_| PipelineError::Aborted {
            task: name.to_string(),
        })
    }

    /// Blocks until every task queued before this call has finished.
    pub fn barrier(&self) -> Result<(), PipelineError> {
        self.call("barrier", |_| ())
    }

    /// Runs the remaining queued tasks, then stops the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Returns the pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn stopped(&self) -> PipelineError {
        PipelineError::Stopped {
            name: self.name.clone(),
        }
    }
}

impl<S> Pipeline<S> {
    fn stop(&mut self) {
        // Closing the channel ends the worker loop once the queue is empty.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("pipeline {} worker panicked", self.name);
            }
        }
    }
}

impl<S> Drop for Pipeline<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S>(pipeline: &str, mut state: S, receiver: Receiver<Task<S>>) {
    while let Ok(Task { name, seq, job }) = receiver.recv() {
        match panic::catch_unwind(AssertUnwindSafe(|| job(&mut state))) {
            Ok(TaskOutcome::Completed) => debug!("task {name} #{seq} completed"),
            Ok(TaskOutcome::Cancelled) => debug!("task {name} #{seq} cancelled"),
            Ok(TaskOutcome::Failed(reason)) => error!("task {name} #{seq} failed: {reason}"),
            Err(payload) => error!("task {name} #{seq} panicked: {}", panic_message(&payload)),
        }
    }
    info!("pipeline {pipeline} stopped");
}

fn panic_message(payload: &Box<dyn Any + Send>) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
