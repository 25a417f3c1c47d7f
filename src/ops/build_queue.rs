//! Single-slot serialization of compiler runs.
//!
//! Hot updates can arrive faster than the compiler finishes. The queue keeps
//! at most one build running and at most one waiting; any further request
//! made while a build is waiting shares that build's result instead of
//! scheduling another run. Every caller therefore observes a build that
//! started after its request.

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::error::{CompilerError, FailureReason};
use crate::ops::gleam_build::BuildResult;
use crate::util::Logger;

type Outcome = Result<BuildResult, CompilerError>;

#[derive(Debug, Default)]
struct Slot {
    running: bool,
    pending: bool,
    /// Number of builds started so far
    started: u64,
    /// Callers blocked on the queue
    waiting: usize,
    /// Generation and outcome of the last finished build
    last: Option<(u64, Outcome)>,
}

/// Serializes builds: one in flight, one pending.
#[derive(Debug, Default)]
pub struct BuildQueue {
    slot: Mutex<Slot>,
    cond: Condvar,
    log: Logger,
}

impl BuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue reporting through `log`.
    pub fn with_logger(log: Logger) -> Self {
        BuildQueue {
            log,
            ..Self::default()
        }
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Run `job`, or wait for a build that will satisfy this request.
    pub fn run<F>(&self, job: F) -> Outcome
    where
        F: FnOnce() -> Outcome,
    {
        let mut slot = self.lock();

        if !slot.running && !slot.pending {
            slot.running = true;
            slot.started += 1;
            let generation = slot.started;
            drop(slot);
            return self.execute(generation, job);
        }

        // The next build to start is the first one that began after this request.
        let target = slot.started + 1;
        let owns_pending = !slot.pending;
        if owns_pending {
            slot.pending = true;
        } else {
            self.log.detail("[queue] build already pending, coalescing request");
        }

        slot.waiting += 1;
        loop {
            let finished = match slot.last {
                Some((generation, ref outcome)) if generation >= target => Some(outcome.clone()),
                _ => None,
            };
            if let Some(outcome) = finished {
                slot.waiting -= 1;
                return outcome;
            }
            if owns_pending && !slot.running {
                slot.waiting -= 1;
                slot.pending = false;
                slot.running = true;
                slot.started += 1;
                let generation = slot.started;
                drop(slot);
                return self.execute(generation, job);
            }
            slot = self
                .cond
                .wait(slot)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Check if a build is currently running.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Check if a build is waiting to start.
    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    /// Number of callers blocked waiting for a build.
    pub fn waiting(&self) -> usize {
        self.lock().waiting
    }

    fn execute<F>(&self, generation: u64, job: F) -> Outcome
    where
        F: FnOnce() -> Outcome,
    {
        let mut finish = Finish {
            queue: self,
            generation,
            outcome: None,
        };
        let outcome = job();
        finish.outcome = Some(outcome.clone());

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the slot when a build ends, including by unwinding.
struct Finish<'a> {
    queue: &'a BuildQueue,
    generation: u64,
    outcome: Option<Outcome>,
}

impl Drop for Finish<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            self.queue.log.error("build job panicked");
            Err(CompilerError {
                command: "gleam build".to_string(),
                reason: FailureReason::Aborted,
                stdout: String::new(),
                stderr: String::new(),
            })
        });

        let mut slot = self.queue.lock();
        slot.running = false;
        slot.last = Some((self.generation, outcome));
        drop(slot);
        self.queue.cond.notify_all();
    }
}
