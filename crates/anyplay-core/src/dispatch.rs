//! Control-thread dispatch
//!
//! All session mutation and event delivery happens on one designated
//! control thread. [`Dispatch`] is the sole marshaling primitive: run a
//! closure synchronously when already on the control thread, otherwise
//! enqueue it for the control thread's next pump.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send>;

/// Run-or-enqueue dispatcher bound to the thread that created it.
pub struct Dispatch {
    control: ThreadId,
    queue: Mutex<VecDeque<Job>>,
}

impl Dispatch {
    /// Create a dispatcher; the calling thread becomes the control thread.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            control: thread::current().id(),
            queue: Mutex::new(VecDeque::new()),
        })
    }

    pub fn is_control_thread(&self) -> bool {
        thread::current().id() == self.control
    }

    /// Run `job` synchronously if already on the control thread, else
    /// enqueue it for the next [`run_pending`](Self::run_pending).
    pub fn run(self: &Arc<Self>, job: impl FnOnce() + Send + 'static) {
        if self.is_control_thread() {
            job();
        } else {
            self.queue.lock().push_back(Box::new(job));
        }
    }

    /// Enqueue `job` after a delay, regardless of the calling thread.
    pub fn run_after(self: &Arc<Self>, delay: Duration, job: impl FnOnce() + Send + 'static) {
        let this = Arc::clone(self);
        thread::spawn(move || {
            thread::sleep(delay);
            this.queue.lock().push_back(Box::new(job));
        });
    }

    /// Drain enqueued jobs. Must be called from the control thread.
    /// Returns the number of jobs executed. Jobs enqueued by running jobs
    /// are executed in the same pump.
    pub fn run_pending(self: &Arc<Self>) -> usize {
        debug_assert!(self.is_control_thread(), "run_pending off the control thread");
        let mut executed = 0;
        loop {
            // The lock is not held while a job runs, so jobs may enqueue.
            let job = self.queue.lock().pop_front();
            match job {
                Some(job) => {
                    job();
                    executed += 1;
                }
                None => return executed,
            }
        }
    }

    /// Number of jobs waiting for the control thread.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}
