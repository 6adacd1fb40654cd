//! A single-threaded deferred task queue.
//!
//! This is the "next scheduling opportunity" of the event loop: work
//! scheduled here runs when the host calls [`TaskQueue::run_until_idle`],
//! never re-entrantly from inside the code that scheduled it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

/// Upper bound on tasks run by one `run_until_idle` call.
pub const MAX_TASKS_PER_RUN: usize = 10_000;

type Task = Box<dyn FnOnce()>;

/// FIFO queue of deferred tasks. Clones share the same queue.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer `task` to the next run.
    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    /// Run tasks until the queue is empty, including tasks scheduled by the
    /// tasks being run. Returns the number of tasks run.
    ///
    /// Stops after [`MAX_TASKS_PER_RUN`] tasks so a task that keeps
    /// rescheduling itself cannot hang the host.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while ran < MAX_TASKS_PER_RUN {
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
        warn!(
            pending = self.pending(),
            "task queue did not settle, leaving remaining tasks queued"
        );
        ran
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
