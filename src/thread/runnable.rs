//! Units of work executed on a spawned thread.

use std::sync::Arc;

/// A unit of work that can be run on a [`Thread`](super::Thread).
///
/// Long-running implementations should poll
/// [`current().is_interrupted()`](crate::current) at safe points; nothing
/// stops a runnable that ignores the flag.
pub trait Runnable: Send + Sync {
    fn run(&self);
}

impl<F> Runnable for F
where
    F: Fn() + Send + Sync,
{
    fn run(&self) {
        self()
    }
}

/// What a thread executes once started.
pub(crate) enum Work {
    Once(Box<dyn FnOnce() + Send + 'static>),
    Shared(Arc<dyn Runnable>),
}

impl Work {
    pub(crate) fn run(self) {
        match self {
            Work::Once(f) => f(),
            Work::Shared(runnable) => runnable.run(),
        }
    }
}
