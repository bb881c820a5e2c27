use std::sync::Arc;

use super::runnable::{Runnable, Work};
use super::Thread;
use crate::platform::{Spawner, StdSpawner};

/// Configuration for a [`Thread`] before it is created.
///
/// ```
/// use native_threads::ThreadBuilder;
///
/// let thread = ThreadBuilder::new()
///     .name("worker")
///     .stack_size(256 * 1024)
///     .spawn(|| {});
/// thread.join();
/// ```
pub struct ThreadBuilder {
    name: Option<String>,
    stack_size: Option<usize>,
    priority: Option<i32>,
    spawner: Arc<dyn Spawner>,
}

impl ThreadBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            stack_size: None,
            priority: None,
            spawner: Arc::new(StdSpawner),
        }
    }

    pub fn name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// OS scheduling priority to apply right after the thread is created.
    ///
    /// Applied best-effort: a rejected value is logged and the thread keeps
    /// the priority it inherited.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replace the mechanism used to create the native thread.
    pub fn spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Create an unstarted thread that runs `work`.
    pub fn build<F>(self, work: F) -> Thread
    where
        F: FnOnce() + Send + 'static,
    {
        self.into_thread(Some(Work::Once(Box::new(work))))
    }

    /// Create an unstarted thread that runs a shared [`Runnable`].
    pub fn build_runnable(self, runnable: Arc<dyn Runnable>) -> Thread {
        self.into_thread(Some(Work::Shared(runnable)))
    }

    /// Create an unstarted thread with no unit of work; its run is a no-op.
    pub fn build_empty(self) -> Thread {
        self.into_thread(None)
    }

    /// Create a thread that runs `work` and start it.
    ///
    /// Creation failure does not surface here; see [`Thread::start`].
    pub fn spawn<F>(self, work: F) -> Thread
    where
        F: FnOnce() + Send + 'static,
    {
        let thread = self.build(work);
        thread.start();
        thread
    }

    fn into_thread(self, work: Option<Work>) -> Thread {
        Thread::from_parts(
            work,
            self.name,
            self.stack_size,
            self.priority,
            self.spawner,
        )
    }
}

impl Default for ThreadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
