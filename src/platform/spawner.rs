//! Native thread creation.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Everything needed to create one native thread.
pub struct SpawnRequest {
    /// Name to give the thread at creation, if any.
    pub name: Option<String>,
    /// Stack size in bytes; `None` uses the platform default.
    pub stack_size: Option<usize>,
    /// Entry point. Must be run exactly once on the new thread.
    pub entry: Box<dyn FnOnce() + Send + 'static>,
}

/// Creates native threads.
///
/// An implementation must either return `Err` without ever running the
/// request's entry point, or return the handle of a new thread that runs it
/// exactly once. A [`Thread`](crate::Thread) whose entry point is dropped
/// unrun after a successful spawn stays alive forever.
pub trait Spawner: Send + Sync {
    fn spawn(&self, request: SpawnRequest) -> io::Result<JoinHandle<()>>;
}

/// Spawner backed by [`std::thread::Builder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdSpawner;

impl Spawner for StdSpawner {
    fn spawn(&self, request: SpawnRequest) -> io::Result<JoinHandle<()>> {
        let mut builder = Builder::new();
        // std panics on interior NUL; such a name is simply not applied.
        if let Some(name) = request.name.filter(|name| !name.contains('\0')) {
            builder = builder.name(name);
        }
        if let Some(stack_size) = request.stack_size {
            builder = builder.stack_size(stack_size);
        }
        builder.spawn(request.entry)
    }
}
