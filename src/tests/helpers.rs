//! Test helper utilities and common functionality.

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use portable_atomic::{AtomicUsize, Ordering};

use crate::platform::{SpawnRequest, Spawner, StdSpawner};
use crate::sync::Promise;

/// Spawner that refuses every request, like an OS out of threads.
#[derive(Default)]
pub(crate) struct FailingSpawner {
    attempts: AtomicUsize,
}

impl FailingSpawner {
    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Spawner for FailingSpawner {
    fn spawn(&self, _request: SpawnRequest) -> io::Result<JoinHandle<()>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "simulated thread exhaustion",
        ))
    }
}

/// Spawner that delegates to `std` and counts successful spawns.
#[derive(Default)]
pub(crate) struct CountingSpawner {
    spawned: AtomicUsize,
}

impl CountingSpawner {
    pub(crate) fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }
}

impl Spawner for CountingSpawner {
    fn spawn(&self, request: SpawnRequest) -> io::Result<JoinHandle<()>> {
        let handle = StdSpawner.spawn(request)?;
        self.spawned.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }
}

/// Spawner that holds the join handle back for `delay` after spawning, so
/// the unit of work runs before the starter has recorded it.
pub(crate) struct SlowSpawner {
    pub(crate) delay: Duration,
}

impl Spawner for SlowSpawner {
    fn spawn(&self, request: SpawnRequest) -> io::Result<JoinHandle<()>> {
        let handle = StdSpawner.spawn(request)?;
        std::thread::sleep(self.delay);
        Ok(handle)
    }
}

/// A closed gate a unit of work can block on until the test opens it.
pub(crate) fn gate() -> Arc<Promise<()>> {
    Arc::new(Promise::new())
}

/// Run `f` and report how long it took.
pub(crate) fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Poll `condition` until it holds or `timeout` passes.
pub(crate) fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
