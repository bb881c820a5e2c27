#![deny(unsafe_op_in_unsafe_fn)]
#![warn(unreachable_pub)]

//! One-shot native threads with a promise-backed completion signal.
//!
//! Each [`Thread`] wraps exactly one OS thread, started at most once. The
//! crate provides:
//!
//! - blocking [`join`](Thread::join) and [`join_timeout`](Thread::join_timeout)
//!   on top of a one-shot [`Promise`]
//! - cooperative interruption through a sticky flag the unit of work polls
//! - liveness introspection via [`is_alive`](Thread::is_alive)
//! - best-effort OS-level naming and priority control
//!
//! # Quick Start
//!
//! ```
//! use native_threads::{current, Thread};
//!
//! let worker = Thread::named("worker", || {
//!     while !current().is_interrupted() {
//!         Thread::sleep(1);
//!     }
//! });
//!
//! worker.start();
//! assert!(!worker.join_millis(20));
//! worker.interrupt();
//! worker.join();
//! assert!(!worker.is_alive());
//! ```
//!
//! # Non-goals
//!
//! There is no scheduler, pool or restart: a started thread is never
//! re-used. Interruption never preempts; a unit of work that ignores the
//! flag runs to completion.

pub mod errors;
pub mod platform;
pub mod sync;
pub mod thread;

#[cfg(test)]
mod tests;

// ============================================================================
// Public API
// ============================================================================

// Threads
pub use thread::{CurrentThread, ForeignThread, Runnable, Thread, ThreadBuilder};

// Completion
pub use sync::Promise;

// Platform
pub use platform::{NativeId, SpawnRequest, Spawner, StdSpawner};

// Errors
pub use errors::{ExecutionError, PlatformError, PromiseError, SpawnError, ThreadError, ThreadResult};

// ============================================================================
// Convenience Functions
// ============================================================================

/// The calling thread.
///
/// Inside the unit of work of a started [`Thread`] this is
/// [`CurrentThread::Owned`], which shares the interruption flag of that
/// thread.
#[inline]
pub fn current() -> CurrentThread {
    Thread::current()
}

/// Block the calling thread for `millis` milliseconds.
#[inline]
pub fn sleep(millis: u32) {
    Thread::sleep(millis)
}
