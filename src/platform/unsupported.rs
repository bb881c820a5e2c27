//! Fallback for targets without a pthread API.
//!
//! Threads are still created through `std`, so identity works, but naming
//! after creation and priority changes are reported as unsupported.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread::{JoinHandle, ThreadId};

use crate::errors::PlatformError;

pub(super) type Raw = ThreadId;

pub(super) fn current() -> Raw {
    std::thread::current().id()
}

pub(super) fn of(handle: &JoinHandle<()>) -> Raw {
    handle.thread().id()
}

pub(super) fn as_u64(raw: Raw) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

pub(super) fn set_name(_thread: Raw, _name: &str) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported("thread naming"))
}

pub(super) fn set_priority(_thread: Raw, _priority: i32) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported("thread priority"))
}
