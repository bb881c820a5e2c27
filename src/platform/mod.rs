//! Native thread plumbing.
//!
//! Everything that touches the OS threading API lives here: creating the
//! native thread (behind the [`Spawner`] seam), identifying it, and the
//! best-effort naming and scheduling calls. Unix targets go through `libc`;
//! other targets get a fallback that reports [`PlatformError::Unsupported`].

use std::ffi::CString;
use std::fmt;
use std::thread::JoinHandle;

use crate::errors::PlatformError;

pub mod spawner;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as imp;

#[cfg(not(unix))]
#[path = "unsupported.rs"]
mod imp;

pub use spawner::{SpawnRequest, Spawner, StdSpawner};

/// Longest OS-level thread name in bytes, excluding the terminator.
///
/// Linux limits `comm` to 16 bytes including the NUL.
pub const MAX_OS_NAME_LEN: usize = 15;

/// Opaque handle to a native thread, as used for naming and scheduling calls.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RawThread(imp::Raw);

// The raw handle is a plain identifier; the OS owns the thread it names.
unsafe impl Send for RawThread {}
unsafe impl Sync for RawThread {}

impl RawThread {
    /// Handle of the calling OS thread.
    pub(crate) fn current() -> Self {
        RawThread(imp::current())
    }

    /// Handle of the thread behind a std join handle.
    pub(crate) fn of(handle: &JoinHandle<()>) -> Self {
        RawThread(imp::of(handle))
    }

    pub(crate) fn set_name(self, name: &str) -> Result<(), PlatformError> {
        imp::set_name(self.0, name)
    }

    pub(crate) fn set_priority(self, priority: i32) -> Result<(), PlatformError> {
        imp::set_priority(self.0, priority)
    }
}

/// Identifier of a native thread.
///
/// Two ids compare equal iff they name the same live OS thread. Ids of
/// threads that have been joined may be reused by the OS.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeId(RawThread);

impl NativeId {
    pub(crate) fn new(raw: RawThread) -> Self {
        NativeId(raw)
    }

    /// Id of the calling OS thread.
    pub fn current() -> Self {
        NativeId(RawThread::current())
    }

    /// The id as an integer, for logging.
    pub fn as_u64(self) -> u64 {
        imp::as_u64(self.0 .0)
    }
}

impl fmt::Debug for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeId({:#x})", self.as_u64())
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.as_u64())
    }
}

/// Convert a thread name to the form the OS accepts.
///
/// The name is cut to [`MAX_OS_NAME_LEN`] bytes on a character boundary.
/// Names with an interior NUL byte are rejected.
pub(crate) fn os_name(name: &str) -> Result<CString, PlatformError> {
    let mut end = name.len().min(MAX_OS_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    CString::new(&name[..end]).map_err(|_| PlatformError::InvalidName(name.to_owned()))
}
