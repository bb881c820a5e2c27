//! pthread-backed implementation.

use std::mem;
use std::os::unix::thread::JoinHandleExt;
use std::thread::JoinHandle;

use crate::errors::PlatformError;

pub(super) type Raw = libc::pthread_t;

pub(super) fn current() -> Raw {
    // SAFETY: pthread_self has no preconditions.
    unsafe { libc::pthread_self() }
}

pub(super) fn of(handle: &JoinHandle<()>) -> Raw {
    // std and this crate may link different libc versions; the cast goes
    // through an integer so both integer and pointer pthread_t line up.
    handle.as_pthread_t() as usize as Raw
}

pub(super) fn as_u64(raw: Raw) -> u64 {
    raw as usize as u64
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(super) fn set_name(thread: Raw, name: &str) -> Result<(), PlatformError> {
    let name = super::os_name(name)?;
    // SAFETY: `thread` has not been joined (callers hold the handle lock) and
    // `name` is a NUL-terminated string within the kernel's length limit.
    check(unsafe { libc::pthread_setname_np(thread, name.as_ptr()) })
}

#[cfg(target_vendor = "apple")]
pub(super) fn set_name(thread: Raw, name: &str) -> Result<(), PlatformError> {
    // Darwin can only name the calling thread.
    // SAFETY: both arguments are valid pthread handles.
    if unsafe { libc::pthread_equal(thread, libc::pthread_self()) } == 0 {
        return Err(PlatformError::Unsupported("renaming another thread"));
    }
    let name = super::os_name(name)?;
    // SAFETY: `name` is a NUL-terminated string.
    check(unsafe { libc::pthread_setname_np(name.as_ptr()) })
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_vendor = "apple")))]
pub(super) fn set_name(_thread: Raw, _name: &str) -> Result<(), PlatformError> {
    Err(PlatformError::Unsupported("thread naming"))
}

pub(super) fn set_priority(thread: Raw, priority: i32) -> Result<(), PlatformError> {
    let mut policy: libc::c_int = 0;
    // SAFETY: sched_param is plain old data and all-zero is a valid value.
    let mut param: libc::sched_param = unsafe { mem::zeroed() };

    // SAFETY: `thread` has not been joined and both out-pointers are valid.
    check(unsafe { libc::pthread_getschedparam(thread, &mut policy, &mut param) })?;
    param.sched_priority = priority;
    // SAFETY: as above; only the priority field differs from what the OS reported.
    check(unsafe { libc::pthread_setschedparam(thread, policy, &param) })
}

fn check(rc: libc::c_int) -> Result<(), PlatformError> {
    if rc == 0 {
        Ok(())
    } else {
        Err(PlatformError::Os(rc))
    }
}
