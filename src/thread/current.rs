//! Access to the calling thread.
//!
//! A thread started through [`Thread::start`](super::Thread::start) registers
//! itself for the duration of its unit of work, so code running inside it
//! gets back the owning [`Thread`] and can poll its interruption flag. Any
//! other OS thread (the main thread, threads spawned by `std` or foreign
//! code) is described by a [`ForeignThread`].

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use log::debug;
use portable_atomic::{AtomicBool, Ordering};

use super::{Thread, ThreadInner};
use crate::errors::ThreadResult;
use crate::platform::{NativeId, RawThread};

thread_local! {
    static OWNER: RefCell<Weak<ThreadInner>> = RefCell::new(Weak::new());
}

pub(super) fn register(inner: &Arc<ThreadInner>) {
    OWNER.with(|owner| *owner.borrow_mut() = Arc::downgrade(inner));
}

pub(super) fn unregister() {
    // Fails only during TLS teardown, when there is nothing left to clear.
    let _ = OWNER.try_with(|owner| *owner.borrow_mut() = Weak::new());
}

pub(super) fn is_current(inner: &Arc<ThreadInner>) -> bool {
    OWNER
        .try_with(|owner| Weak::as_ptr(&owner.borrow()) == Arc::as_ptr(inner))
        .unwrap_or(false)
}

/// The calling thread.
///
/// Not `Send`: a foreign thread is only guaranteed to exist while the code
/// that looked it up is running on it. Use [`thread`](Self::thread) to get a
/// sendable handle to an owned thread.
pub enum CurrentThread {
    /// Running the unit of work of a [`Thread`].
    Owned(Thread),
    /// Any other OS thread.
    Foreign(ForeignThread),
}

impl CurrentThread {
    pub(super) fn get() -> Self {
        let owner = OWNER
            .try_with(|owner| owner.borrow().upgrade())
            .ok()
            .flatten();
        match owner {
            Some(inner) => CurrentThread::Owned(Thread { inner }),
            None => CurrentThread::Foreign(ForeignThread::new()),
        }
    }

    pub fn id(&self) -> NativeId {
        match self {
            // The native handle is recorded by the starter right after
            // creation; the new thread can get here first.
            CurrentThread::Owned(thread) => thread.id().unwrap_or_else(NativeId::current),
            CurrentThread::Foreign(foreign) => foreign.id(),
        }
    }

    pub fn name(&self) -> Option<String> {
        match self {
            CurrentThread::Owned(thread) => thread.name(),
            CurrentThread::Foreign(foreign) => foreign.name(),
        }
    }

    pub fn set_name<T: Into<String>>(&self, name: T) {
        match self {
            CurrentThread::Owned(thread) => thread.set_name(name),
            CurrentThread::Foreign(foreign) => foreign.set_name(name),
        }
    }

    pub fn set_priority(&self, priority: i32) -> ThreadResult<()> {
        match self {
            CurrentThread::Owned(thread) => thread.set_priority(priority),
            CurrentThread::Foreign(foreign) => foreign.set_priority(priority),
        }
    }

    pub fn interrupt(&self) {
        match self {
            CurrentThread::Owned(thread) => thread.interrupt(),
            CurrentThread::Foreign(foreign) => foreign.interrupt(),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        match self {
            CurrentThread::Owned(thread) => thread.is_interrupted(),
            CurrentThread::Foreign(foreign) => foreign.is_interrupted(),
        }
    }

    /// The owning [`Thread`], if the caller is running one's unit of work.
    pub fn thread(&self) -> Option<&Thread> {
        match self {
            CurrentThread::Owned(thread) => Some(thread),
            CurrentThread::Foreign(_) => None,
        }
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, CurrentThread::Foreign(_))
    }
}

/// An OS thread this crate did not start.
///
/// There is no completion promise behind it, so it cannot be joined. The
/// interruption flag belongs to this wrapper alone: two lookups of the same
/// OS thread do not share it.
pub struct ForeignThread {
    raw: RawThread,
    name: spin::Mutex<Option<String>>,
    interrupted: AtomicBool,
    _not_send: PhantomData<*const ()>,
}

impl ForeignThread {
    fn new() -> Self {
        Self {
            raw: RawThread::current(),
            name: spin::Mutex::new(std::thread::current().name().map(str::to_owned)),
            interrupted: AtomicBool::new(false),
            _not_send: PhantomData,
        }
    }

    pub fn id(&self) -> NativeId {
        NativeId::new(self.raw)
    }

    /// Name known to `std` when this wrapper was created, or the last name set
    /// through it.
    pub fn name(&self) -> Option<String> {
        self.name.lock().clone()
    }

    /// Rename the OS thread, best effort.
    pub fn set_name<T: Into<String>>(&self, name: T) {
        let name = name.into();
        if let Err(error) = self.raw.set_name(&name) {
            debug!("could not rename thread to {:?}: {}", name, error);
        }
        *self.name.lock() = Some(name);
    }

    pub fn set_priority(&self, priority: i32) -> ThreadResult<()> {
        Ok(self.raw.set_priority(priority)?)
    }

    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}
