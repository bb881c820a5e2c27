//! Native threads with a promise-backed completion signal.
//!
//! A [`Thread`] owns at most one native thread for its whole life. Starting
//! it allocates a [`Promise<bool>`](crate::sync::Promise) and spawns the
//! native thread; the promise resolves to `true` when the unit of work has
//! returned, or to `false` if the native thread could not be created (or the
//! unit of work panicked). Joiners wait on the promise first and reap the
//! native thread afterwards.
//!
//! While its unit of work runs, a thread holds a strong reference to its own
//! state. That reference is the liveness marker behind
//! [`Thread::is_alive`], and it also keeps the state valid if every user
//! handle is dropped mid-run: the native thread is then detached instead of
//! being torn down under its own feet.

use std::fmt;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};
use portable_atomic::{AtomicBool, Ordering};

pub mod builder;
pub mod current;
pub mod runnable;

pub use builder::ThreadBuilder;
pub use current::{CurrentThread, ForeignThread};
pub use runnable::Runnable;

use crate::errors::{PromiseError, SpawnError, ThreadError, ThreadResult};
use crate::platform::{NativeId, RawThread, SpawnRequest, Spawner};
use crate::sync::Promise;
use runnable::Work;

/// Handle to a one-shot native thread.
///
/// Cloning the handle is cheap; all clones refer to the same thread.
///
/// ```
/// use native_threads::Thread;
/// use std::time::Duration;
///
/// let thread = Thread::named("sleeper", || Thread::sleep(10));
/// assert!(!thread.is_alive());
///
/// thread.start();
/// thread.join_timeout(Duration::from_secs(5));
/// assert!(!thread.is_alive());
/// ```
#[derive(Clone)]
pub struct Thread {
    inner: Arc<ThreadInner>,
}

/// State shared between handles and the running native thread.
pub(crate) struct ThreadInner {
    name: spin::Mutex<Option<String>>,
    work: spin::Mutex<Option<Work>>,
    interrupted: AtomicBool,
    /// Set once, by the first call to `start`.
    execution: spin::Once<Promise<bool>>,
    /// OS calls against the raw handle are made with this lock held, so they
    /// never overlap the join that invalidates it.
    native: spin::Mutex<Option<Native>>,
    /// Self reference held from successful spawn until the unit of work returns.
    live: spin::Mutex<Option<Arc<ThreadInner>>>,
    spawn_error: spin::Mutex<Option<SpawnError>>,
    stack_size: Option<usize>,
    priority: Option<i32>,
    spawner: Arc<dyn Spawner>,
}

struct Native {
    raw: RawThread,
    /// `None` once a joiner has taken it to reap the thread.
    handle: Option<JoinHandle<()>>,
}

impl Native {
    fn unjoined(&self) -> Option<RawThread> {
        self.handle.as_ref().map(|_| self.raw)
    }
}

impl Thread {
    /// Create an unstarted thread that runs `work`.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        ThreadBuilder::new().build(work)
    }

    /// Create an unstarted, named thread that runs `work`.
    pub fn named<T, F>(name: T, work: F) -> Self
    where
        T: Into<String>,
        F: FnOnce() + Send + 'static,
    {
        ThreadBuilder::new().name(name).build(work)
    }

    /// Create an unstarted thread that runs a shared [`Runnable`].
    pub fn from_runnable(runnable: Arc<dyn Runnable>) -> Self {
        ThreadBuilder::new().build_runnable(runnable)
    }

    /// Create an unstarted thread without a unit of work.
    ///
    /// Starting it spawns a native thread that returns immediately.
    pub fn empty() -> Self {
        ThreadBuilder::new().build_empty()
    }

    pub fn builder() -> ThreadBuilder {
        ThreadBuilder::new()
    }

    pub(crate) fn from_parts(
        work: Option<Work>,
        name: Option<String>,
        stack_size: Option<usize>,
        priority: Option<i32>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Self {
            inner: Arc::new(ThreadInner {
                name: spin::Mutex::new(name),
                work: spin::Mutex::new(work),
                interrupted: AtomicBool::new(false),
                execution: spin::Once::new(),
                native: spin::Mutex::new(None),
                live: spin::Mutex::new(None),
                spawn_error: spin::Mutex::new(None),
                stack_size,
                priority,
                spawner,
            }),
        }
    }

    /// Spawn the native thread.
    ///
    /// Only the first call does anything; a thread is never restarted, even
    /// if creating the native thread failed. Failure does not panic or
    /// return an error: the thread never becomes alive, its execution promise
    /// resolves to `false`, and the cause is available from
    /// [`start_error`](Self::start_error).
    pub fn start(&self) {
        let mut first = false;
        let execution = self.inner.execution.call_once(|| {
            first = true;
            Promise::new()
        });
        if !first {
            return;
        }

        *self.inner.live.lock() = Some(Arc::clone(&self.inner));

        let inner = Arc::clone(&self.inner);
        let request = SpawnRequest {
            name: self.name(),
            stack_size: self.inner.stack_size,
            entry: Box::new(move || ThreadInner::run(inner)),
        };

        match self.inner.spawner.spawn(request) {
            Ok(handle) => {
                let raw = RawThread::of(&handle);
                let mut native = self.inner.native.lock();
                *native = Some(Native {
                    raw,
                    handle: Some(handle),
                });

                // Read under the handle lock so a concurrent rename is either
                // seen here or applied by `set_name` afterwards.
                let name = self.name();
                if let Some(name) = &name {
                    if let Err(error) = raw.set_name(name) {
                        debug!("could not name thread {:?}: {}", name, error);
                    }
                }
                if let Some(priority) = self.inner.priority {
                    if let Err(error) = raw.set_priority(priority) {
                        warn!(
                            "could not set priority {} on thread {:?}: {}",
                            priority, name, error
                        );
                    }
                }
                drop(native);

                debug!("started thread {:?}", name);
            }
            Err(error) => {
                self.inner.live.lock().take();

                let error = SpawnError::from(&error);
                warn!("failed to start thread {:?}: {}", self.name(), error);
                *self.inner.spawn_error.lock() = Some(error);

                let settled = execution.complete(false);
                debug_assert!(settled, "start failure settled a completed promise");
            }
        }
    }

    /// Wait for the unit of work to return, then reap the native thread.
    ///
    /// Returns immediately if the thread was never started or failed to
    /// start. Any number of threads may join concurrently; one of them reaps
    /// the native thread. A thread joining itself returns at once instead of
    /// deadlocking.
    pub fn join(&self) {
        let Some(execution) = self.inner.execution.get() else {
            return;
        };
        if self.is_current() {
            warn!("thread {:?} tried to join itself", self.name());
            return;
        }

        // Whether the run succeeded does not matter to a joiner.
        let _ = execution.get();
        self.reap();
    }

    /// Wait at most `timeout` for the unit of work to return.
    ///
    /// A zero timeout waits indefinitely, exactly like [`join`](Self::join);
    /// it does not poll. On timeout the native thread keeps running and is
    /// reaped by a later join.
    ///
    /// Returns `false` if the wait timed out, `true` if the thread is
    /// finished or was never started.
    pub fn join_timeout(&self, timeout: Duration) -> bool {
        let Some(execution) = self.inner.execution.get() else {
            return true;
        };
        if self.is_current() {
            warn!("thread {:?} tried to join itself", self.name());
            return false;
        }
        if timeout.is_zero() {
            self.join();
            return true;
        }

        match execution.get_timeout(timeout) {
            Err(PromiseError::Timeout(_)) => false,
            Ok(_) | Err(PromiseError::Execution(_)) => {
                self.reap();
                true
            }
        }
    }

    /// [`join_timeout`](Self::join_timeout) in milliseconds; `0` waits
    /// indefinitely.
    pub fn join_millis(&self, millis: u64) -> bool {
        self.join_timeout(Duration::from_millis(millis))
    }

    fn reap(&self) {
        let handle = self
            .inner
            .native
            .lock()
            .as_mut()
            .and_then(|native| native.handle.take());

        if let Some(handle) = handle {
            if handle.join().is_err() {
                debug!("reaped thread {:?} after a panic", self.name());
            }
        }
    }

    /// Ask the unit of work to stop at its next safe point.
    ///
    /// Advisory only: the flag is never cleared and nothing is preempted.
    /// Interrupting before [`start`](Self::start) is allowed and sticks.
    pub fn interrupt(&self) {
        self.inner.interrupted.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::Relaxed)
    }

    /// Returns `true` strictly between a successful start and the return of
    /// the unit of work.
    pub fn is_alive(&self) -> bool {
        self.inner.live.lock().is_some()
    }

    /// Returns `true` once [`start`](Self::start) has been called, whether
    /// or not the native thread could be created.
    pub fn is_started(&self) -> bool {
        self.inner.execution.get().is_some()
    }

    pub fn name(&self) -> Option<String> {
        self.inner.name.lock().clone()
    }

    /// Rename the thread.
    ///
    /// If the native thread exists and has not been reaped, the OS-level name
    /// is updated too. That part is best effort: platforms that cannot rename
    /// another thread, and names the OS rejects, are logged and ignored.
    pub fn set_name<T: Into<String>>(&self, name: T) {
        let name = name.into();
        *self.inner.name.lock() = Some(name.clone());

        let native = self.inner.native.lock();
        if let Ok(raw) = self.raw(native.as_ref()) {
            if let Err(error) = raw.set_name(&name) {
                debug!("could not rename thread to {:?}: {}", name, error);
            }
        }
    }

    /// Change the OS scheduling priority, keeping the current policy.
    ///
    /// The valid range depends on the policy; under Linux's default
    /// `SCHED_OTHER` only `0` is accepted.
    pub fn set_priority(&self, priority: i32) -> ThreadResult<()> {
        let native = self.inner.native.lock();
        let raw = self.raw(native.as_ref())?;

        raw.set_priority(priority).map_err(|error| {
            debug!(
                "priority {} rejected for thread {:?}: {}",
                priority,
                self.name(),
                error
            );
            ThreadError::from(error)
        })
    }

    /// The raw handle OS calls should target, given the locked native slot.
    ///
    /// The unit of work can run before `start` records the handle; code on
    /// the thread itself then addresses it through `pthread_self`.
    fn raw(&self, native: Option<&Native>) -> ThreadResult<RawThread> {
        match native {
            Some(native) => native.unjoined().ok_or(ThreadError::AlreadyJoined),
            None if self.is_current() => Ok(RawThread::current()),
            None => Err(ThreadError::NotStarted),
        }
    }

    /// Id of the native thread, once it has been created.
    pub fn id(&self) -> Option<NativeId> {
        self.inner
            .native
            .lock()
            .as_ref()
            .map(|native| NativeId::new(native.raw))
    }

    /// The completion promise of this thread's run, once started.
    pub fn execution(&self) -> Option<&Promise<bool>> {
        self.inner.execution.get()
    }

    /// Why the native thread could not be created, if it could not.
    pub fn start_error(&self) -> Option<SpawnError> {
        self.inner.spawn_error.lock().clone()
    }

    /// Block the calling thread for `millis` milliseconds.
    ///
    /// Sleeps the whole seconds first and the remainder with microsecond
    /// resolution.
    pub fn sleep(millis: u32) {
        let millis = u64::from(millis);
        std::thread::sleep(Duration::from_secs(millis / 1000));
        std::thread::sleep(Duration::from_micros((millis % 1000) * 1000));
    }

    /// The calling thread.
    pub fn current() -> CurrentThread {
        CurrentThread::get()
    }

    fn is_current(&self) -> bool {
        current::is_current(&self.inner)
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("started", &self.is_started())
            .field("alive", &self.is_alive())
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

impl ThreadInner {
    /// Entry point of the native thread.
    fn run(self: Arc<Self>) {
        current::register(&self);
        let mut completion = Completion {
            inner: &self,
            returned: false,
        };

        let work = self.work.lock().take();
        match work {
            Some(work) => work.run(),
            None => debug!("thread {:?} has no unit of work", self.name.lock().as_deref()),
        }

        completion.returned = true;
    }
}

/// Settles a run on scope exit, including when the unit of work unwinds.
struct Completion<'a> {
    inner: &'a ThreadInner,
    returned: bool,
}

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        current::unregister();

        // Liveness is cleared before joiners are released, so a joiner never
        // sees a finished run on a thread that still reports alive.
        let released = self.inner.live.lock().take();
        if let Some(execution) = self.inner.execution.get() {
            let settled = execution.complete(self.returned);
            debug_assert!(settled, "thread run settled a completed promise");
        }

        if self.returned {
            debug!("thread {:?} finished", self.inner.name.lock().as_deref());
        } else {
            warn!("unit of work of thread {:?} panicked", self.inner.name.lock().as_deref());
        }
        drop(released);
    }
}

impl Drop for ThreadInner {
    fn drop(&mut self) {
        if let Some(Native {
            handle: Some(_), ..
        }) = self.native.get_mut()
        {
            debug!("detaching unjoined thread {:?}", self.name.get_mut());
        }
    }
}
