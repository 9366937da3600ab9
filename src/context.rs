//! Execution contexts.
//!
//! A [`Context`] is a cheap, cloneable handle naming *where* work runs. Every
//! stream carries two of them:
//!
//! - the **coordination context**, a serial FIFO context that owns all
//!   stream state mutation, and
//! - the **execution context**, where observer callbacks actually run.
//!
//! Two well-known contexts exist: [`Context::main`], the process-wide serial
//! coordination context, and [`Context::background`], a shared thread pool.
//! Any [`Scheduler`] can be wrapped into a context with [`Context::new`].

use std::{
  fmt,
  sync::{mpsc, Arc},
};

use once_cell::sync::Lazy;

#[cfg(feature = "futures-scheduler")]
use crate::scheduler::ThreadPoolScheduler;
use crate::{
  error::ScheduleError,
  scheduler::{Duration, Scheduler, SerialScheduler},
};

static MAIN: Lazy<Context> = Lazy::new(|| {
  let scheduler = SerialScheduler::builder()
    .name("rxsignal-main")
    .spawn()
    .unwrap_or_else(|err| panic!("failed to spawn the main coordination thread: {err}"));
  Context::new(scheduler)
});

#[cfg(feature = "futures-scheduler")]
static BACKGROUND: Lazy<Context> = Lazy::new(|| Context::new(ThreadPoolScheduler::new()));

/// A value-type handle on a [`Scheduler`].
#[derive(Clone)]
pub struct Context {
  scheduler: Arc<dyn Scheduler>,
}

impl Context {
  pub fn new<S: Scheduler>(scheduler: S) -> Self { Self { scheduler: Arc::new(scheduler) } }

  /// Wrap a scheduler that is already shared; contexts built from the same
  /// `Arc` are [`same_as`](Context::same_as) each other.
  pub fn from_arc(scheduler: Arc<dyn Scheduler>) -> Self { Self { scheduler } }

  /// The process-wide serial coordination context.
  ///
  /// Backed by a [`SerialScheduler`] whose worker thread is named
  /// `rxsignal-main`, started on first use.
  pub fn main() -> Self { MAIN.clone() }

  /// The process-wide background context, a `futures` thread pool with one
  /// thread per CPU, started on first use.
  #[cfg(feature = "futures-scheduler")]
  pub fn background() -> Self { BACKGROUND.clone() }

  /// Run `job` on this context asynchronously. Returns immediately.
  pub fn schedule_now<F>(&self, job: F)
  where
    F: FnOnce() + Send + 'static,
  {
    self.scheduler.execute(Box::new(job));
  }

  /// Run `job` on this context no earlier than `delay` from now.
  pub fn schedule_after<F>(&self, delay: Duration, job: F)
  where
    F: FnOnce() + Send + 'static,
  {
    self.scheduler.execute_after(delay, Box::new(job));
  }

  /// Run `job` on this context and block the caller until it returns.
  ///
  /// Meant for tests and for bridging synchronous code; the stream protocol
  /// never uses it.
  ///
  /// # Errors
  ///
  /// - [`ScheduleError::WouldDeadlock`] if the caller already runs on this
  ///   context's serial worker.
  /// - [`ScheduleError::Abandoned`] if the job was dropped without
  ///   returning, e.g. because it panicked or the worker is gone.
  pub fn schedule_blocking<F, R>(&self, job: F) -> Result<R, ScheduleError>
  where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
  {
    if self.scheduler.is_current() {
      return Err(ScheduleError::WouldDeadlock);
    }
    // A plain channel wait: callers may themselves be running inside an
    // executor worker, where nesting `block_on` panics.
    let (tx, rx) = mpsc::sync_channel(1);
    self.schedule_now(move || {
      let _ = tx.send(job());
    });
    rx.recv().map_err(|_| ScheduleError::Abandoned)
  }

  /// Whether both handles point at the same scheduler.
  pub fn same_as(&self, other: &Context) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(&self.scheduler), Arc::as_ptr(&other.scheduler))
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Context")
      .field("scheduler", &Arc::as_ptr(&self.scheduler).cast::<()>())
      .finish()
  }
}
