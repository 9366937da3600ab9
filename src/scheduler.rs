//! Scheduler trait and the bundled implementations.
//!
//! A [`Scheduler`] runs boxed jobs somewhere else, now or after a delay. The
//! stream core never talks to a scheduler directly; it goes through the
//! [`Context`](crate::context::Context) value type, which wraps one.
//!
//! | Scheduler | Ordering | Typical role |
//! |-----------|----------|--------------|
//! | [`SerialScheduler`] | FIFO, one worker thread | coordination context |
//! | [`ThreadPoolScheduler`] | parallel | background execution context |
//! | [`TokioScheduler`] | parallel (runtime dependent) | execution context inside tokio apps |
//! | [`TestScheduler`] | FIFO in virtual time, driven by the test | deterministic tests |

pub mod serial;
pub mod test_scheduler;
#[cfg(feature = "futures-scheduler")]
pub mod thread_pool;
#[cfg(feature = "tokio-scheduler")]
pub mod tokio_scheduler;

pub use std::time::Duration;

pub use serial::{SerialScheduler, SerialSchedulerBuilder};
pub use test_scheduler::TestScheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A unit of work handed to a scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs on some execution resource.
///
/// Implementations must be cheap to share: a [`Context`] keeps one behind an
/// `Arc` and clones of that context are handed to every stream created on
/// it.
///
/// [`Context`]: crate::context::Context
pub trait Scheduler: Send + Sync + 'static {
  /// Enqueue `job` for asynchronous execution and return immediately.
  fn execute(&self, job: Job);

  /// Enqueue `job` to run no earlier than `delay` from now.
  fn execute_after(&self, delay: Duration, job: Job);

  /// Whether the calling thread is this scheduler's own serial worker.
  ///
  /// Blocking on a serial scheduler from its worker can never complete, so
  /// [`Context::schedule_blocking`](crate::context::Context::schedule_blocking)
  /// refuses to do it when this returns `true`.
  fn is_current(&self) -> bool { false }
}

/// Sleep for `delay` on whatever executor polls the returned future.
pub(crate) async fn sleep(delay: Duration) {
  futures_time::task::sleep(futures_time::time::Duration::from(delay)).await;
}
