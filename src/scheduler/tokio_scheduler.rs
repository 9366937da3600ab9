use tokio::runtime::{Handle, RuntimeFlavor};

use super::{Duration, Job, Scheduler};

/// Runs jobs as tasks on a tokio runtime.
///
/// Ordering between jobs follows the runtime: a current-thread runtime runs
/// them one at a time, a multi-thread runtime may run them in parallel. Use
/// it as an execution context when the observers live inside a tokio
/// application.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { Self { handle } }

  /// The runtime the caller is running on, if any.
  pub fn current() -> Option<Self> { Handle::try_current().ok().map(Self::new) }
}

impl Scheduler for TokioScheduler {
  fn execute(&self, job: Job) {
    self.handle.spawn(async move { job() });
  }

  fn execute_after(&self, delay: Duration, job: Job) {
    self.handle.spawn(async move {
      tokio::time::sleep(delay).await;
      job();
    });
  }

  /// A current-thread runtime only makes progress on the thread driving it,
  /// so blocking from inside one can never complete. Tokio exposes no stable
  /// runtime identity, so any current-thread runtime on the calling thread
  /// counts, not just this scheduler's.
  fn is_current(&self) -> bool {
    is_current_thread(&self.handle)
      && Handle::try_current().is_ok_and(|current| is_current_thread(&current))
  }
}

fn is_current_thread(handle: &Handle) -> bool {
  matches!(handle.runtime_flavor(), RuntimeFlavor::CurrentThread)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{context::Context, error::ScheduleError};

  #[rxsignal_macro::test(shared)]
  async fn runs_jobs_on_the_runtime() {
    let scheduler = TokioScheduler::current().unwrap();
    let (tx, rx) = futures::channel::oneshot::channel();
    scheduler.execute(Box::new(move || {
      let _ = tx.send(Handle::try_current().is_ok());
    }));
    assert!(rx.await.unwrap());
  }

  #[rxsignal_macro::test(local)]
  async fn blocking_on_own_current_thread_runtime_is_refused() {
    let ctx = Context::new(TokioScheduler::current().unwrap());
    let result = ctx.schedule_blocking(|| 1);
    assert!(matches!(result, Err(ScheduleError::WouldDeadlock)));
  }

  #[rxsignal_macro::test]
  fn blocking_on_a_multi_thread_runtime_from_outside() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
      .worker_threads(1)
      .enable_time()
      .build()
      .unwrap();
    let scheduler = TokioScheduler::new(runtime.handle().clone());
    assert!(!scheduler.is_current());

    let ctx = Context::new(scheduler);
    assert_eq!(ctx.schedule_blocking(|| 2).unwrap(), 2);
  }

  #[rxsignal_macro::test]
  fn current_is_none_outside_a_runtime() { assert!(TokioScheduler::current().is_none()); }
}
