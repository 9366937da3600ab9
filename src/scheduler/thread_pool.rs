use futures::executor::ThreadPool;

use super::{sleep, Duration, Job, Scheduler};
use crate::error::ScheduleError;

/// A parallel scheduler on top of the `futures` [`ThreadPool`].
///
/// Jobs may run concurrently and in any order. This is the scheduler behind
/// [`Context::background`](crate::context::Context::background).
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  /// Create a pool with one thread per CPU.
  ///
  /// # Panics
  ///
  /// Panics if the OS fails to create the worker threads. Use
  /// [`ThreadPoolScheduler::with_pool_size`] to handle that case.
  pub fn new() -> Self {
    ThreadPool::builder()
      .name_prefix("rxsignal-background-")
      .create()
      .map(|pool| Self { pool })
      .unwrap_or_else(|err| panic!("failed to spawn background thread pool: {err}"))
  }

  /// Create a pool with exactly `size` worker threads.
  pub fn with_pool_size(size: usize) -> Result<Self, ScheduleError> {
    let pool = ThreadPool::builder()
      .pool_size(size)
      .name_prefix("rxsignal-background-")
      .create()?;
    Ok(Self { pool })
  }
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self { Self::new() }
}

impl Scheduler for ThreadPoolScheduler {
  fn execute(&self, job: Job) { self.pool.spawn_ok(async move { job() }); }

  fn execute_after(&self, delay: Duration, job: Job) {
    self.pool.spawn_ok(async move {
      sleep(delay).await;
      job();
    });
  }
}
