//! Test Scheduler for deterministic testing of stream interleavings.
//!
//! Provides virtual time that only advances when explicitly instructed, and
//! runs jobs only when the test asks for it. Using one `TestScheduler` as
//! both the coordination and the execution context of a stream turns every
//! hop of the delivery protocol into a step the test can observe.
//!
//! # Usage
//!
//! ```rust
//! use rxsignal::prelude::*;
//! use rxsignal::scheduler::TestScheduler;
//!
//! let scheduler = TestScheduler::new();
//! let ctx = scheduler.context();
//! let producer = Producer::<i32>::with_contexts(ctx.clone(), ctx);
//! producer.stream().observe(|v: i32| {
//!   assert_eq!(v, 42);
//!   Verdict::Stop
//! });
//! producer.push(42);
//!
//! // Nothing has run yet; run every job that is due.
//! assert!(scheduler.pending_count() > 0);
//! scheduler.flush();
//! assert!(scheduler.is_empty());
//! ```
//!
//! # Thread Safety
//!
//! Jobs run on the thread that drives the scheduler (`run_next`, `flush`,
//! `advance_by`). Clones share one queue and one virtual clock.

use std::{
  cmp::Ordering,
  collections::BinaryHeap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{Duration, Job, Scheduler};
use crate::context::Context;

// ==================== Internal State ====================

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  job_queue: BinaryHeap<ScheduledJob>,
  next_job_id: usize,
}

struct ScheduledJob {
  scheduled_time: Duration,
  job_id: usize,
  job: Job,
}

impl PartialEq for ScheduledJob {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.job_id == other.job_id
  }
}

impl Eq for ScheduledJob {}

impl PartialOrd for ScheduledJob {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledJob {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by job_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.job_id.cmp(&self.job_id))
  }
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
///
/// Cloning is cheap; all clones share the same virtual time and job queue.
#[derive(Clone, Default)]
pub struct TestScheduler {
  state: Arc<Mutex<TestSchedulerState>>,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// A context that schedules onto this scheduler.
  pub fn context(&self) -> Context { Context::new(self.clone()) }

  /// Get the current virtual time.
  pub fn now(&self) -> Duration { self.lock().virtual_time }

  /// Get the number of queued jobs, due or not.
  pub fn pending_count(&self) -> usize { self.lock().job_queue.len() }

  /// Check if there are no queued jobs.
  pub fn is_empty(&self) -> bool { self.lock().job_queue.is_empty() }

  /// Run the single oldest job that is due at the current virtual time.
  ///
  /// Returns `false` if no job is due.
  pub fn run_next(&self) -> bool { self.run_one(None) }

  /// Run jobs that are due at the current virtual time, including jobs they
  /// schedule without delay, until none is left.
  pub fn run_due(&self) {
    while self.run_one(None) {}
  }

  /// Advance virtual time by the specified duration and execute due jobs.
  ///
  /// Jobs are executed in order of their scheduled time, with FIFO ordering
  /// for jobs scheduled at the same time.
  pub fn advance_by(&self, duration: Duration) {
    let target_time = self.lock().virtual_time + duration;
    while self.run_one(Some(target_time)) {}
    self.lock().virtual_time = target_time;
  }

  /// Execute all queued jobs, advancing time to each job's scheduled time.
  pub fn flush(&self) {
    loop {
      let next_time = match self.lock().job_queue.peek() {
        Some(job) => job.scheduled_time,
        None => break,
      };
      self.run_one(Some(next_time));
    }
  }

  fn run_one(&self, limit: Option<Duration>) -> bool {
    let job = {
      let mut state = self.lock();
      let limit = limit.unwrap_or(state.virtual_time);
      match state.job_queue.peek() {
        Some(peek) if peek.scheduled_time <= limit => {}
        _ => return false,
      }
      let Some(scheduled) = state.job_queue.pop() else {
        return false;
      };
      if scheduled.scheduled_time > state.virtual_time {
        state.virtual_time = scheduled.scheduled_time;
      }
      scheduled.job
    };
    // Run outside the lock: jobs schedule further jobs.
    job();
    true
  }

  fn push(&self, delay: Duration, job: Job) {
    let mut state = self.lock();
    let scheduled_time = state.virtual_time + delay;
    let job_id = state.next_job_id;
    state.next_job_id += 1;
    state.job_queue.push(ScheduledJob { scheduled_time, job_id, job });
  }

  fn lock(&self) -> MutexGuard<'_, TestSchedulerState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Scheduler for TestScheduler {
  fn execute(&self, job: Job) { self.push(Duration::ZERO, job); }

  fn execute_after(&self, delay: Duration, job: Job) { self.push(delay, job); }

  /// Jobs only run when the test drives the scheduler, so a blocking wait on
  /// it can never be satisfied on its own.
  fn is_current(&self) -> bool { true }
}
