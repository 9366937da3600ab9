//! Example: Signal Pipeline with a Custom Execution Context
//!
//! A producer feeds a `filter`/`map` chain coordinated on the main
//! context while observers run on a user-defined scheduler that logs every
//! job it is handed.
//!
//! Run with `RUST_LOG=rxsignal=debug` to see the delivery rounds.

use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc,
  },
  time::Duration,
};

use rxsignal::{
  prelude::*,
  scheduler::{Job, Scheduler, ThreadPoolScheduler},
};
use tracing_subscriber::EnvFilter;

// ==================================================================================
// 1. Define the Custom Scheduler
// ==================================================================================

/// Counts and logs jobs before forwarding them to a thread pool.
struct CountingScheduler {
  inner: ThreadPoolScheduler,
  jobs: AtomicUsize,
}

impl Scheduler for CountingScheduler {
  fn execute(&self, job: Job) {
    let n = self.jobs.fetch_add(1, Ordering::Relaxed);
    tracing::info!(job = n, "running observer job");
    self.inner.execute(job);
  }

  fn execute_after(&self, delay: Duration, job: Job) {
    tracing::info!(?delay, "delayed observer job");
    self.inner.execute_after(delay, job);
  }
}

// ==================================================================================
// 2. Build the Pipeline
// ==================================================================================

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let execution = Context::new(CountingScheduler {
    inner: ThreadPoolScheduler::with_pool_size(2).expect("thread pool"),
    jobs: AtomicUsize::new(0),
  });

  let readings = Producer::<u32>::new(execution);
  let (tx, rx) = mpsc::channel();

  readings
    .stream()
    .filter(|celsius| *celsius >= 30)
    .map(|celsius| format!("hot: {}F", celsius * 9 / 5 + 32))
    .observe(move |alert: String| {
      let _ = tx.send(alert);
      Verdict::Continue
    });

  for celsius in [12, 31, 18, 35, 40] {
    readings.push(celsius);
  }

  // ==================================================================================
  // 3. Collect the Results
  // ==================================================================================

  while let Ok(alert) = rx.recv_timeout(Duration::from_millis(500)) {
    println!("{alert}");
  }
}
