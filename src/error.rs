//! Errors raised at the scheduler boundary.
//!
//! The stream core itself never fails: `push` and `observe` only enqueue
//! work. The only fallible surface is the executor abstraction, where a
//! blocking call can be refused or a worker can fail to start.

use std::io;

use thiserror::Error;

/// Failure of a [`Context`](crate::context::Context) operation or of a
/// scheduler constructor.
#[derive(Debug, Error)]
pub enum ScheduleError {
  /// `schedule_blocking` was called from the serial worker it targets;
  /// waiting would block the only thread able to run the job.
  #[error("blocking on a serial context from its own worker would deadlock")]
  WouldDeadlock,

  /// The job was dropped before it produced a result, either because the
  /// scheduler shut down or because the job panicked.
  #[error("scheduled job was dropped before it completed")]
  Abandoned,

  /// The operating system refused to start a worker thread.
  #[error("failed to spawn scheduler worker: {0}")]
  Spawn(#[from] io::Error),
}
