//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Operators
pub use crate::ops::{Filter, FlatMap, Map};
// Scheduler core types
pub use crate::scheduler::{Duration, Job, Scheduler};
pub use crate::{
  context::Context,
  error::ScheduleError,
  observer::{BoxedObserver, Observer, Verdict},
  stream::{Producer, Stream, WeakStream},
};
