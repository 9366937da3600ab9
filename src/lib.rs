//! # rxsignal: ordered multi-observer signals
//!
//! A [`Stream`] is an asynchronous value channel with one [`Producer`] and
//! any number of observers. Values are delivered in push order, one
//! delivery round at a time, and observers can unsubscribe themselves by
//! returning [`Verdict::Stop`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{sync::mpsc, time::Duration};
//! use rxsignal::prelude::*;
//!
//! let producer = Producer::<i32>::new(Context::background());
//! let (tx, rx) = mpsc::channel();
//!
//! producer
//!   .stream()
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .observe(move |v: i32| {
//!     tx.send(v).unwrap();
//!     Verdict::Continue
//!   });
//!
//! for v in 1..=4 {
//!   producer.push(v);
//! }
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 20);
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 40);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Stream`] | Ordered, multi-observer value channel |
//! | [`Producer`] | The one handle allowed to push into a stream |
//! | [`Observer`] / [`Verdict`] | Callback and its Continue/Stop answer |
//! | [`Context`] | Where work runs: coordination vs. execution |
//! | [`Scheduler`] | Pluggable executor behind a context |
//!
//! ## Two contexts
//!
//! Every stream mutates its state only on its *coordination* context, a
//! serial FIFO context ([`Context::main`] unless injected), and runs
//! observers on its *execution* context. Neither `push` nor `observe`
//! blocks.
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): [`Context::background`] and
//!   `ThreadPoolScheduler`, backed by the `futures` thread pool
//! - **`tokio-scheduler`**: `TokioScheduler`, running jobs on a tokio
//!   runtime
//!
//! [`Stream`]: stream::Stream
//! [`Producer`]: stream::Producer
//! [`Observer`]: observer::Observer
//! [`Verdict`]: observer::Verdict
//! [`Verdict::Stop`]: observer::Verdict::Stop
//! [`Context`]: context::Context
//! [`Context::main`]: context::Context::main
//! [`Context::background`]: context::Context::background
//! [`Scheduler`]: scheduler::Scheduler

pub mod context;
pub mod error;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod stream;

// Re-export the prelude module
pub use prelude::*;
