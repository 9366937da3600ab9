//! The stream primitive and its producer.
//!
//! A [`Stream`] is an ordered, multi-observer value channel fed by exactly
//! one [`Producer`]. All of its state (pending values, registered
//! observers, the draining flag) is touched only by jobs running on its
//! coordination context, while observers run on its execution context.
//!
//! # Delivery protocol
//!
//! 1. `push` and `observe` never touch the state inline; they schedule a job
//!    on the coordination context and return.
//! 2. A drain attempt, also scheduled, starts a *delivery round* when the
//!    stream is idle, a value is pending and at least one observer is
//!    registered: it pops the oldest value and takes the whole observer
//!    list, leaving it empty.
//! 3. The round runs on the execution context. Every taken observer is
//!    called once, in registration order; those answering
//!    [`Verdict::Continue`] are handed back.
//! 4. Back on the coordination context the survivors are appended after any
//!    observer registered meanwhile, the stream becomes idle, and another
//!    drain attempt is scheduled.
//!
//! Consequences: one round at a time per stream, per-observer FIFO order,
//! observers registered during a round only see later values, and an
//! observer may push or observe from inside its callback without
//! deadlocking.
//!
//! Every scheduled job holds a [`WeakStream`]; once the last strong handle is
//! dropped, pending jobs find nothing to upgrade and do nothing.

use std::{collections::VecDeque, fmt, mem};

use smallvec::SmallVec;

use crate::{
  context::Context,
  observer::{self, BoxedObserver, Observer},
  rc::{MutArc, WeakMutArc},
};

struct StreamState<T> {
  pending: VecDeque<T>,
  observers: SmallVec<[BoxedObserver<T>; 2]>,
  draining: bool,
}

impl<T> Default for StreamState<T> {
  fn default() -> Self {
    Self { pending: VecDeque::new(), observers: SmallVec::new(), draining: false }
  }
}

/// A single-producer, multi-observer asynchronous value stream.
///
/// `Stream` is a strong, cloneable handle. Values can only be pushed through
/// the [`Producer`] created together with it.
pub struct Stream<T> {
  state: MutArc<StreamState<T>>,
  coordination: Context,
  execution: Context,
}

/// A non-owning handle on a [`Stream`].
pub struct WeakStream<T> {
  state: WeakMutArc<StreamState<T>>,
  coordination: Context,
  execution: Context,
}

/// The exclusive right to push values into one [`Stream`].
///
/// `Producer` is deliberately not `Clone`. Share it behind an `Arc` if
/// several places must emit into the same stream.
pub struct Producer<T> {
  stream: Stream<T>,
}

// ==================== Producer ====================

impl<T> Producer<T>
where
  T: Clone + Send + 'static,
{
  /// Create a stream coordinated on [`Context::main`] whose observers run on
  /// `execution`.
  pub fn new(execution: Context) -> Self { Self::with_contexts(Context::main(), execution) }

  /// Create a stream with explicit contexts.
  ///
  /// `coordination` must run jobs one at a time in submission order.
  pub fn with_contexts(coordination: Context, execution: Context) -> Self {
    let stream =
      Stream { state: MutArc::own(StreamState::default()), coordination, execution };
    Self { stream }
  }

  /// Emit `value`. Returns immediately; delivery happens later.
  pub fn push(&self, value: T) { self.stream.push(value); }

  /// A strong handle on the stream this producer feeds.
  pub fn stream(&self) -> Stream<T> { self.stream.clone() }
}

// ==================== Stream ====================

impl<T> Stream<T>
where
  T: Clone + Send + 'static,
{
  /// Register `observer`. Returns `self` so registrations can be chained.
  ///
  /// The observer is appended on the coordination context; it does not see
  /// the value of a round already in flight, only values of rounds that
  /// start after the append.
  pub fn observe<O>(&self, observer: O) -> &Self
  where
    O: Observer<T> + 'static,
  {
    let observer: BoxedObserver<T> = Box::new(observer);
    let weak = self.downgrade();
    self.coordination.schedule_now(move || {
      let Some(stream) = weak.upgrade() else {
        tracing::trace!("stream dropped before observer registration");
        return;
      };
      stream.state.rc_deref_mut().observers.push(observer);
      stream.schedule_drain();
    });
    self
  }

  fn push(&self, value: T) {
    let weak = self.downgrade();
    self.coordination.schedule_now(move || {
      let Some(stream) = weak.upgrade() else {
        tracing::trace!("stream dropped before value was enqueued");
        return;
      };
      let pending = {
        let mut state = stream.state.rc_deref_mut();
        state.pending.push_back(value);
        state.pending.len()
      };
      tracing::trace!(pending, "value enqueued");
      stream.schedule_drain();
    });
  }

  fn schedule_drain(&self) {
    let weak = self.downgrade();
    self.coordination.schedule_now(move || match weak.upgrade() {
      Some(stream) => stream.drain(),
      None => tracing::trace!("stream dropped before drain attempt"),
    });
  }

  /// Runs on the coordination context.
  fn drain(&self) {
    let (value, observers) = {
      let mut state = self.state.rc_deref_mut();
      if state.draining || state.observers.is_empty() {
        tracing::trace!(
          draining = state.draining,
          pending = state.pending.len(),
          "drain attempt skipped"
        );
        return;
      }
      let Some(value) = state.pending.pop_front() else {
        return;
      };
      state.draining = true;
      (value, mem::take(&mut state.observers))
    };
    self.deliver(value, observers);
  }

  /// Runs on the coordination context with `draining` set.
  fn deliver(&self, value: T, observers: SmallVec<[BoxedObserver<T>; 2]>) {
    debug_assert!(!observers.is_empty(), "drain never starts a round without observers");
    tracing::debug!(observers = observers.len(), "delivery round started");
    let weak = self.downgrade();
    self.execution.schedule_now(move || {
      let kept = observer::deliver(observers, value);
      let coordination = weak.coordination.clone();
      coordination.schedule_now(move || match weak.upgrade() {
        Some(stream) => stream.finish_round(kept),
        None => tracing::trace!("stream dropped during delivery round"),
      });
    });
  }

  /// Runs on the coordination context.
  fn finish_round(&self, kept: Vec<BoxedObserver<T>>) {
    let kept_count = kept.len();
    {
      let mut state = self.state.rc_deref_mut();
      state.observers.extend(kept);
      state.draining = false;
    }
    tracing::debug!(kept = kept_count, "delivery round finished");
    self.schedule_drain();
  }
}

impl<T> Stream<T> {
  /// A non-owning handle that does not keep the stream alive.
  pub fn downgrade(&self) -> WeakStream<T> {
    WeakStream {
      state: self.state.downgrade(),
      coordination: self.coordination.clone(),
      execution: self.execution.clone(),
    }
  }

  /// Where this stream's state is mutated.
  pub fn coordination_context(&self) -> &Context { &self.coordination }

  /// Where this stream's observers run.
  pub fn execution_context(&self) -> &Context { &self.execution }

  /// Whether both handles refer to the same stream.
  pub fn ptr_eq(&self, other: &Self) -> bool { self.state.ptr_eq(&other.state) }
}

impl<T> Clone for Stream<T> {
  fn clone(&self) -> Self {
    Self {
      state: self.state.clone(),
      coordination: self.coordination.clone(),
      execution: self.execution.clone(),
    }
  }
}

impl<T> fmt::Debug for Stream<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stream")
      .field("coordination", &self.coordination)
      .field("execution", &self.execution)
      .finish_non_exhaustive()
  }
}

// ==================== WeakStream ====================

impl<T> WeakStream<T> {
  pub fn upgrade(&self) -> Option<Stream<T>> {
    self.state.upgrade().map(|state| Stream {
      state,
      coordination: self.coordination.clone(),
      execution: self.execution.clone(),
    })
  }

  /// Whether the stream still has a strong owner.
  pub fn is_alive(&self) -> bool { self.state.is_alive() }
}

impl<T> Clone for WeakStream<T> {
  fn clone(&self) -> Self {
    Self {
      state: self.state.clone(),
      coordination: self.coordination.clone(),
      execution: self.execution.clone(),
    }
  }
}

impl<T> fmt::Debug for WeakStream<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakStream").field("alive", &self.is_alive()).finish_non_exhaustive()
  }
}
