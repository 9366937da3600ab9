//! Observer trait and the Continue/Stop verdict
//!
//! An observer receives each value of a stream and answers with a
//! [`Verdict`]: keep me registered, or remove me.

// ============================================================================
// Verdict
// ============================================================================

/// What an observer wants after handling a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
  /// Keep delivering values to this observer.
  Continue,
  /// Remove this observer; it is never invoked again.
  Stop,
}

impl Verdict {
  #[inline]
  pub fn is_continue(self) -> bool { matches!(self, Verdict::Continue) }

  #[inline]
  pub fn is_stop(self) -> bool { matches!(self, Verdict::Stop) }
}

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: the consumer of a stream's values.
///
/// Observers are invoked on the stream's execution context, one value at a
/// time and never concurrently with another round of the same stream.
///
/// Any `FnMut(T) -> Verdict + Send` closure is an observer:
///
/// ```rust
/// use rxsignal::prelude::*;
///
/// let mut seen = 0;
/// let mut observer = move |v: i32| {
///   seen += v;
///   if seen > 10 { Verdict::Stop } else { Verdict::Continue }
/// };
/// assert_eq!(observer.on_next(4), Verdict::Continue);
/// assert_eq!(observer.on_next(7), Verdict::Stop);
/// ```
pub trait Observer<T>: Send {
  /// Receive the next value.
  fn on_next(&mut self, value: T) -> Verdict;
}

impl<T, F> Observer<T> for F
where
  F: FnMut(T) -> Verdict + Send,
{
  #[inline]
  fn on_next(&mut self, value: T) -> Verdict { self(value) }
}

/// Type-erased observer as stored by a stream.
pub type BoxedObserver<T> = Box<dyn Observer<T> + 'static>;

// ============================================================================
// Delivery
// ============================================================================

/// Call every observer with `value`, in order, and keep those that answered
/// [`Verdict::Continue`].
///
/// The value is cloned for all observers except the last one, which
/// receives it by move.
pub(crate) fn deliver<T, I>(observers: I, value: T) -> Vec<BoxedObserver<T>>
where
  T: Clone,
  I: IntoIterator<Item = BoxedObserver<T>>,
{
  let mut kept = Vec::new();
  let mut iter = observers.into_iter().peekable();
  let mut value = Some(value);
  while let Some(mut observer) = iter.next() {
    let arg = if iter.peek().is_some() { value.clone() } else { value.take() };
    let Some(arg) = arg else { break };
    if observer.on_next(arg).is_continue() {
      kept.push(observer);
    }
  }
  kept
}
