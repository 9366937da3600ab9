use super::derived_producer;
use crate::{observer::Verdict, stream::Stream};

pub trait Map<T> {
  /// Creates a new stream which calls a closure on each value and emits
  /// its return.
  ///
  /// ```rust
  /// use rxsignal::prelude::*;
  ///
  /// let producer = Producer::<i32>::new(Context::background());
  /// let doubled = producer.stream().map(|v: i32| v * 2);
  /// # let _ = doubled;
  /// producer.push(10);
  /// ```
  fn map<U, F>(&self, f: F) -> Stream<U>
  where
    F: FnMut(T) -> U + Send + 'static,
    U: Clone + Send + 'static;
}

impl<T> Map<T> for Stream<T>
where
  T: Clone + Send + 'static,
{
  fn map<U, F>(&self, mut f: F) -> Stream<U>
  where
    F: FnMut(T) -> U + Send + 'static,
    U: Clone + Send + 'static,
  {
    let producer = derived_producer(self);
    let stream = producer.stream();
    self.observe(move |v: T| {
      producer.push(f(v));
      Verdict::Continue
    });
    stream
  }
}
