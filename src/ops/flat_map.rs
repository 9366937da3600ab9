use std::sync::Arc;

use super::derived_producer;
use crate::{observer::Verdict, stream::Stream};

/// Map every value to an inner stream and relay everything the inner
/// streams emit.
///
/// Subscriptions to earlier inner streams are never cancelled: if the source
/// emits N values, up to N inner streams feed the result at the same time,
/// interleaved in whatever order they emit (merge, not switch).
pub trait FlatMap<T> {
  fn flat_map<U, F>(&self, f: F) -> Stream<U>
  where
    F: FnMut(T) -> Stream<U> + Send + 'static,
    U: Clone + Send + 'static;
}

impl<T> FlatMap<T> for Stream<T>
where
  T: Clone + Send + 'static,
{
  fn flat_map<U, F>(&self, mut f: F) -> Stream<U>
  where
    F: FnMut(T) -> Stream<U> + Send + 'static,
    U: Clone + Send + 'static,
  {
    let producer = Arc::new(derived_producer(self));
    let stream = producer.stream();
    self.observe(move |v: T| {
      let inner = f(v);
      let producer = producer.clone();
      inner.observe(move |u: U| {
        producer.push(u);
        Verdict::Continue
      });
      Verdict::Continue
    });
    stream
  }
}
