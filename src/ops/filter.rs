use super::derived_producer;
use crate::{observer::Verdict, stream::Stream};

/// Emit only those values of a stream that pass a predicate test.
///
/// # Example
///
/// ```
/// use std::sync::mpsc;
/// use std::time::Duration;
/// use rxsignal::prelude::*;
///
/// let producer = Producer::<i32>::new(Context::background());
/// let (tx, rx) = mpsc::channel();
///
/// producer
///   .stream()
///   .filter(|v| *v % 2 == 0)
///   .observe(move |v: i32| {
///     tx.send(v).unwrap();
///     Verdict::Continue
///   });
/// for v in 0..10 {
///   producer.push(v);
/// }
///
/// // only even numbers received.
/// let evens: Vec<i32> =
///   (0..5).map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap()).collect();
/// assert_eq!(evens, vec![0, 2, 4, 6, 8]);
/// ```
pub trait Filter<T> {
  fn filter<P>(&self, predicate: P) -> Stream<T>
  where
    P: FnMut(&T) -> bool + Send + 'static;
}

impl<T> Filter<T> for Stream<T>
where
  T: Clone + Send + 'static,
{
  fn filter<P>(&self, mut predicate: P) -> Stream<T>
  where
    P: FnMut(&T) -> bool + Send + 'static,
  {
    let producer = derived_producer(self);
    let stream = producer.stream();
    self.observe(move |v: T| {
      if predicate(&v) {
        producer.push(v);
      }
      Verdict::Continue
    });
    stream
  }
}
