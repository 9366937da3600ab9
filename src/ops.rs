//! Composition operators.
//!
//! Every operator is a derived consumer: it creates a fresh
//! [`Producer`]/[`Stream`] pair on the source's contexts and registers a
//! relay observer on the source that re-emits into that producer. Relays
//! always answer [`Verdict::Continue`](crate::observer::Verdict::Continue),
//! so a derived stream keeps receiving for as long as its source lives.
//!
//! | Operator | Emits per source value |
//! |----------|------------------------|
//! | [`Map::map`] | exactly one transformed value |
//! | [`Filter::filter`] | the value, if the predicate holds |
//! | [`FlatMap::flat_map`] | every value of the inner stream obtained for it |

pub mod filter;
pub mod flat_map;
pub mod map;

pub use filter::Filter;
pub use flat_map::FlatMap;
pub use map::Map;

use crate::stream::{Producer, Stream};

/// A producer whose stream shares `source`'s coordination and execution
/// contexts.
fn derived_producer<T, U>(source: &Stream<T>) -> Producer<U>
where
  U: Clone + Send + 'static,
{
  Producer::with_contexts(
    source.coordination_context().clone(),
    source.execution_context().clone(),
  )
}

#[cfg(test)]
pub(crate) mod testing {
  use std::sync::{Arc, Mutex};

  use crate::{observer::Verdict, scheduler::TestScheduler, stream::Producer};

  pub fn setup<T: Clone + Send + 'static>() -> (TestScheduler, Producer<T>) {
    let scheduler = TestScheduler::new();
    let ctx = scheduler.context();
    (scheduler, Producer::with_contexts(ctx.clone(), ctx))
  }

  pub fn producer_on<T: Clone + Send + 'static>(scheduler: &TestScheduler) -> Producer<T> {
    let ctx = scheduler.context();
    Producer::with_contexts(ctx.clone(), ctx)
  }

  pub fn collect<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl FnMut(T) -> Verdict + Send) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let c_log = log.clone();
    (log, move |v| {
      c_log.lock().unwrap().push(v);
      Verdict::Continue
    })
  }
}
