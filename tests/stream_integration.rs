//! Integration tests for rxsignal
//!
//! Exercises streams on the real process contexts: the serial `main`
//! coordination thread and the multi-threaded background pool.
#![cfg(feature = "futures-scheduler")]

use std::{
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    mpsc::{self, Receiver},
    Arc, Mutex,
  },
  thread,
  time::Duration,
};

use rxsignal::prelude::*;

const WAIT: Duration = Duration::from_secs(5);

/// Returns once every job submitted to the main context so far has run.
fn fence() { Context::main().schedule_blocking(|| ()).unwrap(); }

fn sender_observer<T: Send + 'static>(
  verdict: Verdict,
) -> (Receiver<T>, impl FnMut(T) -> Verdict + Send + 'static) {
  let (tx, rx) = mpsc::channel();
  (rx, move |v| {
    let _ = tx.send(v);
    verdict
  })
}

fn take<T>(rx: &Receiver<T>, n: usize) -> Vec<T> {
  (0..n).map(|_| rx.recv_timeout(WAIT).unwrap()).collect()
}

#[rxsignal_macro::test]
fn test_observe_and_push() {
  let producer = Producer::<i32>::new(Context::main());
  let (rx, observer) = sender_observer::<i32>(Verdict::Continue);

  producer.stream().observe(observer);
  producer.push(4);

  assert_eq!(rx.recv_timeout(WAIT).unwrap(), 4);
}

#[rxsignal_macro::test]
fn test_push_order_is_kept() {
  for execution in [Context::main(), Context::background()] {
    let producer = Producer::<usize>::new(execution);
    let (rx, observer) = sender_observer::<usize>(Verdict::Continue);

    producer.stream().observe(observer);
    for v in 0..1000 {
      producer.push(v);
    }

    assert_eq!(take(&rx, 1000), (0..1000).collect::<Vec<_>>());
  }
}

#[rxsignal_macro::test]
fn test_pushes_from_many_threads_keep_per_thread_order() {
  let producer = Arc::new(Producer::<(usize, usize)>::new(Context::background()));
  let (rx, observer) = sender_observer::<(usize, usize)>(Verdict::Continue);
  producer.stream().observe(observer);

  let handles: Vec<_> = (0..4)
    .map(|id| {
      let producer = producer.clone();
      thread::spawn(move || {
        for seq in 0..100 {
          producer.push((id, seq));
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }

  let mut next = [0; 4];
  for (id, seq) in take(&rx, 400) {
    assert_eq!(seq, next[id]);
    next[id] += 1;
  }
  assert_eq!(next, [100; 4]);
}

#[rxsignal_macro::test]
fn test_rounds_never_overlap_on_a_thread_pool() {
  let producer = Producer::<usize>::new(Context::background());
  let stream = producer.stream();
  let in_round = Arc::new(AtomicBool::new(false));
  let overlaps = Arc::new(AtomicUsize::new(0));

  // The first observer opens the round, the last one closes it; anything
  // else seeing the flag flip means two rounds ran at once.
  let (c_in_round, c_overlaps) = (in_round.clone(), overlaps.clone());
  stream.observe(move |_: usize| {
    if c_in_round.swap(true, Ordering::SeqCst) {
      c_overlaps.fetch_add(1, Ordering::SeqCst);
    }
    thread::sleep(Duration::from_micros(200));
    Verdict::Continue
  });
  let (rx, observer) = sender_observer::<usize>(Verdict::Continue);
  let (c_in_round, c_overlaps) = (in_round.clone(), overlaps.clone());
  stream.observe(observer).observe(move |_: usize| {
    if !c_in_round.swap(false, Ordering::SeqCst) {
      c_overlaps.fetch_add(1, Ordering::SeqCst);
    }
    Verdict::Continue
  });

  for v in 0..200 {
    producer.push(v);
  }

  assert_eq!(take(&rx, 200), (0..200).collect::<Vec<_>>());
  assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[rxsignal_macro::test]
fn test_multiple_observers_some_stop() {
  for execution in [Context::main(), Context::background()] {
    let producer = Producer::<i32>::new(execution);
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();

    producer.stream().observe(move |v: i32| {
      assert_eq!(v, 9);
      c_calls.fetch_add(1, Ordering::SeqCst);
      Verdict::Stop
    });
    let (rx, observer) = sender_observer::<i32>(Verdict::Continue);
    producer.stream().observe(observer);

    producer.push(9);
    producer.push(13);
    producer.push(21);

    // All observers of one round run in the same job, so once the survivor
    // has seen 21 the stopped one would have been called by now.
    assert_eq!(take(&rx, 3), vec![9, 13, 21]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}

#[rxsignal_macro::test]
fn test_late_registration_skips_the_round_in_flight() {
  let producer = Producer::<i32>::new(Context::background());
  let stream = producer.stream();
  let (started_tx, started_rx) = mpsc::channel();
  let (release_tx, release_rx) = mpsc::channel::<()>();
  let release_rx = Mutex::new(release_rx);

  let (early_rx, mut early) = sender_observer::<i32>(Verdict::Continue);
  stream.observe(move |v: i32| {
    if v == 1 {
      started_tx.send(()).unwrap();
      release_rx.lock().unwrap().recv_timeout(WAIT).unwrap();
    }
    early(v)
  });
  producer.push(1);

  // The round for 1 is now blocked inside the first observer.
  started_rx.recv_timeout(WAIT).unwrap();
  let (late_rx, late) = sender_observer::<i32>(Verdict::Continue);
  stream.observe(late);
  fence();
  release_tx.send(()).unwrap();

  producer.push(2);
  assert_eq!(take(&early_rx, 2), vec![1, 2]);
  assert_eq!(take(&late_rx, 1), vec![2]);
  assert!(late_rx.try_recv().is_err());
}

#[rxsignal_macro::test]
fn test_push_before_observe_is_buffered() {
  let producer = Producer::<i32>::new(Context::main());
  producer.push(1);
  producer.push(2);
  fence();

  let (rx, observer) = sender_observer::<i32>(Verdict::Continue);
  producer.stream().observe(observer);

  assert_eq!(take(&rx, 2), vec![1, 2]);
}

#[rxsignal_macro::test]
fn test_dropping_the_stream_cancels_scheduled_work() {
  let calls = Arc::new(AtomicUsize::new(0));
  let (gate_tx, gate_rx) = mpsc::channel::<()>();

  // Hold the coordination thread so nothing below runs before the drop.
  Context::main().schedule_now(move || {
    let _ = gate_rx.recv_timeout(WAIT);
  });

  let producer = Producer::<i32>::new(Context::main());
  let weak = producer.stream().downgrade();
  let c_calls = calls.clone();
  producer.stream().observe(move |_: i32| {
    c_calls.fetch_add(1, Ordering::SeqCst);
    Verdict::Continue
  });
  producer.push(1);
  producer.push(2);
  drop(producer);
  assert!(!weak.is_alive());

  gate_tx.send(()).unwrap();
  fence();
  fence();

  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rxsignal_macro::test]
fn test_observers_emit_into_other_streams() {
  let first = Producer::<i32>::new(Context::background());
  let second = Arc::new(Producer::<i32>::new(Context::background()));
  let (rx, observer) = sender_observer::<i32>(Verdict::Continue);

  second.stream().observe(observer);
  let c_second = second.clone();
  first.stream().observe(move |v: i32| {
    c_second.push(v * 100);
    c_second.push(v * 100 + 1);
    Verdict::Continue
  });

  first.push(1);
  first.push(2);

  assert_eq!(take(&rx, 4), vec![100, 101, 200, 201]);
}

#[rxsignal_macro::test]
fn test_injected_coordination_context() {
  let coordination = Context::new(rxsignal::scheduler::SerialScheduler::new());
  let producer = Producer::<i32>::with_contexts(coordination.clone(), Context::background());
  let (rx, observer) = sender_observer::<i32>(Verdict::Continue);

  let stream = producer.stream();
  assert!(stream.coordination_context().same_as(&coordination));
  stream.observe(observer);
  producer.push(5);

  assert_eq!(rx.recv_timeout(WAIT).unwrap(), 5);
}
