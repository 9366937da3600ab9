use std::{
  io,
  thread::{self, ThreadId},
};

use futures::{
  channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
  executor::LocalPool,
  future,
  task::LocalSpawnExt,
  StreamExt,
};

use super::{sleep, Duration, Job, Scheduler};

enum Message {
  Now(Job),
  After(Duration, Job),
}

/// A FIFO scheduler backed by one dedicated worker thread.
///
/// Jobs passed to [`Scheduler::execute`] run strictly in submission order,
/// whichever thread submitted them. This is the scheduler behind
/// [`Context::main`](crate::context::Context::main) and the natural choice
/// for any coordination context.
///
/// The worker thread drives a `futures` [`LocalPool`]: immediate jobs are
/// run straight off the channel, delayed jobs become local tasks that sleep
/// first. The worker exits once the scheduler is dropped.
pub struct SerialScheduler {
  sender: UnboundedSender<Message>,
  worker: ThreadId,
}

/// Configures and spawns a [`SerialScheduler`].
#[derive(Debug, Default)]
pub struct SerialSchedulerBuilder {
  name: Option<String>,
}

impl SerialSchedulerBuilder {
  /// Name the worker thread.
  pub fn name<N: Into<String>>(mut self, name: N) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Spawn the worker thread.
  pub fn spawn(self) -> io::Result<SerialScheduler> {
    let (sender, receiver) = mpsc::unbounded();
    let mut builder = thread::Builder::new();
    if let Some(name) = self.name {
      builder = builder.name(name);
    }
    let handle = builder.spawn(move || run_worker(receiver))?;
    Ok(SerialScheduler { sender, worker: handle.thread().id() })
  }
}

impl SerialScheduler {
  /// Spawn a serial scheduler with an unnamed worker thread.
  ///
  /// # Panics
  ///
  /// Panics if the OS fails to create the thread, like
  /// [`std::thread::spawn`]. Use [`SerialScheduler::builder`] to handle that
  /// case.
  pub fn new() -> Self {
    Self::builder()
      .spawn()
      .unwrap_or_else(|err| panic!("failed to spawn serial scheduler thread: {err}"))
  }

  pub fn builder() -> SerialSchedulerBuilder { SerialSchedulerBuilder::default() }

  fn send(&self, message: Message) {
    if self.sender.unbounded_send(message).is_err() {
      tracing::warn!("serial scheduler worker is gone, dropping job");
    }
  }
}

impl Default for SerialScheduler {
  fn default() -> Self { Self::new() }
}

impl Scheduler for SerialScheduler {
  fn execute(&self, job: Job) { self.send(Message::Now(job)); }

  fn execute_after(&self, delay: Duration, job: Job) { self.send(Message::After(delay, job)); }

  fn is_current(&self) -> bool { thread::current().id() == self.worker }
}

fn run_worker(receiver: UnboundedReceiver<Message>) {
  let mut pool = LocalPool::new();
  let spawner = pool.spawner();
  pool.run_until(receiver.for_each(|message| {
    match message {
      Message::Now(job) => job(),
      Message::After(delay, job) => {
        let delayed = async move {
          sleep(delay).await;
          job();
        };
        if let Err(err) = spawner.spawn_local(delayed) {
          tracing::warn!(?err, "serial scheduler could not spawn delayed job");
        }
      }
    }
    future::ready(())
  }));
  tracing::debug!("serial scheduler worker exiting");
}
