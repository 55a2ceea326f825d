//! Worker-thread execution of blocking task bodies.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::BridgeError;
use crate::task::{Stage, Task};

/// Submits tasks for execution on the blocking pool.
///
/// This is the cloneable sender half of a
/// [`CompletionDispatcher`](crate::CompletionDispatcher): every completed
/// task flows back to the dispatcher over its channel, which is the sole
/// synchronization point between worker threads and the host context.
pub struct TaskExecutor<H, T> {
  completions: mpsc::Sender<Task<H, T>>,
}

impl<H, T> Clone for TaskExecutor<H, T> {
  fn clone(&self) -> Self {
    Self {
      completions: self.completions.clone(),
    }
  }
}

impl<H: Send + 'static, T: Send + 'static> TaskExecutor<H, T> {
  pub(crate) fn new(completions: mpsc::Sender<Task<H, T>>) -> Self {
    Self { completions }
  }

  /// Queue a task for background execution.
  ///
  /// The blocking body runs on the Tokio blocking pool, so this must be
  /// called from within a runtime and never blocks the host context. Once
  /// this returns `Ok` the task's completion handler will be invoked exactly
  /// once by the dispatcher; there is no cancellation and no retry. Fails
  /// synchronously with [`BridgeError::HostContextClosed`] when the
  /// dispatcher has shut down.
  pub fn submit(&self, mut task: Task<H, T>) -> Result<(), BridgeError> {
    if self.completions.is_closed() {
      return Err(BridgeError::HostContextClosed);
    }
    task.advance(Stage::Queued)?;
    info!(task_id = %task.id(), "task queued");
    let completions = self.completions.clone();
    tokio::task::spawn_blocking(move || run_task(task, completions));
    Ok(())
  }
}

/// Blocking-pool body: runs `execute`, records the outcome and hands the
/// task back to the host context.
fn run_task<H, T>(mut task: Task<H, T>, completions: mpsc::Sender<Task<H, T>>) {
  let id = task.id();
  if let Err(e) = task.run_blocking() {
    error!(task_id = %id, error = %e, "task integrity violation, dropping task");
    return;
  }
  if completions.blocking_send(task).is_err() {
    warn!(task_id = %id, "host context gone, dropping completed task");
  }
}
