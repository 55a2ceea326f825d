//! Host-context completion dispatch.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::executor::TaskExecutor;
use crate::fault::{FaultHook, HandlerFault, default_fault_hook};
use crate::task::Task;

const DEFAULT_BUFFER_SIZE: usize = 100;

/// Receives completed tasks on the host context and invokes each task's
/// completion handler exactly once.
///
/// # Usage
///
/// ```ignore
/// let dispatcher = CompletionDispatcher::new();
/// let executor = dispatcher.executor();
///
/// // Run the dispatch loop on the host context.
/// let cancel = CancellationToken::new();
/// tokio::spawn(dispatcher.run(cancel.clone()));
///
/// // Hand `executor` to whatever accepts caller requests.
/// ```
pub struct CompletionDispatcher<H, T> {
  sender: mpsc::Sender<Task<H, T>>,
  receiver: mpsc::Receiver<Task<H, T>>,
  fault_hook: FaultHook,
}

impl<H: Send + 'static, T: Send + 'static> CompletionDispatcher<H, T> {
  /// Create a dispatcher with the default completion buffer.
  pub fn new() -> Self {
    Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
  }

  /// Create a dispatcher with a custom completion buffer size.
  pub fn with_buffer_size(buffer_size: usize) -> Self {
    let (sender, receiver) = mpsc::channel(buffer_size);
    Self {
      sender,
      receiver,
      fault_hook: default_fault_hook(),
    }
  }

  /// Replace the hook that receives panics raised by completion handlers.
  pub fn with_fault_hook(mut self, hook: FaultHook) -> Self {
    self.fault_hook = hook;
    self
  }

  /// Get an executor handle for submitting tasks to this dispatcher.
  ///
  /// Handles are cheap to clone and can be given to any number of callers.
  pub fn executor(&self) -> TaskExecutor<H, T> {
    TaskExecutor::new(self.sender.clone())
  }

  /// Run the dispatch loop on the host context.
  ///
  /// Completions are processed strictly sequentially, so no two completion
  /// handlers ever run concurrently or interleaved, regardless of how many
  /// worker threads are executing tasks. The loop ends when the token is
  /// cancelled or when every executor handle and in-flight task is gone.
  pub async fn run(self, cancel: CancellationToken) {
    let Self {
      sender,
      mut receiver,
      fault_hook,
    } = self;
    // Keeping our own sender alive would prevent the channel from closing
    // once all executor handles are dropped.
    drop(sender);

    info!("completion dispatcher started");
    loop {
      tokio::select! {
        _ = cancel.cancelled() => {
          info!("completion dispatcher cancelled");
          break;
        }
        task = receiver.recv() => {
          match task {
            Some(task) => dispatch(task, &fault_hook),
            None => {
              info!("all executor handles dropped, completion dispatcher stopping");
              break;
            }
          }
        }
      }
    }
  }
}

impl<H: Send + 'static, T: Send + 'static> Default for CompletionDispatcher<H, T> {
  fn default() -> Self {
    Self::new()
  }
}

/// Dispatch one completed task: map the outcome, invoke the completion
/// handler, report any panic it raises, destroy the task.
fn dispatch<H, T>(mut task: Task<H, T>, fault_hook: &FaultHook) {
  let id = task.id();
  if let Err(e) = task.begin_dispatch() {
    error!(task_id = %id, error = %e, "task integrity violation, dropping task");
    return;
  }
  let Some(callback) = task.take_callback() else {
    error!(task_id = %id, "completion handler already consumed, dropping task");
    return;
  };
  let completion = match task.take_outcome() {
    Some(Ok(handle)) => {
      let Some(map_result) = task.take_map_result() else {
        error!(task_id = %id, "result mapper already consumed, dropping task");
        return;
      };
      Ok(map_result(handle))
    }
    Some(Err(failure)) => {
      trace!(task_id = %id, code = failure.code, "dispatching native failure");
      Err(failure)
    }
    None => {
      error!(task_id = %id, "task reached dispatch without an outcome, dropping task");
      return;
    }
  };
  if let Err(payload) = catch_unwind(AssertUnwindSafe(move || callback(completion))) {
    fault_hook(HandlerFault::from_panic(id, payload));
  }
  // The task drops here, releasing everything it still holds.
}
