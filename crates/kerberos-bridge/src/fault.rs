//! Unhandled-fault reporting for completion handlers.
//!
//! A panic inside a caller-supplied completion handler is not attributable
//! to the task that carried it. It is routed to a fault hook decoupled from
//! the task's own error channel, the way a fatal exception reaches a
//! process-level handler, and never delivered back through a completion.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use tracing::error;

use crate::task::TaskId;

/// A failure raised by a completion handler while it was being invoked.
#[derive(Debug, Clone)]
pub struct HandlerFault {
  /// Task whose completion handler raised.
  pub task_id: TaskId,
  /// Panic message, when one could be extracted from the payload.
  pub message: String,
}

impl HandlerFault {
  pub(crate) fn from_panic(task_id: TaskId, payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
      (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "completion handler panicked with a non-string payload".to_string()
    };
    Self { task_id, message }
  }
}

/// Hook invoked with every [`HandlerFault`], exactly once per fault.
pub type FaultHook = Arc<dyn Fn(HandlerFault) + Send + Sync>;

static DEFAULT_HOOK: OnceLock<FaultHook> = OnceLock::new();

/// Install the process-wide default fault hook.
///
/// First install wins; later calls are ignored and return `false`. Safe to
/// call from any thread, any number of times.
pub fn install_default_fault_hook(hook: FaultHook) -> bool {
  DEFAULT_HOOK.set(hook).is_ok()
}

/// The process-wide default fault hook.
///
/// Logs each fault at error level unless another hook was installed first
/// via [`install_default_fault_hook`].
pub fn default_fault_hook() -> FaultHook {
  DEFAULT_HOOK
    .get_or_init(|| {
      Arc::new(|fault: HandlerFault| {
        error!(
          task_id = %fault.task_id,
          message = %fault.message,
          "unhandled completion handler fault"
        );
      })
    })
    .clone()
}
