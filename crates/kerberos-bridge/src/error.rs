//! Bridge errors.

use thiserror::Error;

use crate::task::Stage;

/// Errors surfaced by the task bridge itself.
///
/// Domain failures of the native operation travel through the completion
/// handler instead; see [`crate::NativeFailure`].
#[derive(Debug, Error)]
pub enum BridgeError {
  /// The completion dispatcher has shut down; no new task can be scheduled.
  #[error("host context closed before the task could be scheduled")]
  HostContextClosed,

  /// A task was driven through an illegal stage transition.
  #[error("invalid task stage transition: {from} -> {to}")]
  InvalidTransition { from: Stage, to: Stage },

  /// A single-shot task slot was consumed twice.
  #[error("task {slot} already consumed")]
  SlotConsumed { slot: &'static str },

  /// A task outcome was recorded more than once.
  #[error("task outcome already recorded")]
  OutcomeRecorded,
}
