//! Task value object and its stage machine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::trace;

use crate::error::BridgeError;

/// Identifier for a submitted task, used for tracing and fault attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
  fn next() -> Self {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    TaskId(NEXT.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Failure reported by the blocking native body.
///
/// The message is a fixed static description of the failed operation; the
/// native library's own diagnostic text is not captured at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeFailure {
  /// Status code returned by the native call.
  pub code: i32,
  /// Fixed description of the failed operation.
  pub message: &'static str,
}

/// Lifecycle stage of a task.
///
/// Stages advance strictly forward, one step at a time; destruction (`Drop`)
/// is the terminal state and a task never re-enters an earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  /// Built, not yet handed to an executor.
  Created,
  /// Accepted by an executor, waiting for a worker thread.
  Queued,
  /// Blocking body running on a worker thread.
  Executing,
  /// Outcome recorded, waiting for the host context.
  Completed,
  /// Host context is invoking the completion handler.
  Dispatching,
}

impl Stage {
  fn follows(self, prior: Stage) -> bool {
    matches!(
      (prior, self),
      (Stage::Created, Stage::Queued)
        | (Stage::Queued, Stage::Executing)
        | (Stage::Executing, Stage::Completed)
        | (Stage::Completed, Stage::Dispatching)
    )
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Created => "created",
      Stage::Queued => "queued",
      Stage::Executing => "executing",
      Stage::Completed => "completed",
      Stage::Dispatching => "dispatching",
    };
    f.write_str(name)
  }
}

type ExecuteFn<H> = Box<dyn FnOnce() -> Result<H, NativeFailure> + Send>;
type MapFn<H, T> = Box<dyn FnOnce(H) -> T + Send>;
type CompletionHandler<T> = Box<dyn FnOnce(Result<T, NativeFailure>) + Send>;

/// A single-shot unit of work scheduled from the host context onto a worker
/// thread and back.
///
/// `H` is the raw handle produced by the blocking body; `T` is the
/// host-visible value the mapper wraps it into. The operation parameters are
/// move-captured by the `execute` closure, so the task owns them from
/// construction until the body consumes them on the worker thread and
/// releases them on return, success or failure alike.
pub struct Task<H, T> {
  id: TaskId,
  stage: Stage,
  execute: Option<ExecuteFn<H>>,
  map_result: Option<MapFn<H, T>>,
  callback: Option<CompletionHandler<T>>,
  outcome: Option<Result<H, NativeFailure>>,
}

impl<H, T> Task<H, T> {
  /// Build a task with its blocking body, success mapper and completion
  /// handler bound.
  pub fn new<E, M, C>(execute: E, map_result: M, callback: C) -> Self
  where
    E: FnOnce() -> Result<H, NativeFailure> + Send + 'static,
    M: FnOnce(H) -> T + Send + 'static,
    C: FnOnce(Result<T, NativeFailure>) + Send + 'static,
  {
    Self {
      id: TaskId::next(),
      stage: Stage::Created,
      execute: Some(Box::new(execute)),
      map_result: Some(Box::new(map_result)),
      callback: Some(Box::new(callback)),
      outcome: None,
    }
  }

  /// Identifier of this task.
  pub fn id(&self) -> TaskId {
    self.id
  }

  /// Current lifecycle stage.
  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub(crate) fn advance(&mut self, next: Stage) -> Result<(), BridgeError> {
    if !next.follows(self.stage) {
      return Err(BridgeError::InvalidTransition {
        from: self.stage,
        to: next,
      });
    }
    trace!(task_id = %self.id, from = %self.stage, to = %next, "task stage");
    self.stage = next;
    Ok(())
  }

  /// Worker-thread body: runs `execute` and records the write-once outcome.
  pub(crate) fn run_blocking(&mut self) -> Result<(), BridgeError> {
    self.advance(Stage::Executing)?;
    let execute = self
      .execute
      .take()
      .ok_or(BridgeError::SlotConsumed { slot: "execute" })?;
    let outcome = execute();
    if self.outcome.is_some() {
      return Err(BridgeError::OutcomeRecorded);
    }
    self.outcome = Some(outcome);
    self.advance(Stage::Completed)
  }

  pub(crate) fn begin_dispatch(&mut self) -> Result<(), BridgeError> {
    self.advance(Stage::Dispatching)
  }

  pub(crate) fn take_outcome(&mut self) -> Option<Result<H, NativeFailure>> {
    self.outcome.take()
  }

  pub(crate) fn take_map_result(&mut self) -> Option<MapFn<H, T>> {
    self.map_result.take()
  }

  pub(crate) fn take_callback(&mut self) -> Option<CompletionHandler<T>> {
    self.callback.take()
  }
}

impl<H, T> Drop for Task<H, T> {
  fn drop(&mut self) {
    trace!(task_id = %self.id, stage = %self.stage, "task destroyed");
  }
}
