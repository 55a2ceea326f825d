//! Worker-thread task bridge.
//!
//! A single-threaded host builds a [`Task`] around a blocking native body
//! and submits it through a [`TaskExecutor`]. The body runs on the blocking
//! pool; the completed task is handed back over a channel to the
//! [`CompletionDispatcher`] loop running on the host context, which maps the
//! outcome and invokes the caller's completion handler exactly once. A panic
//! raised by the handler itself is routed to the fault hook instead of
//! poisoning the dispatch loop.

mod dispatch;
mod error;
mod executor;
mod fault;
mod task;

pub use dispatch::CompletionDispatcher;
pub use error::BridgeError;
pub use executor::TaskExecutor;
pub use fault::{FaultHook, HandlerFault, default_fault_hook, install_default_fault_hook};
pub use task::{NativeFailure, Stage, Task, TaskId};
