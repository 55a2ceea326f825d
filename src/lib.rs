//! Callback-based Kerberos client initialization.
//!
//! [`Kerberos::auth_gss_client_init`] validates its arguments synchronously,
//! then schedules the blocking native GSS call on a worker thread through
//! the task bridge. The caller's completion handler receives either the
//! established [`GssClientContext`] or the failure, exactly once, on the
//! host context running the [`CompletionDispatcher`] loop.

mod client;

pub use client::{GSS_CLIENT_INIT_FAILED, Kerberos, KerberosError};
pub use kerberos_bridge::{
  BridgeError, CompletionDispatcher, FaultHook, HandlerFault, NativeFailure, Task, TaskExecutor,
  TaskId, default_fault_hook, install_default_fault_hook,
};
pub use kerberos_gss::{
  AUTH_GSS_COMPLETE, AUTH_GSS_CONTINUE, AUTH_GSS_ERROR, GssApi, GssClientContext, InitClientReply,
  StateHandle, flags,
};

/// Completion dispatcher instantiated for GSS client tasks.
pub type GssDispatcher = CompletionDispatcher<StateHandle, GssClientContext>;

/// Executor handle instantiated for GSS client tasks.
pub type GssExecutor = TaskExecutor<StateHandle, GssClientContext>;
