//! The inbound `auth_gss_client_init` call surface.

use std::sync::Arc;

use kerberos_bridge::{BridgeError, NativeFailure, Task};
use kerberos_gss::{GssApi, GssClientContext, InitClientReply, StateHandle};
use thiserror::Error;
use tracing::{info, instrument};

use crate::GssExecutor;

/// Fixed description delivered when native initialization fails. The
/// library's own diagnostic text is not captured.
pub const GSS_CLIENT_INIT_FAILED: &str = "Failed to initialize GSS client";

/// Errors surfaced synchronously by the call surface, before any task is
/// scheduled. The completion handler is never invoked for these.
#[derive(Debug, Error)]
pub enum KerberosError {
  /// Malformed call shape.
  #[error("requires a service string uri, integer flags and a callback function")]
  InvalidArgument,

  /// The task bridge rejected the submission.
  #[error(transparent)]
  Bridge(#[from] BridgeError),
}

/// Owned parameters for one client-init call.
struct ClientInitCall {
  uri: String,
  flags: u32,
}

/// Accepts caller requests and submits them to the task bridge.
pub struct Kerberos {
  gss: Arc<dyn GssApi>,
  executor: GssExecutor,
}

impl Kerberos {
  /// Create a call surface over the given GSS library, submitting to
  /// `executor`'s dispatcher.
  pub fn new(gss: Arc<dyn GssApi>, executor: GssExecutor) -> Self {
    Self { gss, executor }
  }

  /// Begin GSS client initialization for `uri` with the given request flags.
  ///
  /// Validation is synchronous: on a malformed uri this returns
  /// [`KerberosError::InvalidArgument`] immediately, no task is created and
  /// `callback` is never invoked. Otherwise the blocking native call runs on
  /// a worker thread and `callback` is invoked exactly once on the host
  /// context, with either the established context or the failure.
  #[instrument(skip(self, callback))]
  pub fn auth_gss_client_init<C>(
    &self,
    uri: &str,
    flags: u32,
    callback: C,
  ) -> Result<(), KerberosError>
  where
    C: FnOnce(Result<GssClientContext, NativeFailure>) + Send + 'static,
  {
    // An empty principal or an interior NUL can never reach the native call.
    if uri.is_empty() || uri.contains('\0') {
      return Err(KerberosError::InvalidArgument);
    }

    let call = ClientInitCall {
      uri: uri.to_string(),
      flags,
    };
    let gss = Arc::clone(&self.gss);
    let task = Task::new(
      move || init_client_blocking(gss, call),
      GssClientContext::new,
      callback,
    );
    info!(task_id = %task.id(), "queueing gss client init");
    self.executor.submit(task)?;
    Ok(())
  }
}

/// Blocking body: invokes the native call and converts its reply. `call` is
/// consumed here and released on both paths.
fn init_client_blocking(
  gss: Arc<dyn GssApi>,
  call: ClientInitCall,
) -> Result<StateHandle, NativeFailure> {
  match gss.init_client(&call.uri, call.flags) {
    InitClientReply::Complete { state } => Ok(state),
    InitClientReply::Failed { status } => Err(NativeFailure {
      code: status,
      message: GSS_CLIENT_INIT_FAILED,
    }),
  }
}
