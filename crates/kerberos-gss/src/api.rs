//! The native authentication call consumed by the bridge.

use crate::handle::StateHandle;

/// Status of a GSS step that must be called again with more input.
pub const AUTH_GSS_CONTINUE: i32 = 0;
/// Status of a completed GSS operation.
pub const AUTH_GSS_COMPLETE: i32 = 1;
/// Status of a failed GSS operation.
pub const AUTH_GSS_ERROR: i32 = -1;

/// Outcome of [`GssApi::init_client`].
#[derive(Debug)]
pub enum InitClientReply {
  /// Client state established; `state` is the opaque handle follow-on GSS
  /// steps will consume.
  Complete { state: StateHandle },
  /// The native call failed with a non-zero status.
  Failed { status: i32 },
}

/// The external GSS authentication library.
///
/// `init_client` is synchronous and may block for arbitrary wall-clock time
/// (network round trips, credential-store lookups); callers must keep it off
/// the host context.
pub trait GssApi: Send + Sync {
  /// Initialize a GSS client for `uri` (a `service@host` principal) with
  /// the requested [flags](crate::flags).
  fn init_client(&self, uri: &str, flags: u32) -> InitClientReply;
}
