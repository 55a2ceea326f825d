//! Host-visible wrapper around an established GSS client state.

use std::fmt;

use crate::handle::StateHandle;

/// Owns exactly one native GSS client-state handle.
///
/// Within this crate the context is only a passable handle; follow-on GSS
/// operations consume it elsewhere.
pub struct GssClientContext {
  state: StateHandle,
}

impl GssClientContext {
  /// Wrap an established client state. Ownership of the handle transfers to
  /// the context.
  pub fn new(state: StateHandle) -> Self {
    Self { state }
  }

  /// Borrow the underlying state handle.
  pub fn state(&self) -> &StateHandle {
    &self.state
  }

  /// Give up ownership of the state handle.
  pub fn into_state(self) -> StateHandle {
    self.state
  }
}

impl fmt::Debug for GssClientContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("GssClientContext(..)")
  }
}
