//! Opaque native state handle.

use std::any::Any;
use std::fmt;

/// An opaque value produced by the native library.
///
/// Move-only single ownership: the handle travels worker thread → task →
/// wrapper and is never shared or cloned.
pub struct StateHandle(Box<dyn Any + Send>);

impl StateHandle {
  /// Box a concrete native state value.
  pub fn new<S: Any + Send>(state: S) -> Self {
    Self(Box::new(state))
  }

  /// Recover the concrete state, or give the handle back untouched when the
  /// type does not match.
  pub fn downcast<S: Any>(self) -> Result<Box<S>, StateHandle> {
    self.0.downcast().map_err(StateHandle)
  }

  /// Borrow the concrete state when the type matches.
  pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
    self.0.downcast_ref()
  }
}

impl fmt::Debug for StateHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("StateHandle(..)")
  }
}
