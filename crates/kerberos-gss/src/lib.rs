//! External GSSAPI collaborator surface.
//!
//! [`GssApi`] abstracts the one native call the bridge consumes. Real
//! implementations sit on FFI against a GSS library; tests use stubs. This
//! crate never interprets the native state, it only stores and forwards it.

mod api;
mod context;
mod handle;

pub mod flags;

pub use api::{AUTH_GSS_COMPLETE, AUTH_GSS_CONTINUE, AUTH_GSS_ERROR, GssApi, InitClientReply};
pub use context::GssClientContext;
pub use handle::StateHandle;
