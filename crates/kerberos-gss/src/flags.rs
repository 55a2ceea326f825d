//! GSS context request flags (RFC 2744).

/// Delegate credentials to the remote peer.
pub const GSS_C_DELEG_FLAG: u32 = 1;
/// Request mutual authentication.
pub const GSS_C_MUTUAL_FLAG: u32 = 2;
/// Enable replay detection for signed or sealed messages.
pub const GSS_C_REPLAY_FLAG: u32 = 4;
/// Enable out-of-sequence detection for signed or sealed messages.
pub const GSS_C_SEQUENCE_FLAG: u32 = 8;
/// Confidentiality (sealing) may be invoked.
pub const GSS_C_CONF_FLAG: u32 = 16;
/// Integrity (signing) may be invoked.
pub const GSS_C_INTEG_FLAG: u32 = 32;
