//! The per-connection error sum type (§9, Design Note 4): a typed enum
//! distinguishing clean disconnects from protocol/auth/transport faults, so
//! callers can decide the disconnect-framing policy from §7 without
//! exceptions for control flow.

use mc_protocol::error::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("clean end of stream")]
    CleanEof,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unexpected packet id {id:#04x} in state {state}")]
    UnexpectedPacketId { state: &'static str, id: i32 },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl SessionError {
    /// True if this is an ordinary, silent disconnection rather than a
    /// fault worth logging at warn level.
    pub fn is_clean(&self) -> bool {
        matches!(self, SessionError::CleanEof)
            || matches!(
                self,
                SessionError::Transport(e) if e.kind() == std::io::ErrorKind::UnexpectedEof
            )
    }
}
