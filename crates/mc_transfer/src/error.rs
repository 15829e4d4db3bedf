//! The per-connection error sum type (§9, Design Note 4), mirroring the
//! server's `SessionError` split between clean disconnects and faults worth
//! logging.

use mc_protocol::error::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("clean end of stream")]
    CleanEof,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unexpected packet id {id:#04x} in state {state}")]
    UnexpectedPacketId { state: &'static str, id: i32 },
    #[error("DNS resolution failed: {0}")]
    Dns(String),
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl ProxyError {
    /// True if this is an ordinary, silent disconnection rather than a
    /// fault worth logging at warn level.
    pub fn is_clean(&self) -> bool {
        matches!(self, ProxyError::CleanEof)
            || matches!(
                self,
                ProxyError::Transport(e) if e.kind() == std::io::ErrorKind::UnexpectedEof
            )
    }
}
