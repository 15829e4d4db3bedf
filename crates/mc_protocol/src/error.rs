use thiserror::Error;

/// Errors produced by the primitive and frame codecs.
///
/// This enum is the typed core referenced by the error-handling design: the
/// policy column (disconnect vs. close silently) is decided by callers that
/// match on these variants, not by the codec itself.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("clean end of stream")]
    CleanEof,
    #[error("malformed length varint")]
    MalformedLength,
    #[error("frame length {0} is out of bounds")]
    FrameTooLarge(i32),
    #[error("short read inside a declared frame")]
    MalformedPayload,
    #[error("failed to decode packet id")]
    DecodeId,
    #[error("decompression failed: {0}")]
    Decompression(String),
    #[error("uncompressed packet of length {len} exceeds compression threshold of {threshold}")]
    NotCompressed { len: usize, threshold: i32 },
    #[error("value out of range for this field")]
    OutOfRange,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
