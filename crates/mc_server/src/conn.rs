//! The per-connection transport wrapper (§3): a TCP stream paired with the
//! frame codec, tracking the attributes the state machine needs to make
//! framing decisions (compression threshold, cipher, protocol version).

use std::net::SocketAddr;

use mc_protocol::decode::PacketDecoder;
use mc_protocol::encode::PacketEncoder;
use mc_protocol::packet::Packet;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::SessionError;

/// Owns the socket plus both halves of the frame codec. Methods operate at
/// the frame level: callers pass and receive concrete `Packet` types.
pub struct Connection {
    stream: TcpStream,
    pub peer_addr: SocketAddr,
    decoder: PacketDecoder,
    encoder: PacketEncoder,
    pub protocol_version: i32,
}

impl Connection {
    pub fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self {
            stream,
            peer_addr,
            decoder: PacketDecoder::new(),
            encoder: PacketEncoder::new(),
            protocol_version: 0,
        }
    }

    pub fn set_compression(&mut self, threshold: i32) {
        self.decoder.set_compression(threshold);
        self.encoder.set_compression(threshold);
    }

    pub fn enable_encryption(&mut self, key: &[u8; 16]) {
        self.decoder.enable_encryption(key);
        self.encoder.enable_encryption(key);
    }

    const READ_BUF_SIZE: usize = 4096;

    /// Reads frames from the socket until one full frame has been decoded,
    /// then decodes it as `P`. A mismatched packet id surfaces as
    /// `ProtocolError::OutOfRange`; callers that need the state-aware
    /// `UnexpectedPacketId` framing check the id against the frame first.
    pub async fn recv_frame(&mut self) -> Result<mc_protocol::decode::PacketFrame, SessionError> {
        loop {
            if let Some(frame) = self.decoder.try_next_packet()? {
                return Ok(frame);
            }

            self.decoder.reserve(Self::READ_BUF_SIZE);
            let mut buf = self.decoder.take_capacity();

            if self.stream.read_buf(&mut buf).await? == 0 {
                return Err(SessionError::CleanEof);
            }

            self.decoder.queue_bytes(buf);
        }
    }

    pub async fn recv_packet<P: Packet>(&mut self) -> Result<P, SessionError> {
        let frame = self.recv_frame().await?;
        Ok(frame.decode::<P>()?)
    }

    pub async fn send_packet<P: Packet>(&mut self, pkt: &P) -> Result<(), SessionError> {
        self.encoder.append_packet(pkt)?;
        let bytes = self.encoder.take();
        self.stream.write_all(&bytes).await?;
        Ok(())
    }
}
