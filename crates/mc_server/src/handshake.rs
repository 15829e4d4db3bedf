//! Handshake-state handling (§4.C): the single entry frame that selects the
//! next state.

use mc_protocol::packet::Packet;
use mc_protocol::packets::handshake::{HandshakeC2s, NextState};

use crate::conn::Connection;
use crate::error::SessionError;

pub struct Handshake {
    pub protocol_version: i32,
    pub next_state: NextState,
}

pub async fn run(conn: &mut Connection) -> Result<Handshake, SessionError> {
    let frame = conn.recv_frame().await?;
    if frame.id != HandshakeC2s::ID {
        return Err(SessionError::UnexpectedPacketId {
            state: "handshake",
            id: frame.id,
        });
    }
    let pkt = frame.decode::<HandshakeC2s>()?;
    conn.protocol_version = pkt.protocol_version;

    Ok(Handshake {
        protocol_version: pkt.protocol_version,
        next_state: pkt.next_state,
    })
}
