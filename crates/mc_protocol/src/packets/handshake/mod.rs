use crate::error::Result;
use crate::packet::Packet;
use crate::primitives::{read_string, read_u16, write_string, write_u16};
use crate::var_int::VarInt;

/// `0x00` in the `handshake` state. An id other than `0x00` here is fatal.
#[derive(Clone, Debug)]
pub struct HandshakeC2s {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: NextState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextState {
    Status,
    Login,
    Transfer,
}

impl NextState {
    pub fn from_varint(n: i32) -> Result<Self> {
        match n {
            1 => Ok(NextState::Status),
            2 => Ok(NextState::Login),
            3 => Ok(NextState::Transfer),
            _ => Err(crate::error::ProtocolError::OutOfRange),
        }
    }

    pub fn to_varint(self) -> i32 {
        match self {
            NextState::Status => 1,
            NextState::Login => 2,
            NextState::Transfer => 3,
        }
    }
}

impl Packet for HandshakeC2s {
    const ID: i32 = 0x00;
    const NAME: &'static str = "Handshake";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.protocol_version).encode(&mut *w)?;
        write_string(&self.server_address, &mut *w)?;
        write_u16(self.server_port, &mut *w)?;
        VarInt(self.next_state.to_varint()).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let protocol_version = VarInt::decode(r)?.0;
        let server_address = read_string(r)?;
        let server_port = read_u16(r)?;
        let next_state = NextState::from_varint(VarInt::decode(r)?.0)?;

        Ok(Self {
            protocol_version,
            server_address,
            server_port,
            next_state,
        })
    }
}
