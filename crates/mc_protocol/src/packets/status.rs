//! Status-state packets (§4.I): MOTD response and ping echo.

use crate::error::Result;
use crate::packet::Packet;
use crate::primitives::{read_i64, read_string, write_i64, write_string};

/// `0x00` in `status`: request for the MOTD response. Empty body.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusRequestC2s;

impl Packet for StatusRequestC2s {
    const ID: i32 = 0x00;
    const NAME: &'static str = "StatusRequest";

    fn encode_body(&self, _w: &mut Vec<u8>) -> std::io::Result<()> {
        Ok(())
    }

    fn decode_body(_r: &mut &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// `0x00` in `status`: the JSON status document.
#[derive(Clone, Debug)]
pub struct StatusResponseS2c {
    pub json: String,
}

impl Packet for StatusResponseS2c {
    const ID: i32 = 0x00;
    const NAME: &'static str = "StatusResponse";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.json, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            json: read_string(r)?,
        })
    }
}

/// `0x01` in `status`: client-sent ping payload to be echoed back verbatim.
#[derive(Clone, Copy, Debug)]
pub struct PingRequestC2s {
    pub payload: i64,
}

impl Packet for PingRequestC2s {
    const ID: i32 = 0x01;
    const NAME: &'static str = "PingRequest";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i64(self.payload, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            payload: read_i64(r)?,
        })
    }
}

/// `0x01` in `status`: echo of the client's ping payload.
#[derive(Clone, Copy, Debug)]
pub struct PongResponseS2c {
    pub payload: i64,
}

impl Packet for PongResponseS2c {
    const ID: i32 = 0x01;
    const NAME: &'static str = "PongResponse";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i64(self.payload, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            payload: read_i64(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_echoes_the_same_payload() {
        let req = PingRequestC2s { payload: 1 };
        let mut buf = Vec::new();
        req.encode_body(&mut buf).unwrap();
        let decoded = PingRequestC2s::decode_body(&mut &buf[..]).unwrap();
        let pong = PongResponseS2c {
            payload: decoded.payload,
        };
        assert_eq!(pong.payload, 1);
    }
}
