//! Login-state packets (§4.D): the RSA/Mojang handshake plus the plain
//! username exchange used by offline mode.

use crate::error::Result;
use crate::packet::Packet;
use crate::primitives::{read_bool, read_string, write_bool, write_string};
use crate::var_int::VarInt;

/// `0x00` C2S: the first packet in `login`, carrying the requested username
/// and (protocol 764+) the client's own profile UUID.
#[derive(Clone, Debug)]
pub struct LoginStartC2s {
    pub username: String,
    pub uuid: uuid::Uuid,
}

impl Packet for LoginStartC2s {
    const ID: i32 = 0x00;
    const NAME: &'static str = "LoginStart";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.username, &mut *w)?;
        w.extend_from_slice(self.uuid.as_bytes());
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let username = read_string(r)?;
        if r.len() < 16 {
            return Err(crate::error::ProtocolError::MalformedPayload);
        }
        let (uuid_bytes, rest) = r.split_at(16);
        let uuid = uuid::Uuid::from_slice(uuid_bytes).map_err(|_| crate::error::ProtocolError::OutOfRange)?;
        *r = rest;
        Ok(Self { username, uuid })
    }
}

fn write_byte_array(bytes: &[u8], w: &mut Vec<u8>) -> std::io::Result<()> {
    VarInt(bytes.len() as i32).encode(&mut *w)?;
    w.extend_from_slice(bytes);
    Ok(())
}

fn read_byte_array(r: &mut &[u8]) -> Result<Vec<u8>> {
    let len = VarInt::decode(r)?.0;
    if len < 0 || len as usize > r.len() {
        return Err(crate::error::ProtocolError::MalformedPayload);
    }
    let len = len as usize;
    let (bytes, rest) = r.split_at(len);
    let out = bytes.to_vec();
    *r = rest;
    Ok(out)
}

/// `0x01` S2C: offer of an RSA public key and a random verify token, asking
/// the client to encrypt both with it.
#[derive(Clone, Debug)]
pub struct EncryptionRequestS2c {
    pub server_id: String,
    pub public_key_der: Vec<u8>,
    pub verify_token: [u8; 16],
    pub authenticate: bool,
}

impl Packet for EncryptionRequestS2c {
    const ID: i32 = 0x01;
    const NAME: &'static str = "EncryptionRequest";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.server_id, &mut *w)?;
        write_byte_array(&self.public_key_der, w)?;
        write_byte_array(&self.verify_token, w)?;
        write_bool(self.authenticate, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let server_id = read_string(r)?;
        let public_key_der = read_byte_array(r)?;
        let verify_token = read_byte_array(r)?;
        let verify_token: [u8; 16] = verify_token
            .try_into()
            .map_err(|_| crate::error::ProtocolError::OutOfRange)?;
        let authenticate = read_bool(r)?;
        Ok(Self {
            server_id,
            public_key_der,
            verify_token,
            authenticate,
        })
    }
}

/// `0x01` C2S: the client's RSA-encrypted shared secret and verify token.
#[derive(Clone, Debug)]
pub struct EncryptionResponseC2s {
    pub shared_secret_enc: Vec<u8>,
    pub verify_token_enc: Vec<u8>,
}

impl Packet for EncryptionResponseC2s {
    const ID: i32 = 0x01;
    const NAME: &'static str = "EncryptionResponse";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_byte_array(&self.shared_secret_enc, w)?;
        write_byte_array(&self.verify_token_enc, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            shared_secret_enc: read_byte_array(r)?,
            verify_token_enc: read_byte_array(r)?,
        })
    }
}

/// One entry in a `Login Success` profile's property list (e.g. `textures`).
#[derive(Clone, Debug)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

fn write_properties(props: &[Property], w: &mut Vec<u8>) -> std::io::Result<()> {
    VarInt(props.len() as i32).encode(&mut *w)?;
    for p in props {
        write_string(&p.name, &mut *w)?;
        write_string(&p.value, &mut *w)?;
        write_bool(p.signature.is_some(), &mut *w)?;
        if let Some(sig) = &p.signature {
            write_string(sig, &mut *w)?;
        }
    }
    Ok(())
}

fn read_properties(r: &mut &[u8]) -> Result<Vec<Property>> {
    let count = VarInt::decode(r)?.0;
    if count < 0 {
        return Err(crate::error::ProtocolError::OutOfRange);
    }
    (0..count)
        .map(|_| {
            let name = read_string(r)?;
            let value = read_string(r)?;
            let signature = if read_bool(r)? {
                Some(read_string(r)?)
            } else {
                None
            };
            Ok(Property {
                name,
                value,
                signature,
            })
        })
        .collect()
}

/// `0x02` S2C: the player's final identity for this session.
#[derive(Clone, Debug)]
pub struct LoginSuccessS2c {
    pub uuid: uuid::Uuid,
    pub username: String,
    pub properties: Vec<Property>,
}

impl Packet for LoginSuccessS2c {
    const ID: i32 = 0x02;
    const NAME: &'static str = "LoginSuccess";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        w.extend_from_slice(self.uuid.as_bytes());
        write_string(&self.username, &mut *w)?;
        write_properties(&self.properties, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        if r.len() < 16 {
            return Err(crate::error::ProtocolError::MalformedPayload);
        }
        let (uuid_bytes, rest) = r.split_at(16);
        let uuid = uuid::Uuid::from_slice(uuid_bytes).map_err(|_| crate::error::ProtocolError::OutOfRange)?;
        *r = rest;
        let username = read_string(r)?;
        let properties = read_properties(r)?;
        Ok(Self {
            uuid,
            username,
            properties,
        })
    }
}

/// `0x03` S2C: enables compression on the codec from this point on.
#[derive(Clone, Copy, Debug)]
pub struct SetCompressionS2c {
    pub threshold: i32,
}

impl Packet for SetCompressionS2c {
    const ID: i32 = 0x03;
    const NAME: &'static str = "SetCompression";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.threshold).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            threshold: VarInt::decode(r)?.0,
        })
    }
}

/// `0x03` C2S: the client confirms it applied `Login Success` and is ready
/// to move to `configuration`. Empty body.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoginAcknowledgedC2s;

impl Packet for LoginAcknowledgedC2s {
    const ID: i32 = 0x03;
    const NAME: &'static str = "LoginAcknowledged";

    fn encode_body(&self, _w: &mut Vec<u8>) -> std::io::Result<()> {
        Ok(())
    }

    fn decode_body(_r: &mut &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// `0x04` C2S: reply to a login-state Cookie Request (proxy use only; see
/// the Transfer proxy's cookie discussion in `DESIGN.md`).
#[derive(Clone, Debug)]
pub struct CookieResponseC2s {
    pub key: String,
    pub payload: Option<Vec<u8>>,
}

impl Packet for CookieResponseC2s {
    const ID: i32 = 0x04;
    const NAME: &'static str = "CookieResponse";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.key, &mut *w)?;
        write_bool(self.payload.is_some(), &mut *w)?;
        if let Some(payload) = &self.payload {
            write_byte_array(payload, w)?;
        }
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let key = read_string(r)?;
        let payload = if read_bool(r)? {
            Some(read_byte_array(r)?)
        } else {
            None
        };
        Ok(Self { key, payload })
    }
}

/// `0x00` S2C: a fatal login-stage disconnect, carrying a JSON text
/// component.
#[derive(Clone, Debug)]
pub struct LoginDisconnectS2c {
    pub reason_json: String,
}

impl Packet for LoginDisconnectS2c {
    const ID: i32 = 0x00;
    const NAME: &'static str = "LoginDisconnect";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.reason_json, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            reason_json: read_string(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_start_round_trip() {
        let pkt = LoginStartC2s {
            username: "Alex".to_owned(),
            uuid: uuid::Uuid::nil(),
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = LoginStartC2s::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.username, "Alex");
    }

    #[test]
    fn login_success_round_trip_with_properties() {
        let pkt = LoginSuccessS2c {
            uuid: uuid::Uuid::nil(),
            username: "Alex".to_owned(),
            properties: vec![Property {
                name: "textures".to_owned(),
                value: "abc".to_owned(),
                signature: Some("sig".to_owned()),
            }],
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = LoginSuccessS2c::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.properties.len(), 1);
        assert_eq!(decoded.properties[0].signature.as_deref(), Some("sig"));
    }

    #[test]
    fn encryption_request_round_trip() {
        let pkt = EncryptionRequestS2c {
            server_id: String::new(),
            public_key_der: vec![1, 2, 3],
            verify_token: [9u8; 16],
            authenticate: true,
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = EncryptionRequestS2c::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.verify_token, [9u8; 16]);
        assert!(decoded.authenticate);
    }
}
