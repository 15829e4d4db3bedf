use std::io::Write;

use byteorder::{ReadBytesExt, BigEndian};

use crate::error::ProtocolError;
use crate::var_int::VarInt;

/// Maximum string length this codec accepts, in UTF-8 bytes. Vanilla caps
/// most protocol strings at 32767 characters; bytes is a conservative
/// stand-in since we never construct strings anywhere near that size.
pub const MAX_STRING_LEN: usize = 32767 * 4;

pub fn write_string(s: &str, mut w: impl Write) -> std::io::Result<()> {
    VarInt(s.len() as i32).encode(&mut w)?;
    w.write_all(s.as_bytes())
}

pub fn read_string(r: &mut &[u8]) -> Result<String, ProtocolError> {
    let len = VarInt::decode(r)?.0;
    if len < 0 || len as usize > MAX_STRING_LEN {
        return Err(ProtocolError::OutOfRange);
    }
    let len = len as usize;
    if r.len() < len {
        return Err(ProtocolError::MalformedPayload);
    }
    let (bytes, rest) = r.split_at(len);
    let s = std::str::from_utf8(bytes)
        .map_err(|_| ProtocolError::InvalidUtf8)?
        .to_owned();
    *r = rest;
    Ok(s)
}

pub fn write_bool(b: bool, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&[if b { 0x01 } else { 0x00 }])
}

pub fn read_bool(r: &mut &[u8]) -> Result<bool, ProtocolError> {
    match r.read_u8().map_err(|_| ProtocolError::MalformedPayload)? {
        0x00 => Ok(false),
        0x01 => Ok(true),
        _ => Err(ProtocolError::OutOfRange),
    }
}

pub fn write_u8(v: u8, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&[v])
}

pub fn read_u8(r: &mut &[u8]) -> Result<u8, ProtocolError> {
    r.read_u8().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_i8(v: i8, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&[v as u8])
}

pub fn read_i8(r: &mut &[u8]) -> Result<i8, ProtocolError> {
    r.read_i8().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_u16(v: u16, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_u16(r: &mut &[u8]) -> Result<u16, ProtocolError> {
    r.read_u16::<BigEndian>().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_i32(v: i32, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_i32(r: &mut &[u8]) -> Result<i32, ProtocolError> {
    r.read_i32::<BigEndian>().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_i64(v: i64, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_i64(r: &mut &[u8]) -> Result<i64, ProtocolError> {
    r.read_i64::<BigEndian>().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_f32(v: f32, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_f32(r: &mut &[u8]) -> Result<f32, ProtocolError> {
    r.read_f32::<BigEndian>().map_err(|_| ProtocolError::MalformedPayload)
}

pub fn write_f64(v: f64, mut w: impl Write) -> std::io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_f64(r: &mut &[u8]) -> Result<f64, ProtocolError> {
    r.read_f64::<BigEndian>().map_err(|_| ProtocolError::MalformedPayload)
}

/// VarInt count, then that many strings — used for the dimension-names
/// array and similar identifier lists.
pub fn write_identifier_array(items: &[String], mut w: impl Write) -> std::io::Result<()> {
    VarInt(items.len() as i32).encode(&mut w)?;
    for item in items {
        write_string(item, &mut w)?;
    }
    Ok(())
}

pub fn read_identifier_array(r: &mut &[u8]) -> Result<Vec<String>, ProtocolError> {
    let count = VarInt::decode(r)?.0;
    if count < 0 {
        return Err(ProtocolError::OutOfRange);
    }
    (0..count).map(|_| read_string(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let mut buf = Vec::new();
        write_string("Alex", &mut buf).unwrap();
        let mut r = &buf[..];
        assert_eq!(read_string(&mut r).unwrap(), "Alex");
        assert!(r.is_empty());
    }

    #[test]
    fn bool_rejects_non_canonical_byte() {
        let buf = [0x02u8];
        let mut r = &buf[..];
        assert!(read_bool(&mut r).is_err());
    }

    #[test]
    fn identifier_array_round_trip() {
        let items = vec!["minecraft:overworld".to_owned()];
        let mut buf = Vec::new();
        write_identifier_array(&items, &mut buf).unwrap();
        let mut r = &buf[..];
        assert_eq!(read_identifier_array(&mut r).unwrap(), items);
    }
}
