use std::io::Write;

use byteorder::ReadBytesExt;

use crate::error::ProtocolError;

/// An `i32` encoded with variable length: seven-bit little-endian groups
/// with a continuation bit in the high bit of each byte.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct VarInt(pub i32);

impl VarInt {
    /// The maximum number of bytes a VarInt can occupy on the wire.
    pub const MAX_SIZE: usize = 5;

    pub fn written_size(self) -> usize {
        match self.0 {
            0 => 1,
            n => (31 - n.leading_zeros() as usize) / 7 + 1,
        }
    }

    /// Decodes a VarInt from a byte-oriented reader, distinguishing a
    /// truncated read (more bytes needed) from an oversized encoding.
    pub fn decode_partial(mut r: impl std::io::Read) -> std::result::Result<i32, VarIntDecodeError> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8().map_err(|_| VarIntDecodeError::Incomplete)?;
            val |= (byte as i32 & 0b0111_1111) << (i * 7);
            if byte & 0b1000_0000 == 0 {
                return Ok(val);
            }
        }
        Err(VarIntDecodeError::TooLarge)
    }

    pub fn encode(self, mut w: impl Write) -> std::io::Result<()> {
        // SWAR-style encode, adapted from the same technique used for the
        // fixed five-byte fast path elsewhere in this codebase's lineage.
        let x = self.0 as u32 as u64;
        let stage1 = (x & 0x0000_0000_0000_007f)
            | ((x & 0x0000_0000_0000_3f80) << 1)
            | ((x & 0x0000_0000_001f_c000) << 2)
            | ((x & 0x0000_0000_0fe0_0000) << 3)
            | ((x & 0x0000_0000_f000_0000) << 4);

        let leading = stage1.leading_zeros();
        let unused_bytes = (leading - 1) >> 3;
        let bytes_needed = 8 - unused_bytes;

        let msbs = 0x8080_8080_8080_8080;
        let msbmask = 0xffff_ffff_ffff_ffffu64 >> (((8 - bytes_needed + 1) << 3) - 1);

        let merged = stage1 | (msbs & msbmask);
        let bytes = merged.to_le_bytes();

        w.write_all(&bytes[..bytes_needed as usize])
    }

    pub fn decode(r: &mut &[u8]) -> std::result::Result<Self, ProtocolError> {
        let mut val = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8().map_err(|_| ProtocolError::DecodeId)?;
            val |= (byte as i32 & 0b0111_1111) << (i * 7);
            if byte & 0b1000_0000 == 0 {
                return Ok(VarInt(val));
            }
        }
        Err(ProtocolError::MalformedLength)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum VarIntDecodeError {
    #[error("incomplete VarInt")]
    Incomplete,
    #[error("VarInt is too large")]
    TooLarge,
}

impl From<i32> for VarInt {
    fn from(i: i32) -> Self {
        VarInt(i)
    }
}

impl From<VarInt> for i32 {
    fn from(i: VarInt) -> Self {
        i.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn varint_written_size() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..100_000)
            .map(|_| rng.gen())
            .chain([0, i32::MIN, i32::MAX])
            .map(VarInt)
        {
            buf.clear();
            n.encode(&mut buf).unwrap();
            assert_eq!(buf.len(), n.written_size());
        }
    }

    #[test]
    fn varint_round_trip() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..1_000_000)
            .map(|_| rng.gen())
            .chain([0, i32::MIN, i32::MAX])
        {
            VarInt(n).encode(&mut buf).unwrap();

            let mut slice = buf.as_slice();
            assert!(slice.len() <= VarInt::MAX_SIZE);
            assert_eq!(n, VarInt::decode(&mut slice).unwrap().0);
            assert!(slice.is_empty());

            buf.clear();
        }
    }

    #[test]
    fn incomplete_is_distinguished_from_too_large() {
        // A single continuation byte with nothing after it is incomplete.
        let buf = [0b1000_0000u8];
        assert_eq!(
            VarInt::decode_partial(&buf[..]),
            Err(VarIntDecodeError::Incomplete)
        );

        // Six continuation bytes is too large for a VarInt.
        let buf = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        assert_eq!(
            VarInt::decode_partial(&buf[..]),
            Err(VarIntDecodeError::TooLarge)
        );
    }
}
