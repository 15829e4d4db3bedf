use std::io::Write;

use byteorder::ReadBytesExt;

use crate::error::ProtocolError;

/// An `i64` encoded the same way as [`crate::var_int::VarInt`], but with up
/// to ten continuation groups instead of five.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct VarLong(pub i64);

impl VarLong {
    pub const MAX_SIZE: usize = 10;

    pub fn written_size(self) -> usize {
        match self.0 {
            0 => 1,
            n => (63 - n.leading_zeros() as usize) / 7 + 1,
        }
    }

    pub fn encode(self, mut w: impl Write) -> std::io::Result<()> {
        let mut x = self.0 as u64;
        loop {
            let byte = (x & 0x7f) as u8;
            x >>= 7;
            if x == 0 {
                w.write_all(&[byte])?;
                return Ok(());
            }
            w.write_all(&[byte | 0x80])?;
        }
    }

    pub fn decode(r: &mut &[u8]) -> std::result::Result<Self, ProtocolError> {
        let mut val: i64 = 0;
        for i in 0..Self::MAX_SIZE {
            let byte = r.read_u8().map_err(|_| ProtocolError::DecodeId)?;
            val |= ((byte & 0x7f) as i64) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(VarLong(val));
            }
        }
        Err(ProtocolError::MalformedLength)
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn varlong_round_trip() {
        let mut rng = thread_rng();
        let mut buf = vec![];

        for n in (0..1_000_000)
            .map(|_| rng.gen())
            .chain([0, i64::MIN, i64::MAX])
        {
            VarLong(n).encode(&mut buf).unwrap();

            let mut slice = buf.as_slice();
            assert!(slice.len() <= VarLong::MAX_SIZE);
            assert_eq!(n, VarLong::decode(&mut slice).unwrap().0);
            assert!(slice.is_empty());

            buf.clear();
        }
    }
}
