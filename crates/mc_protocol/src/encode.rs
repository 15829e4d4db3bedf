use bytes::BytesMut;

#[cfg(feature = "encryption")]
use aes::cipher::{generic_array::GenericArray, BlockEncryptMut, BlockSizeUser, KeyIvInit};

use crate::error::{ProtocolError, Result};
use crate::packet::Packet;
use crate::var_int::VarInt;
use crate::MAX_PACKET_SIZE;

#[cfg(feature = "encryption")]
type Cipher = cfb8::Encryptor<aes::Aes128>;

/// Builds outbound frames: `varint(len) || ...`, applying the compression
/// decision and (once enabled) the stream cipher described by the frame
/// codec's send path.
#[derive(Default)]
pub struct PacketEncoder {
    buf: BytesMut,
    #[cfg(feature = "compression")]
    compress_buf: Vec<u8>,
    #[cfg(feature = "compression")]
    threshold: i32,
    #[cfg(feature = "encryption")]
    cipher: Option<Cipher>,
}

impl PacketEncoder {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "compression")]
            threshold: -1,
            ..Default::default()
        }
    }

    pub fn append_packet<P: Packet>(&mut self, pkt: &P) -> Result<()> {
        let start = self.buf.len();

        VarInt(P::ID).encode(&mut self.buf)?;
        let mut body = Vec::new();
        pkt.encode_body(&mut body)?;
        self.buf.extend_from_slice(&body);

        self.enframe_from(start)
    }

    /// Wraps the raw bytes written since `start` (id + body) with the
    /// length/compression framing described by the frame codec's send path.
    fn enframe_from(&mut self, start: usize) -> Result<()> {
        let data_len = self.buf.len() - start;

        #[cfg(feature = "compression")]
        if self.threshold >= 0 {
            use std::io::Write;
            use flate2::write::ZlibEncoder;
            use flate2::Compression;

            if data_len >= self.threshold as usize {
                let mut z = ZlibEncoder::new(&mut self.compress_buf, Compression::new(4));
                z.write_all(&self.buf[start..])?;
                z.finish()?;

                let mut new_data = Vec::new();
                VarInt(data_len as i32).encode(&mut new_data)?;
                new_data.extend_from_slice(&self.compress_buf);
                self.compress_buf.clear();

                self.buf.truncate(start);
                let packet_len = new_data.len();
                check_packet_size(packet_len)?;
                VarInt(packet_len as i32).encode(&mut self.buf)?;
                self.buf.extend_from_slice(&new_data);
                return Ok(());
            } else {
                let mut new_data = Vec::new();
                VarInt(0).encode(&mut new_data)?;
                new_data.extend_from_slice(&self.buf[start..]);

                self.buf.truncate(start);
                let packet_len = new_data.len();
                check_packet_size(packet_len)?;
                VarInt(packet_len as i32).encode(&mut self.buf)?;
                self.buf.extend_from_slice(&new_data);
                return Ok(());
            }
        }

        check_packet_size(data_len)?;
        let payload = self.buf.split_off(start);
        VarInt(data_len as i32).encode(&mut self.buf)?;
        self.buf.extend_from_slice(&payload);

        Ok(())
    }

    #[cfg(feature = "compression")]
    pub fn set_compression(&mut self, threshold: i32) {
        self.threshold = threshold;
    }

    #[cfg(feature = "encryption")]
    pub fn enable_encryption(&mut self, key: &[u8; 16]) {
        assert!(self.cipher.is_none(), "encryption is already enabled");
        self.cipher = Some(Cipher::new_from_slices(key, key).expect("valid 16-byte key/iv"));
    }

    /// Drains the accumulated, already-framed bytes, applying the cipher
    /// (if enabled) over the whole drained span.
    pub fn take(&mut self) -> BytesMut {
        #[cfg(feature = "encryption")]
        if let Some(cipher) = &mut self.cipher {
            for chunk in self.buf.chunks_mut(Cipher::block_size()) {
                let gen_arr = GenericArray::from_mut_slice(chunk);
                cipher.encrypt_block_mut(gen_arr);
            }
        }

        self.buf.split()
    }
}

fn check_packet_size(packet_len: usize) -> Result<()> {
    if packet_len > MAX_PACKET_SIZE as usize {
        return Err(ProtocolError::FrameTooLarge(packet_len as i32));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PacketDecoder;

    struct Echo(Vec<u8>);
    impl Packet for Echo {
        const ID: i32 = 0x10;
        const NAME: &'static str = "Echo";
        fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
            w.extend_from_slice(&self.0);
            Ok(())
        }
        fn decode_body(r: &mut &[u8]) -> Result<Self> {
            Ok(Echo(r.to_vec()))
        }
    }

    #[test]
    fn plain_frame_round_trips() {
        let mut enc = PacketEncoder::new();
        enc.append_packet(&Echo(vec![1, 2, 3])).unwrap();
        let bytes = enc.take();

        let mut dec = PacketDecoder::new();
        dec.queue_slice(&bytes);
        let frame = dec.try_next_packet().unwrap().unwrap();
        assert_eq!(frame.id, 0x10);
        assert_eq!(&frame.body[..], &[1, 2, 3]);
    }
}
