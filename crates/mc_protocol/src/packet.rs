/// A packet that has a fixed id within the state it is valid in, and can
/// encode/decode its own body (the id itself is written/read by the frame
/// codec, not by the packet).
pub trait Packet: Sized {
    const ID: i32;
    const NAME: &'static str;

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()>;
    fn decode_body(r: &mut &[u8]) -> crate::error::Result<Self>;
}
