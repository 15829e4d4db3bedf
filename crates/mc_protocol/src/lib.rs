//! Wire primitives, frame codec, and packet definitions for the Minecraft
//! Java Edition protocol, numeric versions 770/772 (game version 1.21.x).

pub mod bitpack;
pub mod command;
pub mod decode;
pub mod encode;
pub mod error;
pub mod nbt;
pub mod packet;
pub mod packets;
pub mod position;
pub mod primitives;
pub mod text;
pub mod uuid_offline;
pub mod var_int;
pub mod var_long;

pub use decode::{PacketDecoder, PacketFrame};
pub use encode::PacketEncoder;
pub use error::{ProtocolError, Result};
pub use packet::Packet;
pub use var_int::VarInt;
pub use var_long::VarLong;

/// The largest frame length (outer, post-length-prefix) this codec accepts,
/// 2^21 bytes, per the frame codec's bounds.
pub const MAX_PACKET_SIZE: i32 = 2_097_152;

/// Numeric protocol versions this server speaks.
pub const PROTOCOL_VERSION_1_21_5: i32 = 770;
pub const PROTOCOL_VERSION_1_21_8: i32 = 772;
