//! Play-state packets (§4.F/§4.G): login-play entry, chunk streaming, the
//! keep-alive/position exchange, and the toy block-update demo.

use crate::error::Result;
use crate::packet::Packet;
use crate::position::BlockPos;
use crate::primitives::{
    read_bool, read_f32, read_f64, read_i32, read_i64, read_i8, read_identifier_array, read_string,
    read_u8, write_bool, write_f32, write_f64, write_i32, write_i64, write_i8,
    write_identifier_array, write_string, write_u8,
};
use crate::var_int::VarInt;

/// `0x2B` S2C: entry packet into `play`, field order fixed by §4.F.
#[derive(Clone, Debug)]
pub struct LoginPlayS2c {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub dimension_names: Vec<String>,
    pub max_players: i32,
    pub view_distance: i32,
    pub simulation_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub do_limited_crafting: bool,
    pub dimension_type: i32,
    pub dimension_name: String,
    pub hashed_seed: i64,
    pub game_mode: u8,
    pub previous_game_mode: i8,
    pub is_debug: bool,
    pub is_flat: bool,
    pub has_death_location: bool,
    pub portal_cooldown: i32,
    pub sea_level: i32,
    pub enforces_secure_chat: bool,
}

impl Packet for LoginPlayS2c {
    const ID: i32 = 0x2B;
    const NAME: &'static str = "LoginPlay";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i32(self.entity_id, &mut *w)?;
        write_bool(self.is_hardcore, &mut *w)?;
        write_identifier_array(&self.dimension_names, &mut *w)?;
        VarInt(self.max_players).encode(&mut *w)?;
        VarInt(self.view_distance).encode(&mut *w)?;
        VarInt(self.simulation_distance).encode(&mut *w)?;
        write_bool(self.reduced_debug_info, &mut *w)?;
        write_bool(self.enable_respawn_screen, &mut *w)?;
        write_bool(self.do_limited_crafting, &mut *w)?;
        VarInt(self.dimension_type).encode(&mut *w)?;
        write_string(&self.dimension_name, &mut *w)?;
        write_i64(self.hashed_seed, &mut *w)?;
        write_u8(self.game_mode, &mut *w)?;
        write_i8(self.previous_game_mode, &mut *w)?;
        write_bool(self.is_debug, &mut *w)?;
        write_bool(self.is_flat, &mut *w)?;
        write_bool(self.has_death_location, &mut *w)?;
        VarInt(self.portal_cooldown).encode(&mut *w)?;
        VarInt(self.sea_level).encode(&mut *w)?;
        write_bool(self.enforces_secure_chat, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            entity_id: read_i32(r)?,
            is_hardcore: read_bool(r)?,
            dimension_names: read_identifier_array(r)?,
            max_players: VarInt::decode(r)?.0,
            view_distance: VarInt::decode(r)?.0,
            simulation_distance: VarInt::decode(r)?.0,
            reduced_debug_info: read_bool(r)?,
            enable_respawn_screen: read_bool(r)?,
            do_limited_crafting: read_bool(r)?,
            dimension_type: VarInt::decode(r)?.0,
            dimension_name: read_string(r)?,
            hashed_seed: read_i64(r)?,
            game_mode: read_u8(r)?,
            previous_game_mode: read_i8(r)?,
            is_debug: read_bool(r)?,
            is_flat: read_bool(r)?,
            has_death_location: read_bool(r)?,
            portal_cooldown: VarInt::decode(r)?.0,
            sea_level: VarInt::decode(r)?.0,
            enforces_secure_chat: read_bool(r)?,
        })
    }
}

/// `0x41` S2C: authoritative teleport to a position; the client must echo
/// `teleport_id` back (tracked loosely here — this server never withholds
/// movement on an unconfirmed teleport, matching the toy world's lax
/// movement validation).
#[derive(Clone, Copy, Debug)]
pub struct SynchronizePlayerPositionS2c {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub flags: i32,
    pub teleport_id: i32,
}

impl Packet for SynchronizePlayerPositionS2c {
    const ID: i32 = 0x41;
    const NAME: &'static str = "SynchronizePlayerPosition";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_f64(self.x, &mut *w)?;
        write_f64(self.y, &mut *w)?;
        write_f64(self.z, &mut *w)?;
        write_f64(self.velocity_x, &mut *w)?;
        write_f64(self.velocity_y, &mut *w)?;
        write_f64(self.velocity_z, &mut *w)?;
        write_f32(self.yaw, &mut *w)?;
        write_f32(self.pitch, &mut *w)?;
        write_i32(self.flags, &mut *w)?;
        VarInt(self.teleport_id).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64(r)?,
            y: read_f64(r)?,
            z: read_f64(r)?,
            velocity_x: read_f64(r)?,
            velocity_y: read_f64(r)?,
            velocity_z: read_f64(r)?,
            yaw: read_f32(r)?,
            pitch: read_f32(r)?,
            flags: read_i32(r)?,
            teleport_id: VarInt::decode(r)?.0,
        })
    }
}

/// `0x57` S2C: tells the client which chunk column is the center of its
/// view, so it can prioritize loading around it.
#[derive(Clone, Copy, Debug)]
pub struct SetCenterChunkS2c {
    pub chunk_x: i32,
    pub chunk_z: i32,
}

impl Packet for SetCenterChunkS2c {
    const ID: i32 = 0x57;
    const NAME: &'static str = "SetCenterChunk";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.chunk_x).encode(&mut *w)?;
        VarInt(self.chunk_z).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            chunk_x: VarInt::decode(r)?.0,
            chunk_z: VarInt::decode(r)?.0,
        })
    }
}

/// `0x22` S2C: a world event; this server only ever sends event 13
/// ("start waiting for chunks").
#[derive(Clone, Copy, Debug)]
pub struct GameEventS2c {
    pub event: u8,
    pub value: f32,
}

impl Packet for GameEventS2c {
    const ID: i32 = 0x22;
    const NAME: &'static str = "GameEvent";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_u8(self.event, &mut *w)?;
        write_f32(self.value, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            event: read_u8(r)?,
            value: read_f32(r)?,
        })
    }
}

/// `0x0C` S2C: marks the start of a chunk batch. Always empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkBatchStartS2c;

impl Packet for ChunkBatchStartS2c {
    const ID: i32 = 0x0C;
    const NAME: &'static str = "ChunkBatchStart";

    fn encode_body(&self, _w: &mut Vec<u8>) -> std::io::Result<()> {
        Ok(())
    }

    fn decode_body(_r: &mut &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// `0x27` S2C: one chunk column's block and light data. The payload is a
/// pre-built blob (chunk/world generation is out of scope per §1); this
/// codec only frames the column coordinate and the opaque data.
#[derive(Clone, Debug)]
pub struct ChunkDataAndLightS2c {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub data: Vec<u8>,
}

impl Packet for ChunkDataAndLightS2c {
    const ID: i32 = 0x27;
    const NAME: &'static str = "ChunkDataAndLight";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i32(self.chunk_x, &mut *w)?;
        write_i32(self.chunk_z, &mut *w)?;
        w.extend_from_slice(&self.data);
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let chunk_x = read_i32(r)?;
        let chunk_z = read_i32(r)?;
        let data = r.to_vec();
        *r = &r[r.len()..];
        Ok(Self {
            chunk_x,
            chunk_z,
            data,
        })
    }
}

/// `0x0B` S2C: the number of chunks sent in the batch just finished.
#[derive(Clone, Copy, Debug)]
pub struct ChunkBatchFinishedS2c {
    pub batch_size: i32,
}

impl Packet for ChunkBatchFinishedS2c {
    const ID: i32 = 0x0B;
    const NAME: &'static str = "ChunkBatchFinished";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        VarInt(self.batch_size).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            batch_size: VarInt::decode(r)?.0,
        })
    }
}

/// `0x26` S2C keep-alive ping; `0x1A` C2S is its echo.
#[derive(Clone, Copy, Debug)]
pub struct KeepAliveS2c {
    pub id: i64,
}

impl Packet for KeepAliveS2c {
    const ID: i32 = 0x26;
    const NAME: &'static str = "KeepAlive(S2C)";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i64(self.id, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self { id: read_i64(r)? })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct KeepAliveC2s {
    pub id: i64,
}

impl Packet for KeepAliveC2s {
    const ID: i32 = 0x1A;
    const NAME: &'static str = "KeepAlive(C2S)";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i64(self.id, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self { id: read_i64(r)? })
    }
}

/// `0x1C` C2S: position-only movement update.
#[derive(Clone, Copy, Debug)]
pub struct PlayerPositionC2s {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub on_ground: bool,
}

impl Packet for PlayerPositionC2s {
    const ID: i32 = 0x1C;
    const NAME: &'static str = "PlayerPosition";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_f64(self.x, &mut *w)?;
        write_f64(self.y, &mut *w)?;
        write_f64(self.z, &mut *w)?;
        write_bool(self.on_ground, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64(r)?,
            y: read_f64(r)?,
            z: read_f64(r)?,
            on_ground: read_bool(r)?,
        })
    }
}

/// `0x1D` C2S: position plus look, otherwise identical to `0x1C`.
#[derive(Clone, Copy, Debug)]
pub struct PlayerPositionAndRotationC2s {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Packet for PlayerPositionAndRotationC2s {
    const ID: i32 = 0x1D;
    const NAME: &'static str = "PlayerPositionAndRotation";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_f64(self.x, &mut *w)?;
        write_f64(self.y, &mut *w)?;
        write_f64(self.z, &mut *w)?;
        write_f32(self.yaw, &mut *w)?;
        write_f32(self.pitch, &mut *w)?;
        write_bool(self.on_ground, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            x: read_f64(r)?,
            y: read_f64(r)?,
            z: read_f64(r)?,
            yaw: read_f32(r)?,
            pitch: read_f32(r)?,
            on_ground: read_bool(r)?,
        })
    }
}

/// `0x08` S2C: a single block state change at a packed position.
#[derive(Clone, Copy, Debug)]
pub struct BlockUpdateS2c {
    pub position: BlockPos,
    pub block_state_id: i32,
}

impl Packet for BlockUpdateS2c {
    const ID: i32 = 0x08;
    const NAME: &'static str = "BlockUpdate";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_i64(self.position.encode()?, &mut *w)?;
        VarInt(self.block_state_id).encode(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            position: BlockPos::decode(read_i64(r)?),
            block_state_id: VarInt::decode(r)?.0,
        })
    }
}

/// `0x1C` S2C: a fatal play-stage disconnect, carrying an NBT text
/// component. Shares its numeric id with `PlayerPositionC2s` because the
/// two are scoped to opposite directions.
#[derive(Clone, Debug)]
pub struct PlayDisconnectS2c {
    pub reason_nbt: Vec<u8>,
}

impl Packet for PlayDisconnectS2c {
    const ID: i32 = 0x1C;
    const NAME: &'static str = "PlayDisconnect";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        w.extend_from_slice(&self.reason_nbt);
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let reason_nbt = r.to_vec();
        *r = &r[r.len()..];
        Ok(Self { reason_nbt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_play_round_trip() {
        let pkt = LoginPlayS2c {
            entity_id: 0,
            is_hardcore: false,
            dimension_names: vec!["minecraft:overworld".to_owned()],
            max_players: 20,
            view_distance: 10,
            simulation_distance: 10,
            reduced_debug_info: false,
            enable_respawn_screen: false,
            do_limited_crafting: false,
            dimension_type: 0,
            dimension_name: "minecraft:overworld".to_owned(),
            hashed_seed: 4172702371561058553,
            game_mode: 2,
            previous_game_mode: -1,
            is_debug: false,
            is_flat: true,
            has_death_location: false,
            portal_cooldown: 0,
            sea_level: 0,
            enforces_secure_chat: false,
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = LoginPlayS2c::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.previous_game_mode, -1);
        assert_eq!(decoded.hashed_seed, 4172702371561058553);
    }

    #[test]
    fn block_update_round_trip() {
        let pkt = BlockUpdateS2c {
            position: BlockPos::new(8, 1, 8),
            block_state_id: 42,
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = BlockUpdateS2c::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.position, BlockPos::new(8, 1, 8));
        assert_eq!(decoded.block_state_id, 42);
    }
}
