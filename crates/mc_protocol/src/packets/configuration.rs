//! Configuration-state packets (§4.E): client-info collection, the
//! brand/feature-flags/known-packs/registry/tags exchange, and the finish
//! handshake.

use crate::error::Result;
use crate::packet::Packet;
use crate::primitives::{
    read_bool, read_i8, read_identifier_array, read_string, read_u8, write_bool, write_i8,
    write_identifier_array, write_string, write_u8,
};
use crate::var_int::VarInt;

/// `0x00` C2S: the client's locale/render-distance/chat settings. Only the
/// fields this server actually reads are kept typed; the rest are consumed
/// and discarded.
#[derive(Clone, Debug)]
pub struct ClientInformationC2s {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: i32,
    pub enable_text_filtering: bool,
    pub allow_server_listings: bool,
}

impl Packet for ClientInformationC2s {
    const ID: i32 = 0x00;
    const NAME: &'static str = "ClientInformation";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.locale, &mut *w)?;
        write_i8(self.view_distance, &mut *w)?;
        VarInt(self.chat_mode).encode(&mut *w)?;
        write_bool(self.chat_colors, &mut *w)?;
        write_u8(self.displayed_skin_parts, &mut *w)?;
        VarInt(self.main_hand).encode(&mut *w)?;
        write_bool(self.enable_text_filtering, &mut *w)?;
        write_bool(self.allow_server_listings, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            locale: read_string(r)?,
            view_distance: read_i8(r)?,
            chat_mode: VarInt::decode(r)?.0,
            chat_colors: read_bool(r)?,
            displayed_skin_parts: read_u8(r)?,
            main_hand: VarInt::decode(r)?.0,
            enable_text_filtering: read_bool(r)?,
            allow_server_listings: read_bool(r)?,
        })
    }
}

/// Plugin message, both directions: a channel identifier then raw bytes to
/// the end of the frame. Used clientbound for the `minecraft:brand` push
/// and serverbound for the client's own brand announcement.
#[derive(Clone, Debug)]
pub struct PluginMessage {
    pub channel: String,
    pub data: Vec<u8>,
}

impl Packet for PluginMessage {
    const ID: i32 = 0x01;
    const NAME: &'static str = "PluginMessage";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.channel, &mut *w)?;
        w.extend_from_slice(&self.data);
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let channel = read_string(r)?;
        let data = r.to_vec();
        *r = &r[r.len()..];
        Ok(Self { channel, data })
    }
}

/// Serverbound plugin message uses id `0x02` rather than `0x01`.
#[derive(Clone, Debug)]
pub struct PluginMessageC2s(pub PluginMessage);

impl Packet for PluginMessageC2s {
    const ID: i32 = 0x02;
    const NAME: &'static str = "PluginMessage(C2S)";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        self.0.encode_body(w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self(PluginMessage::decode_body(r)?))
    }
}

/// `0x03` in both directions: finish/acknowledge the configuration
/// handshake. Empty body.
#[derive(Clone, Copy, Debug, Default)]
pub struct FinishConfiguration;

impl Packet for FinishConfiguration {
    const ID: i32 = 0x03;
    const NAME: &'static str = "FinishConfiguration";

    fn encode_body(&self, _w: &mut Vec<u8>) -> std::io::Result<()> {
        Ok(())
    }

    fn decode_body(_r: &mut &[u8]) -> Result<Self> {
        Ok(Self)
    }
}

/// `0x0C` S2C: the set of vanilla feature flags this server enables.
#[derive(Clone, Debug)]
pub struct FeatureFlagsS2c {
    pub flags: Vec<String>,
}

impl Packet for FeatureFlagsS2c {
    const ID: i32 = 0x0C;
    const NAME: &'static str = "FeatureFlags";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_identifier_array(&self.flags, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            flags: read_identifier_array(r)?,
        })
    }
}

/// One `(namespace, id, version)` entry of a known-packs list.
#[derive(Clone, Debug)]
pub struct KnownPack {
    pub namespace: String,
    pub id: String,
    pub version: String,
}

fn write_known_packs(packs: &[KnownPack], w: &mut Vec<u8>) -> std::io::Result<()> {
    VarInt(packs.len() as i32).encode(&mut *w)?;
    for pack in packs {
        write_string(&pack.namespace, &mut *w)?;
        write_string(&pack.id, &mut *w)?;
        write_string(&pack.version, &mut *w)?;
    }
    Ok(())
}

fn read_known_packs(r: &mut &[u8]) -> Result<Vec<KnownPack>> {
    let count = VarInt::decode(r)?.0;
    if count < 0 {
        return Err(crate::error::ProtocolError::OutOfRange);
    }
    (0..count)
        .map(|_| {
            Ok(KnownPack {
                namespace: read_string(r)?,
                id: read_string(r)?,
                version: read_string(r)?,
            })
        })
        .collect()
}

/// `0x0E` S2C: the server's list of data packs the client should already
/// have, so registry data for them can be skipped.
#[derive(Clone, Debug)]
pub struct KnownPacksS2c {
    pub packs: Vec<KnownPack>,
}

impl Packet for KnownPacksS2c {
    const ID: i32 = 0x0E;
    const NAME: &'static str = "KnownPacks(S2C)";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_known_packs(&self.packs, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            packs: read_known_packs(r)?,
        })
    }
}

/// `0x07` C2S: the client's reply, its own known-packs list (ignored; its
/// arrival is what matters, per §4.E).
#[derive(Clone, Debug)]
pub struct KnownPacksC2s {
    pub packs: Vec<KnownPack>,
}

impl Packet for KnownPacksC2s {
    const ID: i32 = 0x07;
    const NAME: &'static str = "KnownPacks(C2S)";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_known_packs(&self.packs, w)
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            packs: read_known_packs(r)?,
        })
    }
}

/// `0x07` S2C: one registry's full id-to-entry dump. The payload is opaque
/// NBT/binary data sourced from the pre-built registry blobs (out of scope
/// per §1); this codec only frames it.
#[derive(Clone, Debug)]
pub struct RegistryDataS2c {
    pub registry_id: String,
    pub entries: Vec<u8>,
}

impl Packet for RegistryDataS2c {
    const ID: i32 = 0x07;
    const NAME: &'static str = "RegistryData";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        write_string(&self.registry_id, &mut *w)?;
        w.extend_from_slice(&self.entries);
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let registry_id = read_string(r)?;
        let entries = r.to_vec();
        *r = &r[r.len()..];
        Ok(Self {
            registry_id,
            entries,
        })
    }
}

/// `0x0D` S2C: the tag frame that follows the registry-data sequence.
#[derive(Clone, Debug)]
pub struct UpdateTagsS2c {
    /// Opaque, pre-built tag payload (out of scope per §1).
    pub payload: Vec<u8>,
}

impl Packet for UpdateTagsS2c {
    const ID: i32 = 0x0D;
    const NAME: &'static str = "UpdateTags";

    fn encode_body(&self, w: &mut Vec<u8>) -> std::io::Result<()> {
        w.extend_from_slice(&self.payload);
        Ok(())
    }

    fn decode_body(r: &mut &[u8]) -> Result<Self> {
        let payload = r.to_vec();
        *r = &r[r.len()..];
        Ok(Self { payload })
    }
}

/// `0x02` S2C: a fatal configuration-stage disconnect, carrying an NBT text
/// component.
#[derive(Clone, Debug)]
pub struct ConfigurationDisconnectS2c {
    pub reason_nbt: Vec<u8>,
}

impl Packet for ConfigurationDisconnectS2c {
    const ID: i32 = 0x02;
    const NAME: &'static str = "ConfigurationDisconnect";

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
    fn plugin_message_carries_bytes_to_end() {
        let pkt = PluginMessage {
            channel: "minecraft:brand".to_owned(),
            data: vec![1, 2, 3],
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = PluginMessage::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.data, vec![1, 2, 3]);
    }

    #[test]
    fn known_packs_round_trip() {
        let pkt = KnownPacksS2c {
            packs: vec![KnownPack {
                namespace: "minecraft".to_owned(),
                id: "core".to_owned(),
                version: "1.21.8".to_owned(),
            }],
        };
        let mut buf = Vec::new();
        pkt.encode_body(&mut buf).unwrap();
        let decoded = KnownPacksS2c::decode_body(&mut &buf[..]).unwrap();
        assert_eq!(decoded.packs[0].id, "core");
    }
}
