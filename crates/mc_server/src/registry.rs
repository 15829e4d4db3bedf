//! Pre-built registry and tag payloads (§4.E). The real vanilla dumps are
//! out of scope per §1 — the "entries" here are minimal NBT compounds, just
//! enough for a client to accept the configuration handshake and proceed
//! to `play` against this server's single, hardcoded dimension.

use mc_protocol::nbt::Compound;
use mc_protocol::packets::configuration::RegistryDataS2c;

/// One minimal entry for a registry that the client requires to be present
/// but whose contents this server never actually looks up again.
fn empty_entry() -> Vec<u8> {
    let mut buf = Vec::new();
    Compound::new().write_root(&mut buf).expect("Vec write cannot fail");
    buf
}

/// The registries a vanilla 1.21.x client expects before `Finish
/// Configuration`, each carrying the single entry this server's world uses.
pub fn registry_frames() -> Vec<RegistryDataS2c> {
    let registries: &[(&str, &[&str])] = &[
        ("minecraft:dimension_type", &["minecraft:overworld"]),
        ("minecraft:worldgen/biome", &["minecraft:plains"]),
        ("minecraft:chat_type", &["minecraft:chat"]),
        ("minecraft:damage_type", &["minecraft:generic"]),
        ("minecraft:wolf_variant", &["minecraft:pale"]),
        ("minecraft:painting_variant", &["minecraft:kebab"]),
    ];

    registries
        .iter()
        .map(|(registry_id, entries)| {
            let mut entries_buf = Vec::new();
            for _ in *entries {
                entries_buf.extend_from_slice(&empty_entry());
            }
            RegistryDataS2c {
                registry_id: (*registry_id).to_owned(),
                entries: entries_buf,
            }
        })
        .collect()
}

/// The tag frame that follows registry data. Vanilla-relevant tags are
/// collapsed into a single empty payload since this server's toy world has
/// no blocks/items/entities that need tag membership checked.
pub fn tags_payload() -> Vec<u8> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registry_carries_at_least_one_entry() {
        for frame in registry_frames() {
            assert!(!frame.entries.is_empty(), "{} has no entries", frame.registry_id);
        }
    }
}
