//! The block-state palette (§3): a read-only `name -> state_id` mapping,
//! loaded once at startup. Per §1 the full registry dump is out of scope;
//! this server's world loop only ever paints the handful of blocks below,
//! so the palette is a small static table rather than the full game
//! registry.

/// Resolves a block resource name to its numeric state id.
pub fn state_id(name: &str) -> Option<i32> {
    match name {
        "minecraft:air" => Some(0),
        "minecraft:white_concrete" => Some(9363),
        "minecraft:gray_concrete" => Some(9370),
        "minecraft:light_gray_concrete" => Some(9371),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_world_blocks_are_all_resolvable() {
        for name in [
            "minecraft:white_concrete",
            "minecraft:gray_concrete",
            "minecraft:light_gray_concrete",
        ] {
            assert!(state_id(name).is_some(), "missing palette entry for {name}");
        }
    }

    #[test]
    fn unknown_block_is_none() {
        assert_eq!(state_id("minecraft:does_not_exist"), None);
    }
}
