//! The live player set and entity-id allocator (§3, §5). Both are guarded
//! by the same mutex, matching the spec's "guarded by the same" invariant;
//! modeled as a `BTreeSet<i32>` of free ids reclaimed on disconnect, the
//! same shape as the `playerId()` helper the original source duplicates in
//! its proxy and world-engine modules (see `SPEC_FULL.md` §3).

use std::collections::BTreeMap;
use std::sync::Mutex;

use uuid::Uuid;

/// Per-tick demo-world state for a player's block-painting loop (§4.G),
/// modeled as an explicit optional field rather than a dynamic attribute
/// bag (§9, Design Note 2).
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoWorldState {
    pub last_cell: Option<(i64, i64)>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub uuid: Uuid,
    pub protocol_version: i32,
    pub entity_id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub world: DemoWorldState,
}

/// The process-wide live player set plus the entity-id allocator, both
/// mutated under one lock.
#[derive(Default)]
pub struct PlayerSet {
    inner: Mutex<PlayerSetInner>,
}

#[derive(Default)]
struct PlayerSetInner {
    players: BTreeMap<i32, Player>,
    free_ids: std::collections::BTreeSet<i32>,
    next_id: i32,
}

impl PlayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the smallest unused non-negative entity id and inserts the
    /// player under it.
    pub fn insert(&self, mut player: Player) -> i32 {
        let mut inner = self.inner.lock().unwrap();
        let id = match inner.free_ids.iter().next().copied() {
            Some(id) => {
                inner.free_ids.remove(&id);
                id
            }
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };
        player.entity_id = id;
        inner.players.insert(id, player);
        id
    }

    /// Releases `id` back to the allocator and removes the player entry.
    pub fn remove(&self, id: i32) -> Option<Player> {
        let mut inner = self.inner.lock().unwrap();
        let removed = inner.players.remove(&id);
        if removed.is_some() {
            inner.free_ids.insert(id);
        }
        removed
    }

    pub fn with_player<R>(&self, id: i32, f: impl FnOnce(&mut Player) -> R) -> Option<R> {
        let mut inner = self.inner.lock().unwrap();
        inner.players.get_mut(&id).map(f)
    }

    pub fn online_count(&self) -> usize {
        self.inner.lock().unwrap().players.len()
    }

    pub fn sample(&self, limit: usize) -> Vec<(String, Uuid)> {
        self.inner
            .lock()
            .unwrap()
            .players
            .values()
            .take(limit)
            .map(|p| (p.name.clone(), p.uuid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_player(name: &str) -> Player {
        Player {
            name: name.to_owned(),
            uuid: Uuid::nil(),
            protocol_version: 772,
            entity_id: -1,
            x: 8.0,
            y: 2.0,
            z: 8.0,
            world: DemoWorldState::default(),
        }
    }

    #[test]
    fn allocates_smallest_unused_id() {
        let set = PlayerSet::new();
        let a = set.insert(demo_player("a"));
        let b = set.insert(demo_player("b"));
        assert_eq!(a, 0);
        assert_eq!(b, 1);

        set.remove(a);
        let c = set.insert(demo_player("c"));
        assert_eq!(c, 0, "released id should be reused before a fresh one");
    }

    #[test]
    fn online_count_tracks_inserts_and_removes() {
        let set = PlayerSet::new();
        let a = set.insert(demo_player("a"));
        assert_eq!(set.online_count(), 1);
        set.remove(a);
        assert_eq!(set.online_count(), 0);
    }
}
