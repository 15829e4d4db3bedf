//! Play entry and the per-connection world loop (§4.F/§4.G).

use std::time::{Duration, Instant};

use mc_protocol::command::{demo_command_graph, CommandTreeS2c};
use mc_protocol::packet::Packet;
use mc_protocol::packets::play::{
    BlockUpdateS2c, ChunkBatchFinishedS2c, ChunkBatchStartS2c, ChunkDataAndLightS2c, GameEventS2c,
    KeepAliveC2s, KeepAliveS2c, LoginPlayS2c, PlayDisconnectS2c, PlayerPositionAndRotationC2s,
    PlayerPositionC2s, SetCenterChunkS2c, SynchronizePlayerPositionS2c,
};
use mc_protocol::position::BlockPos;
use mc_protocol::text::Text;
use tracing::instrument;

use crate::conn::Connection;
use crate::error::SessionError;
use crate::login::LoggedInIdentity;
use crate::palette;
use crate::player::{DemoWorldState, Player, PlayerSet};

const KEEP_ALIVE_SEND_INTERVAL: Duration = Duration::from_secs(1);
const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(5);
const TICK_PERIOD: Duration = Duration::from_millis(50);
const CHUNK_RADIUS: i32 = 2;
const SPAWN: (f64, f64, f64) = (8.0, 2.0, 8.0);
const SETTLED: (f64, f64, f64) = (8.0, 1.0, 8.0);
const DEMO_BLOCK_Y: i32 = 1;

/// Demo-world cell index: `floor` for negative coordinates, truncation for
/// non-negative ones. These agree for every real number, so `0 < c < 1`
/// naturally resolves to cell `0` — the "origin hole" the design notes call
/// out is this formula's ordinary behavior at the boundary, kept as
/// specified rather than special-cased away.
fn cell(c: f64) -> i64 {
    if c < 0.0 {
        c.floor() as i64
    } else {
        c as i64
    }
}

fn checkerboard_color(cx: i64, cz: i64) -> &'static str {
    if cx.div_euclid(2).rem_euclid(2) == cz.div_euclid(2).rem_euclid(2) {
        "minecraft:gray_concrete"
    } else {
        "minecraft:light_gray_concrete"
    }
}

#[instrument(skip_all, fields(peer = %conn.peer_addr, player = %identity.username))]
pub async fn run(
    conn: &mut Connection,
    players: &PlayerSet,
    identity: LoggedInIdentity,
) -> Result<(), SessionError> {
    let entity_id = players.insert(Player {
        name: identity.username.clone(),
        uuid: identity.uuid,
        protocol_version: conn.protocol_version,
        entity_id: 0,
        x: SPAWN.0,
        y: SPAWN.1,
        z: SPAWN.2,
        world: DemoWorldState::default(),
    });

    let result = run_session(conn, players, entity_id).await;
    players.remove(entity_id);
    result
}

async fn run_session(
    conn: &mut Connection,
    players: &PlayerSet,
    entity_id: i32,
) -> Result<(), SessionError> {
    enter_play(conn, entity_id).await?;

    let mut last_keep_alive_sent = Instant::now();
    let mut last_keep_alive_received = Instant::now();
    let mut ticker = tokio::time::interval(TICK_PERIOD);

    paint_initial_cell(conn, players, entity_id, SETTLED.0, SETTLED.2).await?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if last_keep_alive_sent.elapsed() >= KEEP_ALIVE_SEND_INTERVAL {
                    conn.send_packet(&KeepAliveS2c { id: 0 }).await?;
                    last_keep_alive_sent = Instant::now();
                }
                if last_keep_alive_received.elapsed() >= KEEP_ALIVE_TIMEOUT {
                    disconnect(conn, "Timed out").await?;
                    return Ok(());
                }
            }
            frame = conn.recv_frame() => {
                let frame = frame?;
                match frame.id {
                    id if id == KeepAliveC2s::ID => {
                        frame.decode::<KeepAliveC2s>()?;
                        last_keep_alive_received = Instant::now();
                    }
                    id if id == PlayerPositionC2s::ID => {
                        let pkt = frame.decode::<PlayerPositionC2s>()?;
                        on_move(conn, players, entity_id, pkt.x, pkt.z).await?;
                    }
                    id if id == PlayerPositionAndRotationC2s::ID => {
                        let pkt = frame.decode::<PlayerPositionAndRotationC2s>()?;
                        on_move(conn, players, entity_id, pkt.x, pkt.z).await?;
                    }
                    _ => {
                        // Chat, container clicks, and swing/use-item are all
                        // out of scope for this toy world; ignore silently.
                    }
                }
            }
        }
    }
}

async fn enter_play(conn: &mut Connection, entity_id: i32) -> Result<(), SessionError> {
    conn.send_packet(&LoginPlayS2c {
        entity_id,
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
    })
    .await?;

    let (nodes, root_index) = demo_command_graph();
    conn.send_packet(&CommandTreeS2c { nodes, root_index }).await?;

    conn.send_packet(&SynchronizePlayerPositionS2c {
        x: SPAWN.0,
        y: SPAWN.1,
        z: SPAWN.2,
        velocity_x: 0.0,
        velocity_y: 0.0,
        velocity_z: 0.0,
        yaw: 0.0,
        pitch: 0.0,
        flags: 0,
        teleport_id: 0,
    })
    .await?;

    conn.send_packet(&SetCenterChunkS2c { chunk_x: 0, chunk_z: 0 }).await?;
    conn.send_packet(&GameEventS2c { event: 13, value: 0.0 }).await?;
    conn.send_packet(&ChunkBatchStartS2c).await?;

    let mut sent = 0i32;
    for chunk_x in -CHUNK_RADIUS..=CHUNK_RADIUS {
        for chunk_z in -CHUNK_RADIUS..=CHUNK_RADIUS {
            conn.send_packet(&ChunkDataAndLightS2c {
                chunk_x,
                chunk_z,
                data: build_chunk_blob(),
            })
            .await?;
            sent += 1;
        }
    }
    conn.send_packet(&ChunkBatchFinishedS2c { batch_size: sent }).await?;

    conn.send_packet(&SynchronizePlayerPositionS2c {
        x: SETTLED.0,
        y: SETTLED.1,
        z: SETTLED.2,
        velocity_x: 0.0,
        velocity_y: 0.0,
        velocity_z: 0.0,
        yaw: 0.0,
        pitch: 0.0,
        flags: 0,
        teleport_id: 0,
    })
    .await?;

    Ok(())
}

/// A fixed-size placeholder payload: chunk/world generation is an external
/// collaborator this server never implements, so every column carries the
/// same opaque bytes.
fn build_chunk_blob() -> Vec<u8> {
    vec![0u8; 64]
}

async fn paint_initial_cell(
    conn: &mut Connection,
    players: &PlayerSet,
    entity_id: i32,
    x: f64,
    z: f64,
) -> Result<(), SessionError> {
    let m = (cell(x), cell(z));
    paint_block(conn, m, "minecraft:white_concrete").await?;
    players.with_player(entity_id, |p| {
        p.x = x;
        p.z = z;
        p.world.last_cell = Some(m);
    });
    Ok(())
}

async fn on_move(
    conn: &mut Connection,
    players: &PlayerSet,
    entity_id: i32,
    x: f64,
    z: f64,
) -> Result<(), SessionError> {
    let m = (cell(x), cell(z));
    let previous = players
        .with_player(entity_id, |p| {
            p.x = x;
            p.z = z;
            p.world.last_cell.replace(m)
        })
        .flatten();

    if previous == Some(m) {
        return Ok(());
    }

    if let Some(p) = previous {
        paint_block(conn, p, checkerboard_color(p.0, p.1)).await?;
    }
    paint_block(conn, m, "minecraft:white_concrete").await?;

    Ok(())
}

async fn paint_block(
    conn: &mut Connection,
    cell: (i64, i64),
    block_name: &str,
) -> Result<(), SessionError> {
    let block_state_id = palette::state_id(block_name).unwrap_or(0);
    let position = BlockPos::new(cell.0 as i32, DEMO_BLOCK_Y, cell.1 as i32);
    conn.send_packet(&BlockUpdateS2c {
        position,
        block_state_id,
    })
    .await?;
    Ok(())
}

async fn disconnect(conn: &mut Connection, reason: &str) -> Result<(), SessionError> {
    let _ = conn
        .send_packet(&PlayDisconnectS2c {
            reason_nbt: Text::new(reason).to_nbt(),
        })
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_agrees_with_floor_and_trunc_away_from_boundary() {
        assert_eq!(cell(8.4), 8);
        assert_eq!(cell(-0.5), -1);
        assert_eq!(cell(-8.1), -9);
    }

    #[test]
    fn origin_hole_resolves_to_zero_zero() {
        assert_eq!((cell(0.5), cell(0.5)), (0, 0));
    }

    #[test]
    fn checkerboard_alternates_every_two_cells() {
        assert_eq!(checkerboard_color(0, 0), checkerboard_color(1, 1));
        assert_ne!(checkerboard_color(0, 0), checkerboard_color(2, 0));
    }

    #[test]
    fn checkerboard_matches_floor_division_for_negative_cells() {
        // cx=-1 -> cx.div_euclid(2) = -1, rem_euclid(2) = 1; cz=3 -> 1, 1.
        // Matches Python's `(-1 // 2) % 2 == 1`, not Rust's `%` (-1 % 2 == -1).
        assert_eq!(checkerboard_color(-1, 3), checkerboard_color(1, 1));
    }
}
