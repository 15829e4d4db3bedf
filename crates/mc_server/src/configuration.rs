//! Configuration-state handling (§4.E): client-info collection, the
//! brand/feature-flags/known-packs/registry/tags exchange, and the finish
//! handshake.

use std::time::Duration;

use mc_protocol::packet::Packet;
use mc_protocol::packets::configuration::{
    ClientInformationC2s, FeatureFlagsS2c, FinishConfiguration, KnownPack, KnownPacksC2s,
    KnownPacksS2c, PluginMessage, PluginMessageC2s, UpdateTagsS2c,
};
use mc_protocol::primitives::write_string;
use tracing::instrument;

use crate::config::ServerConfig;
use crate::conn::Connection;
use crate::error::SessionError;
use crate::registry;

const CLIENT_INFO_TIMEOUT: Duration = Duration::from_secs(1);
const BRAND_CHANNEL: &str = "minecraft:brand";

#[instrument(skip_all, fields(peer = %conn.peer_addr))]
pub async fn run(conn: &mut Connection, config: &ServerConfig) -> Result<(), SessionError> {
    collect_client_info(conn).await;

    let mut brand = Vec::new();
    write_string("mcords", &mut brand)?;
    conn.send_packet(&PluginMessage {
        channel: BRAND_CHANNEL.to_owned(),
        data: brand,
    })
    .await?;

    conn.send_packet(&FeatureFlagsS2c {
        flags: vec!["minecraft:vanilla".to_owned()],
    })
    .await?;

    conn.send_packet(&KnownPacksS2c {
        packs: vec![KnownPack {
            namespace: "minecraft".to_owned(),
            id: "core".to_owned(),
            version: config.version.clone(),
        }],
    })
    .await?;

    let frame = conn.recv_frame().await?;
    if frame.id != KnownPacksC2s::ID {
        return Err(SessionError::UnexpectedPacketId {
            state: "configuration",
            id: frame.id,
        });
    }

    for registry_frame in registry::registry_frames() {
        conn.send_packet(&registry_frame).await?;
    }
    conn.send_packet(&UpdateTagsS2c {
        payload: registry::tags_payload(),
    })
    .await?;

    conn.send_packet(&FinishConfiguration).await?;
    let frame = conn.recv_frame().await?;
    if frame.id != FinishConfiguration::ID {
        return Err(SessionError::UnexpectedPacketId {
            state: "configuration",
            id: frame.id,
        });
    }

    Ok(())
}

/// Reads frames for up to one second, collecting Client Information and the
/// client's brand announcement. Elapsing the deadline is normal, not an
/// error — whatever was collected (possibly nothing) is kept.
async fn collect_client_info(conn: &mut Connection) {
    let deadline = tokio::time::Instant::now() + CLIENT_INFO_TIMEOUT;

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return;
        }

        let frame = match tokio::time::timeout(remaining, conn.recv_frame()).await {
            Ok(Ok(frame)) => frame,
            Ok(Err(_)) | Err(_) => return,
        };

        if frame.id == ClientInformationC2s::ID {
            let _ = frame.decode::<ClientInformationC2s>();
        } else if frame.id == PluginMessageC2s::ID {
            let _ = frame.decode::<PluginMessageC2s>();
        }
    }
}
