//! The bidirectional relay (§4.H): forwards raw bytes verbatim between a
//! client and the upstream server, while sniffing the client-bound stream
//! just enough to recognize compression negotiation and capture the
//! upstream's Login Success. The proxy never completes an online-mode
//! handshake on either side, so there is no cipher on this path and the
//! sniffer only ever has to follow the compression layer.

use std::net::SocketAddr;
use std::sync::Arc;

use mc_protocol::decode::PacketDecoder;
use mc_protocol::encode::PacketEncoder;
use mc_protocol::packet::Packet;
use mc_protocol::packets::handshake::{HandshakeC2s, NextState};
use mc_protocol::packets::login::{LoginStartC2s, LoginSuccessS2c, SetCompressionS2c};
use mc_protocol::uuid_offline::offline_uuid;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

use crate::config::ProxyConfig;
use crate::dns::resolve_upstream;
use crate::error::ProxyError;

const READ_BUF_SIZE: usize = 4096;

/// A thin decoder-only wrapper used to read exactly one client-sent frame
/// off the raw socket before the relay takes over. This is the only point
/// at which the proxy consumes (rather than forwards) client bytes: the
/// opening Handshake and Login Start are replaced by synthesized frames
/// toward the upstream server, so they must never reach it verbatim.
struct FrameReader {
    decoder: PacketDecoder,
}

impl FrameReader {
    fn new() -> Self {
        Self {
            decoder: PacketDecoder::new(),
        }
    }

    async fn read_packet<P: Packet>(&mut self, stream: &mut TcpStream) -> Result<P, ProxyError> {
        loop {
            if let Some(frame) = self.decoder.try_next_packet()? {
                if frame.id != P::ID {
                    return Err(ProxyError::UnexpectedPacketId {
                        state: "login",
                        id: frame.id,
                    });
                }
                return Ok(frame.decode::<P>()?);
            }

            self.decoder.reserve(READ_BUF_SIZE);
            let mut buf = self.decoder.take_capacity();
            if stream.read_buf(&mut buf).await? == 0 {
                return Err(ProxyError::CleanEof);
            }
            self.decoder.queue_bytes(buf);
        }
    }
}

#[instrument(skip_all, fields(peer = %peer_addr))]
pub async fn handle(mut client: TcpStream, peer_addr: SocketAddr, config: Arc<ProxyConfig>) {
    if let Err(e) = client.set_nodelay(true) {
        warn!("failed to set TCP_NODELAY: {e}");
    }

    match run(&mut client, &config).await {
        Ok(()) => {}
        Err(e) if e.is_clean() => {}
        Err(e) => warn!("relay ended with error: {e:#}"),
    }
}

async fn run(client: &mut TcpStream, config: &ProxyConfig) -> Result<(), ProxyError> {
    let mut reader = FrameReader::new();

    let handshake = reader.read_packet::<HandshakeC2s>(client).await?;
    if !matches!(handshake.next_state, NextState::Login | NextState::Transfer) {
        return Err(ProxyError::UnexpectedPacketId {
            state: "handshake",
            id: 0,
        });
    }

    let login_start = reader.read_packet::<LoginStartC2s>(client).await?;
    let username = login_start.username;
    info!(%username, "client login start received, opening upstream");

    let upstream_addr = resolve_upstream(&config.target_host, config.target_port).await?;
    let mut upstream = TcpStream::connect(upstream_addr).await?;
    upstream.set_nodelay(true).ok();

    send_synthesized_handshake_and_login(&mut upstream, config, &username).await?;

    let (client_read, client_write) = client.split();
    let (upstream_read, upstream_write) = upstream.split();

    tokio::try_join!(
        copy_raw(client_read, upstream_write),
        sniff_client_bound(upstream_read, client_write),
    )?;

    Ok(())
}

/// The proxy's own Handshake and Login Start toward the upstream server,
/// built fresh rather than forwarded: the client's `next_state` may be
/// `Transfer` (3), but upstream only understands the ordinary login flow,
/// so this always sends `next_state = Login`.
async fn send_synthesized_handshake_and_login(
    upstream: &mut TcpStream,
    config: &ProxyConfig,
    username: &str,
) -> Result<(), ProxyError> {
    let mut enc = PacketEncoder::new();

    enc.append_packet(&HandshakeC2s {
        protocol_version: config.protocol,
        server_address: config.target_host.clone(),
        server_port: config.target_port,
        next_state: NextState::Login,
    })?;
    enc.append_packet(&LoginStartC2s {
        username: username.to_owned(),
        uuid: offline_uuid(username),
    })?;

    let bytes = enc.take();
    upstream.write_all(&bytes).await?;
    Ok(())
}

/// Raw, unmodified byte copy: nothing past the initial handshake/login-start
/// needs interpreting on the client-to-upstream direction.
async fn copy_raw(
    mut from: tokio::net::tcp::ReadHalf<'_>,
    mut to: tokio::net::tcp::WriteHalf<'_>,
) -> Result<(), ProxyError> {
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = from.read(&mut buf).await?;
        if n == 0 {
            to.shutdown().await.ok();
            return Ok(());
        }
        to.write_all(&buf[..n]).await?;
    }
}

/// Forwards the upstream's bytes to the client unmodified, while a parallel
/// decoder tracks `Set Compression` and `Login Success` well enough to log
/// the session's negotiated threshold and final identity. Forwarding is
/// never blocked on or altered by sniffing: a frame the sniffer cannot yet
/// parse (for example, split across reads) is simply retried on the next
/// chunk, since the decoder owns its own reassembly buffer independent of
/// what has already been written to the client.
async fn sniff_client_bound(
    mut from: tokio::net::tcp::ReadHalf<'_>,
    mut to: tokio::net::tcp::WriteHalf<'_>,
) -> Result<(), ProxyError> {
    let mut sniffer = PacketDecoder::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut captured_success = false;

    loop {
        let n = from.read(&mut buf).await?;
        if n == 0 {
            to.shutdown().await.ok();
            return Ok(());
        }

        to.write_all(&buf[..n]).await?;
        sniffer.queue_slice(&buf[..n]);

        while let Ok(Some(frame)) = sniffer.try_next_packet() {
            if frame.id == SetCompressionS2c::ID {
                if let Ok(pkt) = frame.decode::<SetCompressionS2c>() {
                    debug!(threshold = pkt.threshold, "upstream set compression");
                    sniffer.set_compression(pkt.threshold);
                }
            } else if frame.id == LoginSuccessS2c::ID && !captured_success {
                if let Ok(pkt) = frame.decode::<LoginSuccessS2c>() {
                    info!(username = %pkt.username, uuid = %pkt.uuid, "upstream login success, entering configuration");
                    captured_success = true;
                }
            }
        }
    }
}
