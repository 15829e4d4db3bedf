//! Upstream address resolution (§4.H, §6): SRV lookup on `_minecraft._tcp.<host>`
//! when the configured port is the default (25565), A-record resolution
//! otherwise.

use std::net::SocketAddr;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::error::ProxyError;

const DEFAULT_PORT: u16 = 25565;

pub async fn resolve_upstream(host: &str, port: u16) -> Result<SocketAddr, ProxyError> {
    if let Ok(addr) = host.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(addr, port));
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    if port == DEFAULT_PORT {
        let srv_name = format!("_minecraft._tcp.{host}");
        if let Ok(lookup) = resolver.srv_lookup(&srv_name).await {
            if let Some(record) = lookup.iter().next() {
                let target = record.target().to_utf8();
                let target = target.trim_end_matches('.');
                return resolve_a(&resolver, target, record.port()).await;
            }
        }
    }

    resolve_a(&resolver, host, port).await
}

async fn resolve_a(
    resolver: &TokioAsyncResolver,
    host: &str,
    port: u16,
) -> Result<SocketAddr, ProxyError> {
    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| ProxyError::Dns(e.to_string()))?;

    let ip = response
        .iter()
        .next()
        .ok_or_else(|| ProxyError::Dns(format!("no A/AAAA records for {host}")))?;

    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn literal_ip_bypasses_dns() {
        let addr = resolve_upstream("127.0.0.1", 25566).await.unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 25566)));
    }
}
