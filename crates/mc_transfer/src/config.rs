//! `proxy.properties` loading (§6, component M): the Transfer proxy's much
//! smaller key set than the full server's — where to listen, and where to
//! forward.

use std::fs;
use std::path::Path;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub listen_ip: String,
    pub listen_port: u16,
    pub target_host: String,
    pub target_port: u16,
    /// Protocol version advertised in the synthesized upstream Handshake
    /// (§4.H); the upstream negotiates its own login, so this only needs to
    /// be a version the target accepts.
    pub protocol: i32,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_ip: "0.0.0.0".to_owned(),
            listen_port: 25565,
            target_host: "127.0.0.1".to_owned(),
            target_port: 25566,
            protocol: mc_protocol::PROTOCOL_VERSION_1_21_8,
        }
    }
}

const DEFAULT_PROPERTIES_FILE: &str = "\
# Minecraft transfer proxy properties\n\
listen-ip=0.0.0.0\n\
listen-port=25565\n\
target-host=127.0.0.1\n\
target-port=25566\n\
protocol=772\n\
";

impl ProxyConfig {
    /// Loads `path`, writing it with documented defaults first if absent.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            fs::write(path, DEFAULT_PROPERTIES_FILE)
                .with_context(|| format!("writing default {}", path.display()))?;
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "listen-ip" => config.listen_ip = value.to_owned(),
                "listen-port" => config.listen_port = value.parse().context("listen-port")?,
                "target-host" => config.target_host = value.to_owned(),
                "target-port" => config.target_port = value.parse().context("target-port")?,
                "protocol" => config.protocol = value.parse().context("protocol")?,
                _ => {}
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_skips_comments() {
        let dir = tempdir();
        let path = dir.join("proxy.properties");
        fs::write(
            &path,
            "# a comment\n\nlisten-port=25577\ntarget-host=play.example.com\ntarget-port=25565\n",
        )
        .unwrap();

        let config = ProxyConfig::load(&path).unwrap();
        assert_eq!(config.listen_port, 25577);
        assert_eq!(config.target_host, "play.example.com");
        assert_eq!(config.target_port, 25565);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn writes_defaults_when_absent() {
        let dir = tempdir();
        let path = dir.join("proxy.properties");
        let config = ProxyConfig::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.listen_port, 25565);
        assert_eq!(config.target_port, 25566);

        fs::remove_dir_all(dir).ok();
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("mc_transfer_config_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
