//! `server.properties` loading (§6, component M). A hand-rolled
//! `key=value` parser — the format is Java-`Properties`-flavored and no
//! ecosystem crate in this codebase's lineage is grounded for it.

use std::fs;
use std::path::Path;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_ip: String,
    pub server_port: u16,
    pub online_mode: bool,
    pub network_compression_threshold: i32,
    pub max_players: i32,
    pub motd: String,
    pub version: String,
    /// Numeric protocol version advertised in the status response; `-1`
    /// means "use whatever the client's handshake reported" (§4.I).
    pub protocol: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_ip: "0.0.0.0".to_owned(),
            server_port: 25565,
            online_mode: true,
            network_compression_threshold: -1,
            max_players: 20,
            motd: "A Minecraft Server".to_owned(),
            version: "1.21.8".to_owned(),
            protocol: mc_protocol::PROTOCOL_VERSION_1_21_8,
        }
    }
}

const DEFAULT_PROPERTIES_FILE: &str = "\
# Minecraft server properties\n\
server-ip=0.0.0.0\n\
server-port=25565\n\
online-mode=true\n\
network-compression-threshold=-1\n\
max-players=20\n\
motd=A Minecraft Server\n\
version=1.21.8\n\
";

impl ServerConfig {
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
                "server-ip" => config.server_ip = value.to_owned(),
                "server-port" => config.server_port = value.parse().context("server-port")?,
                "online-mode" => config.online_mode = value.parse().context("online-mode")?,
                "network-compression-threshold" => {
                    config.network_compression_threshold =
                        value.parse().context("network-compression-threshold")?
                }
                "max-players" => config.max_players = value.parse().context("max-players")?,
                "motd" => config.motd = value.replace("\\n", "\n"),
                "version" => config.version = value.to_owned(),
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
        let path = dir.join("server.properties");
        fs::write(
            &path,
            "# a comment\n\nserver-port=25566\nonline-mode=false\nmotd=Hello\\nWorld\n",
        )
        .unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.server_port, 25566);
        assert!(!config.online_mode);
        assert_eq!(config.motd, "Hello\nWorld");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn writes_defaults_when_absent() {
        let dir = tempdir();
        let path = dir.join("server.properties");
        let config = ServerConfig::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server_port, 25565);

        fs::remove_dir_all(dir).ok();
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mc_server_config_test_{}",
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
