use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::http::HttpVersion;

static CONFIG: OnceCell<ServerConfig> = OnceCell::new();

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub buffer_size: usize,

    pub http_version: HttpVersion,
    pub max_path_size: usize,
    pub max_header_size: usize,
    pub max_body_size: usize,

    #[serde(deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,

    #[serde(deserialize_with = "deserialize_duration")]
    pub write_timeout: Duration,

    pub server_name: String,

    /// Honour `X-Forwarded-Proto` from a TLS-terminating proxy when deciding
    /// whether secure cookies may be sent.
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            buffer_size: 4096,

            http_version: HttpVersion::V1_1,
            max_path_size: 1024,
            max_header_size: 8192,
            max_body_size: 1024 * 1024, // 1 MB

            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),

            server_name: "rustycookie/0.1".to_string(),

            trust_proxy: false,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path, %err, "failed to read config, falling back to defaults");
                return ServerConfig::default();
            }
        };

        match toml::from_str::<ServerConfig>(content.as_str()) {
            Ok(server_config) => server_config,
            Err(err) => {
                tracing::warn!(path, %err, "failed to deserialize config, falling back to defaults");
                ServerConfig::default()
            }
        }
    }
}

/// Installs the process-wide config. Fails if a config is already active,
/// including one lazily initialized by an earlier [`config`] call.
pub fn set_config(cfg: ServerConfig) -> Result<(), ServerConfig> {
    CONFIG.set(cfg)
}

pub fn config() -> &'static ServerConfig {
    CONFIG.get_or_init(ServerConfig::default)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
