use anyhow::{Context, Result, bail};
use chat_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Unified config (figment-deserialized from defaults / chat.toml / env vars)
// =============================================================================
//
//   chat.toml:   [client]
//                endpoint = "ws://chat.internal:8080/websocket"
//
//   env var:     CHAT_CLIENT__ENDPOINT=ws://chat.internal:8080/websocket
//
//   (double underscore = nesting; single underscore stays within field
//   names: CHAT_CLIENT__HEARTBEAT_INTERVAL_SECS)

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientFileConfig,
}

/// Connection tunables (lives under `[client]` in chat.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientFileConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
}

impl Default for ClientFileConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

fn default_endpoint() -> String {
    chat_session::DEFAULT_ENDPOINT.to_string()
}

fn default_heartbeat_interval_secs() -> u64 {
    chat_session::DEFAULT_HEARTBEAT_INTERVAL.as_secs()
}

/// Build a figment that layers: defaults → config file → CHAT_* env vars.
pub fn load_config(config_path: &Path) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_path))
        .merge(Env::prefixed("CHAT_").split("__"))
}

/// Resolve the runtime session settings. A CLI endpoint wins over every
/// figment layer.
pub fn resolve(figment: &figment::Figment, endpoint: Option<String>) -> Result<SessionConfig> {
    let fc: FileConfig = figment
        .extract()
        .context("Failed to load chat configuration")?;

    if fc.client.heartbeat_interval_secs == 0 {
        bail!("client.heartbeat_interval_secs must be at least 1");
    }

    let endpoint = endpoint.unwrap_or(fc.client.endpoint);
    if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
        bail!("endpoint must be a ws:// or wss:// URL, got {:?}", endpoint);
    }

    Ok(SessionConfig {
        endpoint,
        heartbeat_interval: Duration::from_secs(fc.client.heartbeat_interval_secs),
    })
}
