use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use pageframe_engine::{EngineConfig, RendererSettings, RetrievalSettings, SandboxPolicy};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the retrieval service; requests go to `{endpoint}/fetch`.
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_response_bytes: u64,
    /// Delay between a view change and the scroll to the results section.
    pub scroll_delay_ms: u64,
    pub sandbox: SandboxPolicy,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let retrieval = RetrievalSettings::default();
        let engine = EngineConfig::default();
        Self {
            endpoint: retrieval.endpoint,
            connect_timeout_ms: duration_ms(retrieval.connect_timeout),
            request_timeout_ms: duration_ms(retrieval.request_timeout),
            max_response_bytes: retrieval.max_bytes,
            scroll_delay_ms: duration_ms(engine.scroll_delay),
            sandbox: SandboxPolicy::default(),
            log: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            retrieval: RetrievalSettings {
                endpoint: self.endpoint.clone(),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                max_bytes: self.max_response_bytes,
            },
            renderer: RendererSettings {
                policy: self.sandbox,
            },
            scroll_delay: Duration::from_millis(self.scroll_delay_ms),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Loads the configuration at `path`, falling back to defaults when the file does not exist.
pub fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded configuration from {:?}", path);
    Ok(config)
}
