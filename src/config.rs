use crate::data_structures::SiteContent;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TRACKER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigYaml {
    pub site_name: Option<String>,
    pub environment: Option<String>,
    pub port: Option<u16>,
    pub reports_dir: Option<PathBuf>,
    pub models_dir: Option<PathBuf>,
    pub content_file: Option<PathBuf>,
    pub tracker_url: Option<String>,
    pub tracker_data_file: Option<PathBuf>,
    pub tracker_timeout_secs: Option<u64>,
    pub state_file: Option<PathBuf>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub site_name: String,
    pub environment: String,
    pub port: u16,
    pub reports_dir: PathBuf,
    pub models_dir: PathBuf,
    pub content_file: Option<PathBuf>,
    pub tracker_url: String,
    pub tracker_data_file: PathBuf,
    pub tracker_timeout: Duration,
    pub state_file: PathBuf,
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(Path::new(&config_file))
        } else {
            Ok(Self::from_env())
        }
    }

    // Load configuration from YAML file, defaulting any missing key
    pub fn from_yaml(file_path: &Path) -> Result<Self, ConfigError> {
        let yaml_content = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;

        let yaml_config: ConfigYaml = serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
            path: file_path.to_path_buf(),
            source,
        })?;

        Ok(Self::from_parts(yaml_config))
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Self {
        let number = |key: &str| env::var(key).ok().and_then(|s| s.parse::<u64>().ok());

        Self::from_parts(ConfigYaml {
            site_name: env::var("SITE_NAME").ok(),
            environment: env::var("ENVIRONMENT").ok(),
            port: env::var("PORT").ok().and_then(|s| s.parse().ok()),
            reports_dir: env::var("REPORTS_DIR").ok().map(PathBuf::from),
            models_dir: env::var("MODELS_DIR").ok().map(PathBuf::from),
            content_file: env::var("CONTENT_FILE").ok().map(PathBuf::from),
            tracker_url: env::var("TRACKER_URL").ok(),
            tracker_data_file: env::var("TRACKER_DATA_FILE").ok().map(PathBuf::from),
            tracker_timeout_secs: number("TRACKER_TIMEOUT"),
            state_file: env::var("STATE_FILE").ok().map(PathBuf::from),
        })
    }

    fn from_parts(raw: ConfigYaml) -> Self {
        let port = raw.port.unwrap_or(DEFAULT_PORT);

        Self {
            site_name: raw.site_name.unwrap_or_else(|| "atlantic-walk".to_string()),
            environment: raw.environment.unwrap_or_else(|| "development".to_string()),
            port,
            reports_dir: raw.reports_dir.unwrap_or_else(|| PathBuf::from("public/reports")),
            models_dir: raw.models_dir.unwrap_or_else(|| PathBuf::from("public/models")),
            content_file: raw.content_file,
            // The site serves its own tracker data unless pointed elsewhere
            tracker_url: raw
                .tracker_url
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/tracker")),
            tracker_data_file: raw.tracker_data_file.unwrap_or_else(|| PathBuf::from("data/tracker.json")),
            tracker_timeout: Duration::from_secs(raw.tracker_timeout_secs.unwrap_or(DEFAULT_TRACKER_TIMEOUT_SECS)),
            state_file: raw.state_file.unwrap_or_else(|| PathBuf::from(".atlantic-walk/state.json")),
        }
    }
}

/// Load site content from a YAML file, or the built-in copy when no file is configured.
pub fn load_site_content(path: Option<&Path>) -> Result<SiteContent, ConfigError> {
    let Some(path) = path else {
        tracing::info!("No content file configured, using built-in site content");
        return Ok(SiteContent::default());
    };

    tracing::info!(?path, "Loading site content");

    let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let content: SiteContent = serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        reports = content.reports.len(),
        models = content.models.len(),
        "Successfully loaded site content"
    );
    Ok(content)
}
