use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "CLAIMS_AGENT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DATA_DIR: &str = "CLAIMS_AGENT_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

const ENV_EXTRACT_MODEL: &str = "CLAIMS_AGENT_EXTRACT_MODEL";
const ENV_SUMMARY_MODEL: &str = "CLAIMS_AGENT_SUMMARY_MODEL";
const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

const ENV_MODEL_ENDPOINT: &str = "CLAIMS_AGENT_MODEL_ENDPOINT";
const DEFAULT_MODEL_ENDPOINT: &str = "http://127.0.0.1:8080";
const ENV_MODEL_API_KEY: &str = "CLAIMS_AGENT_MODEL_API_KEY";

const ENV_REQUEST_TIMEOUT: &str = "CLAIMS_AGENT_REQUEST_TIMEOUT_SECS";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Store key prefixes for claim documents, pipeline outputs, and the policy
/// snippet corpus
pub const CLAIMS_PREFIX: &str = "claims/";
pub const OUTPUTS_PREFIX: &str = "outputs/";
pub const POLICIES_PREFIX: &str = "policies/";

/// Snippet retrieval configuration
///
/// The keyword set drives the overlap scoring in retrieval; it defaults to
/// the water-damage domain set and can be overridden via the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
        }
    }
}

fn default_keywords() -> Vec<String> {
    ["water", "damage", "leak", "pipe"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub extract_model_id: String,
    pub summary_model_id: String,
    pub model_endpoint: String,
    pub model_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub retrieval: RetrievalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            extract_model_id: DEFAULT_MODEL_ID.to_string(),
            summary_model_id: DEFAULT_MODEL_ID.to_string(),
            model_endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            model_api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let data_dir = std::env::var(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let extract_model_id =
            std::env::var(ENV_EXTRACT_MODEL).unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let summary_model_id =
            std::env::var(ENV_SUMMARY_MODEL).unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());

        let model_endpoint = std::env::var(ENV_MODEL_ENDPOINT)
            .unwrap_or_else(|_| DEFAULT_MODEL_ENDPOINT.to_string());
        let model_api_key = std::env::var(ENV_MODEL_API_KEY).ok().filter(|k| !k.is_empty());

        let request_timeout_secs = std::env::var(ENV_REQUEST_TIMEOUT)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        // Load config file
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let retrieval = Self::load_config_file(&config_path)
            .map(|cf| cf.retrieval)
            .unwrap_or_default();

        Self {
            data_dir,
            extract_model_id,
            summary_model_id,
            model_endpoint,
            model_api_key,
            request_timeout_secs,
            retrieval,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}
