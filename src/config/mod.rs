//! Configuration management for storyqa
//!
//! Settings come from an optional TOML file layered over built-in defaults.
//! Provider secrets are never stored in the file; they are read from the
//! process environment (after loading `.env`) into [`Secrets`].

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Environment variable that overrides the configured index name
pub const INDEX_NAME_ENV: &str = "PINECONE_INDEX";

/// Environment variable that overrides `openai.base_url`
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout applied to every outbound request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Embedding and chat completion provider
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Vector index provider
    #[serde(default)]
    pub index: IndexConfig,

    /// Retrieval-augmented query settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Smoke check target
    #[serde(default)]
    pub smoke: SmokeConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL (the `/v1/...` paths are appended)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    /// Model used to embed queries
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Model used for chat completions
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

/// Pinecone index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name, overridden by `PINECONE_INDEX` when set
    #[serde(default = "default_index_name")]
    pub name: String,

    /// Environment variable holding the API key
    #[serde(default = "default_index_api_key_env")]
    pub api_key_env: String,

    /// Control plane URL used to resolve the index host
    #[serde(default = "default_index_control_url")]
    pub control_url: String,

    /// Data plane host; skips the control plane lookup when set
    #[serde(default)]
    pub host: Option<String>,

    /// Namespace to query within the index
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of fragments to retrieve
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// System instruction sent with every answer request
    #[serde(default = "default_rag_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_system_prompt")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeConfig {
    #[serde(default = "default_smoke_url")]
    pub url: String,

    #[serde(default = "default_smoke_question")]
    pub question: String,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for storyqa data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            openai: OpenAiConfig::default(),
            index: IndexConfig::default(),
            query: QueryConfig::default(),
            chat: ChatConfig::default(),
            smoke: SmokeConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key_env: default_openai_api_key_env(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: default_index_name(),
            api_key_env: default_index_api_key_env(),
            control_url: default_index_control_url(),
            host: None,
            namespace: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            system_prompt: default_rag_system_prompt(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_chat_system_prompt(),
        }
    }
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            url: default_smoke_url(),
            question: default_smoke_question(),
        }
    }
}

impl Config {
    /// Get the default base directory for storyqa (~/.storyqa)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".storyqa")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a base directory, falling back to defaults
    /// when no config file exists there
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration for a run: an explicit file must
    /// exist, the default location is optional. Environment overrides are
    /// applied last.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_from(None)?,
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(name) = read(INDEX_NAME_ENV) {
            debug!("Index name overridden by {}: {}", INDEX_NAME_ENV, name);
            self.index.name = name;
        }

        if let Some(url) = read(OPENAI_BASE_URL_ENV) {
            debug!("OpenAI base URL overridden by {}: {}", OPENAI_BASE_URL_ENV, url);
            self.openai.base_url = url;
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Outbound request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.query.top_k == 0 {
            return Err(Error::Config("query.top_k must be >= 1".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        if self.index.name.trim().is_empty() {
            return Err(Error::Config("index.name must not be empty".to_string()));
        }

        for (field, value) in [
            ("openai.base_url", &self.openai.base_url),
            ("index.control_url", &self.index.control_url),
            ("smoke.url", &self.smoke.url),
        ] {
            Url::parse(value)
                .map_err(|e| Error::Config(format!("{} is not a valid URL: {}", field, e)))?;
        }

        Ok(())
    }
}

/// Provider API keys read from the environment
#[derive(Clone, Default)]
pub struct Secrets {
    openai_api_key: Option<String>,
    index_api_key: Option<String>,
    openai_env: String,
    index_env: String,
}

impl Secrets {
    /// Read secrets from the process environment
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Read secrets through an arbitrary lookup; blank values count as unset
    pub fn from_lookup<F>(config: &Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: read(&config.openai.api_key_env),
            index_api_key: read(&config.index.api_key_env),
            openai_env: config.openai.api_key_env.clone(),
            index_env: config.index.api_key_env.clone(),
        }
    }

    /// The embedding/chat provider key, or a configuration error
    pub fn openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", self.openai_env)))
    }

    /// The vector index provider key, or a configuration error
    pub fn index_api_key(&self) -> Result<&str> {
        self.index_api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", self.index_env)))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field(&self.openai_env, &mask(&self.openai_api_key))
            .field(&self.index_env, &mask(&self.index_api_key))
            .finish()
    }
}

/// Load a `.env` file from the working directory if one exists
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }
}
