//! Configuration loading.
//!
//! Settings come from a TOML file, then environment variables, then CLI flags.
//! Lookup order for the file:
//! 1. The path passed explicitly (`--config`), which must exist
//! 2. `./commitcraft.toml`
//! 3. `<config dir>/commitcraft/config.toml`
//!
//! With no file at all, built-in defaults are used.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::commit::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::error::ConfigError;
use crate::llm::model::ModelId;
use crate::llm::router::BackendMode;

/// Environment variable overriding the configured backend.
pub const BACKEND_ENV_VAR: &str = "COMMITCRAFT_BACKEND";
/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the Groq API key.
pub const GROQ_KEY_ENV_VAR: &str = "GROQ_API_KEY";

const LOCAL_CONFIG_FILE: &str = "commitcraft.toml";

const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:9988/v1";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "deepseek/deepseek-r1";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";

/// Model used when a local server reports no models and none is configured.
const FALLBACK_LOCAL_MODEL: &str = "default";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    #[serde(alias = "api_mode")]
    backend: Option<String>,
    commit_prompt: Option<String>,
    local: LocalSection,
    openrouter: RemoteSection,
    groq: RemoteSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LocalSection {
    api_base_url: Option<String>,
    default_model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RemoteSection {
    api_base_url: Option<String>,
    api_key: Option<String>,
    default_model: Option<String>,
}

/// Settings for a local OpenAI-compatible server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    pub api_base_url: String,
    pub default_model: Option<String>,
}

/// Settings for a hosted chat-completions API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub default_model: String,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendMode,
    pub system_prompt: String,
    pub local: LocalSettings,
    pub openrouter: RemoteSettings,
    pub groq: RemoteSettings,
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
}

/// Read a non-empty environment variable.
fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Locate the first existing config file in the default search path.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("commitcraft").join("config.toml"))
        .filter(|path| path.is_file())
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    parse_file_config(&content, &path.display().to_string())
}

fn parse_file_config(content: &str, origin: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseFailed {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

impl Config {
    /// Load configuration from `explicit_path` or the default search path,
    /// then apply environment overrides.
    ///
    /// `backend_override` comes from `--backend`. When it is set,
    /// `COMMITCRAFT_BACKEND` and the file's `backend` are not consulted.
    pub fn load(
        explicit_path: Option<&Path>,
        backend_override: Option<BackendMode>,
    ) -> Result<Self, ConfigError> {
        let (file, source) = match explicit_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                (read_file_config(path)?, Some(path.to_path_buf()))
            }
            None => match find_config_file() {
                Some(path) => (read_file_config(&path)?, Some(path)),
                None => {
                    debug!("No config file found, using defaults");
                    (FileConfig::default(), None)
                }
            },
        };

        if let Some(path) = &source {
            debug!("Loaded config from {}", path.display());
        }

        Self::resolve(file, source, backend_override)
    }

    /// Parse configuration from TOML text, then apply environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file = parse_file_config(content, "<inline>")?;
        Self::resolve(file, None, None)
    }

    fn resolve(
        file: FileConfig,
        source: Option<PathBuf>,
        backend_override: Option<BackendMode>,
    ) -> Result<Self, ConfigError> {
        let backend = match backend_override {
            Some(mode) => mode,
            None => match env_non_empty(BACKEND_ENV_VAR).or(non_empty(file.backend)) {
                Some(name) => name.parse()?,
                None => BackendMode::Local,
            },
        };

        let system_prompt =
            non_empty(file.commit_prompt).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let local = LocalSettings {
            api_base_url: non_empty(file.local.api_base_url)
                .unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_string()),
            default_model: non_empty(file.local.default_model),
        };

        let openrouter = RemoteSettings {
            api_base_url: non_empty(file.openrouter.api_base_url)
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            api_key: env_non_empty(OPENROUTER_KEY_ENV_VAR).or(non_empty(file.openrouter.api_key)),
            default_model: non_empty(file.openrouter.default_model)
                .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
        };

        let groq = RemoteSettings {
            api_base_url: non_empty(file.groq.api_base_url)
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            api_key: env_non_empty(GROQ_KEY_ENV_VAR).or(non_empty(file.groq.api_key)),
            default_model: non_empty(file.groq.default_model)
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
        };

        Ok(Self {
            backend,
            system_prompt,
            local,
            openrouter,
            groq,
            source,
        })
    }

    /// Check that the selected backend has everything it needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            BackendMode::OpenRouter if self.openrouter.api_key.is_none() => {
                Err(ConfigError::MissingApiKey {
                    backend: "OpenRouter".to_string(),
                    env_var: OPENROUTER_KEY_ENV_VAR,
                    section: "openrouter",
                })
            }
            BackendMode::Groq if self.groq.api_key.is_none() => Err(ConfigError::MissingApiKey {
                backend: "Groq".to_string(),
                env_var: GROQ_KEY_ENV_VAR,
                section: "groq",
            }),
            _ => Ok(()),
        }
    }

    /// Settings of the hosted API for `mode`, if it is one.
    pub fn remote(&self, mode: BackendMode) -> Option<&RemoteSettings> {
        match mode {
            BackendMode::OpenRouter => Some(&self.openrouter),
            BackendMode::Groq => Some(&self.groq),
            BackendMode::Local | BackendMode::ClaudeCode | BackendMode::Codex => None,
        }
    }

    /// Model pinned by configuration. Hosted APIs have no discovery and always pin one.
    pub fn configured_model(&self) -> Result<Option<ModelId>, ConfigError> {
        self.remote(self.backend)
            .map(|remote| ModelId::new(remote.default_model.as_str()))
            .transpose()
            .map_err(ConfigError::InvalidModel)
    }

    /// Model to use when discovery returns nothing.
    pub fn fallback_model(&self) -> Result<ModelId, ConfigError> {
        let id = self
            .local
            .default_model
            .as_deref()
            .unwrap_or(FALLBACK_LOCAL_MODEL);
        ModelId::new(id).map_err(ConfigError::InvalidModel)
    }
}
