use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix override file values,
/// e.g. `TRANSLATOR__PROVIDER__KIND=live`.
pub const ENV_PREFIX: &str = "TRANSLATOR";
pub const DEFAULT_CONFIG_PATH: &str = "translator.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Mock,
    Live,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL of a LibreTranslate compatible endpoint, required for `live`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
}

fn default_max_text_chars() -> usize {
    1000
}

fn default_max_batch_items() -> usize {
    100
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            max_batch_items: default_max_batch_items(),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file layered under
    /// `TRANSLATOR__*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Load only the given file, ignoring the environment
    #[cfg(test)]
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.provider.kind == ProviderKind::Live {
            let base_url = self.provider.base_url.as_deref().map(str::trim);
            match base_url {
                None | Some("") => {
                    anyhow::bail!("provider.base_url is required when provider.kind is 'live'")
                }
                Some(url) => {
                    reqwest::Url::parse(url).map_err(|e| {
                        anyhow::anyhow!("provider.base_url '{}' is not a valid URL: {}", url, e)
                    })?;
                }
            }
        }
        if self.limits.max_text_chars == 0 {
            anyhow::bail!("limits.max_text_chars must be greater than zero");
        }
        if self.limits.max_batch_items == 0 {
            anyhow::bail!("limits.max_batch_items must be greater than zero");
        }
        Ok(())
    }
}
