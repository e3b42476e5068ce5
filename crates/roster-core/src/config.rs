//! Runtime configuration: upstream endpoint, credential, and client limits.
//!
//! Values are layered: built-in defaults, then an optional `roster.toml`,
//! then `ROSTER_*` environment variables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default per-call network timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `per_page` value sent on every request.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Page fetches allowed for one logical call before it is abandoned.
pub const DEFAULT_MAX_PAGES: u32 = 50;

const ENV_PREFIX: &str = "ROSTER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// How a stale target-section enrollment is removed.
///
/// Sent as the `task` parameter of the delete-enrollment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropMode {
    /// Remove the enrollment record.
    #[default]
    Delete,
    /// Soft-drop: mark the enrollment completed.
    Conclude,
    Deactivate,
    Inactivate,
}

impl DropMode {
    pub fn as_task(&self) -> &'static str {
        match self {
            DropMode::Delete => "delete",
            DropMode::Conclude => "conclude",
            DropMode::Deactivate => "deactivate",
            DropMode::Inactivate => "inactivate",
        }
    }
}

impl FromStr for DropMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(DropMode::Delete),
            "conclude" => Ok(DropMode::Conclude),
            "deactivate" => Ok(DropMode::Deactivate),
            "inactivate" => Ok(DropMode::Inactivate),
            other => Err(ConfigError::Invalid {
                field: "drop_mode",
                reason: format!("unknown drop mode '{other}'"),
            }),
        }
    }
}

impl fmt::Display for DropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_task())
    }
}

/// Resolved configuration handed to the client.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RosterConfig {
    /// Versioned API base, e.g. `https://lms.example.edu/api/v1`.
    pub api_url: String,
    /// Bearer credential.
    pub api_token: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub max_pages: u32,
    pub drop_mode: DropMode,
    pub user_agent: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            drop_mode: DropMode::Delete,
            user_agent: concat!("rosterbalance/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for RosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("drop_mode", &self.drop_mode)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Environment overrides. Every field is optional so unset variables
/// leave lower layers untouched.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    api_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<u32>,
    max_pages: Option<u32>,
    drop_mode: Option<String>,
    user_agent: Option<String>,
}

impl RosterConfig {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults, optionally overlaid with a file, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `ROSTER_*` variables from `vars` onto this config.
    pub fn with_env<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: EnvOverrides = envy::prefixed(ENV_PREFIX).from_iter(vars)?;

        if let Some(v) = env.api_url {
            self.api_url = v;
        }
        if let Some(v) = env.api_token {
            self.api_token = v;
        }
        if let Some(v) = env.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = env.page_size {
            self.page_size = v;
        }
        if let Some(v) = env.max_pages {
            self.max_pages = v;
        }
        if let Some(v) = env.drop_mode {
            self.drop_mode = v.parse()?;
        }
        if let Some(v) = env.user_agent {
            self.user_agent = v;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("api_url"));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: format!("'{}' is not an http(s) URL", self.api_url),
            });
        }
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Missing("api_token"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid {
                field: "max_pages",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = RosterConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.drop_mode, DropMode::Delete);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = RosterConfig::default()
            .with_env(vars(&[
                ("ROSTER_API_URL", "https://lms.example.edu/api/v1"),
                ("ROSTER_API_TOKEN", "secret"),
                ("ROSTER_PAGE_SIZE", "25"),
                ("ROSTER_DROP_MODE", "Conclude"),
                ("UNRELATED", "ignored"),
            ]))
            .unwrap();

        assert_eq!(config.api_url, "https://lms.example.edu/api/v1");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.drop_mode, DropMode::Conclude);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "https://file.example.edu/api/v1"
api_token = "from-file"
max_pages = 10
"#
        )
        .unwrap();

        let config = RosterConfig::from_file(file.path())
            .unwrap()
            .with_env(vars(&[("ROSTER_API_TOKEN", "from-env")]))
            .unwrap();

        assert_eq!(config.api_url, "https://file.example.edu/api/v1");
        assert_eq!(config.api_token, "from-env");
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn validate_rejects_missing_token() {
        let config = RosterConfig::new("https://lms.example.edu/api/v1", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("api_token"))
        ));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let config = RosterConfig::new("ftp://lms.example.edu", "t");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "api_url", .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_page_ceiling() {
        let mut config = RosterConfig::new("https://lms.example.edu", "t");
        config.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = RosterConfig::new("https://lms.example.edu", "t")
            .with_env(vars(&[("ROSTER_TIMEOUT_SECS", "0")]))
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn unknown_drop_mode_is_rejected() {
        assert!("purge".parse::<DropMode>().is_err());
        assert_eq!("inactivate".parse::<DropMode>().unwrap(), DropMode::Inactivate);
    }

    #[test]
    fn debug_redacts_token() {
        let config = RosterConfig::new("https://lms.example.edu", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
