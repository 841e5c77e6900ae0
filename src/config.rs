//! Project configuration (swatch.yaml) and credentials.
//!
//! Everything except credentials lives in the YAML file; the access token
//! and document key only ever come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SwatchError};

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "swatch.yaml";

/// Environment variable holding the document API access token.
pub const TOKEN_ENV: &str = "FIGMA_ACCESS_TOKEN";

/// Environment variable holding the document (file) key.
pub const DOCUMENT_ENV: &str = "FIGMA_FILE_KEY";

/// A frame on the icon page and the icon type its members get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Frame name, matched case-insensitively.
    pub frame: String,
    /// Icon type written to the index and used as the first path segment.
    #[serde(rename = "type")]
    pub icon_type: String,
}

impl Section {
    pub fn new(frame: impl Into<String>, icon_type: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
            icon_type: icon_type.into(),
        }
    }
}

/// Which optimizer runs before id prefixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    #[default]
    Minify,
    Usvg,
    None,
}

/// Configuration loaded from swatch.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output root for SVG files and the index.
    pub output: PathBuf,

    /// Index file name, relative to `output`.
    pub index: String,

    /// Page that holds the icon frames.
    pub page: String,

    /// Frames to walk, in order.
    pub sections: Vec<Section>,

    /// Base URL of the document API.
    pub api_base: String,

    /// Node ids per export request.
    pub batch_size: usize,

    /// Pause between export batches, in milliseconds.
    pub batch_delay_ms: u64,

    /// Retries for a failed export request.
    pub max_retries: u32,

    /// First retry backoff, in milliseconds. Doubles per attempt.
    pub retry_backoff_ms: u64,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,

    pub optimizer: OptimizerKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("assets/icons"),
            index: "icon-library.json".to_string(),
            page: "Icons".to_string(),
            sections: vec![Section::new("Icons", "icon"), Section::new("Logos", "logo")],
            api_base: "https://api.figma.com/v1".to_string(),
            batch_size: 100,
            batch_delay_ms: 500,
            max_retries: 3,
            retry_backoff_ms: 1000,
            timeout_secs: 60,
            optimizer: OptimizerKind::Minify,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SwatchError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `swatch.yaml` from `dir` if it exists, else defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| SwatchError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SwatchError::config(
                "batch_size must be at least 1",
                "The document API accepts up to a few hundred ids per request; 100 is a safe value",
            ));
        }
        if self.sections.is_empty() {
            return Err(SwatchError::config(
                "no sections configured",
                "Add at least one `sections` entry with a frame name and type",
            ));
        }
        Ok(())
    }

    /// Absolute-or-relative path of the index file.
    pub fn index_path(&self) -> PathBuf {
        self.output.join(&self.index)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Render the configuration as YAML (used by `swatch init`).
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| SwatchError::Build {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}

/// Access token and document key for the document API.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub document_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("document_key", &self.document_key)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup (environment, test map).
    ///
    /// Missing or blank values are a configuration error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    SwatchError::config(
                        format!("{} is not set", key),
                        format!("Export {} before running `swatch build`", key),
                    )
                })
        };

        Ok(Self {
            token: read(TOKEN_ENV)?,
            document_key: read(DOCUMENT_ENV)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("output: public/icons").unwrap();

        assert_eq!(config.output, PathBuf::from("public/icons"));
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.index_path(), PathBuf::from("public/icons/icon-library.json"));
        assert_eq!(config.optimizer, OptimizerKind::Minify);
    }

    #[test]
    fn test_usvg_optimizer_is_opt_in() {
        let config = Config::parse("optimizer: usvg").unwrap();
        assert_eq!(config.optimizer, OptimizerKind::Usvg);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
output: dist
index: library.json
page: Brand
sections:
  - frame: Coins
    type: coin
batch_size: 25
batch_delay_ms: 0
optimizer: none
"#;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.page, "Brand");
        assert_eq!(config.sections, vec![Section::new("Coins", "coin")]);
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.batch_delay(), Duration::ZERO);
        assert_eq!(config.optimizer, OptimizerKind::None);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(Config::parse("batch_size: 0").is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(Config::parse("sections: [unclosed").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = Config::default().to_yaml().unwrap();
        let parsed = Config::parse(&yaml).unwrap();
        assert_eq!(parsed.sections, Config::default().sections);
    }

    #[test]
    fn test_discover_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.page, "Icons");
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env: HashMap<&str, &str> =
            HashMap::from([(TOKEN_ENV, "secret"), (DOCUMENT_ENV, "AbC123")]);
        let creds = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(creds.document_key, "AbC123");
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        let err = Credentials::from_lookup(|k| (k == TOKEN_ENV).then(|| "t".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_ENV));

        let err = Credentials::from_lookup(|_| Some("   ".to_string())).unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV));
    }
}
