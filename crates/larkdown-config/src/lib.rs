//! Configuration management for larkdown.
//!
//! Parses `larkdown.toml` files with serde and auto-discovers the config
//! file in parent directories. CLI flags can override loaded values via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `feishu.base_url`
//! - `feishu.access_token`
//! - `publish.folder_token`
//! - `wiki.space_id`
//! - `wiki.node_token`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "larkdown.toml";

/// Default Feishu open-platform API base URL.
const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default destination folder token.
    pub folder_token: Option<String>,
    /// Override the wiki space id.
    pub wiki_space_id: Option<String>,
    /// Override the wiki parent node token.
    pub wiki_node_token: Option<String>,
    /// Override the duplicate-check flag.
    pub check_duplicate: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feishu API credentials and endpoint.
    pub feishu: Option<FeishuConfig>,
    /// Publish defaults.
    pub publish: PublishDefaults,
    /// Wiki destination defaults.
    pub wiki: WikiDefaults,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Feishu API configuration.
#[derive(Debug, Deserialize)]
pub struct FeishuConfig {
    /// Open-platform API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential consumed per request. Acquisition and refresh are
    /// handled outside this tool; expand from the environment here.
    pub access_token: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

/// Defaults for the publish command.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishDefaults {
    /// Destination folder token for folder publishes and duplicate checks.
    pub folder_token: Option<String>,
    /// Whether to check the destination folder for a same-named document.
    pub check_duplicate: bool,
}

impl Default for PublishDefaults {
    fn default() -> Self {
        Self {
            folder_token: None,
            check_duplicate: true,
        }
    }
}

/// Defaults for wiki destinations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WikiDefaults {
    /// Wiki space id. When absent it is resolved from `node_token`.
    pub space_id: Option<String>,
    /// Parent node token for new wiki documents.
    pub node_token: Option<String>,
}

impl FeishuConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has
    /// an invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "feishu.base_url")?;
        require_http_url(&self.base_url, "feishu.base_url")?;
        require_non_empty(&self.access_token, "feishu.access_token")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`feishu.access_token`").
        field: String,
        /// Error message (e.g., "${`LARK_ACCESS_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `larkdown.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after loading, so flags take precedence
    /// over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(folder_token) = &settings.folder_token {
            self.publish.folder_token = Some(folder_token.clone());
        }
        if let Some(space_id) = &settings.wiki_space_id {
            self.wiki.space_id = Some(space_id.clone());
        }
        if let Some(node_token) = &settings.wiki_node_token {
            self.wiki.node_token = Some(node_token.clone());
        }
        if let Some(check_duplicate) = settings.check_duplicate {
            self.publish.check_duplicate = check_duplicate;
        }
    }

    /// Get validated Feishu configuration.
    ///
    /// Returns the Feishu config if the `[feishu]` section is present and
    /// all fields are valid. Use this instead of accessing the `feishu`
    /// field directly when the command requires the API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or
    /// invalid.
    pub fn require_feishu(&self) -> Result<&FeishuConfig, ConfigError> {
        let feishu = self.feishu.as_ref().ok_or_else(|| {
            ConfigError::Validation("[feishu] section required in config".into())
        })?;
        feishu.validate()?;
        Ok(feishu)
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut feishu) = self.feishu {
            feishu.base_url = expand::expand_env(&feishu.base_url, "feishu.base_url")?;
            feishu.access_token = expand::expand_env(&feishu.access_token, "feishu.access_token")?;
        }

        if let Some(ref token) = self.publish.folder_token {
            self.publish.folder_token = Some(expand::expand_env(token, "publish.folder_token")?);
        }

        if let Some(ref space_id) = self.wiki.space_id {
            self.wiki.space_id = Some(expand::expand_env(space_id, "wiki.space_id")?);
        }
        if let Some(ref node_token) = self.wiki.node_token {
            self.wiki.node_token = Some(expand::expand_env(node_token, "wiki.node_token")?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a valid Feishu config for testing.
    fn valid_feishu_config() -> FeishuConfig {
        FeishuConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            access_token: "t-token".to_owned(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.feishu.is_none());
        assert!(config.publish.folder_token.is_none());
        assert!(config.publish.check_duplicate);
        assert!(config.wiki.space_id.is_none());
        assert!(config.wiki.node_token.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.feishu.is_none());
        assert!(config.publish.check_duplicate);
    }

    #[test]
    fn test_parse_feishu_config() {
        let toml = r#"
[feishu]
access_token = "t-abc"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let feishu = config.feishu.unwrap();
        assert_eq!(feishu.base_url, DEFAULT_BASE_URL);
        assert_eq!(feishu.access_token, "t-abc");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[feishu]
base_url = "https://open.larksuite.com/open-apis"
access_token = "t-abc"

[publish]
folder_token = "fldr123"
check_duplicate = false

[wiki]
space_id = "7034"
node_token = "wikcn456"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.feishu.unwrap().base_url,
            "https://open.larksuite.com/open-apis"
        );
        assert_eq!(config.publish.folder_token.as_deref(), Some("fldr123"));
        assert!(!config.publish.check_duplicate);
        assert_eq!(config.wiki.space_id.as_deref(), Some("7034"));
        assert_eq!(config.wiki.node_token.as_deref(), Some("wikcn456"));
    }

    #[test]
    fn test_apply_cli_settings_folder_token() {
        let mut config = Config::default();
        let overrides = CliSettings {
            folder_token: Some("fldrX".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.publish.folder_token.as_deref(), Some("fldrX"));
        assert!(config.publish.check_duplicate); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_wiki() {
        let mut config = Config::default();
        let overrides = CliSettings {
            wiki_space_id: Some("99".to_owned()),
            wiki_node_token: Some("wikcnZ".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.wiki.space_id.as_deref(), Some("99"));
        assert_eq!(config.wiki.node_token.as_deref(), Some("wikcnZ"));
    }

    #[test]
    fn test_apply_cli_settings_check_duplicate() {
        let mut config = Config::default();
        let overrides = CliSettings {
            check_duplicate: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(!config.publish.check_duplicate);
    }

    #[test]
    fn test_apply_cli_settings_empty_changes_nothing() {
        let mut config = Config::default();
        config.publish.folder_token = Some("keep".to_owned());

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.publish.folder_token.as_deref(), Some("keep"));
    }

    #[test]
    fn test_expand_env_vars_access_token() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LD_CONFIG_TEST_TOKEN", "t-expanded");
        }

        let toml = r#"
[feishu]
access_token = "${LD_CONFIG_TEST_TOKEN}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.feishu.unwrap().access_token, "t-expanded");

        unsafe {
            std::env::remove_var("LD_CONFIG_TEST_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LD_CONFIG_TEST_MISSING");
        }

        let toml = r#"
[feishu]
access_token = "${LD_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("feishu.access_token"));
    }

    #[test]
    fn test_validate_valid_feishu_config() {
        assert!(valid_feishu_config().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_access_token() {
        let config = FeishuConfig {
            access_token: String::new(),
            ..valid_feishu_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let config = FeishuConfig {
            base_url: "not-a-url".to_owned(),
            ..valid_feishu_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_require_feishu_missing_section() {
        let config = Config::default();
        let err = config.require_feishu().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[feishu]"));
    }

    #[test]
    fn test_require_feishu_returns_validated() {
        let mut config = Config::default();
        config.feishu = Some(valid_feishu_config());
        assert!(config.require_feishu().is_ok());
    }
}
