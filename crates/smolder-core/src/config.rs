use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SmolderError;

/// Top-level configuration loaded from `.smolder.toml`.
///
/// Resolution order: CLI flags > env vars > config file > defaults.
///
/// # Examples
///
/// ```
/// use smolder_core::SmolderConfig;
///
/// let config = SmolderConfig::default();
/// assert_eq!(config.scan.base_branch, "master");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmolderConfig {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,
    /// Scan behavior settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl SmolderConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Io`] if the file cannot be read, or
    /// [`SmolderError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smolder_core::SmolderConfig;
    /// use std::path::Path;
    ///
    /// let config = SmolderConfig::from_file(Path::new(".smolder.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, SmolderError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SmolderError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use smolder_core::SmolderConfig;
    ///
    /// let toml = r#"
    /// [scan]
    /// base_branch = "main"
    /// "#;
    /// let config = SmolderConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.scan.base_branch, "main");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, SmolderError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// GitHub API configuration.
///
/// # Examples
///
/// ```
/// use smolder_core::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert_eq!(config.api_base, "https://api.github.com");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL for API requests (override for GitHub Enterprise).
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Personal access token. The `GITHUB_TOKEN` env var takes precedence.
    pub token: Option<String>,
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
        }
    }
}

/// Scan behavior configuration.
///
/// # Examples
///
/// ```
/// use smolder_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.base_branch, "master");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Base branch pull requests were opened against (default: `master`).
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
}

fn default_base_branch() -> String {
    "master".into()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
        }
    }
}
