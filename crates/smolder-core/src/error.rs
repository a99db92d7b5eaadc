/// Errors that can occur across the smolder workspace.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate reports it through `miette` at the boundary.
///
/// # Examples
///
/// ```
/// use smolder_core::SmolderError;
///
/// let err = SmolderError::Config("missing GitHub token".into());
/// assert!(err.to_string().contains("missing GitHub token"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SmolderError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub API, network, or pagination failure.
    #[error("GitHub error: {0}")]
    Github(String),

    /// A scoring precondition does not hold (e.g. non-positive repository age).
    #[error("domain error: {0}")]
    Domain(String),

    /// Missing or malformed input from the data source.
    #[error("input error: {0}")]
    Input(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
