//! Core types, configuration, and error handling for smolder.
//!
//! This crate provides the shared foundation used by the other smolder crates:
//! - [`SmolderError`] — unified error type using `thiserror`
//! - [`SmolderConfig`] — configuration loaded from `.smolder.toml`
//! - Shared types: [`ChangeRequest`], [`ChangeSet`], [`BugfixRecord`],
//!   [`FileScore`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GithubConfig, ScanConfig, SmolderConfig};
pub use error::SmolderError;
pub use types::{BugfixRecord, ChangeRequest, ChangeSet, FileScore, OutputFormat};

/// A convenience `Result` type for smolder operations.
pub type Result<T> = std::result::Result<T, SmolderError>;
