//! GitHub as a repository data source.
//!
//! Supplies the three things the scoring pipeline needs: the repository's
//! creation timestamp, its pull requests against a base branch, and the file
//! paths touched by each pull request. All listings are paginated to
//! exhaustion before scoring begins.

pub mod client;

pub use client::{parse_repo_reference, GithubClient};
