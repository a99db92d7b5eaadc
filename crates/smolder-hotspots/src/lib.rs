//! Bugfix-history hotspot scoring.
//!
//! Folds a repository's bugfix pull requests into per-file defect-risk
//! scores, weighting each fix by how recent it is relative to the
//! repository's lifetime. The pipeline is a single forward pass:
//! classify → weight → accumulate → rank.

pub mod classify;
pub mod exclude;
pub mod score;
pub mod weight;
