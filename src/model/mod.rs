//! Snapshot formats read and written by cirrus
//!
//! - `iam` - IAM roles, users and groups with their inline policies
//! - `security` - Security group rules

pub mod iam;
pub mod security;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    log::debug!("Loaded {}", path.display());
    Ok(value)
}
