//! Core types for change sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of change a resource needs to match its declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Declared locally but missing from the cloud
    Add,
    /// Present in the cloud but not declared
    Remove,
    /// Present in both with differences
    Change,
    /// Present in both; the only differences are policies to remove
    RemovePolicy,
}

impl ChangeKind {
    /// Check if the kind alone signals a difference
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Add | Self::Remove)
    }

    /// Short symbol used when listing changes
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Remove => "-",
            Self::Change => "~",
            Self::RemovePolicy => "~",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Change => "change",
            Self::RemovePolicy => "remove-policy",
        };
        f.write_str(label)
    }
}

/// Policy name to ordered difference descriptions, in first-recorded order
pub type PolicyDiffs = Vec<(String, Vec<String>)>;
