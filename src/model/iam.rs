//! IAM snapshot model and its rendering

use anyhow::Result;
use changeset::{ChangeKind, PolicyDiffs, RenderableAsChanged, RenderableAsNew};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Kind of IAM resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IamKind {
    Role,
    User,
    Group,
}

impl fmt::Display for IamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Role => "role",
            Self::User => "user",
            Self::Group => "group",
        };
        f.write_str(label)
    }
}

/// One resource as it appears in a snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamResource {
    /// Inline policy documents by name
    #[serde(default)]
    pub policies: BTreeMap<String, Value>,
    /// Group members (groups only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
}

/// A declared or live IAM snapshot
///
/// ```json
/// {
///   "roles": { "deploy": { "policies": { "s3": { ... } } } },
///   "groups": { "admins": { "policies": {}, "users": ["alice"] } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamSnapshot {
    #[serde(default)]
    pub roles: BTreeMap<String, IamResource>,
    #[serde(default)]
    pub users: BTreeMap<String, IamResource>,
    #[serde(default)]
    pub groups: BTreeMap<String, IamResource>,
}

impl IamSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        super::load_json(path)
    }

    /// Flatten into named configs, ordered by kind then name
    pub fn into_configs(self) -> Vec<IamConfig> {
        let tagged = [
            (IamKind::Role, self.roles),
            (IamKind::User, self.users),
            (IamKind::Group, self.groups),
        ];
        tagged
            .into_iter()
            .flat_map(|(kind, resources)| {
                resources.into_iter().map(move |(name, resource)| IamConfig {
                    name,
                    kind,
                    policies: resource.policies,
                    users: resource.users,
                })
            })
            .collect()
    }
}

/// A named IAM resource, the configuration a change set refers to
#[derive(Debug, Clone, PartialEq)]
pub struct IamConfig {
    pub name: String,
    pub kind: IamKind,
    pub policies: BTreeMap<String, Value>,
    pub users: Vec<String>,
}

impl IamConfig {
    pub fn key(&self) -> (IamKind, &str) {
        (self.kind, &self.name)
    }
}

fn colored_diff_line(line: &str) -> String {
    if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else {
        line.to_string()
    }
}

impl RenderableAsNew for IamConfig {
    fn added_text(&self) -> String {
        let mut out = format!("{} {} will be created", self.kind, self.name.green());
        if !self.policies.is_empty() {
            let names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
            out.push_str(&format!("\n    policies: {}", names.join(", ")));
        }
        if !self.users.is_empty() {
            out.push_str(&format!("\n    users: {}", self.users.join(", ")));
        }
        out
    }
}

impl RenderableAsChanged for IamConfig {
    fn changed_text(
        &self,
        kind: ChangeKind,
        policy_diffs: &PolicyDiffs,
        added_users: &[String],
        removed_users: &[String],
    ) -> String {
        let mut out = match kind {
            ChangeKind::RemovePolicy => format!(
                "{} {} has policies that are not declared and will be removed",
                self.kind,
                self.name.yellow()
            ),
            _ => format!("{} {} differs", self.kind, self.name.yellow()),
        };

        for (policy, diffs) in policy_diffs {
            out.push_str(&format!("\n    policy {}:", policy.bold()));
            for diff in diffs {
                out.push_str(&format!("\n        {}", colored_diff_line(diff)));
            }
        }

        if !added_users.is_empty() {
            out.push_str(&format!(
                "\n    users to add: {}",
                added_users.join(", ").green()
            ));
        }
        if !removed_users.is_empty() {
            out.push_str(&format!(
                "\n    users to remove: {}",
                removed_users.join(", ").red()
            ));
        }
        out
    }
}
