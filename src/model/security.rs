//! Security group snapshots and declared rule files

use anyhow::{Context, Result, bail};
use rulekit::{RawRule, RuleDescriptor, consolidate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Live security groups as reported by the cloud
///
/// ```json
/// { "groups": { "web": { "inbound": [{"protocol": "tcp", "from": 443, "to": 443, "subnets": ["0.0.0.0/0"]}] } } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityGroupSnapshot {
    #[serde(default)]
    pub groups: BTreeMap<String, GroupRules>,
}

impl SecurityGroupSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        super::load_json(path)
    }
}

/// Raw rules of one security group
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupRules {
    #[serde(default)]
    pub inbound: Vec<RawRule>,
    #[serde(default)]
    pub outbound: Vec<RawRule>,
}

/// Declared form of one security group's rules
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeclaredGroupRules {
    pub inbound: Vec<Map<String, Value>>,
    pub outbound: Vec<Map<String, Value>>,
}

impl DeclaredGroupRules {
    pub fn rule_count(&self) -> usize {
        self.inbound.len() + self.outbound.len()
    }
}

/// Canonicalize raw rules and fold them into fewer declared rules
pub fn migrate_rules(rules: &[RawRule]) -> Vec<Map<String, Value>> {
    let canonical = rules.iter().map(RuleDescriptor::from_declared_rule).collect();
    consolidate(canonical)
        .iter()
        .map(RuleDescriptor::to_field_map)
        .collect()
}

impl GroupRules {
    pub fn migrate(&self) -> DeclaredGroupRules {
        DeclaredGroupRules {
            inbound: migrate_rules(&self.inbound),
            outbound: migrate_rules(&self.outbound),
        }
    }

    pub fn rule_count(&self) -> usize {
        self.inbound.len() + self.outbound.len()
    }
}

/// Load a JSON array of declared rules
pub fn load_rule_file(path: &Path) -> Result<Vec<RuleDescriptor>> {
    let value: Value = super::load_json(path)?;
    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array of rules", path.display());
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let map = item
                .as_object()
                .with_context(|| format!("Rule {} in {} is not an object", index, path.display()))?;
            RuleDescriptor::from_field_map(map)
                .with_context(|| format!("Invalid rule {} in {}", index, path.display()))
        })
        .collect()
}
