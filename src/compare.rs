//! Comparison of declared and live IAM resources
//!
//! Each resource is compared on its own, so resources are compared in
//! parallel and each comparison owns its change set.

use crate::model::iam::{IamConfig, IamKind};
use changeset::{ChangeKind, ChangeSet};
use rayon::prelude::*;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::{BTreeMap, BTreeSet};

/// Description recorded for a live policy with no declaration
pub const UNDECLARED_POLICY: &str = "- policy is not declared and will be removed";

fn policy_text(document: &Value) -> String {
    let mut text = serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string());
    text.push('\n');
    text
}

/// Line differences turning the live policy document into the declared one
pub fn policy_differences(declared: &Value, live: Option<&Value>) -> Vec<String> {
    if live == Some(declared) {
        return Vec::new();
    }

    let declared_text = policy_text(declared);
    let live_text = live.map(policy_text).unwrap_or_default();
    let diff = TextDiff::from_lines(&live_text, &declared_text);

    diff.iter_all_changes()
        .filter_map(|change| {
            let line = change.value().trim_end();
            match change.tag() {
                ChangeTag::Delete => Some(format!("- {line}")),
                ChangeTag::Insert => Some(format!("+ {line}")),
                ChangeTag::Equal => None,
            }
        })
        .collect()
}

/// Compare one resource, returning `None` if it exists on neither side
pub fn compare_resource<'a>(
    name: &str,
    declared: Option<&'a IamConfig>,
    live: Option<&IamConfig>,
) -> Option<ChangeSet<'a, IamConfig>> {
    let (declared, live) = match (declared, live) {
        (None, None) => return None,
        (Some(declared), None) => {
            return Some(ChangeSet::new(name, ChangeKind::Add, Some(declared)));
        }
        (None, Some(_)) => return Some(ChangeSet::new(name, ChangeKind::Remove, None)),
        (Some(declared), Some(live)) => (declared, live),
    };

    let mut change = ChangeSet::new(name, ChangeKind::Change, Some(declared));
    let mut content_changed = false;

    for (policy, document) in &declared.policies {
        for line in policy_differences(document, live.policies.get(policy)) {
            content_changed = true;
            change.record_policy_diff(policy.as_str(), line);
        }
    }

    for policy in live.policies.keys() {
        if !declared.policies.contains_key(policy) {
            change.record_policy_diff(policy.as_str(), UNDECLARED_POLICY);
        }
    }

    if declared.kind == IamKind::Group {
        for user in &declared.users {
            if !live.users.contains(user) {
                change.record_added_user(user.as_str());
            }
        }
        for user in &live.users {
            if !declared.users.contains(user) {
                change.record_removed_user(user.as_str());
            }
        }
    }

    let membership_changed = !change.added_users().is_empty() || !change.removed_users().is_empty();
    if change.has_differences() && !content_changed && !membership_changed {
        change.set_kind(ChangeKind::RemovePolicy);
    }

    log::trace!(
        "Compared {} {}: {} ({} policies differ)",
        declared.kind,
        name,
        change.kind(),
        change.policy_diffs().len()
    );
    Some(change)
}

/// Compare every resource present in either snapshot
///
/// Results are ordered by kind, then name. Unchanged resources are included;
/// use [`ChangeSet::has_differences`] to filter them.
pub fn compare_all<'a>(
    declared: &'a [IamConfig],
    live: &[IamConfig],
) -> Vec<ChangeSet<'a, IamConfig>> {
    let declared_by_key: BTreeMap<(IamKind, &str), &IamConfig> =
        declared.iter().map(|c| (c.key(), c)).collect();
    let live_by_key: BTreeMap<(IamKind, &str), &IamConfig> =
        live.iter().map(|c| (c.key(), c)).collect();
    let keys: Vec<(IamKind, &str)> = declared_by_key
        .keys()
        .chain(live_by_key.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    log::debug!(
        "Comparing {} declared and {} live IAM resources",
        declared.len(),
        live.len()
    );

    keys.par_iter()
        .filter_map(|key| {
            compare_resource(
                key.1,
                declared_by_key.get(key).copied(),
                live_by_key.get(key).copied(),
            )
        })
        .collect()
}
