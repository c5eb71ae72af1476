//! Summaries across many change sets

use crate::change::ChangeSet;
use crate::types::ChangeKind;
use std::collections::HashMap;

/// Change set summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources no longer managed
    pub removals: usize,
    /// Number of resources to modify
    pub changes: usize,
    /// Number of resources only losing policies
    pub policy_removals: usize,
}

impl ChangeSummary {
    /// Create a summary from change sets, counting only those that differ
    pub fn from_changes<C: ?Sized>(changes: &[ChangeSet<'_, C>]) -> Self {
        let mut summary = Self::default();
        for change in changes.iter().filter(|c| c.has_differences()) {
            match change.kind() {
                ChangeKind::Add => summary.additions += 1,
                ChangeKind::Remove => summary.removals += 1,
                ChangeKind::Change => summary.changes += 1,
                ChangeKind::RemovePolicy => summary.policy_removals += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.changes + self.policy_removals
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group change sets by kind
pub fn group_by_kind<'c, 'a, C: ?Sized>(
    changes: &'c [ChangeSet<'a, C>],
) -> HashMap<ChangeKind, Vec<&'c ChangeSet<'a, C>>> {
    let mut groups: HashMap<ChangeKind, Vec<&'c ChangeSet<'a, C>>> = HashMap::new();
    for change in changes {
        groups.entry(change.kind()).or_default().push(change);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ChangeSet<'static, str>> {
        let mut changed = ChangeSet::new("b", ChangeKind::Change, Some("b"));
        changed.record_policy_diff("p", "x");
        let unchanged = ChangeSet::new("c", ChangeKind::Change, Some("c"));
        let mut policy_only = ChangeSet::new("d", ChangeKind::RemovePolicy, Some("d"));
        policy_only.record_policy_diff("old", "removed");

        vec![
            ChangeSet::new("a", ChangeKind::Add, Some("a")),
            changed,
            unchanged,
            policy_only,
            ChangeSet::new("e", ChangeKind::Remove, None),
        ]
    }

    #[test]
    fn test_summary_skips_unchanged() {
        let summary = ChangeSummary::from_changes(&sample());
        assert_eq!(
            summary,
            ChangeSummary {
                additions: 1,
                removals: 1,
                changes: 1,
                policy_removals: 1,
            }
        );
        assert_eq!(summary.total(), 4);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_empty_summary() {
        let summary = ChangeSummary::from_changes::<str>(&[]);
        assert!(!summary.has_changes());
    }

    #[test]
    fn test_group_by_kind() {
        let changes = sample();
        let groups = group_by_kind(&changes);
        assert_eq!(groups[&ChangeKind::Change].len(), 2);
        assert_eq!(groups[&ChangeKind::Add][0].name(), "a");
        assert_eq!(groups[&ChangeKind::RemovePolicy].len(), 1);
    }
}
