//! Change set for a single resource

use crate::error::{Error, Result};
use crate::render::{RenderableAsChanged, RenderableAsNew};
use crate::types::{ChangeKind, PolicyDiffs};

/// The differences between a declared resource and its live counterpart
///
/// The declared configuration is borrowed, not copied. It may be absent
/// when the kind is [`ChangeKind::Remove`], since the resource is then
/// only known to the cloud.
#[derive(Debug)]
pub struct ChangeSet<'a, C: ?Sized> {
    name: String,
    kind: ChangeKind,
    config: Option<&'a C>,
    policy_diffs: PolicyDiffs,
    added_users: Vec<String>,
    removed_users: Vec<String>,
}

impl<'a, C: ?Sized> ChangeSet<'a, C> {
    /// Create an empty change set for a resource
    pub fn new(name: impl Into<String>, kind: ChangeKind, config: Option<&'a C>) -> Self {
        Self {
            name: name.into(),
            kind,
            config,
            policy_diffs: Vec::new(),
            added_users: Vec::new(),
            removed_users: Vec::new(),
        }
    }

    /// Name of the resource this change set is for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Reclassify the change (e.g. demote `Change` to `RemovePolicy`)
    pub fn set_kind(&mut self, kind: ChangeKind) {
        self.kind = kind;
    }

    /// The declared configuration, if any
    pub fn config(&self) -> Option<&'a C> {
        self.config
    }

    pub fn policy_diffs(&self) -> &PolicyDiffs {
        &self.policy_diffs
    }

    /// Differences recorded for one policy, in the order they were recorded
    pub fn policy_diff(&self, policy: &str) -> Option<&[String]> {
        self.policy_diffs
            .iter()
            .find(|(name, _)| name == policy)
            .map(|(_, diffs)| diffs.as_slice())
    }

    pub fn added_users(&self) -> &[String] {
        &self.added_users
    }

    pub fn removed_users(&self) -> &[String] {
        &self.removed_users
    }

    /// Record a difference for a policy
    ///
    /// Descriptions are appended; identical descriptions are kept.
    pub fn record_policy_diff(
        &mut self,
        policy: impl Into<String>,
        description: impl Into<String>,
    ) {
        let policy = policy.into();
        let description = description.into();
        match self.policy_diffs.iter_mut().find(|(name, _)| *name == policy) {
            Some((_, diffs)) => diffs.push(description),
            None => self.policy_diffs.push((policy, vec![description])),
        }
    }

    /// Record a user to add to a group
    pub fn record_added_user(&mut self, user: impl Into<String>) {
        self.added_users.push(user.into());
    }

    /// Record a user to remove from a group
    pub fn record_removed_user(&mut self, user: impl Into<String>) {
        self.removed_users.push(user.into());
    }

    /// Check whether this change set represents a difference at all
    ///
    /// `Add` and `Remove` always do, whatever was recorded. Other kinds
    /// differ once a policy or membership difference has been recorded.
    pub fn has_differences(&self) -> bool {
        self.kind.is_structural()
            || !self.policy_diffs.is_empty()
            || !self.added_users.is_empty()
            || !self.removed_users.is_empty()
    }

    fn require_config(&self) -> Result<&'a C> {
        self.config().ok_or_else(|| Error::MissingConfig {
            name: self.name.clone(),
            kind: self.kind,
        })
    }
}

impl<C> ChangeSet<'_, C>
where
    C: RenderableAsNew + RenderableAsChanged + ?Sized,
{
    /// Render the change set as text
    ///
    /// `Add` and the changed kinds delegate to the declared configuration;
    /// `Remove` yields a fixed message.
    pub fn render(&self) -> Result<String> {
        log::trace!("Rendering {} change for {}", self.kind, self.name);
        match self.kind {
            ChangeKind::Add => Ok(self.require_config()?.added_text()),
            ChangeKind::Remove => Ok(format!("{} is not managed by cirrus", self.name)),
            ChangeKind::Change | ChangeKind::RemovePolicy => {
                let config = self.require_config()?;
                Ok(config.changed_text(
                    self.kind,
                    &self.policy_diffs,
                    &self.added_users,
                    &self.removed_users,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeConfig;

    impl RenderableAsNew for FakeConfig {
        fn added_text(&self) -> String {
            "new".to_string()
        }
    }

    impl RenderableAsChanged for FakeConfig {
        fn changed_text(
            &self,
            kind: ChangeKind,
            policy_diffs: &PolicyDiffs,
            added_users: &[String],
            removed_users: &[String],
        ) -> String {
            format!(
                "{kind}: {} policies, +{} -{}",
                policy_diffs.len(),
                added_users.len(),
                removed_users.len()
            )
        }
    }

    #[test]
    fn test_empty_change_has_no_differences() {
        let change = ChangeSet::new("role", ChangeKind::Change, Some(&FakeConfig));
        assert!(!change.has_differences());

        let demoted = ChangeSet::new("role", ChangeKind::RemovePolicy, Some(&FakeConfig));
        assert!(!demoted.has_differences());
    }

    #[test]
    fn test_add_and_remove_are_always_different() {
        let added = ChangeSet::new("role", ChangeKind::Add, Some(&FakeConfig));
        assert!(added.has_differences());
        assert!(added.policy_diffs().is_empty());

        let removed = ChangeSet::<FakeConfig>::new("role", ChangeKind::Remove, None);
        assert!(removed.has_differences());

        let mut reclassified = ChangeSet::new("role", ChangeKind::Change, Some(&FakeConfig));
        assert!(!reclassified.has_differences());
        reclassified.set_kind(ChangeKind::Remove);
        assert!(reclassified.has_differences());
    }

    #[test]
    fn test_policy_diffs_keep_order_per_policy() {
        let mut change = ChangeSet::new("role", ChangeKind::Change, Some(&FakeConfig));
        change.record_policy_diff("b", "first");
        change.record_policy_diff("a", "other");
        change.record_policy_diff("b", "second");
        change.record_policy_diff("b", "first");

        assert_eq!(
            change.policy_diff("b").unwrap(),
            &["first".to_string(), "second".to_string(), "first".to_string()]
        );
        assert_eq!(change.policy_diff("a").unwrap(), &["other".to_string()]);
        assert!(change.policy_diff("c").is_none());

        let names: Vec<&str> = change.policy_diffs().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(change.has_differences());
    }

    #[test]
    fn test_users_are_not_deduplicated() {
        let mut change = ChangeSet::new("admins", ChangeKind::Change, Some(&FakeConfig));
        change.record_added_user("alice");
        change.record_added_user("alice");
        change.record_removed_user("alice");

        assert_eq!(change.added_users().len(), 2);
        assert_eq!(change.removed_users(), &["alice".to_string()]);
        assert!(change.has_differences());
    }

    #[test]
    fn test_render_dispatch() {
        let added = ChangeSet::new("role", ChangeKind::Add, Some(&FakeConfig));
        assert_eq!(added.render().unwrap(), "new");

        let removed = ChangeSet::<FakeConfig>::new("role", ChangeKind::Remove, None);
        assert_eq!(removed.render().unwrap(), "role is not managed by cirrus");

        let mut changed = ChangeSet::new("admins", ChangeKind::Change, Some(&FakeConfig));
        changed.record_policy_diff("p", "x");
        changed.record_added_user("bob");
        assert_eq!(changed.render().unwrap(), "change: 1 policies, +1 -0");

        changed.set_kind(ChangeKind::RemovePolicy);
        assert_eq!(changed.render().unwrap(), "remove-policy: 1 policies, +1 -0");
    }

    #[test]
    fn test_render_without_config() {
        let change = ChangeSet::<FakeConfig>::new("role", ChangeKind::Add, None);
        assert_eq!(
            change.render(),
            Err(Error::MissingConfig {
                name: "role".to_string(),
                kind: ChangeKind::Add,
            })
        );
    }
}
