//! Rendering capabilities for declared configurations
//!
//! A change set never formats resource details itself. Each declared
//! configuration type implements these traits, so new resource types can be
//! rendered without touching this crate.

use crate::types::{ChangeKind, PolicyDiffs};

/// A declared configuration that can describe itself as a new resource
pub trait RenderableAsNew {
    /// Text shown when the resource will be created
    fn added_text(&self) -> String;
}

/// A declared configuration that can describe its differences from the live resource
pub trait RenderableAsChanged {
    /// Text shown when the resource exists but differs
    ///
    /// # Arguments
    /// * `kind` - `Change` or `RemovePolicy`; only the renderer cares which
    /// * `policy_diffs` - Difference descriptions per policy, in discovery order
    /// * `added_users` - Users to add (groups only)
    /// * `removed_users` - Users to remove (groups only)
    fn changed_text(
        &self,
        kind: ChangeKind,
        policy_diffs: &PolicyDiffs,
        added_users: &[String],
        removed_users: &[String],
    ) -> String;
}
