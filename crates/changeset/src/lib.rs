//! # Changeset
//!
//! Typed change sets describing how a declared cloud resource differs from
//! the live one.
//!
//! ## Core Concepts
//!
//! - **ChangeKind**: Whether the resource is added, removed, changed, or only
//!   loses policies
//! - **ChangeSet**: Per-resource accumulation of policy differences and group
//!   membership changes
//! - **RenderableAsNew / RenderableAsChanged**: Capabilities a declared
//!   configuration type implements so a change set can be rendered
//! - **ChangeSummary**: Counts across many change sets
//!
//! ## Example
//!
//! ```
//! use changeset::{ChangeKind, ChangeSet, PolicyDiffs, RenderableAsChanged, RenderableAsNew};
//!
//! #[derive(Debug)]
//! struct RoleConfig { name: String }
//!
//! impl RenderableAsNew for RoleConfig {
//!     fn added_text(&self) -> String { format!("{} will be created", self.name) }
//! }
//!
//! impl RenderableAsChanged for RoleConfig {
//!     fn changed_text(
//!         &self,
//!         _kind: ChangeKind,
//!         policy_diffs: &PolicyDiffs,
//!         _added_users: &[String],
//!         _removed_users: &[String],
//!     ) -> String {
//!         format!("{}: {} policies differ", self.name, policy_diffs.len())
//!     }
//! }
//!
//! let role = RoleConfig { name: "deploy".into() };
//! let mut change = ChangeSet::new("deploy", ChangeKind::Change, Some(&role));
//! change.record_policy_diff("s3-access", "+ \"s3:GetObject\"");
//!
//! assert!(change.has_differences());
//! assert_eq!(change.render()?, "deploy: 1 policies differ");
//! # Ok::<(), changeset::Error>(())
//! ```

pub mod change;
pub mod error;
pub mod render;
pub mod summary;
pub mod types;

// Re-export main types at crate root
pub use change::ChangeSet;
pub use error::{Error, Result};
pub use render::{RenderableAsChanged, RenderableAsNew};
pub use summary::{ChangeSummary, group_by_kind};
pub use types::{ChangeKind, PolicyDiffs};
