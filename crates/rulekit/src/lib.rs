//! # rulekit
//!
//! Canonicalization and consolidation of security group access rules.
//!
//! This crate provides functionality for:
//! - Converting raw declared or cloud-reported rules into a canonical,
//!   merge-ready [`RuleDescriptor`]
//! - Merging descriptors that share ports but allow different entities
//! - Merging descriptors that allow the same entities on different ports
//! - Folding a whole rule list into fewer equivalent rules
//! - Converting descriptors to and from the declared field-map form
//!
//! ## Example
//!
//! ```
//! use rulekit::{RawRule, RuleDescriptor, consolidate};
//!
//! let https = RawRule::new("tcp", Some(443), Some(443)).with_subnets(["0.0.0.0/0"]);
//! let http = RawRule::new("tcp", Some(80), Some(80)).with_subnets(["0.0.0.0/0"]);
//!
//! let rules = vec![
//!     RuleDescriptor::from_declared_rule(&https),
//!     RuleDescriptor::from_declared_rule(&http),
//! ];
//! let merged = consolidate(rules);
//!
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].subnets, vec!["all".to_string()]);
//! ```
//!
//! ## Merge outcomes
//!
//! [`combine_ports`] never fails. When two rules cannot be merged without
//! changing their meaning, it hands both back as [`PortMerge::Unmerged`] so a
//! fold can keep them as separate rules.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod consolidate;
pub mod error;
pub mod field_map;
pub mod migration;
pub mod types;

pub use consolidate::consolidate;
pub use error::{Error, Result};
pub use migration::{PortMerge, combine_allowed_entities, combine_ports};
pub use types::{ALL_SUBNETS, DeclaredRule, ICMP, PortSpec, RawRule, RuleDescriptor};
