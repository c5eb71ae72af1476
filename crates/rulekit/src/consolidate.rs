//! Folding a rule list into fewer equivalent rules.

use crate::migration::{combine_allowed_entities, combine_ports};
use crate::types::{PortSpec, RuleDescriptor};

/// Rules that agree on protocol and ports can share one allow-list.
#[derive(PartialEq)]
struct PortKey<'a> {
    protocol: &'a str,
    icmp_type: Option<i32>,
    icmp_code: Option<i32>,
    ports: Option<&'a [PortSpec]>,
}

/// Rules that agree on protocol and allowed entities can share one port list.
#[derive(PartialEq)]
struct EntityKey<'a> {
    protocol: &'a str,
    icmp_type: Option<i32>,
    icmp_code: Option<i32>,
    security_groups: &'a [String],
    subnets: &'a [String],
}

impl<'a> PortKey<'a> {
    fn of(rule: &'a RuleDescriptor) -> Self {
        Self {
            protocol: &rule.protocol,
            icmp_type: rule.icmp_type,
            icmp_code: rule.icmp_code,
            ports: rule.ports.as_deref(),
        }
    }
}

impl<'a> EntityKey<'a> {
    fn of(rule: &'a RuleDescriptor) -> Self {
        Self {
            protocol: &rule.protocol,
            icmp_type: rule.icmp_type,
            icmp_code: rule.icmp_code,
            security_groups: &rule.security_groups,
            subnets: &rule.subnets,
        }
    }
}

/// Group rules by a key, keeping groups in order of first appearance.
fn group_in_order<F>(rules: Vec<RuleDescriptor>, same_group: F) -> Vec<Vec<RuleDescriptor>>
where
    F: Fn(&RuleDescriptor, &RuleDescriptor) -> bool,
{
    let mut groups: Vec<Vec<RuleDescriptor>> = Vec::new();
    for rule in rules {
        match groups.iter_mut().find(|group| same_group(&group[0], &rule)) {
            Some(group) => group.push(rule),
            None => groups.push(vec![rule]),
        }
    }
    groups
}

/// Consolidate canonical rules into fewer equivalent rules.
///
/// First, rules with the same protocol and ports have their allowed entities
/// combined. Then rules with the same protocol and allowed entities have
/// their ports combined; pairs that cannot be merged stay separate.
pub fn consolidate(rules: Vec<RuleDescriptor>) -> Vec<RuleDescriptor> {
    let before = rules.len();

    let by_ports = group_in_order(rules, |a, b| PortKey::of(a) == PortKey::of(b));
    let combined: Vec<RuleDescriptor> = by_ports
        .into_iter()
        .filter_map(|group| {
            group
                .into_iter()
                .reduce(|acc, rule| combine_allowed_entities(&acc, &rule))
        })
        .collect();

    let by_entities = group_in_order(combined, |a, b| EntityKey::of(a) == EntityKey::of(b));
    let mut result = Vec::new();
    for group in by_entities {
        let mut folded: Vec<RuleDescriptor> = Vec::new();
        for rule in group {
            // At most one bounded and one all-ports rule survive per group
            let partner = folded
                .iter()
                .position(|kept| kept.is_all_ports() == rule.is_all_ports());
            let Some(index) = partner else {
                folded.push(rule);
                continue;
            };

            let outcome = combine_ports(folded.remove(index), rule);
            if !outcome.is_merged() {
                log::trace!("Port lists could not be merged, keeping both rules");
            }
            let mut kept = outcome.into_rules().into_iter();
            if let Some(first) = kept.next() {
                folded.insert(index, first);
            }
            folded.extend(kept);
        }
        result.extend(folded);
    }

    log::debug!("Consolidated {} rules into {}", before, result.len());
    result
}
