//! Canonicalization and pairwise merging of rules.
//!
//! Both merge functions expect descriptors with the same protocol and ICMP
//! fields. That precondition is the caller's to uphold and is not checked.

use crate::types::{ALL_SUBNETS, ANY_CIDR, DeclaredRule, ICMP, PortSpec, RuleDescriptor};

/// Outcome of [`combine_ports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMerge {
    /// The two rules collapsed into one.
    Merged(RuleDescriptor),
    /// The rules cannot be merged; both are returned untouched.
    Unmerged(RuleDescriptor, RuleDescriptor),
}

impl PortMerge {
    /// Flatten the outcome into the rules a fold should keep.
    pub fn into_rules(self) -> Vec<RuleDescriptor> {
        match self {
            PortMerge::Merged(rule) => vec![rule],
            PortMerge::Unmerged(a, b) => vec![a, b],
        }
    }

    /// Check whether the rules were merged.
    pub fn is_merged(&self) -> bool {
        matches!(self, PortMerge::Merged(_))
    }
}

impl RuleDescriptor {
    /// Canonicalize a raw rule.
    ///
    /// - ICMP rules get no ports; their bounds become the ICMP type and code.
    /// - Other rules get no ports when both bounds are missing, a single port
    ///   when the bounds are equal, and one range otherwise. A rule with only
    ///   one bound is treated as a single port.
    /// - `0.0.0.0/0` subnets become `all`.
    pub fn from_declared_rule<R: DeclaredRule + ?Sized>(rule: &R) -> Self {
        let protocol = rule.protocol();
        let lower = rule.lower_bound();
        let upper = rule.upper_bound();
        let is_icmp = protocol == ICMP;

        let ports = if is_icmp {
            None
        } else {
            match (lower, upper) {
                (None, None) => None,
                (Some(low), Some(high)) if low == high => Some(vec![PortSpec::Single(low)]),
                (Some(low), Some(high)) => Some(vec![PortSpec::Range(low, high)]),
                (Some(port), None) | (None, Some(port)) => Some(vec![PortSpec::Single(port)]),
            }
        };

        let (icmp_type, icmp_code) = if is_icmp { (lower, upper) } else { (None, None) };

        let subnets = rule
            .subnets()
            .iter()
            .map(|subnet| {
                if subnet == ANY_CIDR {
                    ALL_SUBNETS.to_string()
                } else {
                    subnet.clone()
                }
            })
            .collect();

        Self {
            ports,
            protocol: protocol.to_string(),
            icmp_type,
            icmp_code,
            security_groups: rule.security_groups().to_vec(),
            subnets,
        }
    }
}

/// Combine two rules by concatenating their allowed entities.
///
/// The result keeps `a`'s ports, protocol and ICMP fields. Entities are not
/// deduplicated.
pub fn combine_allowed_entities(a: &RuleDescriptor, b: &RuleDescriptor) -> RuleDescriptor {
    let mut security_groups = a.security_groups.clone();
    security_groups.extend(b.security_groups.iter().cloned());
    let mut subnets = a.subnets.clone();
    subnets.extend(b.subnets.iter().cloned());

    RuleDescriptor {
        ports: a.ports.clone(),
        protocol: a.protocol.clone(),
        icmp_type: a.icmp_type,
        icmp_code: a.icmp_code,
        security_groups,
        subnets,
    }
}

/// Combine two rules by concatenating their ports.
///
/// - Both cover all ports: `a` is kept and `b` dropped.
/// - Only one covers all ports: merging would change meaning, so both are
///   returned unmerged.
/// - Both have ports: `a`'s ports followed by `b`'s, with `a`'s entities.
///   Ports are neither sorted nor collapsed.
pub fn combine_ports(a: RuleDescriptor, b: RuleDescriptor) -> PortMerge {
    match (a.ports.as_ref(), b.ports.as_ref()) {
        (None, None) => PortMerge::Merged(a),
        (None, Some(_)) | (Some(_), None) => PortMerge::Unmerged(a, b),
        (Some(a_ports), Some(b_ports)) => {
            let mut ports = a_ports.clone();
            ports.extend(b_ports.iter().copied());
            PortMerge::Merged(RuleDescriptor {
                ports: Some(ports),
                ..a
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRule;

    fn tcp(ports: Option<Vec<PortSpec>>) -> RuleDescriptor {
        RuleDescriptor {
            ports,
            protocol: "tcp".to_string(),
            icmp_type: None,
            icmp_code: None,
            security_groups: Vec::new(),
            subnets: Vec::new(),
        }
    }

    #[test]
    fn test_canonical_single_port() {
        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("tcp", Some(22), Some(22)));
        assert_eq!(rule.ports, Some(vec![PortSpec::Single(22)]));
        assert_eq!(rule.icmp_type, None);
        assert_eq!(rule.icmp_code, None);
    }

    #[test]
    fn test_canonical_range() {
        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("udp", Some(8000), Some(8080)));
        assert_eq!(rule.ports, Some(vec![PortSpec::Range(8000, 8080)]));
        assert_eq!(rule.protocol, "udp");
    }

    #[test]
    fn test_canonical_no_bounds() {
        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("-1", None, None));
        assert_eq!(rule.ports, None);
        assert!(rule.is_all_ports());
    }

    #[test]
    fn test_canonical_one_bound() {
        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("tcp", Some(443), None));
        assert_eq!(rule.ports, Some(vec![PortSpec::Single(443)]));
    }

    #[test]
    fn test_canonical_icmp() {
        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("icmp", Some(8), Some(0)));
        assert_eq!(rule.ports, None);
        assert_eq!(rule.icmp_type, Some(8));
        assert_eq!(rule.icmp_code, Some(0));

        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("icmp", Some(3), Some(3)));
        assert_eq!(rule.ports, None);
        assert_eq!(rule.icmp_type, Some(3));
        assert_eq!(rule.icmp_code, Some(3));

        let rule = RuleDescriptor::from_declared_rule(&RawRule::new("icmp", None, None));
        assert_eq!(rule.ports, None);
        assert_eq!(rule.icmp_type, None);
        assert_eq!(rule.icmp_code, None);
    }

    #[test]
    fn test_canonical_subnets() {
        let raw = RawRule::new("tcp", Some(80), Some(80))
            .with_subnets(["10.0.0.0/8", "0.0.0.0/0", "192.168.1.0/24", "0.0.0.0/0"])
            .with_security_groups(["web", "lb"]);
        let rule = RuleDescriptor::from_declared_rule(&raw);
        assert_eq!(
            rule.subnets,
            vec!["10.0.0.0/8", "all", "192.168.1.0/24", "all"]
        );
        assert_eq!(rule.security_groups, vec!["web", "lb"]);
    }

    #[test]
    fn test_combine_ports_both_all() {
        let mut a = tcp(None);
        a.security_groups.push("a".to_string());
        let b = tcp(None);
        assert_eq!(combine_ports(a.clone(), b), PortMerge::Merged(a));
    }

    #[test]
    fn test_combine_ports_mismatched() {
        let a = tcp(Some(vec![PortSpec::Single(80)]));
        let b = tcp(None);
        let merged = combine_ports(a.clone(), b.clone());
        assert!(!merged.is_merged());
        assert_eq!(merged, PortMerge::Unmerged(a.clone(), b.clone()));

        assert_eq!(combine_ports(b.clone(), a.clone()), PortMerge::Unmerged(b, a));
    }

    #[test]
    fn test_combine_ports_concatenates() {
        let mut a = tcp(Some(vec![PortSpec::Single(80)]));
        a.subnets.push("all".to_string());
        let mut b = tcp(Some(vec![PortSpec::Single(443)]));
        b.subnets.push("10.0.0.0/8".to_string());

        let PortMerge::Merged(rule) = combine_ports(a, b) else {
            panic!("expected a merge");
        };
        assert_eq!(
            rule.ports,
            Some(vec![PortSpec::Single(80), PortSpec::Single(443)])
        );
        assert_eq!(rule.protocol, "tcp");
        assert_eq!(rule.subnets, vec!["all"]);
    }

    #[test]
    fn test_combine_ports_keeps_duplicates() {
        let a = tcp(Some(vec![PortSpec::Single(80)]));
        let rules = combine_ports(a.clone(), a).into_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].ports,
            Some(vec![PortSpec::Single(80), PortSpec::Single(80)])
        );
    }

    #[test]
    fn test_combine_allowed_entities() {
        let mut a = tcp(Some(vec![PortSpec::Single(22)]));
        a.security_groups.push("sg-1".to_string());
        let mut b = tcp(Some(vec![PortSpec::Single(9999)]));
        b.security_groups.push("sg-2".to_string());
        b.subnets.push("10.0.0.0/8".to_string());

        let rule = combine_allowed_entities(&a, &b);
        assert_eq!(rule.security_groups, vec!["sg-1", "sg-2"]);
        assert_eq!(rule.subnets, vec!["10.0.0.0/8"]);
        assert_eq!(rule.ports, Some(vec![PortSpec::Single(22)]));
        assert_eq!(rule.protocol, "tcp");
    }

    #[test]
    fn test_combine_allowed_entities_with_itself_duplicates() {
        let mut a = tcp(None);
        a.security_groups.push("sg-1".to_string());
        a.subnets.push("all".to_string());

        let rule = combine_allowed_entities(&a, &a);
        assert_eq!(rule.security_groups, vec!["sg-1", "sg-1"]);
        assert_eq!(rule.subnets, vec!["all", "all"]);
    }

    #[test]
    fn test_into_rules_unmerged() {
        let a = tcp(Some(vec![PortSpec::Single(80)]));
        let b = tcp(None);
        assert_eq!(combine_ports(a.clone(), b.clone()).into_rules(), vec![a, b]);
    }
}
