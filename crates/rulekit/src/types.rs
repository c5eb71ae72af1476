//! Core types for security group rules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protocol token whose port bounds carry ICMP type and code instead.
pub const ICMP: &str = "icmp";

/// Symbolic subnet meaning "everywhere" in declared config.
pub const ALL_SUBNETS: &str = "all";

/// CIDR the cloud reports for "everywhere".
pub(crate) const ANY_CIDR: &str = "0.0.0.0/0";

/// One port specification: a single port or a closed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSpec {
    /// A single port, e.g. `443`
    Single(i32),
    /// A closed range, e.g. `8000-8080`
    Range(i32, i32),
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Single(port) => write!(f, "{port}"),
            PortSpec::Range(low, high) => write!(f, "{low}-{high}"),
        }
    }
}

impl FromStr for PortSpec {
    type Err = Error;

    /// Parse `"443"` or `"8000-8080"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidPort {
            value: s.to_string(),
        };

        if let Ok(port) = trimmed.parse::<i32>() {
            return Ok(PortSpec::Single(port));
        }

        let (low, high) = trimmed.split_once('-').ok_or_else(invalid)?;
        let low = low.trim().parse::<i32>().map_err(|_| invalid())?;
        let high = high.trim().parse::<i32>().map_err(|_| invalid())?;
        Ok(PortSpec::Range(low, high))
    }
}

/// A raw rule as declared by a user or reported by the cloud.
///
/// The two bounds encode a port range for most protocols, and the ICMP type
/// and code when the protocol is `icmp`.
pub trait DeclaredRule {
    /// Lower port bound, or ICMP type.
    fn lower_bound(&self) -> Option<i32>;
    /// Upper port bound, or ICMP code.
    fn upper_bound(&self) -> Option<i32>;
    /// Protocol token (`tcp`, `udp`, `icmp`, `-1`).
    fn protocol(&self) -> &str;
    /// Referenced security group identifiers.
    fn security_groups(&self) -> &[String];
    /// CIDR blocks.
    fn subnets(&self) -> &[String];
}

/// A plain raw rule, as found in security group snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawRule {
    /// Protocol token
    pub protocol: String,
    /// Lower bound (port or ICMP type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i32>,
    /// Upper bound (port or ICMP code)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i32>,
    /// Referenced security groups
    #[serde(default)]
    pub security_groups: Vec<String>,
    /// CIDR blocks
    #[serde(default)]
    pub subnets: Vec<String>,
}

impl RawRule {
    /// Create a raw rule with no allowed entities.
    pub fn new(protocol: impl Into<String>, from: Option<i32>, to: Option<i32>) -> Self {
        Self {
            protocol: protocol.into(),
            from,
            to,
            security_groups: Vec::new(),
            subnets: Vec::new(),
        }
    }

    /// Set the referenced security groups.
    pub fn with_security_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Set the CIDR blocks.
    pub fn with_subnets<I, S>(mut self, subnets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subnets = subnets.into_iter().map(Into::into).collect();
        self
    }
}

impl DeclaredRule for RawRule {
    fn lower_bound(&self) -> Option<i32> {
        self.from
    }

    fn upper_bound(&self) -> Option<i32> {
        self.to
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn security_groups(&self) -> &[String] {
        &self.security_groups
    }

    fn subnets(&self) -> &[String] {
        &self.subnets
    }
}

/// A canonical rule, ready to be merged or written to declared config.
///
/// `ports` is `None` for "all ports" and for ICMP rules. ICMP fields are only
/// set when `protocol` is `icmp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleDescriptor {
    /// Port specifications, or `None` for all ports
    pub ports: Option<Vec<PortSpec>>,
    /// Protocol token
    pub protocol: String,
    /// ICMP type (ICMP rules only)
    pub icmp_type: Option<i32>,
    /// ICMP code (ICMP rules only)
    pub icmp_code: Option<i32>,
    /// Referenced security groups
    pub security_groups: Vec<String>,
    /// CIDR blocks or `all`
    pub subnets: Vec<String>,
}

impl RuleDescriptor {
    /// Check whether this rule covers every port.
    pub fn is_all_ports(&self) -> bool {
        self.ports.is_none() && !self.is_icmp()
    }

    /// Check whether this is an ICMP rule.
    pub fn is_icmp(&self) -> bool {
        self.protocol == ICMP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_spec_display() {
        assert_eq!(PortSpec::Single(22).to_string(), "22");
        assert_eq!(PortSpec::Range(8000, 8080).to_string(), "8000-8080");
    }

    #[test]
    fn test_port_spec_parse() {
        assert_eq!("443".parse::<PortSpec>().unwrap(), PortSpec::Single(443));
        assert_eq!(" 80 ".parse::<PortSpec>().unwrap(), PortSpec::Single(80));
        assert_eq!(
            "1024-65535".parse::<PortSpec>().unwrap(),
            PortSpec::Range(1024, 65535)
        );
        assert_eq!("-1".parse::<PortSpec>().unwrap(), PortSpec::Single(-1));
    }

    #[test]
    fn test_port_spec_parse_errors() {
        assert!("".parse::<PortSpec>().is_err());
        assert!("http".parse::<PortSpec>().is_err());
        assert!("80-".parse::<PortSpec>().is_err());
        assert_eq!(
            "80-x".parse::<PortSpec>(),
            Err(Error::InvalidPort {
                value: "80-x".to_string()
            })
        );
    }

    #[test]
    fn test_raw_rule_deserialize() {
        let rule: RawRule = serde_json::from_str(
            r#"{"protocol": "tcp", "from": 22, "to": 22, "security-groups": ["bastion"]}"#,
        )
        .unwrap();
        assert_eq!(rule.lower_bound(), Some(22));
        assert_eq!(rule.security_groups(), &["bastion".to_string()]);
        assert!(rule.subnets().is_empty());

        let all: RawRule = serde_json::from_str(r#"{"protocol": "-1"}"#).unwrap();
        assert_eq!(all.from, None);
        assert_eq!(all.to, None);
    }

    #[test]
    fn test_descriptor_predicates() {
        let rule = RuleDescriptor {
            ports: None,
            protocol: "tcp".to_string(),
            icmp_type: None,
            icmp_code: None,
            security_groups: vec!["a".to_string()],
            subnets: vec!["all".to_string(), "10.0.0.0/8".to_string()],
        };
        assert!(rule.is_all_ports());
        assert!(!rule.is_icmp());

        let icmp = RuleDescriptor {
            protocol: ICMP.to_string(),
            ..rule
        };
        assert!(icmp.is_icmp());
        assert!(!icmp.is_all_ports());
    }
}
