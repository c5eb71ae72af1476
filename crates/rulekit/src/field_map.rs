//! Declared field-map form of a rule.
//!
//! This is the shape written to and read from security group config files:
//!
//! ```json
//! {
//!   "security-groups": ["bastion"],
//!   "protocol": "tcp",
//!   "ports": [22, "8000-8080"],
//!   "subnets": ["all"]
//! }
//! ```
//!
//! Single ports are numbers and ranges are `"low-high"` strings. Keys whose
//! value is absent are omitted. Keys are written in the order shown, with
//! `icmp-type` and `icmp-code` taking the place of `ports` for ICMP rules.

use crate::error::{Error, Result};
use crate::types::{PortSpec, RuleDescriptor};
use serde_json::{Map, Value};

/// Key for referenced security groups.
pub const SECURITY_GROUPS: &str = "security-groups";
/// Key for the protocol token.
pub const PROTOCOL: &str = "protocol";
/// Key for port specifications.
pub const PORTS: &str = "ports";
/// Key for the ICMP type.
pub const ICMP_TYPE: &str = "icmp-type";
/// Key for the ICMP code.
pub const ICMP_CODE: &str = "icmp-code";
/// Key for subnets.
pub const SUBNETS: &str = "subnets";

fn port_to_value(port: &PortSpec) -> Value {
    match port {
        PortSpec::Single(port) => Value::from(*port),
        PortSpec::Range(..) => Value::from(port.to_string()),
    }
}

fn port_from_value(value: &Value) -> Result<PortSpec> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(PortSpec::Single)
            .ok_or_else(|| Error::InvalidPort {
                value: n.to_string(),
            }),
        Value::String(s) => s.parse(),
        other => Err(Error::InvalidPort {
            value: other.to_string(),
        }),
    }
}

fn strings_from_value(field: &'static str, value: Option<&Value>) -> Result<Vec<String>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| Error::invalid_field(field, "expected an array"))?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                Error::invalid_field(field, format!("expected a string, got {item}"))
            })
        })
        .collect()
}

fn int_from_value(field: &'static str, value: Option<&Value>) -> Result<Option<i32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| Error::invalid_field(field, format!("expected an integer, got {v}"))),
    }
}

impl RuleDescriptor {
    /// Convert to the declared field-map form, omitting absent values.
    pub fn to_field_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            SECURITY_GROUPS.to_string(),
            Value::from(self.security_groups.clone()),
        );
        map.insert(PROTOCOL.to_string(), Value::from(self.protocol.clone()));
        if let Some(ports) = &self.ports {
            map.insert(
                PORTS.to_string(),
                Value::Array(ports.iter().map(port_to_value).collect()),
            );
        }
        if let Some(icmp_type) = self.icmp_type {
            map.insert(ICMP_TYPE.to_string(), Value::from(icmp_type));
        }
        if let Some(icmp_code) = self.icmp_code {
            map.insert(ICMP_CODE.to_string(), Value::from(icmp_code));
        }
        map.insert(SUBNETS.to_string(), Value::from(self.subnets.clone()));
        map
    }

    /// Read a rule back from its declared field-map form.
    ///
    /// Missing entity lists are treated as empty; `protocol` is required.
    pub fn from_field_map(map: &Map<String, Value>) -> Result<Self> {
        let protocol = match map.get(PROTOCOL) {
            None | Some(Value::Null) => return Err(Error::MissingField { field: PROTOCOL }),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(Error::invalid_field(
                    PROTOCOL,
                    format!("expected a string, got {other}"),
                ));
            }
        };

        let ports = match map.get(PORTS) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(port_from_value)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(_) => return Err(Error::invalid_field(PORTS, "expected an array")),
        };

        Ok(Self {
            ports,
            protocol,
            icmp_type: int_from_value(ICMP_TYPE, map.get(ICMP_TYPE))?,
            icmp_code: int_from_value(ICMP_CODE, map.get(ICMP_CODE))?,
            security_groups: strings_from_value(SECURITY_GROUPS, map.get(SECURITY_GROUPS))?,
            subnets: strings_from_value(SUBNETS, map.get(SUBNETS))?,
        })
    }
}
