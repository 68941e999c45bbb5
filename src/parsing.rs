use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};

/// A resource amount as it appears in object payloads: either an already
/// converted number or a Kubernetes quantity string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
}

impl RawQuantity {
    /// Stand-in for a missing quantity; callers substitute it, parsers never do.
    pub const ZERO: RawQuantity = RawQuantity::Number(0.0);
}

impl From<&str> for RawQuantity {
    fn from(s: &str) -> Self {
        RawQuantity::Text(s.to_string())
    }
}

impl From<String> for RawQuantity {
    fn from(s: String) -> Self {
        RawQuantity::Text(s)
    }
}

impl From<f64> for RawQuantity {
    fn from(n: f64) -> Self {
        RawQuantity::Number(n)
    }
}

impl From<i64> for RawQuantity {
    fn from(n: i64) -> Self {
        RawQuantity::Number(n as f64)
    }
}

impl From<&Quantity> for RawQuantity {
    fn from(q: &Quantity) -> Self {
        RawQuantity::Text(q.0.clone())
    }
}

// Binary-SI suffixes, matched against the last two characters only.
const BINARY_UNITS: &[(&str, f64)] = &[
    ("Ki", 1024.0),
    ("Mi", 1024.0 * 1024.0),
    ("Gi", 1024.0 * 1024.0 * 1024.0),
];

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numbers pass through untouched. A trailing `m` is stripped and the rest is
/// the millicore count; any other string is returned as its plain numeric
/// value without scaling.
pub fn parse_millicores(input: &RawQuantity) -> Option<f64> {
    match input {
        RawQuantity::Number(n) => Some(*n),
        RawQuantity::Text(q) => {
            let q = q.trim();
            if q.is_empty() {
                return None;
            }
            match q.strip_suffix('m') {
                Some(millis) => parse_number(millis),
                None => parse_number(q),
            }
        }
    }
}

/// Numbers pass through untouched. `Ki`/`Mi`/`Gi` suffixes are expanded to
/// bytes; anything else is taken as a byte count.
pub fn parse_bytes(input: &RawQuantity) -> Option<f64> {
    match input {
        RawQuantity::Number(n) => Some(*n),
        RawQuantity::Text(q) => {
            let q = q.trim();
            if q.is_empty() {
                return None;
            }
            for (suf, mul) in BINARY_UNITS {
                if let Some(stripped) = q.strip_suffix(suf) {
                    return parse_number(stripped).map(|v| v * mul);
                }
            }
            parse_number(q)
        }
    }
}
