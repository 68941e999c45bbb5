use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const UNIT_MILLICORES: &str = "millicores";
pub const UNIT_BYTES: &str = "bytes";

#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_path: Option<String>,
    pub namespaces: Vec<String>,
    pub ingest_url: Option<String>,
    pub cluster_name: Option<String>,
    pub include_metrics: bool,
    pub fail_if_no_metrics: bool,
}

/// Health verdict attached to an object by an upstream health check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }
}

/// A Kubernetes object together with its externally computed `healthStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecked<K> {
    #[serde(flatten)]
    pub object: K,
    #[serde(rename = "healthStatus", default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<HealthStatus>,
}

impl<K> HealthChecked<K> {
    pub fn new(object: K, health_status: Option<HealthStatus>) -> Self {
        Self { object, health_status }
    }
}

/// Batch element wrapper: every raw object arrives under an `Object` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Object")]
    pub object: T,
}

impl<T> From<T> for Envelope<T> {
    fn from(object: T) -> Self {
        Self { object }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Healthy,
    Unhealthy,
}

/// One displayable attribute of an entity: a number with optional bounds,
/// free text, or a bare metric sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Property {
    Numeric {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        max: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        headline: Option<bool>,
    },
    Text {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        headline: Option<bool>,
    },
    /// Serialized as `{name, value}` only; `value` is `null` when unparseable.
    Sample { name: String, value: Option<f64> },
}

impl Property {
    pub fn text(name: &str, text: Option<String>) -> Self {
        Property::Text {
            name: name.to_string(),
            text,
            headline: None,
        }
    }

    /// A numeric property measured in `unit` whose current value is filled in elsewhere.
    pub fn gauge(name: &str, unit: &str) -> Self {
        Property::Numeric {
            name: name.to_string(),
            value: None,
            unit: Some(unit.to_string()),
            min: None,
            max: None,
            headline: None,
        }
    }

    pub fn value(name: &str, value: Option<f64>) -> Self {
        Property::Sample {
            name: name.to_string(),
            value,
        }
    }

    pub fn with_min(mut self, bound: Option<f64>) -> Self {
        if let Property::Numeric { min, .. } = &mut self {
            *min = bound;
        }
        self
    }

    pub fn with_max(mut self, bound: Option<f64>) -> Self {
        if let Property::Numeric { max, .. } = &mut self {
            *max = bound;
        }
        self
    }

    pub fn headline(mut self) -> Self {
        match &mut self {
            Property::Numeric { headline, .. } | Property::Text { headline, .. } => *headline = Some(true),
            Property::Sample { .. } => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Numeric { name, .. } | Property::Text { name, .. } | Property::Sample { name, .. } => {
                name.as_str()
            }
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match self {
            Property::Text { text, .. } => text.as_deref(),
            Property::Numeric { .. } | Property::Sample { .. } => None,
        }
    }

    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Property::Numeric { value, .. } | Property::Sample { value, .. } => *value,
            Property::Text { .. } => None,
        }
    }

    pub fn max(&self) -> Option<f64> {
        match self {
            Property::Numeric { max, .. } => *max,
            Property::Text { .. } | Property::Sample { .. } => None,
        }
    }

    pub fn is_headline(&self) -> bool {
        match self {
            Property::Numeric { headline, .. } | Property::Text { headline, .. } => headline.unwrap_or(false),
            Property::Sample { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    pub name: String,
    #[serde(rename = "labelSelector")]
    pub label_selector: String,
    #[serde(rename = "fieldSelector")]
    pub field_selector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSource {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigRef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub external_id: String,
    pub labels: BTreeMap<String, String>,
    pub properties: Vec<Property>,
    pub status: EntityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<Selector>,
    pub configs: Vec<ConfigRef>,
    pub logs: Vec<LogSource>,
}

impl Entity {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn is_healthy(&self) -> bool {
        self.status == EntityStatus::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComponent {
    pub name: String,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub pass: bool,
    pub namespace: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub message: String,
    pub name: String,
}
