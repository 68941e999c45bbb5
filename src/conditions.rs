use chrono::{DateTime, SecondsFormat, Utc};
use k8s_openapi::api::core::v1::{Node, NodeCondition, Pod, PodCondition};

use crate::types::{HealthChecked, HealthStatus};

pub const NO_STATUS: &str = "No status found";
pub const NO_CONDITIONS: &str = "no conditions found";

/// A status condition, independent of the object kind it was reported on.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub type_: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl From<&PodCondition> for Condition {
    fn from(c: &PodCondition) -> Self {
        Self {
            type_: c.type_.clone(),
            status: c.status.clone(),
            reason: c.reason.clone(),
            message: c.message.clone(),
            last_transition_time: c.last_transition_time.as_ref().map(|t| t.0),
        }
    }
}

impl From<&NodeCondition> for Condition {
    fn from(c: &NodeCondition) -> Self {
        Self {
            type_: c.type_.clone(),
            status: c.status.clone(),
            reason: c.reason.clone(),
            message: c.message.clone(),
            last_transition_time: c.last_transition_time.as_ref().map(|t| t.0),
        }
    }
}

/// What an object reports about its conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionLookup {
    NoStatus,
    NoConditions,
    Found(Vec<Condition>),
}

pub trait ConditionSource {
    fn condition_lookup(&self) -> ConditionLookup;
}

impl ConditionSource for Pod {
    fn condition_lookup(&self) -> ConditionLookup {
        match self.status.as_ref() {
            None => ConditionLookup::NoStatus,
            Some(status) => match status.conditions.as_ref() {
                None => ConditionLookup::NoConditions,
                Some(conditions) => ConditionLookup::Found(conditions.iter().map(Condition::from).collect()),
            },
        }
    }
}

impl ConditionSource for Node {
    fn condition_lookup(&self) -> ConditionLookup {
        match self.status.as_ref() {
            None => ConditionLookup::NoStatus,
            Some(status) => match status.conditions.as_ref() {
                None => ConditionLookup::NoConditions,
                Some(conditions) => ConditionLookup::Found(conditions.iter().map(Condition::from).collect()),
            },
        }
    }
}

impl<K: ConditionSource> ConditionSource for HealthChecked<K> {
    fn condition_lookup(&self) -> ConditionLookup {
        self.object.condition_lookup()
    }
}

/// Ready iff the attached health status reads `healthy` in any letter case.
/// A missing health status is never ready.
pub fn is_ready<K>(obj: &HealthChecked<K>) -> bool {
    obj.health_status
        .as_ref()
        .map(|h| h.status.to_lowercase() == "healthy")
        .unwrap_or(false)
}

pub fn get_message<K>(obj: &HealthChecked<K>) -> String {
    obj.health_status
        .as_ref()
        .map(|h| h.message.trim().to_string())
        .unwrap_or_default()
}

/// One-line `"<status>: <message>"` form of a health status.
pub fn health_summary(health: &HealthStatus) -> String {
    format!("{}: {}", health.status, health.message.trim())
}

/// Diagnostic rendering of every `False` condition, oldest transition first.
pub fn get_error_summary<S: ConditionSource + ?Sized>(obj: &S) -> String {
    let conditions = match obj.condition_lookup() {
        ConditionLookup::NoStatus => return NO_STATUS.to_string(),
        ConditionLookup::NoConditions => return NO_CONDITIONS.to_string(),
        ConditionLookup::Found(conditions) => conditions,
    };

    let mut active: Vec<Condition> = conditions
        .into_iter()
        .filter(|c| c.status == "False")
        .collect();
    active.sort_by_key(|c| c.last_transition_time);

    active
        .iter()
        .map(|c| {
            let time = c
                .last_transition_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            let mut line = format!("{}: {} is {}", time, c.type_, c.reason.as_deref().unwrap_or_default());
            if let Some(message) = c.message.as_ref() {
                line.push_str(" with ");
                line.push_str(message);
            }
            line
        })
        .collect::<Vec<_>>()
        .join(", ")
}
