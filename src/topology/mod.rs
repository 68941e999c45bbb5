// Topology entity builders
pub mod pods;
pub mod nodes;

use chrono::SecondsFormat;
use k8s_openapi::api::core::v1::{Node, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use crate::conditions::{get_message, is_ready};
use crate::types::{Entity, EntityStatus, Envelope, HealthChecked};

pub use pods::{build_pod, pod_resource_totals, PodResourceTotals, ResourceKind};
pub use nodes::{build_node, node_short_name};

pub fn pod_topology(results: &[Envelope<HealthChecked<Pod>>]) -> Vec<Entity> {
    results.iter().map(|r| build_pod(&r.object)).collect()
}

pub fn node_topology(results: &[Envelope<HealthChecked<Node>>]) -> Vec<Entity> {
    results.iter().map(|r| build_node(&r.object)).collect()
}

/// Entity status from the attached health check; the reason is only set when unhealthy.
fn entity_health<K>(obj: &HealthChecked<K>) -> (EntityStatus, Option<String>) {
    if is_ready(obj) {
        (EntityStatus::Healthy, None)
    } else {
        (EntityStatus::Unhealthy, Some(get_message(obj)))
    }
}

fn format_time(t: &Time) -> String {
    t.0.to_rfc3339_opts(SecondsFormat::Secs, true)
}
