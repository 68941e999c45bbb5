use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::Serialize;
use tracing::debug;

use crate::labels::object_labels;
use crate::parsing::{parse_bytes, parse_millicores, RawQuantity};
use crate::types::{ConfigRef, Entity, HealthChecked, LogSource, Property, UNIT_BYTES, UNIT_MILLICORES};
use super::{entity_health, format_time};

pub const POD_ENTITY_TYPE: &str = "KubernetesPod";
pub const POD_CONFIG_TYPE: &str = "Kubernetes::Pod";

/// Builds the topology entity for one pod.
///
/// CPU and memory limits come from the first container only; a missing or
/// zero limit is reported as no upper bound.
pub fn build_pod(raw: &HealthChecked<Pod>) -> Entity {
    let pod = &raw.object;
    let name = pod.metadata.name.clone().unwrap_or_default();
    let namespace = pod.metadata.namespace.clone();
    let first: Option<&Container> = pod.spec.as_ref().and_then(|s| s.containers.first());

    let limits = first
        .and_then(|c| c.resources.as_ref())
        .and_then(|r| r.limits.as_ref());
    let cpu_limit = limits.and_then(|l| nonzero_limit(l, "cpu", parse_millicores));
    let memory_limit = limits.and_then(|l| nonzero_limit(l, "memory", parse_bytes));

    let version = first
        .and_then(|c| c.image.as_deref())
        .and_then(image_version);
    let node_name = pod.spec.as_ref().and_then(|s| s.node_name.clone());
    let created = pod.metadata.creation_timestamp.as_ref().map(format_time);
    let ip = pod
        .status
        .as_ref()
        .and_then(|s| s.pod_ips.as_ref())
        .and_then(|ips| ips.first())
        .and_then(|ip| ip.ip.clone())
        .unwrap_or_default();

    let (status, status_reason) = entity_health(raw);
    debug!("pod {}/{} is {:?}", namespace.as_deref().unwrap_or_default(), name, status);

    Entity {
        external_id: format!("{}/{}", namespace.as_deref().unwrap_or_default(), name),
        type_: POD_ENTITY_TYPE.to_string(),
        labels: object_labels(&pod.metadata),
        properties: vec![
            Property::text("version", version).headline(),
            Property::gauge("cpu", UNIT_MILLICORES).with_max(cpu_limit).headline(),
            Property::gauge("memory", UNIT_BYTES).with_max(memory_limit).headline(),
            Property::text("node", node_name),
            Property::text("created", created),
            Property::text("ip", Some(ip)),
        ],
        status,
        status_reason,
        selectors: Vec::new(),
        configs: vec![ConfigRef {
            name: name.clone(),
            type_: POD_CONFIG_TYPE.to_string(),
        }],
        logs: vec![LogSource {
            name: "Kubernetes".to_string(),
            type_: POD_ENTITY_TYPE.to_string(),
        }],
        name,
        namespace,
    }
}

fn nonzero_limit(
    limits: &BTreeMap<String, Quantity>,
    key: &str,
    parse: fn(&RawQuantity) -> Option<f64>,
) -> Option<f64> {
    let quantity = limits.get(key).map(RawQuantity::from).unwrap_or(RawQuantity::ZERO);
    parse(&quantity).filter(|v| *v != 0.0)
}

/// Everything after the first `:` of an image reference.
fn image_version(image: &str) -> Option<String> {
    image.split_once(':').map(|(_, tag)| tag.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Limits,
    Requests,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PodResourceTotals {
    pub cpu_millicores: Option<f64>,
    pub memory_bytes: Option<f64>,
}

impl PodResourceTotals {
    /// Adds another total; a side stays `None` only if neither declares it.
    pub fn merge(&mut self, other: &PodResourceTotals) {
        if let Some(cpu) = other.cpu_millicores {
            *self.cpu_millicores.get_or_insert(0.0) += cpu;
        }
        if let Some(mem) = other.memory_bytes {
            *self.memory_bytes.get_or_insert(0.0) += mem;
        }
    }
}

/// Sums declared CPU and memory across all containers of a pod.
pub fn pod_resource_totals(pod: &Pod, kind: ResourceKind) -> PodResourceTotals {
    let mut totals = PodResourceTotals::default();

    if let Some(spec) = pod.spec.as_ref() {
        for c in &spec.containers {
            let declared = c.resources.as_ref().and_then(|r| match kind {
                ResourceKind::Limits => r.limits.as_ref(),
                ResourceKind::Requests => r.requests.as_ref(),
            });
            let Some(declared) = declared else { continue };
            if let Some(mc) = declared.get("cpu").and_then(|q| parse_millicores(&RawQuantity::from(q))) {
                *totals.cpu_millicores.get_or_insert(0.0) += mc;
            }
            if let Some(bytes) = declared.get("memory").and_then(|q| parse_bytes(&RawQuantity::from(q))) {
                *totals.memory_bytes.get_or_insert(0.0) += bytes;
            }
        }
    }

    totals
}
