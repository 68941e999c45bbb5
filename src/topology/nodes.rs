use k8s_openapi::api::core::v1::{Node, NodeAddress};
use serde_json::Value;
use tracing::debug;

use crate::labels::filter_hashed;
use crate::parsing::{parse_bytes, parse_millicores, RawQuantity};
use crate::types::{ConfigRef, Entity, HealthChecked, LogSource, Property, Selector, UNIT_BYTES, UNIT_MILLICORES};
use super::entity_health;

pub const NODE_ENTITY_TYPE: &str = "KubernetesNode";
pub const NODE_CONFIG_TYPE: &str = "Kubernetes::Node";

const INSTANCE_TYPE_LABEL: &str = "beta.kubernetes.io/instance-type";
const ZONE_LABEL: &str = "topology.kubernetes.io/zone";
const AMI_LABEL: &str = "eks.amazonaws.com/nodegroup-image";

// nodeInfo fields that are either identifiers or already folded into `os`.
const SKIPPED_NODE_INFO: &[&str] = &[
    "bootID",
    "machineID",
    "systemUUID",
    "architecture",
    "operatingSystem",
    "osImage",
];

pub fn build_node(raw: &HealthChecked<Node>) -> Entity {
    let node = &raw.object;
    let name = node.metadata.name.clone().unwrap_or_default();
    let labels = node.metadata.labels.clone().unwrap_or_default();
    let status = node.status.as_ref();

    let allocatable = |key: &str| {
        status
            .and_then(|s| s.allocatable.as_ref())
            .and_then(|a| a.get(key))
            .map(RawQuantity::from)
            .unwrap_or(RawQuantity::ZERO)
    };
    let label = |key: &str| labels.get(key).cloned();

    let mut properties = vec![
        Property::gauge("cpu", UNIT_MILLICORES)
            .with_min(Some(0.0))
            .with_max(parse_millicores(&allocatable("cpu")))
            .headline(),
        Property::gauge("memory", UNIT_BYTES)
            .with_max(parse_bytes(&allocatable("memory")))
            .headline(),
        Property::gauge("ephemeral-storage", UNIT_BYTES).with_max(parse_bytes(&allocatable("ephemeral-storage"))),
        Property::text("instance-type", label(INSTANCE_TYPE_LABEL)),
        Property::text("zone", label(ZONE_LABEL)),
        Property::text("ami", label(AMI_LABEL)),
    ];

    let addresses: &[NodeAddress] = status
        .and_then(|s| s.addresses.as_deref())
        .unwrap_or_default();
    if let Some(internal) = first_address(addresses, "InternalIP") {
        properties.push(Property::text("ip", Some(internal)));
    }
    if let Some(external) = first_address(addresses, "ExternalIP") {
        properties.push(Property::text("externalIp", Some(external)));
    }

    let node_info = status.and_then(|s| s.node_info.as_ref());
    properties.push(Property::text(
        "os",
        node_info.map(|info| format!("{}({})", info.os_image, info.architecture)),
    ));

    // Remaining nodeInfo fields, named without their `Version` suffix
    if let Some(Ok(Value::Object(fields))) = node_info.map(serde_json::to_value) {
        for (key, value) in fields {
            if SKIPPED_NODE_INFO.contains(&key.as_str()) {
                continue;
            }
            let prop_name = key.strip_suffix("Version").unwrap_or(&key);
            if properties.iter().any(|p| p.name() == prop_name) {
                debug!("node {} already has a {} property", name, prop_name);
                continue;
            }
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            properties.push(Property::text(prop_name, Some(text)));
        }
    }

    let (status, status_reason) = entity_health(raw);
    debug!("node {} is {:?}", name, status);

    Entity {
        external_id: name.clone(),
        namespace: None,
        type_: NODE_ENTITY_TYPE.to_string(),
        labels: filter_hashed(&labels),
        properties,
        status,
        status_reason,
        selectors: vec![Selector {
            name: String::new(),
            label_selector: String::new(),
            field_selector: format!("node={}", name),
        }],
        configs: vec![ConfigRef {
            name: name.clone(),
            type_: NODE_CONFIG_TYPE.to_string(),
        }],
        logs: vec![LogSource {
            name: "Kubernetes".to_string(),
            type_: NODE_ENTITY_TYPE.to_string(),
        }],
        name,
    }
}

/// Host part of a node name: everything before the first `.`.
pub fn node_short_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn first_address(addresses: &[NodeAddress], type_: &str) -> Option<String> {
    addresses
        .iter()
        .find(|a| a.type_ == type_)
        .map(|a| a.address.clone())
}
