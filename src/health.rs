use k8s_openapi::api::core::v1::{Node, Pod};

use crate::types::{HealthChecked, HealthStatus};

pub const HEALTHY: &str = "Healthy";
pub const UNHEALTHY: &str = "Unhealthy";

/// Health of a pod as seen from its phase and `Ready` condition.
///
/// Succeeded pods are always healthy. Running pods are healthy unless their
/// `Ready` condition is `False`. Every other phase is unhealthy.
pub fn assess_pod_health(pod: &Pod) -> HealthStatus {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("");

    match phase {
        "Succeeded" => HealthStatus::new(HEALTHY, ""),
        "Running" => {
            let not_ready = status
                .and_then(|s| s.conditions.as_ref())
                .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready" && c.status == "False"));
            match not_ready {
                Some(c) => HealthStatus::new(
                    UNHEALTHY,
                    c.message.clone().or_else(|| c.reason.clone()).unwrap_or_else(|| "NotReady".to_string()),
                ),
                None => HealthStatus::new(HEALTHY, ""),
            }
        }
        "" => HealthStatus::new(UNHEALTHY, "phase unknown"),
        other => {
            let message = status
                .and_then(|s| s.message.clone().or_else(|| s.reason.clone()))
                .unwrap_or_else(|| other.to_string());
            HealthStatus::new(UNHEALTHY, message)
        }
    }
}

/// A node is healthy only while its `Ready` condition is `True`.
pub fn assess_node_health(node: &Node) -> HealthStatus {
    let ready = node
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"));

    match ready {
        Some(c) if c.status == "True" => HealthStatus::new(HEALTHY, ""),
        Some(c) => HealthStatus::new(
            UNHEALTHY,
            c.message.clone().or_else(|| c.reason.clone()).unwrap_or_else(|| "NotReady".to_string()),
        ),
        None => HealthStatus::new(UNHEALTHY, "no Ready condition reported"),
    }
}

pub fn check_pod(pod: Pod) -> HealthChecked<Pod> {
    let health = assess_pod_health(&pod);
    HealthChecked::new(pod, Some(health))
}

pub fn check_node(node: Node) -> HealthChecked<Node> {
    let health = assess_node_health(&node);
    HealthChecked::new(node, Some(health))
}
