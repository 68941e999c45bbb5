use anyhow::{anyhow, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::parsing::{parse_bytes, parse_millicores, RawQuantity};
use crate::types::Envelope;

/// `usage` block of a metrics-API sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceUsage {
    #[serde(default)]
    pub cpu: Option<RawQuantity>,
    #[serde(default)]
    pub memory: Option<RawQuantity>,
}

impl ResourceUsage {
    pub fn cpu_millicores(&self) -> Option<f64> {
        let zero = RawQuantity::ZERO;
        let q = self.cpu.as_ref().unwrap_or(&zero);
        let parsed = parse_millicores(q);
        if parsed.is_none() {
            warn!("unparseable cpu usage {:?}", q);
        }
        parsed
    }

    pub fn memory_bytes(&self) -> Option<f64> {
        let zero = RawQuantity::ZERO;
        let q = self.memory.as_ref().unwrap_or(&zero);
        let parsed = parse_bytes(q);
        if parsed.is_none() {
            warn!("unparseable memory usage {:?}", q);
        }
        parsed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerMetrics {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub usage: ResourceUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodMetricsItem {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub containers: Vec<ContainerMetrics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetricsItem {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub usage: ResourceUsage,
}

#[derive(Debug, Deserialize)]
struct MetricsList<T> {
    items: Vec<T>,
}

async fn list_metrics_http<T: DeserializeOwned>(client: &Client, path: &str) -> Result<Vec<Envelope<T>>> {
    use http::Request as HttpRequest;
    let req = HttpRequest::builder()
        .method("GET")
        .uri(path)
        .body(Vec::new())
        .map_err(|e| anyhow!("build request: {}", e))?;
    let list: MetricsList<T> = client.request(req).await?;
    Ok(list.items.into_iter().map(Envelope::from).collect())
}

/// Pod usage samples for one namespace, or the whole cluster when `namespace` is `None`.
pub async fn list_pod_metrics_http(client: &Client, namespace: Option<&str>) -> Result<Vec<Envelope<PodMetricsItem>>> {
    let path = match namespace {
        Some(ns) => format!("/apis/metrics.k8s.io/v1beta1/namespaces/{}/pods", ns),
        None => "/apis/metrics.k8s.io/v1beta1/pods".to_string(),
    };
    list_metrics_http(client, &path).await
}

pub async fn list_node_metrics_http(client: &Client) -> Result<Vec<Envelope<NodeMetricsItem>>> {
    list_metrics_http(client, "/apis/metrics.k8s.io/v1beta1/nodes").await
}
