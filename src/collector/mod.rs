use std::path::{Path, PathBuf};

use anyhow::Result;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alerts::RawAlertLabels;
use crate::conditions::health_summary;
use crate::health::{check_node, check_pod};
use crate::kubernetes::{list_nodes, list_pods};
use crate::metrics::{self, NodeMetricsItem, PodMetricsItem};
use crate::types::{Config, Envelope, HealthChecked};

/// Every raw batch the mappers consume, as fetched at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub pods: Vec<Envelope<HealthChecked<Pod>>>,
    #[serde(default)]
    pub nodes: Vec<Envelope<HealthChecked<Node>>>,
    #[serde(default, rename = "podMetrics")]
    pub pod_metrics: Vec<Envelope<PodMetricsItem>>,
    #[serde(default, rename = "nodeMetrics")]
    pub node_metrics: Vec<Envelope<NodeMetricsItem>>,
    #[serde(default)]
    pub alerts: Vec<RawAlertLabels>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_snapshot(path: &Path) -> Result<ClusterSnapshot, SnapshotError> {
    let data = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetches a snapshot from a live cluster and attaches health verdicts.
pub struct SnapshotCollector<'a> {
    client: &'a Client,
    config: &'a Config,
}

impl<'a> SnapshotCollector<'a> {
    pub fn new(client: &'a Client, config: &'a Config) -> Self {
        Self { client, config }
    }

    pub async fn collect(&self) -> Result<ClusterSnapshot> {
        let pods = list_pods(self.client, &self.config.namespaces).await?;
        let nodes = list_nodes(self.client).await?;
        info!("Listed {} pods and {} nodes", pods.len(), nodes.len());

        let pods: Vec<Envelope<HealthChecked<Pod>>> = pods.into_iter().map(check_pod).map(Envelope::from).collect();
        let nodes: Vec<Envelope<HealthChecked<Node>>> = nodes.into_iter().map(check_node).map(Envelope::from).collect();
        for checked in pods.iter().map(|p| &p.object) {
            if let Some(health) = checked.health_status.as_ref() {
                debug!("pod {:?} {}", checked.object.metadata.name, health_summary(health));
            }
        }

        let (pod_metrics, node_metrics) = if self.config.include_metrics {
            self.collect_metrics().await?
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(ClusterSnapshot {
            pods,
            nodes,
            pod_metrics,
            node_metrics,
            alerts: Vec::new(),
        })
    }

    /// Metrics are optional unless `fail_if_no_metrics` is set.
    async fn collect_metrics(&self) -> Result<(Vec<Envelope<PodMetricsItem>>, Vec<Envelope<NodeMetricsItem>>)> {
        let listed = metrics::list_node_metrics_http(self.client).await;
        let Some(node_metrics) = tolerate_unavailable(listed, self.config.fail_if_no_metrics)? else {
            return Ok((Vec::new(), Vec::new()));
        };

        let mut pod_metrics = Vec::new();
        if self.config.namespaces.is_empty() {
            pod_metrics = metrics::list_pod_metrics_http(self.client, None).await?;
        } else {
            for ns in &self.config.namespaces {
                pod_metrics.extend(metrics::list_pod_metrics_http(self.client, Some(ns)).await?);
            }
        }

        Ok((pod_metrics, node_metrics))
    }
}

/// A failed metrics listing is fatal only when metrics are required.
fn tolerate_unavailable<T>(listed: Result<Vec<T>>, required: bool) -> Result<Option<Vec<T>>> {
    match listed {
        Ok(items) => Ok(Some(items)),
        Err(e) if required => Err(e),
        Err(e) => {
            warn!("node metrics unavailable: {}", e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::is_ready;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "pods": [
            {"Object": {
                "apiVersion": "v1",
                "kind": "Pod",
                "metadata": {"name": "web-0", "namespace": "default"},
                "spec": {"containers": [{"name": "web", "image": "nginx:1.25"}]},
                "healthStatus": {"status": "Healthy", "message": ""}
            }}
        ],
        "nodes": [
            {"Object": {
                "metadata": {"name": "node-a"},
                "status": {"allocatable": {"cpu": "4", "memory": "16Gi"}},
                "healthStatus": {"status": "Unhealthy", "message": "KubeletNotReady"}
            }}
        ],
        "nodeMetrics": [
            {"Object": {"metadata": {"name": "node-a"}, "usage": {"cpu": "900m", "memory": "2Gi"}}}
        ],
        "alerts": [
            {"alertname": "KubeNodeNotReady", "node": "node-a", "severity": "warning"}
        ]
    }"#;

    #[test]
    fn test_load_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.pods.len(), 1);
        assert_eq!(snapshot.pods[0].object.object.metadata.name.as_deref(), Some("web-0"));
        assert!(is_ready(&snapshot.pods[0].object));
        assert_eq!(snapshot.nodes.len(), 1);
        assert!(!is_ready(&snapshot.nodes[0].object));
        assert!(snapshot.pod_metrics.is_empty());
        assert_eq!(snapshot.node_metrics.len(), 1);
        assert_eq!(snapshot.alerts.len(), 1);
    }

    #[test]
    fn test_tolerate_unavailable() {
        let listed: Result<Vec<u8>> = Ok(vec![1, 2]);
        assert_eq!(tolerate_unavailable(listed, true).unwrap(), Some(vec![1, 2]));

        let missing = || -> Result<Vec<u8>> { Err(anyhow::anyhow!("the server could not find the requested resource")) };
        assert_eq!(tolerate_unavailable(missing(), false).unwrap(), None);

        let err = tolerate_unavailable(missing(), true).unwrap_err();
        assert!(err.to_string().contains("could not find"));
    }

    #[test]
    fn test_load_snapshot_errors() {
        let missing = load_snapshot(Path::new("/nonexistent/snapshot.json"));
        assert!(matches!(missing, Err(SnapshotError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
        assert!(err.to_string().contains("invalid snapshot"));
    }
}
