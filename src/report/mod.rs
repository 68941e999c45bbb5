use serde::Serialize;

use crate::alerts::build_alerts;
use crate::collector::ClusterSnapshot;
use crate::metrics::{build_node_metrics, build_pod_metrics};
use crate::topology::{node_topology, pod_resource_totals, pod_topology, PodResourceTotals, ResourceKind};
use crate::types::{Alert, Entity, MetricComponent};

/// Everything produced from one snapshot, ready for ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    pub pods: Vec<Entity>,
    pub nodes: Vec<Entity>,
    pub pod_metrics: Vec<MetricComponent>,
    pub node_metrics: Vec<MetricComponent>,
    pub alerts: Vec<Alert>,
    /// Declared requests summed over every pod in the snapshot.
    pub requested: PodResourceTotals,
}

impl TopologyReport {
    pub fn from_snapshot(snapshot: &ClusterSnapshot, cluster: Option<String>) -> Self {
        let mut requested = PodResourceTotals::default();
        for pod in &snapshot.pods {
            requested.merge(&pod_resource_totals(&pod.object.object, ResourceKind::Requests));
        }

        Self {
            cluster,
            pods: pod_topology(&snapshot.pods),
            nodes: node_topology(&snapshot.nodes),
            pod_metrics: build_pod_metrics(&snapshot.pod_metrics),
            node_metrics: build_node_metrics(&snapshot.node_metrics),
            alerts: build_alerts(&snapshot.alerts),
            requested,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            pod_count: self.pods.len(),
            unhealthy_pod_count: self.pods.iter().filter(|p| !p.is_healthy()).count(),
            node_count: self.nodes.len(),
            unhealthy_node_count: self.nodes.iter().filter(|n| !n.is_healthy()).count(),
            metric_component_count: self.pod_metrics.len() + self.node_metrics.len(),
            alert_count: self.alerts.len(),
            failing_alert_count: self.alerts.iter().filter(|a| !a.pass).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub pod_count: usize,
    pub unhealthy_pod_count: usize,
    pub node_count: usize,
    pub unhealthy_node_count: usize,
    pub metric_component_count: usize,
    pub alert_count: usize,
    pub failing_alert_count: usize,
}

impl ReportSummary {
    pub fn total_entities(&self) -> usize {
        self.pod_count + self.node_count
    }

    pub fn total_issues(&self) -> usize {
        self.unhealthy_pod_count + self.unhealthy_node_count + self.failing_alert_count
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = TopologyReport::from_snapshot(&ClusterSnapshot::default(), None);
        let summary = report.summary();
        assert_eq!(summary.total_entities(), 0);
        assert!(!summary.has_issues());
        assert_eq!(report.requested, PodResourceTotals::default());
    }

    #[test]
    fn test_summary_counts() {
        let summary = ReportSummary {
            pod_count: 4,
            unhealthy_pod_count: 1,
            node_count: 2,
            unhealthy_node_count: 1,
            metric_component_count: 6,
            alert_count: 3,
            failing_alert_count: 2,
        };
        assert_eq!(summary.total_entities(), 6);
        assert_eq!(summary.total_issues(), 4);
        assert!(summary.has_issues());
    }
}
