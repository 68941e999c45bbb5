// Public modules
pub mod types;
pub mod config;
pub mod parsing;
pub mod conditions;
pub mod labels;
pub mod alerts;
pub mod topology;
pub mod metrics;
pub mod health;
pub mod kubernetes;
pub mod collector;
pub mod report;
pub mod ingest;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{parse_millicores, parse_bytes, RawQuantity};
pub use conditions::{is_ready, get_message, get_error_summary, health_summary, ConditionSource};
pub use labels::{normalize, filter_hashed, object_labels, LabelMap};
pub use alerts::{build_alert, build_alerts, derive_name, AlertIdentity, RawAlertLabels, IGNORED_KEYS};
pub use topology::{build_pod, build_node, node_short_name, pod_topology, node_topology, pod_resource_totals, PodResourceTotals, ResourceKind};
pub use metrics::{build_pod_metrics, build_node_metrics, PodMetricsItem, NodeMetricsItem};
pub use collector::{load_snapshot, ClusterSnapshot, SnapshotCollector, SnapshotError};
pub use report::{TopologyReport, ReportSummary};
pub use ingest::{render_report, send_to_ingest};
