// Metrics-API usage aggregation
pub mod pods;
pub mod nodes;
pub mod base;

// Re-export commonly used items
pub use pods::build_pod_metrics;
pub use nodes::build_node_metrics;
pub use base::{
    list_node_metrics_http, list_pod_metrics_http, ContainerMetrics, NodeMetricsItem, PodMetricsItem,
    ResourceUsage,
};
