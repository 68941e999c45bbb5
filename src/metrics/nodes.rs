use crate::types::{Envelope, MetricComponent, Property};
use super::base::NodeMetricsItem;

pub fn build_node_metrics(samples: &[Envelope<NodeMetricsItem>]) -> Vec<MetricComponent> {
    samples
        .iter()
        .map(|sample| {
            let node = &sample.object;
            MetricComponent {
                name: node.metadata.name.clone().unwrap_or_default(),
                properties: vec![
                    Property::value("cpu", node.usage.cpu_millicores()),
                    Property::value("memory", node.usage.memory_bytes()),
                ],
            }
        })
        .collect()
}
