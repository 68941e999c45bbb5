use crate::types::{Envelope, MetricComponent, Property};
use super::base::PodMetricsItem;

/// One component per pod with CPU and memory usage summed over its containers.
pub fn build_pod_metrics(samples: &[Envelope<PodMetricsItem>]) -> Vec<MetricComponent> {
    samples
        .iter()
        .map(|sample| {
            let pod = &sample.object;
            let mut cpu = 0.0;
            let mut memory = 0.0;
            for c in &pod.containers {
                if let Some(mc) = c.usage.cpu_millicores() {
                    cpu += mc;
                }
                if let Some(bytes) = c.usage.memory_bytes() {
                    memory += bytes;
                }
            }
            MetricComponent {
                name: pod.metadata.name.clone().unwrap_or_default(),
                properties: vec![Property::value("cpu", Some(cpu)), Property::value("memory", Some(memory))],
            }
        })
        .collect()
}
