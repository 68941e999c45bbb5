use std::path::Path;

use anyhow::Result;
use kube::Client;
use tracing::{info, warn};

use kube_topology_mapper::{
    load_config, load_snapshot, render_report, send_to_ingest, ClusterSnapshot, SnapshotCollector, TopologyReport,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;

    let snapshot: ClusterSnapshot = match cfg.snapshot_path.as_deref() {
        Some(path) => {
            info!("Mapping snapshot file {}", path);
            load_snapshot(Path::new(path))?
        }
        None => {
            info!("namespaces = {:?}", cfg.namespaces);
            let client = Client::try_default().await?;
            SnapshotCollector::new(&client, &cfg).collect().await?
        }
    };

    let report = TopologyReport::from_snapshot(&snapshot, cfg.cluster_name.clone());

    let summary = report.summary();
    info!(
        "Mapped {} entities, {} metric components, {} alerts",
        summary.total_entities(),
        summary.metric_component_count,
        summary.alert_count
    );
    if summary.has_issues() {
        warn!(
            "{} unhealthy pods, {} unhealthy nodes, {} failing alerts",
            summary.unhealthy_pod_count, summary.unhealthy_node_count, summary.failing_alert_count
        );
    }

    match cfg.ingest_url.as_deref() {
        Some(url) => send_to_ingest(url, &report).await?,
        None => println!("{}", render_report(&report)?),
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
