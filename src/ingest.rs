use anyhow::{anyhow, Context, Result};
use tracing::{error, info};

use crate::report::TopologyReport;

/// Pretty JSON form of a report, as written to stdout when no endpoint is configured.
pub fn render_report(report: &TopologyReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize topology report")
}

pub async fn send_to_ingest(ingest_url: &str, report: &TopologyReport) -> Result<()> {
    let client = reqwest::Client::new();
    let res = client
        .post(ingest_url)
        .json(report)
        .send()
        .await
        .context("Failed to send ingest request")?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        error!("Ingest endpoint failed: {} - {}", status, body);
        return Err(anyhow!("Ingest endpoint returned non-success status"));
    }
    info!("Submitted {} pods and {} nodes", report.pods.len(), report.nodes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ClusterSnapshot;

    fn empty_report() -> TopologyReport {
        TopologyReport::from_snapshot(&ClusterSnapshot::default(), Some("test-cluster".to_string()))
    }

    #[test]
    fn test_render_report() {
        let rendered = render_report(&empty_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["cluster"], "test-cluster");
        assert!(value["pods"].as_array().unwrap().is_empty());
        assert!(value["alerts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_ingest_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ingest")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(r#"{"cluster": "test-cluster"}"#.to_string()))
            .with_status(202)
            .create_async()
            .await;

        let url = format!("{}/ingest", server.url());
        send_to_ingest(&url, &empty_report()).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_send_to_ingest_rejected() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/ingest")
            .with_status(500)
            .with_body("boom")
            .create();

        let url = format!("{}/ingest", server.url());
        let result = tokio_test::block_on(send_to_ingest(&url, &empty_report()));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("non-success"));
        mock.assert();
    }
}
