use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::labels::{normalize, LabelMap};
use crate::types::Alert;

/// A flat Alertmanager label set as scraped: values are usually strings but
/// may be any JSON scalar.
pub type RawAlertLabels = BTreeMap<String, Value>;

/// Labels that describe the alert rule rather than the affected object.
pub const IGNORED_KEYS: &[&str] = &[
    "severity",
    "job",
    "alertname",
    "alertstate",
    "__name__",
    "value",
    "namespace",
];

const CERT_MANAGER_INVALID_CERTIFICATE: &str = "CertManagerInvalidCertificate";
const CERT_MANAGER_DROPPED_KEYS: &[&str] = &["condition", "container", "endpoint", "instance", "service", "pod"];

pub fn is_ignored(key: &str) -> bool {
    IGNORED_KEYS.contains(&key)
}

#[derive(Debug, Clone, Copy)]
enum AlertMatch {
    Prefix(&'static str),
    Exact(&'static str),
}

impl AlertMatch {
    fn matches(&self, alertname: &str) -> bool {
        match self {
            AlertMatch::Prefix(p) => alertname.starts_with(p),
            AlertMatch::Exact(e) => alertname == *e,
        }
    }
}

// Evaluated in order; the first match decides which label names the subject.
const ALERT_SUBJECTS: &[(AlertMatch, &str)] = &[
    (AlertMatch::Prefix("KubeDeployment"), "deployment"),
    (AlertMatch::Prefix("KubePod"), "pod"),
    (AlertMatch::Prefix("ExcessivePod"), "pod"),
    (AlertMatch::Prefix("KubeDaemonSet"), "daemonset"),
    (AlertMatch::Exact(CERT_MANAGER_INVALID_CERTIFICATE), "name"),
    (AlertMatch::Prefix("KubeStatefulSet"), "statefulset"),
    (AlertMatch::Prefix("Node"), "node"),
    (AlertMatch::Prefix("KubeNode"), "node"),
];

/// Stable identity of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertIdentity {
    /// `alertname/subject`, where subject names the affected object.
    Qualified { alertname: String, subject: String },
    /// No known taxonomy entry applies; the rule name alone.
    Bare(String),
}

impl fmt::Display for AlertIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertIdentity::Qualified { alertname, subject } => write!(f, "{}/{}", alertname, subject),
            AlertIdentity::Bare(alertname) => f.write_str(alertname),
        }
    }
}

pub fn identify(labels: &LabelMap) -> AlertIdentity {
    let alertname = labels.get("alertname").cloned().unwrap_or_default();
    let subject_key = ALERT_SUBJECTS
        .iter()
        .find(|(m, _)| m.matches(&alertname))
        .map(|(_, key)| *key);

    match subject_key.and_then(|key| labels.get(key)) {
        Some(subject) => AlertIdentity::Qualified {
            alertname,
            subject: subject.clone(),
        },
        None => {
            debug!("alert {:?} has no subject label, using bare name", alertname);
            AlertIdentity::Bare(alertname)
        }
    }
}

pub fn derive_name(labels: &LabelMap) -> String {
    identify(labels).to_string()
}

fn label_value_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn build_alert(raw: &RawAlertLabels) -> Alert {
    let mut labels: LabelMap = normalize(raw)
        .into_iter()
        .map(|(k, v)| (k, label_value_string(&v)))
        .collect();

    if labels.get("alertname").map(String::as_str) == Some(CERT_MANAGER_INVALID_CERTIFICATE) {
        for key in CERT_MANAGER_DROPPED_KEYS {
            labels.remove(*key);
        }
    }

    let display: LabelMap = labels
        .iter()
        .filter(|(k, _)| !is_ignored(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let message = display
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");

    Alert {
        pass: labels.get("severity").map(String::as_str) == Some("none"),
        namespace: labels.get("namespace").cloned(),
        name: derive_name(&labels),
        labels: display,
        message,
    }
}

pub fn build_alerts(results: &[RawAlertLabels]) -> Vec<Alert> {
    results.iter().map(build_alert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(pairs: &[(&str, &str)]) -> LabelMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn raw(value: Value) -> RawAlertLabels {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_derive_name_taxonomy() {
        let cases = [
            (labels(&[("alertname", "KubeDeploymentReplicasMismatch"), ("deployment", "foo")]), "KubeDeploymentReplicasMismatch/foo"),
            (labels(&[("alertname", "KubePodCrashLooping"), ("pod", "api-0")]), "KubePodCrashLooping/api-0"),
            (labels(&[("alertname", "ExcessivePodRestarts"), ("pod", "api-1")]), "ExcessivePodRestarts/api-1"),
            (labels(&[("alertname", "KubeDaemonSetRolloutStuck"), ("daemonset", "fluentd")]), "KubeDaemonSetRolloutStuck/fluentd"),
            (labels(&[("alertname", "CertManagerInvalidCertificate"), ("name", "tls")]), "CertManagerInvalidCertificate/tls"),
            (labels(&[("alertname", "KubeStatefulSetReplicasMismatch"), ("statefulset", "db")]), "KubeStatefulSetReplicasMismatch/db"),
            (labels(&[("alertname", "NodeFilesystemAlmostOutOfSpace"), ("node", "n1")]), "NodeFilesystemAlmostOutOfSpace/n1"),
            (labels(&[("alertname", "KubeNodeNotReady"), ("node", "n2")]), "KubeNodeNotReady/n2"),
        ];
        for (input, expected) in cases {
            assert_eq!(derive_name(&input), expected);
        }
    }

    #[test]
    fn test_derive_name_fallback() {
        let input = labels(&[("alertname", "Watchdog"), ("pod", "x")]);
        assert_eq!(identify(&input), AlertIdentity::Bare("Watchdog".to_string()));
        assert_eq!(derive_name(&input), "Watchdog");

        // Exact match only for cert-manager
        let input = labels(&[("alertname", "CertManagerInvalidCertificateSoon"), ("name", "tls")]);
        assert_eq!(derive_name(&input), "CertManagerInvalidCertificateSoon");

        // Matched rule without its subject label
        let input = labels(&[("alertname", "KubePodNotReady")]);
        assert_eq!(derive_name(&input), "KubePodNotReady");
    }

    #[test]
    fn test_build_alert() {
        let alert = build_alert(&raw(json!({
            "alertname": "KubePodCrashLooping",
            "severity": "warning",
            "job": "kube-state-metrics",
            "exported_namespace": "payments",
            "exported_instance": "10.0.0.5:8080",
            "instance": "ksm:8080",
            "pod": "api-0",
            "label_team": "core",
            "value": 3
        })));

        assert!(!alert.pass);
        assert_eq!(alert.namespace.as_deref(), Some("payments"));
        assert_eq!(alert.name, "KubePodCrashLooping/api-0");
        assert_eq!(
            alert.labels,
            labels(&[("instance", "10.0.0.5:8080"), ("pod", "api-0"), ("team", "core")])
        );
        assert_eq!(alert.message, "instance=10.0.0.5:8080 pod=api-0 team=core");
    }

    #[test]
    fn test_build_alert_severity_none_passes() {
        let alert = build_alert(&raw(json!({
            "alertname": "Watchdog",
            "severity": "none",
            "namespace": "monitoring"
        })));
        assert!(alert.pass);
        assert_eq!(alert.name, "Watchdog");
        assert!(alert.labels.is_empty());
        assert_eq!(alert.message, "");
    }

    #[test]
    fn test_build_alert_cert_manager_drops_scrape_labels() {
        let alert = build_alert(&raw(json!({
            "alertname": "CertManagerInvalidCertificate",
            "severity": "critical",
            "namespace": "ingress",
            "name": "wildcard-tls",
            "condition": "False",
            "container": "cert-manager",
            "endpoint": "http-metrics",
            "exported_instance": "10.1.1.1:9402",
            "service": "cert-manager",
            "pod": "cert-manager-abc"
        })));

        assert_eq!(alert.name, "CertManagerInvalidCertificate/wildcard-tls");
        assert_eq!(alert.labels, labels(&[("name", "wildcard-tls")]));
        assert_eq!(alert.message, "name=wildcard-tls");
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let alert = build_alert(&raw(json!({
            "alertname": "Custom",
            "replicas": 3,
            "enabled": true
        })));
        assert_eq!(alert.labels, labels(&[("enabled", "true"), ("replicas", "3")]));
        assert_eq!(alert.namespace, None);
    }

    #[test]
    fn test_build_alerts_batch() {
        let alerts = build_alerts(&[
            raw(json!({"alertname": "KubeNodeNotReady", "node": "n1", "severity": "critical"})),
            raw(json!({"alertname": "Watchdog", "severity": "none"})),
        ]);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].name, "KubeNodeNotReady/n1");
        assert!(alerts[1].pass);
    }
}
