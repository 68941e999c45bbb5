use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub type LabelMap = BTreeMap<String, String>;

const LABEL_PREFIX: &str = "label_";
const KEY_REWRITES: &[(&str, &str)] = &[("apps_kubernetes_io_", "apps/kubernetes.io/")];
const HASH_SUFFIX: &str = "-hash";

fn rewrite_key(key: &str) -> String {
    let mut key = key.strip_prefix(LABEL_PREFIX).unwrap_or(key).to_string();
    for (from, to) in KEY_REWRITES {
        key = key.replacen(from, to, 1);
    }
    key
}

/// Canonicalizes an exporter label set into a new map.
///
/// `namespace` falls back to `exported_namespace`, `instance` is taken from
/// `exported_instance` (and dropped when that is absent), then every key loses
/// its `label_` prefix and has `apps_kubernetes_io_` spelled out as
/// `apps/kubernetes.io/`. The input is never modified.
pub fn normalize<V: Clone>(raw: &BTreeMap<String, V>) -> BTreeMap<String, V> {
    let mut source = raw.clone();
    let exported_namespace = source.remove("exported_namespace");
    let exported_instance = source.remove("exported_instance");

    if !source.contains_key("namespace") {
        if let Some(namespace) = exported_namespace {
            source.insert("namespace".to_string(), namespace);
        }
    }
    source.remove("instance");
    if let Some(instance) = exported_instance {
        source.insert("instance".to_string(), instance);
    }

    source
        .into_iter()
        .map(|(k, v)| (rewrite_key(&k), v))
        .collect()
}

/// Drops churn labels such as `pod-template-hash`.
pub fn filter_hashed(labels: &LabelMap) -> LabelMap {
    labels
        .iter()
        .filter(|(k, _)| !k.ends_with(HASH_SUFFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Grouping labels for an object: hash labels removed, `namespace` added when set.
pub fn object_labels(meta: &ObjectMeta) -> LabelMap {
    let mut labels = meta
        .labels
        .as_ref()
        .map(filter_hashed)
        .unwrap_or_default();
    if let Some(ns) = meta.namespace.as_ref() {
        labels.insert("namespace".to_string(), ns.clone());
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> LabelMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_normalize_rewrites_keys() {
        let out = normalize(&map(&[("label_team", "x"), ("apps_kubernetes_io_name", "y")]));
        assert_eq!(out, map(&[("team", "x"), ("apps/kubernetes.io/name", "y")]));

        let out = normalize(&map(&[("label_apps_kubernetes_io_instance", "web")]));
        assert_eq!(out, map(&[("apps/kubernetes.io/instance", "web")]));
    }

    #[test]
    fn test_normalize_resolves_namespace_and_instance() {
        let raw = map(&[
            ("exported_namespace", "monitoring"),
            ("exported_instance", "10.0.0.1:9100"),
            ("instance", "prometheus:9090"),
        ]);
        let out = normalize(&raw);
        assert_eq!(out, map(&[("namespace", "monitoring"), ("instance", "10.0.0.1:9100")]));

        // An explicit namespace wins over the exported one
        let out = normalize(&map(&[("namespace", "prod"), ("exported_namespace", "other")]));
        assert_eq!(out, map(&[("namespace", "prod")]));

        // Without exported_instance the scrape instance is not kept
        let out = normalize(&map(&[("instance", "prometheus:9090"), ("pod", "a")]));
        assert_eq!(out, map(&[("pod", "a")]));
    }

    #[test]
    fn test_normalize_leaves_input_untouched() {
        let raw = map(&[("exported_namespace", "ns"), ("label_team", "x")]);
        let before = raw.clone();
        let _ = normalize(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_filter_hashed() {
        let out = filter_hashed(&map(&[("a", "1"), ("pod-template-hash", "2"), ("controller-revision-hash", "3")]));
        assert_eq!(out, map(&[("a", "1")]));
    }

    #[test]
    fn test_object_labels() {
        let meta = ObjectMeta {
            namespace: Some("default".to_string()),
            labels: Some(map(&[("app", "web"), ("pod-template-hash", "abc")])),
            ..Default::default()
        };
        assert_eq!(object_labels(&meta), map(&[("app", "web"), ("namespace", "default")]));

        assert!(object_labels(&ObjectMeta::default()).is_empty());
    }
}
