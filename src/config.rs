use anyhow::{anyhow, Result};
use std::collections::HashMap;
use crate::types::Config;

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }
    
    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }
    
    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    // Empty means every namespace
    let namespaces: Vec<String> = env
        .get_var("NAMESPACES")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let snapshot_path = non_empty(env.get_var("SNAPSHOT_PATH"));
    let ingest_url = non_empty(env.get_var("INGEST_URL"));
    if let Some(url) = ingest_url.as_ref() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!("INGEST_URL must be an http(s) URL, got {}", url));
        }
    }
    let cluster_name = non_empty(env.get_var("CLUSTER_NAME"));

    let include_metrics = parse_flag(env.get_var("INCLUDE_METRICS"), true);
    let fail_if_no_metrics = parse_flag(env.get_var("FAIL_IF_NO_METRICS"), false);

    Ok(Config {
        snapshot_path,
        namespaces,
        ingest_url,
        cluster_name,
        include_metrics,
        fail_if_no_metrics,
    })
}
