use std::str::FromStr;

use crate::cluster::{CoreId, CoreSet};
use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct RotationConfig {
    // =========================
    // Topology
    // =========================
    /// Cluster layout in registration order, one cpulist per cluster.
    ///
    /// The first entry becomes the primary cluster.
    /// Env: `ROTATION_TOPOLOGY`, clusters separated by `;` (e.g. `0-3;4-7`).
    pub topology: Vec<CoreSet>,

    /// Representative (lowest) core the primary cluster is expected to have.
    ///
    /// When set, the startup pass logs an error if cluster 0 turns out to be
    /// a different cluster. Classification still follows registration order.
    pub primary_core: Option<CoreId>,

    // =========================
    // Window timing
    // =========================
    /// Length of one scheduling window in milliseconds.
    pub window_ms: u64,

    /// How often the ticker samples the window boundary.
    ///
    /// Sampling faster than `window_ms` means several notifications per
    /// window; the aggregator reports each window once.
    pub tick_ms: u64,

    // =========================
    // Logging
    // =========================
    /// JSON log output (production) instead of pretty output.
    pub json_logs: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            topology: vec![CoreSet::from([0, 1, 2, 3]), CoreSet::from([4, 5, 6, 7])],
            primary_core: None,
            window_ms: 20,
            tick_ms: 5,
            json_logs: false,
        }
    }
}

impl RotationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("ROTATION_TOPOLOGY") {
            cfg.topology = parse_topology(&v)?;
        }
        if let Some(v) = lookup("ROTATION_PRIMARY_CORE") {
            cfg.primary_core = Some(parse_value("ROTATION_PRIMARY_CORE", &v)?);
        }
        if let Some(v) = lookup("ROTATION_WINDOW_MS") {
            cfg.window_ms = parse_positive("ROTATION_WINDOW_MS", &v)?;
        }
        if let Some(v) = lookup("ROTATION_TICK_MS") {
            cfg.tick_ms = parse_positive("ROTATION_TICK_MS", &v)?;
        }
        if cfg.tick_ms > cfg.window_ms {
            return Err(ConfigError::InvalidValue {
                key: "ROTATION_TICK_MS",
                value: cfg.tick_ms.to_string(),
            });
        }
        cfg.json_logs = lookup("APP_ENV").is_some_and(|v| v == "production");

        Ok(cfg)
    }
}

fn parse_topology(v: &str) -> Result<Vec<CoreSet>, ConfigError> {
    v.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CoreSet::from_str)
        .collect()
}

fn parse_value<T: FromStr>(key: &'static str, v: &str) -> Result<T, ConfigError> {
    v.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: v.to_string(),
    })
}

fn parse_positive(key: &'static str, v: &str) -> Result<u64, ConfigError> {
    match parse_value::<u64>(key, v)? {
        0 => Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = RotationConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.topology.len(), 2);
        assert_eq!(cfg.window_ms, 20);
        assert_eq!(cfg.tick_ms, 5);
        assert_eq!(cfg.primary_core, None);
        assert!(!cfg.json_logs);
    }

    #[test]
    fn reads_all_keys() {
        let cfg = RotationConfig::from_lookup(lookup(&[
            ("ROTATION_TOPOLOGY", "0-5; 6-7 ;"),
            ("ROTATION_PRIMARY_CORE", "0"),
            ("ROTATION_WINDOW_MS", "16"),
            ("ROTATION_TICK_MS", "4"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(cfg.topology, vec![CoreSet::from([0, 1, 2, 3, 4, 5]), CoreSet::from([6, 7])]);
        assert_eq!(cfg.primary_core, Some(0));
        assert_eq!(cfg.window_ms, 16);
        assert_eq!(cfg.tick_ms, 4);
        assert!(cfg.json_logs);
    }

    #[test]
    fn rejects_bad_values() {
        let err = RotationConfig::from_lookup(lookup(&[("ROTATION_WINDOW_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "ROTATION_WINDOW_MS", .. }));

        let err = RotationConfig::from_lookup(lookup(&[("ROTATION_TOPOLOGY", "0-3;x")])).unwrap_err();
        assert_eq!(err, ConfigError::MalformedCpuList("x".to_string()));

        assert!(RotationConfig::from_lookup(lookup(&[("ROTATION_PRIMARY_CORE", "-1")])).is_err());
    }

    #[test]
    fn tick_longer_than_window_is_rejected() {
        let err = RotationConfig::from_lookup(lookup(&[
            ("ROTATION_WINDOW_MS", "10"),
            ("ROTATION_TICK_MS", "11"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "ROTATION_TICK_MS",
                value: "11".to_string()
            }
        );

        let cfg = RotationConfig::from_lookup(lookup(&[
            ("ROTATION_WINDOW_MS", "10"),
            ("ROTATION_TICK_MS", "10"),
        ]))
        .unwrap();
        assert_eq!(cfg.tick_ms, 10);
    }
}
