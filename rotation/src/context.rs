//! Process-wide rotation state.
//!
//! The context owns the cluster registry and publishes it exactly once.
//! Publishing the registry is the readiness signal: until
//! [`RotationContext::initialize`] has completed, [`RotationContext::registry`]
//! returns `None` and window aggregation is skipped.

use std::sync::OnceLock;

use tracing::{error, info, instrument, warn};

use crate::cluster::{ClusterRegistry, CoreId, TopologySource};
use crate::error::RegistryError;
use crate::metrics::counters::Counters;

#[derive(Debug, Default)]
pub struct RotationContext {
    registry: OnceLock<ClusterRegistry>,
    counters: Counters,
}

impl RotationContext {
    pub fn new(counters: Counters) -> Self {
        Self {
            registry: OnceLock::new(),
            counters,
        }
    }

    /// One-shot startup pass over the topology.
    ///
    /// Every reported group is registered in order. A group that fails is
    /// logged and skipped; the pass always completes and readiness is
    /// published afterwards. When `expected_primary` is given, cluster 0 is
    /// checked against it and a mismatch is logged.
    ///
    /// Returns `false` if the context was already initialized; the second
    /// topology is ignored.
    #[instrument(skip_all, target = "rotation")]
    pub fn initialize(
        &self,
        topology: &dyn TopologySource,
        expected_primary: Option<CoreId>,
    ) -> bool {
        if self.is_ready() {
            warn!("rotation context already initialized; ignoring");
            return false;
        }

        let mut registry = ClusterRegistry::new();

        for cores in topology.clusters() {
            match registry.register(&cores, topology) {
                Ok(id) => {
                    Counters::bump(&self.counters.clusters_registered);
                    info!(cluster_id = %id, cores = %cores, "cluster registered");
                }
                Err(e) => {
                    Counters::bump(&self.counters.cluster_register_failures);
                    warn!(error = %e, cores = %cores, "unable to create rotation group");
                }
            }
        }

        let primary_check = match expected_primary {
            Some(expected) => registry.validate_primary(expected),
            None if registry.is_empty() => Err(RegistryError::NoClusters),
            None => Ok(()),
        };
        if let Err(e) = primary_check {
            error!(error = %e, "primary cluster check failed");
        }

        let clusters = registry.len();
        if self.registry.set(registry).is_err() {
            warn!("rotation context initialized concurrently; keeping first registry");
            return false;
        }

        info!(clusters, "rotation control ready");
        true
    }

    /// The published registry, or `None` before initialization completes.
    pub fn registry(&self) -> Option<&ClusterRegistry> {
        self.registry.get()
    }

    pub fn is_ready(&self) -> bool {
        self.registry.get().is_some()
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}
