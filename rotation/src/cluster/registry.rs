use tracing::{error, info};

use super::topology::TopologySource;
use super::{Cluster, ClusterId, CoreId, CoreSet, MAX_CORES};
use crate::error::RegistryError;

/// Maximum number of clusters the registry will hold.
pub const MAX_CLUSTERS: usize = 4;

/// Ordered, bounded collection of clusters.
///
/// Guarantees:
/// - At most [`MAX_CLUSTERS`] entries.
/// - Member sets are pairwise disjoint.
/// - Representative cores are unique; re-registering one is a no-op.
#[derive(Debug, Default, Clone)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self {
            clusters: Vec::with_capacity(MAX_CLUSTERS),
        }
    }

    /// Registers one topology group and returns its cluster id.
    ///
    /// Returns the existing id when a cluster with the same representative
    /// (lowest) core is already present, even if the registry is full.
    /// On error the registry is left untouched.
    pub fn register(
        &mut self,
        cores: &CoreSet,
        topology: &dyn TopologySource,
    ) -> Result<ClusterId, RegistryError> {
        let first_core = cores.first().ok_or(RegistryError::EmptyCoreSet)?;

        if let Some(existing) = self.find_by_first_core(first_core) {
            return Ok(existing.id);
        }

        if !topology.core_present(first_core) {
            return Err(RegistryError::UnknownCore(first_core));
        }

        if let Some(core) = cores.iter().find(|&c| c >= MAX_CORES) {
            return Err(RegistryError::UnknownCore(core));
        }

        for existing in &self.clusters {
            if let Some(core) = existing.member_cores.first_shared(cores) {
                return Err(RegistryError::OverlappingCores {
                    core,
                    cluster: existing.id,
                });
            }
        }

        info!(first_core, cores = %cores, "creating cluster");

        if self.clusters.len() >= MAX_CLUSTERS {
            error!(max = MAX_CLUSTERS, first_core, "unsupported number of clusters");
            return Err(RegistryError::CapacityExceeded { max: MAX_CLUSTERS });
        }

        let id = ClusterId(self.clusters.len());
        self.clusters.push(Cluster {
            id,
            member_cores: cores.clone(),
            representative_core: first_core,
            active: true,
        });

        Ok(id)
    }

    /// Read-only view in registration order.
    pub fn all_clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn find_by_first_core(&self, first_core: CoreId) -> Option<&Cluster> {
        self.clusters
            .iter()
            .find(|c| c.representative_core == first_core)
    }

    /// Cluster that owns `core`, if any.
    pub fn cluster_of(&self, core: CoreId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.member_cores.contains(core))
    }

    pub fn primary(&self) -> Option<&Cluster> {
        self.clusters.first()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Checks that cluster 0 is the cluster the operator expects to be primary.
    pub fn validate_primary(&self, expected_first_core: CoreId) -> Result<(), RegistryError> {
        let primary = self.primary().ok_or(RegistryError::NoClusters)?;
        if primary.representative_core != expected_first_core {
            return Err(RegistryError::PrimaryMismatch {
                expected: expected_first_core,
                found: primary.representative_core,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, id: ClusterId, active: bool) {
        if let Some(c) = self.clusters.get_mut(id.0) {
            c.active = active;
        }
    }
}
