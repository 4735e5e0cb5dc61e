use super::{CoreId, CoreSet};

/// Source of the hardware cluster layout, consulted once at startup.
pub trait TopologySource: Send + Sync {
    /// Core groups in the order they should be registered.
    /// The first group becomes the primary cluster.
    fn clusters(&self) -> Vec<CoreSet>;

    /// Whether `core` resolves to a live device.
    fn core_present(&self, core: CoreId) -> bool;
}

/// Topology fixed at construction, typically from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticTopology {
    clusters: Vec<CoreSet>,
    present: CoreSet,
}

impl StaticTopology {
    pub fn new(clusters: Vec<CoreSet>, present: CoreSet) -> Self {
        Self { clusters, present }
    }

    /// Every core named by `clusters` is considered present.
    pub fn from_clusters(clusters: Vec<CoreSet>) -> Self {
        let present = clusters.iter().flat_map(|c| c.iter()).collect();
        Self { clusters, present }
    }

    /// Number of core slots a stats snapshot needs to cover this topology.
    pub fn core_slots(&self) -> usize {
        self.present.iter().max().map_or(0, |max| max.saturating_add(1))
    }
}

impl TopologySource for StaticTopology {
    fn clusters(&self) -> Vec<CoreSet> {
        self.clusters.clone()
    }

    fn core_present(&self, core: CoreId) -> bool {
        self.present.contains(core)
    }
}
