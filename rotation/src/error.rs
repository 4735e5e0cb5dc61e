use thiserror::Error;

use crate::cluster::{ClusterId, CoreId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unsupported number of clusters; only {max} supported")]
    CapacityExceeded { max: usize },

    #[error("core {0} does not resolve to a present device")]
    UnknownCore(CoreId),

    #[error("core set is empty")]
    EmptyCoreSet,

    #[error("core {core} already belongs to cluster {cluster}")]
    OverlappingCores { core: CoreId, cluster: ClusterId },

    #[error("primary cluster starts at core {found}, expected core {expected}")]
    PrimaryMismatch { expected: CoreId, found: CoreId },

    #[error("no clusters registered")]
    NoClusters,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("malformed cpulist {0:?}")]
    MalformedCpuList(String),
}
