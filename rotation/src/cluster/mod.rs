//! Static partition of cores into clusters.
//!
//! The registry is filled once at startup from a [`topology::TopologySource`]
//! and is read-only afterwards. Registration order matters: the first
//! cluster registered is the primary one.

pub mod registry;
pub mod topology;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub use registry::{ClusterRegistry, MAX_CLUSTERS};
pub use topology::{StaticTopology, TopologySource};

/// Index of a core in the per-core stats snapshot.
pub type CoreId = usize;

/// Exclusive upper bound on core ids.
pub const MAX_CORES: usize = 1024;

/// Ordinal of a cluster in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub usize);

impl ClusterId {
    const PRIMARY: ClusterId = ClusterId(0);

    /// The first registered cluster counts misfits instead of running tasks.
    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered set of core ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreSet(BTreeSet<CoreId>);

impl CoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest core id in the set.
    pub fn first(&self) -> Option<CoreId> {
        self.0.first().copied()
    }

    pub fn contains(&self, core: CoreId) -> bool {
        self.0.contains(&core)
    }

    pub fn insert(&mut self, core: CoreId) -> bool {
        self.0.insert(core)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CoreId> + '_ {
        self.0.iter().copied()
    }

    /// First core present in both sets, if any.
    pub fn first_shared(&self, other: &CoreSet) -> Option<CoreId> {
        self.0.intersection(&other.0).next().copied()
    }
}

impl FromIterator<CoreId> for CoreSet {
    fn from_iter<I: IntoIterator<Item = CoreId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[CoreId; N]> for CoreSet {
    fn from(cores: [CoreId; N]) -> Self {
        cores.into_iter().collect()
    }
}

/// Parses the Linux cpulist syntax, e.g. `0-3,6,8-9`.
impl FromStr for CoreSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedCpuList(s.to_string());
        let mut set = CoreSet::new();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo: CoreId = lo.trim().parse().map_err(|_| malformed())?;
                    let hi: CoreId = hi.trim().parse().map_err(|_| malformed())?;
                    if lo > hi || hi >= MAX_CORES {
                        return Err(malformed());
                    }
                    set.0.extend(lo..=hi);
                }
                None => {
                    let core: CoreId = part.parse().map_err(|_| malformed())?;
                    if core >= MAX_CORES {
                        return Err(malformed());
                    }
                    set.insert(core);
                }
            }
        }

        if set.is_empty() {
            return Err(malformed());
        }
        Ok(set)
    }
}

impl fmt::Display for CoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cores = self.iter().peekable();
        let mut first = true;
        while let Some(lo) = cores.next() {
            let mut hi = lo;
            while hi.checked_add(1).is_some_and(|next| cores.peek() == Some(&next)) {
                hi += 1;
                cores.next();
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if lo == hi {
                write!(f, "{lo}")?;
            } else {
                write!(f, "{lo}-{hi}")?;
            }
        }
        Ok(())
    }
}

/// One registered group of cores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Registration ordinal; `ClusterId(0)` is the primary cluster.
    pub id: ClusterId,
    pub member_cores: CoreSet,
    /// Lowest core in `member_cores`; dedup key during registration.
    pub representative_core: CoreId,
    /// Inactive clusters contribute nothing to a window.
    pub active: bool,
}
