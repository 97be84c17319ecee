use std::fmt::Display;

use serde::Serialize;

use crate::constants::HEALTHY_STATUS;

/// Health of a single node as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum NodeState {
    Good,
    Bad,
}

impl NodeState {
    /// `healthy` in any case is good, every other status is bad.
    pub fn from_status(status: &str) -> Self {
        if status.eq_ignore_ascii_case(HEALTHY_STATUS) {
            NodeState::Good
        } else {
            NodeState::Bad
        }
    }
}

/// Health of the whole cluster.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ClusterState {
    Uninitialised, // nothing polled yet; never re-entered
    Good,
    Degraded,
    NetworkError,
}

impl Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterState::Uninitialised => write!(f, "Uninitialised"),
            ClusterState::Good => write!(f, "Good"),
            ClusterState::Degraded => write!(f, "Degraded"),
            ClusterState::NetworkError => write!(f, "NetworkError"),
        }
    }
}

/// Worst-of reduction: any bad node degrades the cluster. An empty node list is good.
pub fn aggregate(states: &[NodeState]) -> ClusterState {
    if states.iter().all(|s| *s == NodeState::Good) {
        ClusterState::Good
    } else {
        ClusterState::Degraded
    }
}
