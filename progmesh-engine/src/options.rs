//! Engine configuration

use serde::{Deserialize, Serialize};

/// Which normals are refreshed after a split or contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalPolicy {
    /// Refresh every vertex whose incident faces changed shape or membership.
    /// Vertex normals always equal the normalized sum of their face normals.
    #[default]
    Touched,
    /// Refresh only the split/contracted endpoints. Neighbouring normals may
    /// lag behind until one of their own endpoints is edited.
    Endpoints,
}

/// Configuration for a [`ProgressiveMesh`](crate::ProgressiveMesh)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub normal_policy: NormalPolicy,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normal_policy(mut self, policy: NormalPolicy) -> Self {
        self.normal_policy = policy;
        self
    }

    /// Options favouring playback speed over neighbour shading accuracy
    pub fn fast() -> Self {
        Self::new().with_normal_policy(NormalPolicy::Endpoints)
    }
}
