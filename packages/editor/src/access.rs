//! Capability checks for premium-gated content.
//!
//! The policy itself (which plan grants what) lives with the host
//! application; the editor only asks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const PREMIUM_COMPONENTS: &str = "premiumComponents";

pub trait AccessControl {
    fn has_capability(&self, feature: &str) -> bool;
}

/// Subscription tier of the acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Agency,
}

impl AccessControl for Tier {
    fn has_capability(&self, feature: &str) -> bool {
        match self {
            Tier::Free => false,
            Tier::Pro => feature == PREMIUM_COMPONENTS,
            Tier::Agency => true,
        }
    }
}

/// Explicit list of granted capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<String>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, feature: impl Into<String>) -> Self {
        self.granted.insert(feature.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl AccessControl for CapabilitySet {
    fn has_capability(&self, feature: &str) -> bool {
        self.granted.contains(feature)
    }
}
