//! Access control: clearance profiles and fact filtering

use crate::memory::types::{Classification, Fact};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-holder permission config: domain -> highest classification the holder may read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearanceProfile {
    /// Agent or human this profile belongs to
    pub holder_id: String,
    #[serde(default)]
    pub domain_clearance: HashMap<String, Classification>,
}

impl ClearanceProfile {
    /// Create a profile with no domain clearances (public facts only)
    pub fn new(holder_id: impl Into<String>) -> Self {
        Self {
            holder_id: holder_id.into(),
            domain_clearance: HashMap::new(),
        }
    }

    /// Grant clearance up to `level` for `domain`
    pub fn grant(mut self, domain: impl Into<String>, level: Classification) -> Self {
        self.domain_clearance.insert(domain.into(), level);
        self
    }

    /// Clearance level for a domain, if any
    pub fn clearance_for(&self, domain: &str) -> Option<Classification> {
        self.domain_clearance.get(domain).copied()
    }

    /// Check if this profile can read a fact
    ///
    /// Public facts are always readable. Otherwise the holder needs clearance
    /// for the fact's domain ranked at or above the fact's classification.
    pub fn can_access(&self, fact: &Fact) -> bool {
        if fact.classification == Classification::Public {
            return true;
        }
        match self.clearance_for(&fact.domain) {
            Some(level) => level.rank() >= fact.classification.rank(),
            None => false,
        }
    }
}

/// Filter a list of facts by clearance
#[derive(Debug, Clone)]
pub struct AccessFilter {
    clearance: ClearanceProfile,
}

impl AccessFilter {
    /// Create a filter for a clearance profile
    pub fn new(clearance: ClearanceProfile) -> Self {
        Self { clearance }
    }

    /// The profile this filter applies
    pub fn clearance(&self) -> &ClearanceProfile {
        &self.clearance
    }

    /// Keep the accessible facts, preserving order
    pub fn filter(&self, facts: Vec<Fact>) -> Vec<Fact> {
        facts
            .into_iter()
            .filter(|f| self.clearance.can_access(f))
            .collect()
    }
}
