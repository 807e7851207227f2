//! Named, ordered collections of apexes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::apex::rand::random_apexes;
use crate::apex::Apex;

/// Point-set metadata; both fields are optional in older files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn new(count: usize) -> Self {
        Self {
            count: Some(count),
            created: Some(Utc::now()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub metadata: Metadata,
    pub elements: Vec<Apex>,
}

impl PointSet {
    pub fn new(elements: Vec<Apex>) -> Self {
        Self {
            metadata: Metadata::new(elements.len()),
            elements,
        }
    }

    /// Random set on the dyadic grid of spacing `2^-grid_density`.
    pub fn random(grid_density: u32, count: usize, seed: u64) -> Self {
        Self::new(random_apexes(grid_density, count, seed))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Apex> {
        self.elements.get(index)
    }
}
