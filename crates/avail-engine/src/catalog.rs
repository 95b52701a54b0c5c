//! The read-only unit inventory, as far as availability cares about it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AvailError, Result};

/// One advertising placement from the inventory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub market: String,
    #[serde(default, rename = "type", alias = "unitType")]
    pub unit_type: String,
}

/// Accepted inventory layouts: a bare array or `{"units": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Unit>),
    Wrapped { units: Vec<Unit> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitCatalog {
    units: Vec<Unit>,
}

impl UnitCatalog {
    /// Build a catalog, rejecting empty or duplicated ids.
    pub fn new(units: Vec<Unit>) -> Result<Self> {
        let mut seen = HashSet::new();
        for unit in &units {
            if unit.id.trim().is_empty() {
                return Err(AvailError::Catalog("unit with empty id".to_string()));
            }
            if !seen.insert(unit.id.as_str()) {
                return Err(AvailError::Catalog(format!("duplicate unit id: {}", unit.id)));
            }
        }
        Ok(Self { units })
    }

    /// Load from inventory JSON. Fields other than id, name, market and type are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let units = match serde_json::from_str(json)? {
            CatalogDocument::List(units) => units,
            CatalogDocument::Wrapped { units } => units,
        };
        Self::new(units)
    }

    /// The known-id set the import validator checks against.
    pub fn ids(&self) -> HashSet<String> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
