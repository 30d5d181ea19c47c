use serde::{Deserialize, Serialize};

/// A tradable resource: material, chemical, energy carrier, currency.
///
/// Identity is carried by the [`super::ids::CommodityId`] handle issued at
/// registration; this struct is only the registry payload. Conversions refer
/// to commodities exclusively through their handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Canonical name, used for indexing and alias resolution.
    pub name: String,
    /// Optional human-readable label, used for reporting.
    pub label: String,
}

impl Commodity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
        }
    }

    pub fn with_label(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}
