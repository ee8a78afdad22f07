//! Display metadata for the specialty selector.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::all_specialties;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpecialtyInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// All specialties in selector order.
pub fn list_specialties() -> Vec<SpecialtyInfo> {
    all_specialties().iter().map(|s| s.info()).collect()
}

/// Display name for a specialty id, falling back to the id itself for
/// records written under a specialty this build does not know.
pub fn display_name(id: &str) -> String {
    all_specialties()
        .iter()
        .find(|s| s.id() == id)
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
