//! mediclerk-forms
//!
//! Specialty catalog, per-specialty field schemas, and the form engine that
//! binds a schema to live input state. Pure data and state, no HTTP
//! dependency.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod registry;
pub mod schema;
pub mod specialties;

use catalog::SpecialtyInfo;
use schema::FieldDefinition;

/// Trait implemented by each medical specialty's clerking pad.
pub trait Specialty: Send + Sync {
    /// Stable identifier stored on records (e.g., "internal medicine").
    fn id(&self) -> &'static str;

    /// Human-readable name (e.g., "Internal Medicine").
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Reference to the icon asset shown on the specialty selector.
    fn icon(&self) -> &'static str;

    /// The ordered history sections collected for this specialty.
    fn fields(&self) -> &'static [FieldDefinition];

    fn info(&self) -> SpecialtyInfo {
        SpecialtyInfo {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            icon: self.icon().to_string(),
        }
    }
}

/// Return all shipped specialties, in selector order.
pub fn all_specialties() -> Vec<Box<dyn Specialty>> {
    vec![
        Box::new(specialties::internal_medicine::InternalMedicine),
        Box::new(specialties::surgery::Surgery),
        Box::new(specialties::pediatrics::Pediatrics),
        Box::new(specialties::obs_gyn::ObsGyn),
    ]
}

/// Look up a specialty by ID.
pub fn get_specialty(id: &str) -> Option<Box<dyn Specialty>> {
    all_specialties().into_iter().find(|s| s.id() == id)
}
