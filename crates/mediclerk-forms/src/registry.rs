//! Static lookup table from specialty id to its field schema.
//!
//! Built once from the compiled-in specialties and validated so that no
//! specialty declares the same key twice. An unknown specialty resolves to
//! `None` (or an empty field list through [`SchemaRegistry::fields_for`]),
//! which callers treat as "no form rendered yet".

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use tracing::debug;

use crate::error::FormError;
use crate::schema::FieldDefinition;
use crate::{Specialty, all_specialties};

/// One specialty's resolved schema.
#[derive(Debug, Clone, Copy)]
pub struct SpecialtySchema {
    pub id: &'static str,
    pub fields: &'static [FieldDefinition],
}

impl SpecialtySchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// A key used by several specialties under different labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConflict {
    pub key: String,
    /// `(specialty id, label)` for every specialty declaring the key.
    pub labels: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: Vec<SpecialtySchema>,
}

impl SchemaRegistry {
    /// Build and validate a registry from a set of specialties.
    pub fn build(specialties: &[Box<dyn Specialty>]) -> Result<Self, FormError> {
        let mut schemas = Vec::with_capacity(specialties.len());
        let mut seen_ids = HashSet::new();

        for specialty in specialties {
            if !seen_ids.insert(specialty.id()) {
                return Err(FormError::DuplicateSpecialty(specialty.id().to_string()));
            }

            let mut seen_keys = HashSet::new();
            for field in specialty.fields() {
                if !seen_keys.insert(field.key.as_str()) {
                    return Err(FormError::DuplicateFieldKey {
                        specialty: specialty.id().to_string(),
                        key: field.key.clone(),
                    });
                }
            }

            schemas.push(SpecialtySchema {
                id: specialty.id(),
                fields: specialty.fields(),
            });
        }

        debug!(specialties = schemas.len(), "schema registry built");
        Ok(Self { schemas })
    }

    pub fn schema(&self, specialty_id: &str) -> Option<&SpecialtySchema> {
        self.schemas.iter().find(|s| s.id == specialty_id)
    }

    /// Like [`schema`](Self::schema), for callers that must reject an
    /// unknown id.
    pub fn require_schema(&self, specialty_id: &str) -> Result<&SpecialtySchema, FormError> {
        self.schema(specialty_id)
            .ok_or_else(|| FormError::UnknownSpecialty(specialty_id.to_string()))
    }

    /// Ordered fields for a specialty; empty for an unknown id.
    pub fn fields_for(&self, specialty_id: &str) -> &'static [FieldDefinition] {
        self.schema(specialty_id).map(|s| s.fields).unwrap_or(&[])
    }

    pub fn specialty_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(|s| s.id)
    }

    /// Keys shared across specialties whose labels disagree.
    ///
    /// Renderers that apply one rule per key (export, detail view) should
    /// only rely on cross-specialty consistency for keys absent from this
    /// list.
    pub fn shared_key_conflicts(&self) -> Vec<KeyConflict> {
        let mut by_key: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();
        for schema in &self.schemas {
            for field in schema.fields {
                by_key
                    .entry(field.key.as_str())
                    .or_default()
                    .push((schema.id.to_string(), field.label.clone()));
            }
        }

        by_key
            .into_iter()
            .filter(|(_, labels)| {
                labels
                    .iter()
                    .any(|(_, label)| label != &labels[0].1)
            })
            .map(|(key, labels)| KeyConflict {
                key: key.to_string(),
                labels,
            })
            .collect()
    }
}

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::build(&all_specialties())
        .unwrap_or_else(|e| panic!("invalid compiled-in specialty schema: {e}"))
});

/// The registry of compiled-in specialties.
///
/// # Panics
///
/// Panics on first use if a compiled-in specialty declares a duplicate key.
/// The schema set is fixed at build time, so a panic indicates a schema
/// definition bug caught by the registry tests.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Ordered fields for a specialty; empty for an unknown id.
pub fn fields_for(specialty_id: &str) -> &'static [FieldDefinition] {
    registry().fields_for(specialty_id)
}
