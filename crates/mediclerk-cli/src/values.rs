//! Field values supplied from a JSON file instead of interactively.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mediclerk_core::models::record::ClerkingNote;
use mediclerk_forms::engine::FormSession;
use tracing::{info, warn};

use crate::store::write_private;

/// Parse a `{"key": "value"}` object. `null` values read as empty.
pub fn parse_values(json: &str) -> eyre::Result<ClerkingNote> {
    let raw: BTreeMap<String, Option<String>> = serde_json::from_str(json)
        .map_err(|e| eyre::eyre!("values must be a JSON object of strings: {e}"))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

pub fn read_values(path: &Path) -> eyre::Result<ClerkingNote> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    parse_values(&contents)
}

/// Write `values` into the form as user edits. Keys the active specialty
/// does not define are skipped; their keys are returned.
pub fn apply_values(session: &mut FormSession, values: &ClerkingNote) -> Vec<String> {
    let mut skipped = Vec::new();
    for (key, value) in values {
        if session.set_field_value(key, value.as_str()).is_err() {
            warn!(key = %key, "skipping value for a field this specialty does not have");
            skipped.push(key.clone());
        }
    }
    skipped
}

/// Save unsubmitted form values as `<dir>/drafts/<name>.json`, in the
/// format [`read_values`] accepts.
pub fn write_draft(dir: &Path, name: &str, values: &ClerkingNote) -> eyre::Result<PathBuf> {
    let path = dir.join("drafts").join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(values)?;
    write_private(&path, &json)?;
    info!(path = %path.display(), fields = values.len(), "saved form draft");
    Ok(path)
}
