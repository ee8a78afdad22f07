use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::CoreError;

/// Key → free-text content of one clerking note.
pub type ClerkingNote = BTreeMap<String, String>;

/// Note keys used for patient identification in listings and search.
pub mod patient_keys {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
}

/// Server-assigned record identifier.
///
/// Opaque to the client. The backend may send it as a JSON number or a
/// string; both deserialize to the same value and it always serializes
/// as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(CoreError::InvalidRecordId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(RecordId::from(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A persisted clerking note as returned by the record service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClerkingRecord {
    #[ts(type = "string")]
    pub id: RecordId,
    pub specialty: String,
    #[serde(deserialize_with = "nullable_note")]
    pub clerking_note: ClerkingNote,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: jiff::Timestamp,
}

impl ClerkingRecord {
    /// Value stored under `key`, or `""` when absent.
    pub fn note_value(&self, key: &str) -> &str {
        self.clerking_note.get(key).map(String::as_str).unwrap_or("")
    }

    /// "First Last" as recorded, skipping missing parts.
    pub fn patient_name(&self) -> String {
        [
            self.note_value(patient_keys::FIRST_NAME),
            self.note_value(patient_keys::LAST_NAME),
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Case-insensitive substring match on first or last name.
    /// An empty (or whitespace-only) term matches every record.
    pub fn matches_patient(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [patient_keys::FIRST_NAME, patient_keys::LAST_NAME]
            .iter()
            .any(|key| self.note_value(key).to_lowercase().contains(&needle))
    }
}

/// Keep the records whose patient name matches `term`, preserving order.
pub fn filter_by_patient<'a>(records: &'a [ClerkingRecord], term: &str) -> Vec<&'a ClerkingRecord> {
    records.iter().filter(|r| r.matches_patient(term)).collect()
}

/// Older notes store untouched sections as `null`.
fn nullable_note<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ClerkingNote, D::Error> {
    let raw: BTreeMap<String, Option<String>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

/// Accepts RFC 3339 instants as well as offset-less datetimes or bare
/// dates, which are read as UTC.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<jiff::Timestamp, D::Error> {
    use jiff::civil::{Date, DateTime, Time};
    use jiff::tz::TimeZone;

    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
        return Ok(ts);
    }
    let civil = raw
        .parse::<DateTime>()
        .or_else(|_| raw.parse::<Date>().map(|d| d.to_datetime(Time::midnight())))
        .map_err(|e| serde::de::Error::custom(format!("invalid created_at {raw:?}: {e}")))?;
    civil
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(serde::de::Error::custom)
}
