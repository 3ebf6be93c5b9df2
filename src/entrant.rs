// Entrant model - identity plus name values
//
// The id is assigned by the store and never changes. Names are plain values
// checked once at creation; records are never edited in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// System-assigned identifier. Assigned ids start at 1.
pub type EntrantId = u64;

// ============================================================================
// ENTRANT
// ============================================================================

/// A stored entrant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    /// Unique id, owned by the store
    pub id: EntrantId,

    /// First name (never blank)
    pub first_name: String,

    /// Last (or family) name (never blank)
    pub last_name: String,
}

impl Entrant {
    /// Build a record with a known id. Used for seeding and in tests.
    pub fn new(id: EntrantId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Entrant {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

// ============================================================================
// NEW ENTRANT (create candidate)
// ============================================================================

/// Candidate for `create`. Fields are optional so that missing and `null`
/// names reach validation instead of failing deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntrant {
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl NewEntrant {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        NewEntrant {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }

    /// Check both names, first name first. Returns the offending field.
    pub fn validate(&self) -> Result<(), Field> {
        if is_blank(self.first_name.as_deref()) {
            return Err(Field::FirstName);
        }
        if is_blank(self.last_name.as_deref()) {
            return Err(Field::LastName);
        }
        Ok(())
    }

    /// Attach an id. Call only after `validate` has passed.
    pub(crate) fn into_entrant(self, id: EntrantId) -> Entrant {
        Entrant {
            id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
        }
    }
}

/// `None`, empty and whitespace-only values are all blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

// ============================================================================
// FIELD
// ============================================================================

/// Names the argument that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The whole candidate was absent
    Entrant,
    FirstName,
    LastName,
    Id,
}

impl Field {
    /// Wire name, matching the JSON keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Entrant => "entrant",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Id => "id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
