use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::preference::Preferences;
use crate::error::{RelationshipError, RelationshipResult};

/// Maximum label length in characters.
pub const RELATIONSHIP_TYPE_MAX_LEN: usize = 50;

/// Byte capacity holding `RELATIONSHIP_TYPE_MAX_LEN` characters of any UTF-8 width.
pub const RELATIONSHIP_TYPE_CAPACITY: usize = 4 * RELATIONSHIP_TYPE_MAX_LEN;

/// Free-form label such as Father, Mother, Guardian or Sponsor.
pub type RelationshipType = HeaplessString<RELATIONSHIP_TYPE_CAPACITY>;

/// Label given to edges created without an explicit relationship type.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "Guardian";

/// Builds a bounded relationship label, trimming surrounding whitespace.
pub fn relationship_type(label: &str) -> RelationshipResult<RelationshipType> {
    let label = label.trim();
    if label.is_empty() {
        return Err(RelationshipError::Validation(
            "relationship_type must not be empty".to_string(),
        ));
    }
    let too_long = || {
        RelationshipError::Validation(format!(
            "relationship_type is too long (max {RELATIONSHIP_TYPE_MAX_LEN} chars)"
        ))
    };
    if label.chars().count() > RELATIONSHIP_TYPE_MAX_LEN {
        return Err(too_long());
    }
    RelationshipType::try_from(label).map_err(|_| too_long())
}

/// # Documentation
/// - One guardian/student association with its attributes
/// - `(guardian_id, student_id)` is the composite key
/// - Exactly one edge per student carries `is_primary = true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub guardian_id: Uuid,
    pub student_id: Uuid,
    pub is_primary: bool,
    pub relationship_type: RelationshipType,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        guardian_id: Uuid,
        student_id: Uuid,
        relationship_type: RelationshipType,
        is_primary: bool,
        preferences: Preferences,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            guardian_id,
            student_id,
            is_primary,
            relationship_type,
            preferences,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> (Uuid, Uuid) {
        (self.guardian_id, self.student_id)
    }
}

/// Partial update applied by `EdgeRepository::update`. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub is_primary: Option<bool>,
    pub relationship_type: Option<RelationshipType>,
    pub preferences: Option<Preferences>,
}

impl EdgePatch {
    pub fn primary(value: bool) -> Self {
        Self {
            is_primary: Some(value),
            ..Self::default()
        }
    }

    pub fn preferences(preferences: Preferences) -> Self {
        Self {
            preferences: Some(preferences),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_primary.is_none() && self.relationship_type.is_none() && self.preferences.is_none()
    }

    /// Whether applying this patch would leave `edge` unchanged.
    pub fn is_noop_for(&self, edge: &Edge) -> bool {
        self.is_primary.map_or(true, |v| v == edge.is_primary)
            && self
                .relationship_type
                .as_ref()
                .map_or(true, |v| *v == edge.relationship_type)
            && self.preferences.map_or(true, |v| v == edge.preferences)
    }

    pub fn apply(&self, edge: &mut Edge, now: DateTime<Utc>) {
        if let Some(is_primary) = self.is_primary {
            edge.is_primary = is_primary;
        }
        if let Some(relationship_type) = &self.relationship_type {
            edge.relationship_type = relationship_type.clone();
        }
        if let Some(preferences) = self.preferences {
            edge.preferences = preferences;
        }
        edge.updated_at = now;
    }
}

/// Request to attach one guardian to one student.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LinkRequest {
    pub guardian_id: Uuid,
    pub student_id: Uuid,
    #[validate(length(min = 1, max = 50))]
    pub relationship_type: String,
    /// Ignored when the student has no guardian yet; the first edge is always primary.
    #[serde(default)]
    pub is_primary: bool,
    /// Falls back to `Preferences::default()`.
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl LinkRequest {
    pub fn new(guardian_id: Uuid, student_id: Uuid, relationship_type: &str) -> Self {
        Self {
            guardian_id,
            student_id,
            relationship_type: relationship_type.to_string(),
            is_primary: false,
            preferences: None,
        }
    }

    pub fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

/// One entry of a full guardian-list replacement for a student.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EdgeSpec {
    pub guardian_id: Uuid,
    #[serde(default)]
    pub is_primary: bool,
    #[validate(length(min = 1, max = 50))]
    #[serde(default)]
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl EdgeSpec {
    pub fn new(guardian_id: Uuid, is_primary: bool) -> Self {
        Self {
            guardian_id,
            is_primary,
            relationship_type: None,
            preferences: None,
        }
    }

    pub fn with_relationship_type(mut self, relationship_type: &str) -> Self {
        self.relationship_type = Some(relationship_type.to_string());
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_bounds() {
        assert_eq!(relationship_type("  Mother ").unwrap().as_str(), "Mother");
        assert!(relationship_type("   ").is_err());
        assert!(relationship_type(&"x".repeat(RELATIONSHIP_TYPE_MAX_LEN + 1)).is_err());
        assert!(relationship_type(&"x".repeat(RELATIONSHIP_TYPE_MAX_LEN)).is_ok());
    }

    #[test]
    fn test_relationship_type_counts_chars() {
        let label = "Двоюродная бабушка по матери";
        assert!(label.len() > RELATIONSHIP_TYPE_MAX_LEN);
        assert_eq!(relationship_type(label).unwrap().as_str(), label);

        let widest = "需".repeat(RELATIONSHIP_TYPE_MAX_LEN);
        assert!(relationship_type(&widest).is_ok());
        assert!(relationship_type(&"需".repeat(RELATIONSHIP_TYPE_MAX_LEN + 1)).is_err());

        let request = LinkRequest::new(Uuid::new_v4(), Uuid::new_v4(), label);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_link_request_validation() {
        let request = LinkRequest::new(Uuid::new_v4(), Uuid::new_v4(), "");
        assert!(request.validate().is_err());

        let request = LinkRequest::new(Uuid::new_v4(), Uuid::new_v4(), "Father");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_patch_apply() {
        let now = Utc::now();
        let mut edge = Edge::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            relationship_type("Father").unwrap(),
            false,
            Preferences::default(),
            now,
        );

        let patch = EdgePatch::primary(true);
        assert!(!patch.is_noop_for(&edge));
        patch.apply(&mut edge, now);
        assert!(edge.is_primary);
        assert_eq!(edge.relationship_type.as_str(), "Father");
        assert!(patch.is_noop_for(&edge));
        assert!(EdgePatch::default().is_empty());
    }
}
