//! Profile and affiliation data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OnboardingError;

/// Maximum bio length, in characters.
pub const BIO_MAX_CHARS: usize = 150;

/// End-year marker stored for affiliations that are still ongoing.
pub const PRESENT: &str = "Present";

/// Avatar every new draft starts with unless configured otherwise.
pub const DEFAULT_AVATAR: &str = "https://picsum.photos/seed/user123/400/400";

/// Identifier of an affiliation inside one draft.
pub type AffiliationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "nosay")]
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// Human-readable option label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Kind of place an affiliation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationType {
    School,
    University,
    Work,
    Organization,
    Other,
}

impl AffiliationType {
    pub const ALL: [AffiliationType; 5] = [
        AffiliationType::School,
        AffiliationType::University,
        AffiliationType::Work,
        AffiliationType::Organization,
        AffiliationType::Other,
    ];

    /// Human-readable option label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::School => "High School",
            Self::University => "University / College",
            Self::Work => "Workplace",
            Self::Organization => "Organization",
            Self::Other => "Other Community",
        }
    }

    /// Place categories used to narrow name suggestions for this kind.
    pub fn place_categories(&self) -> &'static [&'static str] {
        match self {
            Self::School | Self::University => &["university", "school"],
            Self::Work | Self::Organization | Self::Other => &["establishment"],
        }
    }
}

impl std::fmt::Display for AffiliationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::School => "school",
            Self::University => "university",
            Self::Work => "work",
            Self::Organization => "organization",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// A past school, workplace or organization with its time range.
///
/// Only produced by [`AffiliationDraft::finalize`], so every value satisfies
/// the insertion invariant. Replace by removing and re-adding. Stored
/// records are re-checked against the same invariant when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AffiliationRecord")]
pub struct Affiliation {
    id: AffiliationId,
    kind: AffiliationType,
    name: String,
    start_year: String,
    end_year: String,
    is_current: bool,
}

impl Affiliation {
    pub fn id(&self) -> AffiliationId {
        self.id
    }

    pub fn kind(&self) -> AffiliationType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_year(&self) -> &str {
        &self.start_year
    }

    /// The end year, or [`PRESENT`] for ongoing affiliations.
    pub fn end_year(&self) -> &str {
        &self.end_year
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }
}

/// Wire form of an [`Affiliation`], validated before it becomes one.
#[derive(Deserialize)]
struct AffiliationRecord {
    id: AffiliationId,
    kind: AffiliationType,
    name: String,
    start_year: String,
    end_year: String,
    #[serde(default)]
    is_current: bool,
}

impl TryFrom<AffiliationRecord> for Affiliation {
    type Error = OnboardingError;

    fn try_from(record: AffiliationRecord) -> Result<Self, Self::Error> {
        let reason = if record.name.trim().is_empty() {
            Some("name is blank")
        } else if record.start_year.trim().is_empty() {
            Some("start year is blank")
        } else if record.end_year.trim().is_empty() {
            Some("end year is blank")
        } else if record.is_current && record.end_year != PRESENT {
            Some("current affiliation must end in the present")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(OnboardingError::InvalidAffiliation { reason });
        }
        Ok(Self {
            id: record.id,
            kind: record.kind,
            name: record.name,
            start_year: record.start_year,
            end_year: record.end_year,
            is_current: record.is_current,
        })
    }
}

/// Raw affiliation input as collected by the entry step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationDraft {
    #[serde(default)]
    pub kind: Option<AffiliationType>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_year: String,
    #[serde(default)]
    pub end_year: String,
    #[serde(default)]
    pub is_current: bool,
}

impl AffiliationDraft {
    /// Whether the candidate may be submitted: kind set, name and start year
    /// present, and an end year unless the affiliation is current.
    pub fn is_submittable(&self) -> bool {
        self.kind.is_some()
            && !self.name.trim().is_empty()
            && !self.start_year.trim().is_empty()
            && (self.is_current || !self.end_year.trim().is_empty())
    }

    /// Turn a valid candidate into an [`Affiliation`] with a fresh id.
    ///
    /// A current affiliation stores [`PRESENT`] as its end year regardless of
    /// any raw end-year input.
    pub fn finalize(self) -> Option<Affiliation> {
        if !self.is_submittable() {
            return None;
        }
        let kind = self.kind?;
        let end_year = if self.is_current {
            PRESENT.to_string()
        } else {
            self.end_year.trim().to_string()
        };
        Some(Affiliation {
            id: Uuid::new_v4(),
            kind,
            name: self.name.trim().to_string(),
            start_year: self.start_year.trim().to_string(),
            end_year,
            is_current: self.is_current,
        })
    }
}

/// The profile collected by onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    /// Date of birth in the host's native date-input format.
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub bio: String,
    pub interests: Vec<String>,
    pub avatar: String,
    pub affiliations: Vec<Affiliation>,
}

/// A partial profile edit. `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Full copy of a finished profile handed to the persistence sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub profile: UserProfile,
    pub updated_at: DateTime<Utc>,
}

impl ProfileSnapshot {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str) -> AffiliationDraft {
        AffiliationDraft {
            kind: Some(AffiliationType::School),
            name: name.to_string(),
            start_year: "2010".to_string(),
            end_year: "2014".to_string(),
            is_current: false,
        }
    }

    #[test]
    fn complete_candidate_is_submittable() {
        assert!(school("Lincoln High").is_submittable());
    }

    #[test]
    fn candidate_missing_pieces_is_rejected() {
        let mut no_kind = school("Lincoln High");
        no_kind.kind = None;
        assert!(!no_kind.is_submittable());

        assert!(!school("").is_submittable());
        assert!(!school("   ").is_submittable());

        let mut no_start = school("Lincoln High");
        no_start.start_year.clear();
        assert!(!no_start.is_submittable());

        let mut no_end = school("Lincoln High");
        no_end.end_year.clear();
        assert!(!no_end.is_submittable());
        assert!(no_end.clone().finalize().is_none());

        // Current affiliations don't need an end year
        no_end.is_current = true;
        assert!(no_end.is_submittable());
    }

    #[test]
    fn current_affiliation_ends_present() {
        let mut draft = school("Acme Corp");
        draft.kind = Some(AffiliationType::Work);
        draft.end_year = "2019".to_string();
        draft.is_current = true;

        let aff = draft.finalize().unwrap();
        assert_eq!(aff.end_year(), PRESENT);
        assert!(aff.is_current());
        assert_eq!(aff.kind(), AffiliationType::Work);
    }

    #[test]
    fn finalize_generates_distinct_ids() {
        let a = school("Lincoln High").finalize().unwrap();
        let b = school("Lincoln High").finalize().unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "Lincoln High");
        assert_eq!(a.start_year(), "2010");
        assert_eq!(a.end_year(), "2014");
    }

    #[test]
    fn stored_affiliation_round_trips() {
        let aff = school("Lincoln High").finalize().unwrap();
        let json = serde_json::to_string(&aff).unwrap();
        let parsed: Affiliation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, aff);
    }

    #[test]
    fn stored_affiliation_is_revalidated() {
        let mut value = serde_json::to_value(school("Lincoln High").finalize().unwrap()).unwrap();

        value["name"] = "  ".into();
        let err = serde_json::from_value::<Affiliation>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("name is blank"));

        value["name"] = "Lincoln High".into();
        value["is_current"] = true.into();
        let err = serde_json::from_value::<Affiliation>(value.clone()).unwrap_err();
        assert!(err.to_string().contains("must end in the present"));

        value["end_year"] = PRESENT.into();
        let parsed: Affiliation = serde_json::from_value(value).unwrap();
        assert!(parsed.is_current());
    }

    #[test]
    fn gender_wire_names() {
        let json = serde_json::to_string(&Gender::PreferNotToSay).unwrap();
        assert_eq!(json, "\"nosay\"");
        let parsed: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
        assert_eq!(Gender::PreferNotToSay.label(), "Prefer not to say");
    }

    #[test]
    fn affiliation_type_display_matches_serde() {
        let kinds = [
            AffiliationType::School,
            AffiliationType::University,
            AffiliationType::Work,
            AffiliationType::Organization,
            AffiliationType::Other,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(format!("\"{kind}\""), json);
        }
    }

    #[test]
    fn place_categories_by_kind() {
        assert_eq!(
            AffiliationType::University.place_categories(),
            &["university", "school"]
        );
        assert_eq!(AffiliationType::Work.place_categories(), &["establishment"]);
    }

    #[test]
    fn draft_deserializes_with_missing_fields() {
        let draft: AffiliationDraft =
            serde_json::from_str(r#"{"kind": "organization", "name": "Scouts"}"#).unwrap();
        assert_eq!(draft.kind, Some(AffiliationType::Organization));
        assert!(draft.start_year.is_empty());
        assert!(!draft.is_current);
        assert!(!draft.is_submittable());
    }
}
