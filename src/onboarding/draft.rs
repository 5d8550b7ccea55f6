//! ProfileDraft: the profile accumulated while the user walks the wizard.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{
    Affiliation, AffiliationDraft, AffiliationId, DEFAULT_AVATAR, Gender, ProfileUpdate,
    UserProfile,
};
use super::ports::IdentityClaims;

/// Values a fresh draft starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDefaults {
    pub avatar: String,
    pub interests: Vec<String>,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            avatar: DEFAULT_AVATAR.to_string(),
            interests: vec![
                "Hiking".to_string(),
                "Vinyl Records".to_string(),
                "Coffee".to_string(),
            ],
        }
    }
}

/// Fields that identity pre-population may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PrefillField {
    FirstName,
    LastName,
    Avatar,
}

/// In-memory profile under construction.
///
/// Mutated only through the flow controller; does no I/O.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    profile: UserProfile,
    /// Fields the user has edited; pre-population never touches these.
    edited: HashSet<PrefillField>,
}

impl Default for ProfileDraft {
    fn default() -> Self {
        Self::new(&DraftDefaults::default())
    }
}

impl ProfileDraft {
    pub fn new(defaults: &DraftDefaults) -> Self {
        let mut interests: Vec<String> = Vec::with_capacity(defaults.interests.len());
        for tag in &defaults.interests {
            if !interests.contains(tag) {
                interests.push(tag.clone());
            }
        }
        Self {
            profile: UserProfile {
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: String::new(),
                gender: None,
                bio: String::new(),
                interests,
                avatar: defaults.avatar.clone(),
                affiliations: Vec::new(),
            },
            edited: HashSet::new(),
        }
    }

    /// Read-only view of the accumulated profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn first_name(&self) -> &str {
        &self.profile.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.profile.last_name
    }

    pub fn date_of_birth(&self) -> &str {
        &self.profile.date_of_birth
    }

    pub fn gender(&self) -> Option<Gender> {
        self.profile.gender
    }

    pub fn interests(&self) -> &[String] {
        &self.profile.interests
    }

    pub fn avatar(&self) -> &str {
        &self.profile.avatar
    }

    pub fn affiliations(&self) -> &[Affiliation] {
        &self.profile.affiliations
    }

    /// Shallow-merge the provided fields. Nothing is validated here.
    pub fn merge(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.profile.first_name = first_name;
            self.edited.insert(PrefillField::FirstName);
        }
        if let Some(last_name) = update.last_name {
            self.profile.last_name = last_name;
            self.edited.insert(PrefillField::LastName);
        }
        if let Some(dob) = update.date_of_birth {
            self.profile.date_of_birth = dob;
        }
        if let Some(gender) = update.gender {
            self.profile.gender = Some(gender);
        }
        if let Some(bio) = update.bio {
            self.profile.bio = bio;
        }
        if let Some(avatar) = update.avatar {
            self.profile.avatar = avatar;
            self.edited.insert(PrefillField::Avatar);
        }
    }

    /// Append a candidate affiliation if it is valid. Returns the new id.
    pub fn add_affiliation(&mut self, candidate: AffiliationDraft) -> Option<AffiliationId> {
        let affiliation = candidate.finalize()?;
        let id = affiliation.id();
        self.profile.affiliations.push(affiliation);
        Some(id)
    }

    /// Remove the affiliation with `id`. Returns false if there was none.
    pub fn remove_affiliation(&mut self, id: AffiliationId) -> bool {
        match self.profile.affiliations.iter().position(|a| a.id() == id) {
            Some(index) => {
                self.profile.affiliations.remove(index);
                true
            }
            None => false,
        }
    }

    /// Add an interest tag. Empty (after trimming) and duplicate tags are ignored.
    pub fn add_interest(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.profile.interests.iter().any(|i| i == tag) {
            return false;
        }
        self.profile.interests.push(tag.to_string());
        true
    }

    /// Remove an interest tag (exact match). Returns false if absent.
    pub fn remove_interest(&mut self, tag: &str) -> bool {
        let before = self.profile.interests.len();
        self.profile.interests.retain(|i| i != tag);
        self.profile.interests.len() != before
    }

    /// Fill name and avatar from an identity source, leaving alone anything
    /// the user already edited.
    pub fn prefill(&mut self, claims: &IdentityClaims) {
        if let Some(display_name) = claims.display_name.as_deref() {
            let (first, last) = split_display_name(display_name);
            if let Some(first) = first {
                self.prefill_field(PrefillField::FirstName, first);
            }
            if let Some(last) = last {
                self.prefill_field(PrefillField::LastName, last);
            }
        }
        if let Some(photo) = claims.photo_url.as_deref() {
            if !photo.trim().is_empty() {
                self.prefill_field(PrefillField::Avatar, photo.trim());
            }
        }
    }

    fn prefill_field(&mut self, field: PrefillField, value: &str) {
        if self.edited.contains(&field) {
            debug!(field = ?field, "Skipping pre-population of user-edited field");
            return;
        }
        let slot = match field {
            PrefillField::FirstName => &mut self.profile.first_name,
            PrefillField::LastName => &mut self.profile.last_name,
            PrefillField::Avatar => &mut self.profile.avatar,
        };
        *slot = value.to_string();
    }

    /// Owned copy of the whole profile.
    pub fn snapshot(&self) -> UserProfile {
        self.profile.clone()
    }
}

/// Split a display name at the first whitespace run into first and last name.
fn split_display_name(display_name: &str) -> (Option<&str>, Option<&str>) {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => {
            let rest = rest.trim();
            (Some(first), (!rest.is_empty()).then_some(rest))
        }
        None => (Some(trimmed), None),
    }
}
