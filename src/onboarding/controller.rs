//! FlowController drives the wizard. It owns step transitions and exit
//! gates, runs the affiliation sub-loop, and hands off the finished profile.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::OnboardingError;

use super::draft::{DraftDefaults, ProfileDraft};
use super::model::{
    AffiliationDraft, AffiliationId, AffiliationType, BIO_MAX_CHARS, ProfileSnapshot,
    ProfileUpdate, UserProfile,
};
use super::ports::{
    IdentitySource, NoIdentity, NoPlaceLookup, PersistenceSink, PlaceLookup,
};
use super::state::OnboardingStep;

/// Collaborators a controller talks to.
#[derive(Clone)]
pub struct FlowDeps {
    pub identity: Arc<dyn IdentitySource>,
    pub sink: Arc<dyn PersistenceSink>,
    pub places: Arc<dyn PlaceLookup>,
}

impl FlowDeps {
    /// Dependencies with the given sink, no identity source and no place lookup.
    pub fn new(sink: Arc<dyn PersistenceSink>) -> Self {
        Self {
            identity: Arc::new(NoIdentity),
            sink,
            places: Arc::new(NoPlaceLookup),
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentitySource>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_places(mut self, places: Arc<dyn PlaceLookup>) -> Self {
        self.places = places;
        self
    }
}

/// What the host needs to render the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct FlowStatus {
    pub step: OnboardingStep,
    pub progress_percent: u8,
    /// The progress indicator is hidden on the success screen.
    pub shows_progress: bool,
    pub can_go_back: bool,
    /// Whether the current step's exit gate holds ("Next" enabled).
    pub can_advance: bool,
    pub profile: UserProfile,
}

/// State machine for one onboarding session.
///
/// Owns the session's [`ProfileDraft`] exclusively. All transitions are
/// synchronous; the only asynchronous work is the save dispatched by
/// [`FlowController::finish`], which the state machine never waits on.
pub struct FlowController {
    step: OnboardingStep,
    draft: ProfileDraft,
    deps: FlowDeps,
}

impl FlowController {
    pub fn new(deps: FlowDeps) -> Self {
        Self::with_defaults(&DraftDefaults::default(), deps)
    }

    pub fn with_defaults(defaults: &DraftDefaults, deps: FlowDeps) -> Self {
        Self {
            step: OnboardingStep::default(),
            draft: ProfileDraft::new(defaults),
            deps,
        }
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn status(&self) -> FlowStatus {
        FlowStatus {
            step: self.step,
            progress_percent: self.step.progress_percent(),
            shows_progress: !self.step.is_terminal(),
            can_go_back: self.step != OnboardingStep::Identity && !self.step.is_terminal(),
            can_advance: self.can_advance(),
            profile: self.draft.snapshot(),
        }
    }

    /// Whether the current step's exit gate holds.
    pub fn can_advance(&self) -> bool {
        let draft = &self.draft;
        match self.step {
            OnboardingStep::Identity => {
                !draft.first_name().trim().is_empty()
                    && !draft.last_name().trim().is_empty()
                    && !draft.date_of_birth().trim().is_empty()
            }
            OnboardingStep::Gender => draft.gender().is_some(),
            // Affiliation candidates are gated inside submit_affiliation
            OnboardingStep::Personal
            | OnboardingStep::AffiliationEntry
            | OnboardingStep::Journey => true,
            OnboardingStep::Success => false,
        }
    }

    /// Move to the next step if the exit gate holds. Refused silently
    /// otherwise; clamped at Success.
    pub fn advance(&mut self) -> OnboardingStep {
        let Some(next) = self.step.next() else {
            return self.step;
        };
        if !self.can_advance() {
            debug!(step = %self.step, "Exit gate not satisfied, staying put");
            return self.step;
        }
        self.transition(next)
    }

    /// Move to the previous step; clamped at Identity. Never validates.
    pub fn retreat(&mut self) -> OnboardingStep {
        match self.step.previous() {
            Some(previous) => self.transition(previous),
            None => self.step,
        }
    }

    /// Merge a profile edit. A bio over the length bound is rejected and the
    /// draft left unchanged.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), OnboardingError> {
        if let Some(bio) = update.bio.as_deref() {
            let length = bio.chars().count();
            if length > BIO_MAX_CHARS {
                return Err(OnboardingError::BioTooLong {
                    length,
                    max: BIO_MAX_CHARS,
                });
            }
        }
        self.draft.merge(update);
        Ok(())
    }

    pub fn add_interest(&mut self, tag: &str) -> bool {
        self.draft.add_interest(tag)
    }

    pub fn remove_interest(&mut self, tag: &str) -> bool {
        self.draft.remove_interest(tag)
    }

    /// Swap the avatar for a freshly generated placeholder image.
    pub fn shuffle_avatar(&mut self) -> String {
        let avatar = format!(
            "https://picsum.photos/seed/{}/400/400",
            Uuid::new_v4().simple()
        );
        self.draft.merge(ProfileUpdate {
            avatar: Some(avatar.clone()),
            ..Default::default()
        });
        avatar
    }

    /// Add an affiliation from the entry step and jump straight to Journey.
    ///
    /// Invalid candidates, or calls from any other step, are refused and
    /// leave both the draft and the step unchanged.
    pub fn submit_affiliation(&mut self, candidate: AffiliationDraft) -> Option<AffiliationId> {
        if self.step != OnboardingStep::AffiliationEntry {
            debug!(step = %self.step, "Ignoring affiliation submitted outside the entry step");
            return None;
        }
        let kind = candidate.kind;
        let Some(id) = self.draft.add_affiliation(candidate) else {
            debug!("Ignoring incomplete affiliation");
            return None;
        };
        info!(
            affiliation_id = %id,
            kind = ?kind,
            total = self.draft.affiliations().len(),
            "Affiliation added"
        );
        self.transition(OnboardingStep::Journey);
        Some(id)
    }

    /// Loop from Journey back to the entry step to add another affiliation.
    pub fn request_another_affiliation(&mut self) -> OnboardingStep {
        if self.step != OnboardingStep::Journey {
            debug!(step = %self.step, "Ignoring add-another outside the journey step");
            return self.step;
        }
        self.transition(OnboardingStep::AffiliationEntry)
    }

    /// Remove an affiliation while reviewing the journey. Unknown ids are a
    /// no-op. There is no minimum count.
    pub fn remove_affiliation_at(&mut self, id: AffiliationId) -> bool {
        if self.step != OnboardingStep::Journey {
            debug!(step = %self.step, "Ignoring affiliation removal outside the journey step");
            return false;
        }
        let removed = self.draft.remove_affiliation(id);
        if removed {
            info!(affiliation_id = %id, "Affiliation removed");
        } else {
            debug!(affiliation_id = %id, "No affiliation with this id");
        }
        removed
    }

    /// Complete the journey: hand a snapshot to the persistence sink and move
    /// to Success without waiting for the save.
    ///
    /// Only valid from Journey. The returned handle lets a caller observe the
    /// background save; its outcome is only ever logged.
    pub fn finish(&mut self) -> Option<JoinHandle<()>> {
        if self.step != OnboardingStep::Journey {
            debug!(step = %self.step, "Ignoring finish outside the journey step");
            return None;
        }
        let snapshot = ProfileSnapshot::new(self.draft.snapshot());
        let handle = self.dispatch_save(snapshot);
        self.advance();
        handle
    }

    /// Pre-populate the draft from the identity source. Fields the user has
    /// already edited are kept.
    pub async fn prefill_from_identity(&mut self) {
        match self.deps.identity.identity().await {
            Some(claims) => {
                debug!("Pre-populating draft from identity source");
                self.draft.prefill(&claims);
            }
            None => debug!("No identity available for pre-population"),
        }
    }

    /// Name suggestions for the affiliation being typed. Lookup failures
    /// degrade to no suggestions.
    pub async fn suggest_places(&self, query: &str, kind: Option<AffiliationType>) -> Vec<String> {
        lookup_places(self.deps.places.as_ref(), query, kind).await
    }

    /// The session's place lookup, for callers that must not hold the
    /// controller while the lookup runs.
    pub fn place_lookup(&self) -> Arc<dyn PlaceLookup> {
        Arc::clone(&self.deps.places)
    }

    fn transition(&mut self, target: OnboardingStep) -> OnboardingStep {
        debug_assert!(
            self.step.can_transition_to(target),
            "{} -> {} is not a wizard edge",
            self.step,
            target
        );
        info!(from = %self.step, to = %target, "Onboarding step changed");
        self.step = target;
        target
    }

    fn dispatch_save(&self, snapshot: ProfileSnapshot) -> Option<JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("No async runtime, finished profile was not persisted: {}", e);
                return None;
            }
        };
        let sink = Arc::clone(&self.deps.sink);
        Some(runtime.spawn(async move {
            let affiliations = snapshot.profile.affiliations.len();
            match sink.save(snapshot).await {
                Ok(()) => info!(affiliations, "Finished profile persisted"),
                Err(e) => warn!("Failed to persist finished profile: {}", e),
            }
        }))
    }
}

/// Query `places` for names matching `query` within the categories of
/// `kind`. Blank queries and lookup failures yield no suggestions.
pub async fn lookup_places(
    places: &dyn PlaceLookup,
    query: &str,
    kind: Option<AffiliationType>,
) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let categories = kind
        .map(|k| k.place_categories())
        .unwrap_or(AffiliationType::Other.place_categories());
    match places.suggest(query, categories).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Place lookup failed for {:?}: {}", query, e);
            Vec::new()
        }
    }
}
