//! Onboarding system: the multi-step profile wizard.
//!
//! A [`FlowController`] walks the user through identity, gender, a personal
//! touch, and a repeatable affiliation loop, accumulating a [`ProfileDraft`].
//! Finishing hands a snapshot to the injected [`PersistenceSink`] and moves
//! to the success screen without waiting for the save.

pub mod controller;
pub mod draft;
pub mod model;
pub mod ports;
pub mod routes;
pub mod state;

pub use controller::{FlowController, FlowDeps, FlowStatus, lookup_places};
pub use draft::{DraftDefaults, ProfileDraft};
pub use model::{
    Affiliation, AffiliationDraft, AffiliationId, AffiliationType, Gender, ProfileSnapshot,
    ProfileUpdate, UserProfile,
};
pub use ports::{
    DiscardSink, IdentityClaims, IdentitySource, NoIdentity, NoPlaceLookup, PersistenceSink,
    PlaceLookup, StaticIdentity, StaticPlaceLookup,
};
pub use routes::{OnboardingRouteState, Session, onboarding_routes, spawn_session_sweeper};
pub use state::OnboardingStep;
