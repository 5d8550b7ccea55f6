//! REST endpoints driving onboarding sessions.
//!
//! Each session owns one [`FlowController`]. Transition endpoints always
//! answer with the session's current status: refused transitions are not
//! errors, the status simply shows the unchanged step.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{ProfileStore, ProfileStoreSink};

use super::controller::{FlowController, FlowDeps, lookup_places};
use super::draft::DraftDefaults;
use super::model::{AffiliationDraft, AffiliationType, Gender, ProfileUpdate};
use super::ports::{IdentityClaims, IdentitySource, NoIdentity, PlaceLookup, StaticIdentity};

type Reply = (StatusCode, Json<Value>);

/// How often the sweeper looks for idle sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A live wizard session.
pub struct Session {
    pub flow: FlowController,
    last_active: Instant,
}

impl Session {
    fn new(flow: FlowController) -> Self {
        Self {
            flow,
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub store: Arc<dyn ProfileStore>,
    pub places: Arc<dyn PlaceLookup>,
    pub defaults: DraftDefaults,
}

impl OnboardingRouteState {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        places: Arc<dyn PlaceLookup>,
        defaults: DraftDefaults,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            places,
            defaults,
        }
    }

    /// Drop sessions untouched for longer than `max_idle`. Returns how many
    /// were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle).await
    }

    async fn evict_idle_at(&self, now: Instant, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now.saturating_duration_since(session.last_active) <= max_idle);
        before - sessions.len()
    }
}

/// Spawn the background loop that drops idle sessions.
pub fn spawn_session_sweeper(state: OnboardingRouteState, max_idle: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(idle_secs = max_idle.as_secs(), "Session sweeper started");

        let period = SWEEP_INTERVAL.min(max_idle).max(Duration::from_secs(1));
        let mut tick = tokio::time::interval(period);

        loop {
            tick.tick().await;
            let evicted = state.evict_idle(max_idle).await;
            if evicted > 0 {
                info!(evicted, "Dropped idle onboarding sessions");
            }
        }
    })
}

/// Body of `POST /api/onboarding/sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Key the finished profile is stored under; defaults to the session id.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub identity: IdentityClaims,
}

#[derive(Debug, Deserialize)]
struct InterestRequest {
    tag: String,
}

#[derive(Debug, Deserialize)]
struct PlacesQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    kind: Option<AffiliationType>,
}

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, Reply> {
    Uuid::parse_str(raw).map_err(|_| error(StatusCode::BAD_REQUEST, &format!("Invalid {what} ID")))
}

fn status_reply(flow: &FlowController) -> Reply {
    (StatusCode::OK, Json(json!(flow.status())))
}

/// Run `f` against the session's controller and reply with its status.
async fn with_session<F>(state: &OnboardingRouteState, id: &str, f: F) -> Reply
where
    F: FnOnce(&mut FlowController) -> Result<(), Reply>,
{
    let session_id = match parse_id(id, "session") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let mut sessions = state.sessions.write().await;
    let Some(session) = sessions.get_mut(&session_id) else {
        return error(StatusCode::NOT_FOUND, "Session not found");
    };
    session.touch();
    match f(&mut session.flow) {
        Ok(()) => status_reply(&session.flow),
        Err(reply) => reply,
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "reconnect-onboarding"
    }))
}

/// GET /api/onboarding/options
///
/// Choices for the gender and affiliation-kind pickers, in display order.
async fn options() -> Json<Value> {
    let genders: Vec<Value> = Gender::ALL
        .iter()
        .map(|g| json!({ "value": g, "label": g.label() }))
        .collect();
    let kinds: Vec<Value> = AffiliationType::ALL
        .iter()
        .map(|k| json!({ "value": k, "label": k.label() }))
        .collect();
    Json(json!({
        "genders": genders,
        "affiliation_kinds": kinds,
    }))
}

/// POST /api/onboarding/sessions
///
/// Starts a session, pre-populating the draft from any identity supplied.
async fn create_session(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<CreateSessionRequest>,
) -> Reply {
    let session_id = Uuid::new_v4();
    let user_id = req
        .user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| session_id.to_string());

    let identity: Arc<dyn IdentitySource> =
        if req.identity.display_name.is_some() || req.identity.photo_url.is_some() {
            Arc::new(StaticIdentity::new(req.identity))
        } else {
            Arc::new(NoIdentity)
        };
    let sink = Arc::new(ProfileStoreSink::new(Arc::clone(&state.store), user_id.clone()));
    let deps = FlowDeps::new(sink)
        .with_identity(identity)
        .with_places(Arc::clone(&state.places));

    let mut flow = FlowController::with_defaults(&state.defaults, deps);
    flow.prefill_from_identity().await;
    let status = flow.status();

    state
        .sessions
        .write()
        .await
        .insert(session_id, Session::new(flow));
    info!(session_id = %session_id, user_id = %user_id, "Onboarding session started");

    (
        StatusCode::CREATED,
        Json(json!({
            "session_id": session_id,
            "user_id": user_id,
            "status": status,
        })),
    )
}

/// GET /api/onboarding/sessions/{id}
async fn get_session(State(state): State<OnboardingRouteState>, Path(id): Path<String>) -> Reply {
    let session_id = match parse_id(&id, "session") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    match state.sessions.read().await.get(&session_id) {
        Some(session) => status_reply(&session.flow),
        None => error(StatusCode::NOT_FOUND, "Session not found"),
    }
}

/// DELETE /api/onboarding/sessions/{id}
///
/// Drops the session. A save already dispatched by finish still completes.
async fn delete_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
) -> Reply {
    let session_id = match parse_id(&id, "session") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    match state.sessions.write().await.remove(&session_id) {
        Some(_) => {
            info!(session_id = %session_id, "Onboarding session closed");
            (StatusCode::OK, Json(json!({ "deleted": session_id })))
        }
        None => error(StatusCode::NOT_FOUND, "Session not found"),
    }
}

/// PATCH /api/onboarding/sessions/{id}/profile
async fn update_profile(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Reply {
    with_session(&state, &id, |flow| {
        flow.update_profile(update)
            .map_err(|e| error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
    })
    .await
}

async fn add_interest(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
    Json(req): Json<InterestRequest>,
) -> Reply {
    with_session(&state, &id, |flow| {
        flow.add_interest(&req.tag);
        Ok(())
    })
    .await
}

async fn remove_interest(
    State(state): State<OnboardingRouteState>,
    Path((id, tag)): Path<(String, String)>,
) -> Reply {
    with_session(&state, &id, |flow| {
        flow.remove_interest(&tag);
        Ok(())
    })
    .await
}

async fn shuffle_avatar(State(state): State<OnboardingRouteState>, Path(id): Path<String>) -> Reply {
    with_session(&state, &id, |flow| {
        flow.shuffle_avatar();
        Ok(())
    })
    .await
}

async fn advance(State(state): State<OnboardingRouteState>, Path(id): Path<String>) -> Reply {
    with_session(&state, &id, |flow| {
        flow.advance();
        Ok(())
    })
    .await
}

async fn retreat(State(state): State<OnboardingRouteState>, Path(id): Path<String>) -> Reply {
    with_session(&state, &id, |flow| {
        flow.retreat();
        Ok(())
    })
    .await
}

async fn submit_affiliation(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
    Json(candidate): Json<AffiliationDraft>,
) -> Reply {
    with_session(&state, &id, |flow| {
        flow.submit_affiliation(candidate);
        Ok(())
    })
    .await
}

async fn request_another_affiliation(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
) -> Reply {
    with_session(&state, &id, |flow| {
        flow.request_another_affiliation();
        Ok(())
    })
    .await
}

async fn remove_affiliation(
    State(state): State<OnboardingRouteState>,
    Path((id, affiliation_id)): Path<(String, String)>,
) -> Reply {
    let affiliation_id = match parse_id(&affiliation_id, "affiliation") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    with_session(&state, &id, |flow| {
        flow.remove_affiliation_at(affiliation_id);
        Ok(())
    })
    .await
}

/// POST /api/onboarding/sessions/{id}/finish
///
/// The save runs in the background; the reply already shows Success.
async fn finish(State(state): State<OnboardingRouteState>, Path(id): Path<String>) -> Reply {
    with_session(&state, &id, |flow| {
        // Dropping the handle detaches the save task
        let _ = flow.finish();
        Ok(())
    })
    .await
}

/// GET /api/onboarding/sessions/{id}/places?q=&kind=
async fn suggest_places(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<String>,
    Query(query): Query<PlacesQuery>,
) -> Reply {
    let session_id = match parse_id(&id, "session") {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    // The lookup may be slow; don't hold the session map while it runs
    let places = match state.sessions.read().await.get(&session_id) {
        Some(session) => session.flow.place_lookup(),
        None => return error(StatusCode::NOT_FOUND, "Session not found"),
    };
    let suggestions = lookup_places(places.as_ref(), &query.q, query.kind).await;
    (StatusCode::OK, Json(json!({ "suggestions": suggestions })))
}

/// GET /api/onboarding/profiles/{user_id}
///
/// Returns the persisted profile, or 404 if none has been saved yet.
async fn get_profile(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Reply {
    match state.store.get_profile(&user_id).await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(json!(snapshot))),
        Ok(None) => error(StatusCode::NOT_FOUND, "No profile exists yet"),
        Err(e) => {
            warn!(user_id = %user_id, "Failed to load profile: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load profile")
        }
    }
}

/// DELETE /api/onboarding/profiles/{user_id}
async fn delete_profile(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Reply {
    match state.store.delete_profile(&user_id).await {
        Ok(true) => {
            info!(user_id = %user_id, "Profile deleted");
            (StatusCode::OK, Json(json!({ "deleted": user_id })))
        }
        Ok(false) => error(StatusCode::NOT_FOUND, "No profile exists yet"),
        Err(e) => {
            warn!(user_id = %user_id, "Failed to delete profile: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete profile")
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/options", get(options))
        .route("/api/onboarding/sessions", post(create_session))
        .route(
            "/api/onboarding/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/onboarding/sessions/{id}/profile", patch(update_profile))
        .route("/api/onboarding/sessions/{id}/interests", post(add_interest))
        .route(
            "/api/onboarding/sessions/{id}/interests/{tag}",
            delete(remove_interest),
        )
        .route(
            "/api/onboarding/sessions/{id}/avatar/shuffle",
            post(shuffle_avatar),
        )
        .route("/api/onboarding/sessions/{id}/advance", post(advance))
        .route("/api/onboarding/sessions/{id}/retreat", post(retreat))
        .route(
            "/api/onboarding/sessions/{id}/affiliations",
            post(submit_affiliation),
        )
        .route(
            "/api/onboarding/sessions/{id}/affiliations/another",
            post(request_another_affiliation),
        )
        .route(
            "/api/onboarding/sessions/{id}/affiliations/{affiliation_id}",
            delete(remove_affiliation),
        )
        .route("/api/onboarding/sessions/{id}/finish", post(finish))
        .route("/api/onboarding/sessions/{id}/places", get(suggest_places))
        .route(
            "/api/onboarding/profiles/{user_id}",
            get(get_profile).delete(delete_profile),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;
    use crate::error::PlaceLookupError;
    use crate::onboarding::model::ProfileSnapshot;
    use crate::onboarding::ports::StaticPlaceLookup;
    use crate::store::LibSqlBackend;

    /// Lookup that parks every query until released.
    #[derive(Default)]
    struct ParkedLookup {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl PlaceLookup for ParkedLookup {
        async fn suggest(
            &self,
            _query: &str,
            _categories: &[&str],
        ) -> Result<Vec<String>, PlaceLookupError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec!["Lincoln Diner".to_string()])
        }
    }

    async fn state_with(places: Arc<dyn PlaceLookup>) -> OnboardingRouteState {
        let store: Arc<dyn ProfileStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        OnboardingRouteState::new(store, places, DraftDefaults::default())
    }

    async fn test_state() -> OnboardingRouteState {
        state_with(Arc::new(StaticPlaceLookup::new([(
            "school".to_string(),
            "Lincoln High School".to_string(),
        )])))
        .await
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn new_session(app: &Router, body: Value) -> String {
        let (status, json) = call(app, "POST", "/api/onboarding/sessions", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_session_prefills_identity() {
        let app = onboarding_routes(test_state().await);
        let (status, json) = call(
            &app,
            "POST",
            "/api/onboarding/sessions",
            Some(json!({"display_name": "Jane Doe", "photo_url": "https://example.com/j.png"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"]["step"], "identity");
        assert_eq!(json["status"]["profile"]["first_name"], "Jane");
        assert_eq!(json["status"]["profile"]["last_name"], "Doe");
        assert_eq!(json["status"]["profile"]["avatar"], "https://example.com/j.png");
        assert_eq!(json["user_id"], json["session_id"]);
    }

    #[tokio::test]
    async fn unknown_and_malformed_sessions() {
        let app = onboarding_routes(test_state().await);
        let (status, _) = call(&app, "GET", "/api/onboarding/sessions/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/api/onboarding/sessions/{}/advance", Uuid::new_v4());
        let (status, json) = call(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Session not found");
    }

    #[tokio::test]
    async fn refused_advance_reports_unchanged_step() {
        let app = onboarding_routes(test_state().await);
        let id = new_session(&app, json!({})).await;

        let (status, json) =
            call(&app, "POST", &format!("/api/onboarding/sessions/{id}/advance"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["step"], "identity");
        assert_eq!(json["can_advance"], false);
    }

    #[tokio::test]
    async fn long_bio_is_unprocessable() {
        let app = onboarding_routes(test_state().await);
        let id = new_session(&app, json!({})).await;

        let (status, json) = call(
            &app,
            "PATCH",
            &format!("/api/onboarding/sessions/{id}/profile"),
            Some(json!({"bio": "x".repeat(200)})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"].as_str().unwrap().contains("200 > 150"));
    }

    #[tokio::test]
    async fn interests_add_and_remove() {
        let app = onboarding_routes(test_state().await);
        let id = new_session(&app, json!({})).await;

        let uri = format!("/api/onboarding/sessions/{id}/interests");
        call(&app, "POST", &uri, Some(json!({"tag": "Chess"}))).await;
        let (_, json) = call(&app, "POST", &uri, Some(json!({"tag": "Chess"}))).await;
        assert_eq!(
            json["profile"]["interests"],
            json!(["Hiking", "Vinyl Records", "Coffee", "Chess"])
        );

        let (_, json) = call(
            &app,
            "DELETE",
            &format!("/api/onboarding/sessions/{id}/interests/Vinyl%20Records"),
            None,
        )
        .await;
        assert_eq!(json["profile"]["interests"], json!(["Hiking", "Coffee", "Chess"]));
    }

    #[tokio::test]
    async fn places_are_suggested_by_kind() {
        let app = onboarding_routes(test_state().await);
        let id = new_session(&app, json!({})).await;

        let (status, json) = call(
            &app,
            "GET",
            &format!("/api/onboarding/sessions/{id}/places?q=linc&kind=school"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["suggestions"], json!(["Lincoln High School"]));

        let (_, json) = call(
            &app,
            "GET",
            &format!("/api/onboarding/sessions/{id}/places?q=linc&kind=work"),
            None,
        )
        .await;
        assert_eq!(json["suggestions"], json!([]));
    }

    #[tokio::test]
    async fn options_list_choices_with_labels() {
        let app = onboarding_routes(test_state().await);
        let (status, json) = call(&app, "GET", "/api/onboarding/options", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["genders"].as_array().unwrap().len(), 4);
        assert_eq!(json["genders"][3]["value"], "nosay");
        assert_eq!(json["genders"][3]["label"], "Prefer not to say");
        assert_eq!(json["affiliation_kinds"][0]["value"], "school");
        assert_eq!(json["affiliation_kinds"][0]["label"], "High School");
        assert_eq!(json["affiliation_kinds"][4]["label"], "Other Community");
    }

    #[tokio::test]
    async fn slow_lookup_does_not_block_other_sessions() {
        let lookup = Arc::new(ParkedLookup::default());
        let app = onboarding_routes(state_with(lookup.clone()).await);
        let a = new_session(&app, json!({})).await;
        let b = new_session(&app, json!({})).await;

        let pending = {
            let app = app.clone();
            let uri = format!("/api/onboarding/sessions/{a}/places?q=linc");
            tokio::spawn(async move { call(&app, "GET", &uri, None).await })
        };
        lookup.entered.notified().await;

        let uri = format!("/api/onboarding/sessions/{b}/advance");
        let advance = call(&app, "POST", &uri, None);
        let (status, json) = tokio::time::timeout(Duration::from_secs(2), advance)
            .await
            .expect("advance blocked behind the place lookup");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["step"], "identity");

        lookup.release.notify_one();
        let (status, json) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["suggestions"], json!(["Lincoln Diner"]));
    }

    #[tokio::test]
    async fn deleted_session_is_gone() {
        let app = onboarding_routes(test_state().await);
        let id = new_session(&app, json!({})).await;
        let uri = format!("/api/onboarding/sessions/{id}");

        let (status, json) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], id.as_str());

        let (status, _) = call(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let state = test_state().await;
        let app = onboarding_routes(state.clone());
        let stale = new_session(&app, json!({})).await;
        let fresh = new_session(&app, json!({})).await;

        let now = Instant::now();
        let idle = Duration::from_secs(300);
        assert_eq!(state.evict_idle_at(now, idle).await, 0);

        // Pretend the fresh session was used well after the stale one
        let fresh_id = Uuid::parse_str(&fresh).unwrap();
        state
            .sessions
            .write()
            .await
            .get_mut(&fresh_id)
            .unwrap()
            .last_active = now + Duration::from_secs(500);

        assert_eq!(state.evict_idle_at(now + Duration::from_secs(600), idle).await, 1);
        let (status, _) = call(&app, "GET", &format!("/api/onboarding/sessions/{stale}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "GET", &format!("/api/onboarding/sessions/{fresh}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn stored_profile_can_be_deleted() {
        let state = test_state().await;
        let snapshot = ProfileSnapshot::new(crate::onboarding::ProfileDraft::default().snapshot());
        state.store.upsert_profile("jane", &snapshot).await.unwrap();
        let app = onboarding_routes(state);

        let (status, json) = call(&app, "DELETE", "/api/onboarding/profiles/jane", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["deleted"], "jane");

        let (status, _) = call(&app, "GET", "/api/onboarding/profiles/jane", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, "DELETE", "/api/onboarding/profiles/jane", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let app = onboarding_routes(test_state().await);
        let (status, json) = call(&app, "GET", "/api/onboarding/profiles/nobody", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No profile exists yet");
    }
}
