use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
use crate::core::{DeliveryFailure, SessionCoordinator};
use crate::models::{
    ErrorResponse, HealthResponse, MatchRequest, PreferenceProfile, RelayRequest, RequesterId, RequesterRequest,
    SessionResponse, StateQuery,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
}

/// Configure all session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/sessions/match", web::post().to(request_match))
        .route("/sessions/cancel", web::post().to(cancel))
        .route("/sessions/end", web::post().to(end_session))
        .route("/sessions/reset", web::post().to(reset))
        .route("/sessions/relay", web::post().to(relay))
        .route("/sessions/state", web::get().to(session_state));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// 200 with the outcome, or 502 with the committed outcome and delivery errors
fn outcome_response<O: Serialize + std::fmt::Debug>(
    requester_id: &RequesterId,
    result: Result<O, DeliveryFailure<O>>,
) -> HttpResponse {
    match result {
        Ok(outcome) => HttpResponse::Ok().json(SessionResponse {
            requester_id: requester_id.to_string(),
            outcome,
            delivery_errors: vec![],
        }),
        Err(failure) => {
            tracing::warn!("{}", failure);
            HttpResponse::BadGateway().json(SessionResponse {
                requester_id: requester_id.to_string(),
                delivery_errors: failure
                    .failures
                    .iter()
                    .map(|(recipient, e)| format!("{}: {}", recipient, e))
                    .collect(),
                outcome: failure.outcome,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let stats = state.coordinator.stats().await;

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        waiting: stats.waiting,
        pairs: stats.pairs,
    })
}

/// Enter matchmaking
///
/// POST /api/v1/sessions/match
///
/// Request body:
/// ```json
/// {
///   "requesterId": "string",
///   "gender": "male|female",
///   "ageBracket": "18_25|26_35|36_45|45_plus",
///   "wantedGender": "male|female|any",
///   "wantedAgeBracket": "18_25|26_35|36_45|45_plus|any"
/// }
/// ```
async fn request_match(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let profile = PreferenceProfile::from(req.into_inner());
    let requester_id = profile.requester_id.clone();

    tracing::info!(
        "Match request from {} ({} {}, wants {} {})",
        requester_id,
        profile.gender,
        profile.age_bracket,
        profile.wanted_gender,
        profile.wanted_age_bracket
    );

    let result = state.coordinator.request_match(profile).await;
    outcome_response(&requester_id, result)
}

/// Leave the waiting pool
///
/// POST /api/v1/sessions/cancel
async fn cancel(state: web::Data<AppState>, req: web::Json<RequesterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let requester_id = RequesterId::from(req.into_inner().requester_id);
    let outcome = state.coordinator.cancel(&requester_id).await;
    outcome_response(&requester_id, Ok(outcome))
}

/// End the current session
///
/// POST /api/v1/sessions/end
async fn end_session(state: web::Data<AppState>, req: web::Json<RequesterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let requester_id = RequesterId::from(req.into_inner().requester_id);
    let result = state.coordinator.end_session(&requester_id).await;
    outcome_response(&requester_id, result)
}

/// Return the requester to idle, whatever it was doing
///
/// POST /api/v1/sessions/reset
async fn reset(state: web::Data<AppState>, req: web::Json<RequesterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let requester_id = RequesterId::from(req.into_inner().requester_id);
    let result = state.coordinator.reset(&requester_id).await;
    outcome_response(&requester_id, result)
}

/// Forward an opaque payload to the sender's partner
///
/// POST /api/v1/sessions/relay
async fn relay(state: web::Data<AppState>, req: web::Json<RelayRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let RelayRequest { requester_id, payload } = req.into_inner();
    let requester_id = RequesterId::from(requester_id);

    match state.coordinator.relay(&requester_id, payload).await {
        Ok(outcome) => outcome_response(&requester_id, Ok(outcome)),
        Err(e) => {
            tracing::error!("Relay from {} failed: {}", requester_id, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Relay delivery failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Current session state for a requester
///
/// GET /api/v1/sessions/state?requesterId={requesterId}
async fn session_state(state: web::Data<AppState>, query: web::Query<StateQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let requester_id = RequesterId::from(query.into_inner().requester_id);
    let session = state.coordinator.state_of(&requester_id).await;
    let matched_at = state
        .coordinator
        .connection(&requester_id)
        .await
        .map(|pair| pair.matched_at);

    HttpResponse::Ok().json(serde_json::json!({
        "requesterId": requester_id,
        "session": session,
        "matchedAt": matched_at,
    }))
}
