// src/server/handlers.rs
// Session and recommendation handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::chat::{drive_round, ChatEvent, RecommendationParams, RecommendationVersion, Round};
use crate::error::{AcError, Result};
use crate::knowledge;
use crate::session::Session;
use crate::state::AppState;

pub async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

// ==================== Sessions ====================

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

pub async fn create_session_handler(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.sessions.create();
    Json(SessionResponse {
        session_id: session.id.clone(),
    })
}

pub async fn reset_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let session = lookup(&state, &id)?;
    // A reset also abandons whatever round is still streaming.
    session.abort_round();
    session.conversation.lock().await.reset();
    Ok(Json(json!({ "reset": true })))
}

fn lookup(state: &AppState, id: &str) -> Result<Arc<Session>> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AcError::NotFound("session".to_string()))
}

// ==================== Recommendation rounds ====================

#[derive(Deserialize)]
pub struct RecommendRequest {
    /// Floor-plan image as a data URL.
    pub image: String,
    #[serde(flatten)]
    pub params: RecommendationParams,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RecommendRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let session = lookup(&state, &id)?;
    let guard = session.begin_round()?;

    let staged: Result<Round> = async {
        let digest = knowledge::build_digest(state.store.as_ref()).await?;
        session
            .conversation
            .lock()
            .await
            .prepare_initial(&req.params, &req.image, &digest)
    }
    .await;

    let round = match staged {
        Ok(round) => round,
        Err(e) => {
            session.finish_round(&guard);
            return Err(e);
        }
    };

    Ok(spawn_round(state, session, guard, round))
}

pub async fn feedback_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let session = lookup(&state, &id)?;
    let guard = session.begin_round()?;

    let round = match session
        .conversation
        .lock()
        .await
        .prepare_continuation(&req.feedback)
    {
        Ok(round) => round,
        Err(e) => {
            session.finish_round(&guard);
            return Err(e);
        }
    };

    Ok(spawn_round(state, session, guard, round))
}

/// Run the round on its own task; the response is the event stream.
fn spawn_round(
    state: AppState,
    session: Arc<Session>,
    guard: crate::session::RoundGuard,
    round: Round,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<ChatEvent>(32);
    let client = state.chat.clone();
    let conversation = session.conversation.clone();
    let token = guard.token.clone();

    tokio::spawn(async move {
        drive_round(&client, conversation, round, token, tx).await;
        session.finish_round(&guard);
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(Event::default().data(data))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn abort_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let session = lookup(&state, &id)?;
    let aborted = session.abort_round();
    Ok(Json(json!({ "aborted": aborted })))
}

// ==================== Versions ====================

#[derive(Serialize)]
pub struct VersionsResponse {
    pub current_id: Option<i64>,
    pub versions: Vec<RecommendationVersion>,
}

pub async fn versions_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VersionsResponse>> {
    let session = lookup(&state, &id)?;
    let convo = session.conversation.lock().await;
    Ok(Json(VersionsResponse {
        current_id: convo.versions.current_id(),
        versions: convo.versions.versions().to_vec(),
    }))
}

pub async fn select_version_handler(
    State(state): State<AppState>,
    Path((id, version_id)): Path<(String, i64)>,
) -> Result<Json<serde_json::Value>> {
    let session = lookup(&state, &id)?;
    let mut convo = session.conversation.lock().await;
    if !convo.versions.set_current(version_id) {
        return Err(AcError::NotFound("version".to_string()));
    }
    Ok(Json(json!({ "current_id": version_id })))
}

pub async fn export_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let session = lookup(&state, &id)?;
    let convo = session.conversation.lock().await;
    let version = convo
        .versions
        .current()
        .ok_or_else(|| AcError::NotFound("recommendation".to_string()))?;

    let mut body = format!("{}\n\n", version.title);
    if let Some(feedback) = &version.user_feedback {
        body.push_str(&format!("Feedback: {feedback}\n\n"));
    }
    body.push_str(&version.content);

    let filename = format!("ac-plan-{}.txt", Utc::now().format("%Y-%m-%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

// ==================== Public knowledge pages ====================

pub async fn products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::store::AcProduct>>> {
    Ok(Json(state.store.all_products().await?))
}

pub async fn cases_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::store::HistoricalCase>>> {
    Ok(Json(state.store.all_cases().await?))
}
