// src/server/admin.rs
// Password login plus token-gated catalog CRUD.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AcError, Result};
use crate::state::AppState;
use crate::store::{AcProduct, HistoricalCase};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if req.password != state.admin_password {
        return Err(AcError::Unauthorized);
    }
    let token = Uuid::new_v4().to_string();
    state.admin_tokens.lock().unwrap().insert(token.clone());
    Ok(Json(LoginResponse { token }))
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AcError::Unauthorized)?;
    if state.admin_tokens.lock().unwrap().contains(token) {
        Ok(())
    } else {
        Err(AcError::Unauthorized)
    }
}

// ==================== Products ====================

pub async fn add_product_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(product): Json<AcProduct>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    state.store.add_product(&product).await?;
    Ok(Json(json!({ "id": product.id })))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut product): Json<AcProduct>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    product.id = id;
    if !state.store.update_product(&product).await? {
        return Err(AcError::NotFound("product".to_string()));
    }
    Ok(Json(json!({ "id": product.id })))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    if !state.store.delete_product(&id).await? {
        return Err(AcError::NotFound("product".to_string()));
    }
    Ok(Json(json!({ "deleted": id })))
}

// ==================== Historical cases ====================

pub async fn add_case_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(case): Json<HistoricalCase>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    state.store.add_case(&case).await?;
    Ok(Json(json!({ "id": case.id })))
}

pub async fn update_case_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut case): Json<HistoricalCase>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    case.id = id;
    if !state.store.update_case(&case).await? {
        return Err(AcError::NotFound("case".to_string()));
    }
    Ok(Json(json!({ "id": case.id })))
}

pub async fn delete_case_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    require_admin(&state, &headers)?;
    if !state.store.delete_case(&id).await? {
        return Err(AcError::NotFound("case".to_string()));
    }
    Ok(Json(json!({ "deleted": id })))
}
