use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{ConnectionReport, CreateSwitchRequest, MessageResponse, SwitchRecord};
use crate::utils::is_valid_address;
use crate::AppState;

use super::{created, ApiError};

/// List all switches in the inventory
pub async fn list_switches(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SwitchRecord>> {
    Json(state.store.list_switches().await)
}

/// Add a switch and immediately test connectivity.
///
/// The record is created first and kept whatever the test outcome, so a
/// failed first contact still leaves an entry the user can retest; the
/// response then carries the classified failure.
pub async fn create_switch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSwitchRequest>,
) -> Result<(StatusCode, Json<SwitchRecord>), ApiError> {
    let address = req.address.trim().to_string();
    if address.is_empty() {
        return Err(ApiError::validation("address is required"));
    }
    if !is_valid_address(&address) {
        return Err(ApiError::validation("invalid switch address"));
    }
    if state.store.has_switch(&address).await {
        return Err(ApiError::conflict(format!(
            "switch {} already exists",
            address
        )));
    }

    state
        .store
        .add_switch(SwitchRecord::new(address.clone(), req.name.clone()))
        .await;

    let explicit = req
        .username
        .filter(|u| !u.is_empty())
        .map(|u| (u, req.password.unwrap_or_default()));

    state.resolver.resolve(&address, explicit).await?;

    let record = state
        .store
        .get_switch(&address)
        .await
        .ok_or_else(|| ApiError::not_found("switch"))?;
    Ok(created(record))
}

/// Remove a switch and its saved credentials
pub async fn delete_switch(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.store.remove_switch(&address).await {
        return Err(ApiError::not_found("switch"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Re-test connectivity using saved/default credentials only
pub async fn test_switch(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<ConnectionReport>, ApiError> {
    if !state.store.has_switch(&address).await {
        return Err(ApiError::not_found("switch"));
    }
    let report = state.resolver.resolve(&address, None).await?;
    Ok(Json(report))
}

/// Session-limit recovery: tear down API sessions on the device
pub async fn cleanup_sessions(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.store.has_switch(&address).await {
        return Err(ApiError::not_found("switch"));
    }
    state.client.cleanup_sessions(&address).await;
    Ok(Json(MessageResponse {
        message: format!("Session cleanup attempted for {}", address),
    }))
}
