use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::models::{InterfaceRecord, MessageResponse, PatchInterfaceRequest, SwitchQuery};
use crate::resolver::ConnectionResolver;
use crate::AppState;

use super::ApiError;

/// List interfaces live from a switch
pub async fn list_interfaces(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SwitchQuery>,
) -> Result<Json<Vec<InterfaceRecord>>, ApiError> {
    if !state.store.has_switch(&query.switch).await {
        return Err(ApiError::not_found("switch"));
    }
    state.resolver.ensure_session(&query.switch).await?;
    let interfaces = state.client.list_interfaces(&query.switch).await?;
    Ok(Json(interfaces))
}

/// Set an interface's admin state. The interface name rides in the body
/// because vendor names contain '/'.
pub async fn patch_interface(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PatchInterfaceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let record = state
        .store
        .get_switch(&req.switch)
        .await
        .ok_or_else(|| ApiError::not_found("switch"))?;
    if req.name.trim().is_empty() {
        return Err(ApiError::validation("interface name is required"));
    }
    ConnectionResolver::check_write_allowed(&record)?;

    state.resolver.ensure_session(&req.switch).await?;
    state
        .client
        .set_interface_admin(&req.switch, &req.name, req.admin_up)
        .await?;

    Ok(Json(MessageResponse {
        message: format!(
            "Interface {} on {} set admin {}",
            req.name,
            req.switch,
            if req.admin_up { "up" } else { "down" }
        ),
    }))
}
