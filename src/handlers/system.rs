use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::SystemStatus;
use crate::AppState;

/// Inventory counts and currently-online switches, for the dashboard header
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let mut online_switches = state.store.online_switches().await;
    online_switches.sort_by(|a, b| a.address.cmp(&b.address));
    Json(SystemStatus {
        switches: state.store.counts().await,
        online_switches,
    })
}
