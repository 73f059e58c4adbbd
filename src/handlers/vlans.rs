use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::models::{CreateVlanRequest, MessageResponse, SwitchQuery, SwitchRecord, VlanRecord};
use crate::resolver::ConnectionResolver;
use crate::utils::{validate_vlan_id, validate_vlan_name};
use crate::AppState;

use super::ApiError;

async fn known_switch(state: &AppState, address: &str) -> Result<SwitchRecord, ApiError> {
    state
        .store
        .get_switch(address)
        .await
        .ok_or_else(|| ApiError::not_found("switch"))
}

/// List VLANs live from a switch
pub async fn list_vlans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SwitchQuery>,
) -> Result<Json<Vec<VlanRecord>>, ApiError> {
    known_switch(&state, &query.switch).await?;
    state.resolver.ensure_session(&query.switch).await?;
    let vlans = state.client.list_vlans(&query.switch).await?;
    Ok(Json(vlans))
}

/// Create a VLAN on a switch.
///
/// Input validation and the central-management gate both run before any
/// network call; a doomed request never reaches the device.
pub async fn create_vlan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVlanRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let record = known_switch(&state, &req.switch).await?;
    validate_vlan_id(req.id).map_err(ApiError::validation)?;
    let name = validate_vlan_name(&req.name).map_err(ApiError::validation)?;
    ConnectionResolver::check_write_allowed(&record)?;

    state.resolver.ensure_session(&req.switch).await?;
    let created = state.client.create_vlan(&req.switch, req.id, &name).await?;

    let message = if created {
        format!("Created VLAN {} ('{}') on {}", req.id, name, req.switch)
    } else {
        format!("VLAN {} already exists on {}", req.id, req.switch)
    };
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(MessageResponse { message })))
}

/// Delete a VLAN from a switch
pub async fn delete_vlan(
    State(state): State<Arc<AppState>>,
    Path(vlan_id): Path<u16>,
    Query(query): Query<SwitchQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let record = known_switch(&state, &query.switch).await?;
    validate_vlan_id(vlan_id).map_err(ApiError::validation)?;
    ConnectionResolver::check_write_allowed(&record)?;

    state.resolver.ensure_session(&query.switch).await?;
    let deleted = state.client.delete_vlan(&query.switch, vlan_id).await?;

    let message = if deleted {
        format!("Deleted VLAN {} from {}", vlan_id, query.switch)
    } else {
        format!("VLAN {} does not exist on {}", vlan_id, query.switch)
    };
    Ok(Json(MessageResponse { message }))
}

#[cfg(test)]
mod tests {
    use crate::models::{InterfaceRecord, ManagementMode, SwitchRecord, VlanRecord};
    use crate::rest::types::SystemInfo;
    use crate::rest::{SwitchApi, SwitchError};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Accepts every login and counts write calls, so tests can assert that
    /// locally-gated requests never reach the device.
    #[derive(Default)]
    struct CountingSwitch {
        write_calls: AtomicUsize,
    }

    #[async_trait]
    impl SwitchApi for CountingSwitch {
        async fn login(&self, _: &str, _: &str, _: &str) -> Result<(), SwitchError> {
            Ok(())
        }

        async fn has_session(&self, _: &str) -> bool {
            true
        }

        async fn system_info(&self, _: &str) -> Result<SystemInfo, SwitchError> {
            Ok(SystemInfo::default())
        }

        async fn list_vlans(&self, _: &str) -> Result<Vec<VlanRecord>, SwitchError> {
            Ok(vec![VlanRecord {
                id: 1,
                name: "DEFAULT_VLAN_1".to_string(),
                admin_state: Some("up".to_string()),
                oper_state: Some("up".to_string()),
            }])
        }

        async fn create_vlan(&self, _: &str, _: u16, _: &str) -> Result<bool, SwitchError> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        async fn delete_vlan(&self, _: &str, _: u16) -> Result<bool, SwitchError> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        async fn list_interfaces(&self, _: &str) -> Result<Vec<InterfaceRecord>, SwitchError> {
            Ok(vec![])
        }

        async fn set_interface_admin(&self, _: &str, _: &str, _: bool) -> Result<(), SwitchError> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn cleanup_sessions(&self, _: &str) {}
    }

    async fn test_app(central: bool) -> (axum::Router, Arc<CountingSwitch>) {
        let switch = Arc::new(CountingSwitch::default());
        let state = crate::test_state(Arc::clone(&switch) as Arc<dyn SwitchApi>);
        let mut record = SwitchRecord::new("10.0.0.3", None);
        if central {
            record.management_mode = ManagementMode::Central;
        }
        state.store.add_switch(record).await;
        (crate::router::build(state, "/nonexistent"), switch)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn central_managed_write_is_rejected_without_network_call() {
        let (app, switch) = test_app(true).await;

        let resp = app
            .oneshot(post_json(
                "/api/vlans",
                serde_json::json!({"switch": "10.0.0.3", "id": 200, "name": "X"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = json_body(resp).await;
        assert_eq!(body["error_type"], "central_management");
        assert_eq!(switch.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_vlan_id_is_rejected_locally() {
        let (app, switch) = test_app(false).await;

        let resp = app
            .oneshot(post_json(
                "/api/vlans",
                serde_json::json!({"switch": "10.0.0.3", "id": 5000, "name": "X"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(switch.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reserved_vlan_cannot_be_deleted() {
        let (app, switch) = test_app(false).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/vlans/1?switch=10.0.0.3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(switch.write_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_vlan_on_standalone_switch_succeeds() {
        let (app, switch) = test_app(false).await;

        let resp = app
            .oneshot(post_json(
                "/api/vlans",
                serde_json::json!({"switch": "10.0.0.3", "id": 200, "name": "lab"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(switch.write_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_switch_is_not_found() {
        let (app, _) = test_app(false).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/vlans?switch=10.9.9.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_vlans_returns_live_records() {
        let (app, _) = test_app(false).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/vlans?switch=10.0.0.3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["name"], "DEFAULT_VLAN_1");
    }
}
