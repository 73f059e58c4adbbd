use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::RwLock;

use super::error::SwitchError;
use super::types::{
    InterfaceDetail, InterfaceIndex, InterfacePatch, SystemInfo, VlanCreate, VlanDetail, VlanIndex,
};
use super::SwitchApi;
use crate::models::{InterfaceRecord, VlanRecord};
use crate::utils::{MAX_VLAN_ID, MIN_VLAN_ID};

/// An authenticated cookie session against one switch.
#[derive(Clone)]
struct Session {
    http: reqwest::Client,
    username: String,
}

/// Switch REST API client.
///
/// The vendor dialect is cookie-session based: a form-encoded login
/// establishes a session cookie, and all further calls ride on it. One
/// authenticated session is cached per switch address; a 401 on any call
/// evicts it.
pub struct RestSwitchClient {
    api_version: String,
    ssl_verify: bool,
    timeout: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl RestSwitchClient {
    pub fn new(api_version: impl Into<String>, ssl_verify: bool, timeout: Duration) -> Self {
        Self {
            api_version: api_version.into(),
            ssl_verify,
            timeout,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn base_url(&self, address: &str) -> String {
        // Test harnesses pass a full http://host:port origin; production
        // addresses are bare IPs/hostnames reached over HTTPS.
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{}/rest/v{}", address.trim_end_matches('/'), self.api_version)
        } else {
            format!("https://{}/rest/v{}", address, self.api_version)
        }
    }

    fn build_http(&self, address: &str) -> Result<reqwest::Client, SwitchError> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.ssl_verify)
            .build()
            .map_err(|e| SwitchError::Unknown {
                address: address.to_string(),
                detail: format!("failed to build HTTP client: {}", e),
            })
    }

    async fn session(&self, address: &str) -> Result<Session, SwitchError> {
        self.sessions
            .read()
            .await
            .get(address)
            .cloned()
            .ok_or_else(|| SwitchError::AuthenticationFailed {
                address: address.to_string(),
                username: "(no session)".to_string(),
            })
    }

    async fn evict(&self, address: &str) -> Option<Session> {
        self.sessions.write().await.remove(address)
    }

    fn transport_error(address: &str, err: reqwest::Error) -> SwitchError {
        if err.is_timeout() {
            SwitchError::Timeout {
                address: address.to_string(),
            }
        } else if err.is_connect() {
            SwitchError::Connection {
                address: address.to_string(),
                detail: format!("{}", err),
            }
        } else {
            SwitchError::Unknown {
                address: address.to_string(),
                detail: format!("{}", err),
            }
        }
    }

    fn looks_central_managed(body: &str) -> bool {
        let lower = body.to_lowercase();
        lower.contains("central") || lower.contains("cloud-managed")
    }

    fn looks_session_limited(body: &str) -> bool {
        let lower = body.to_lowercase();
        lower.contains("session limit")
            || lower.contains("sessions exceeded")
            || lower.contains("too many sessions")
            || lower.contains("max sessions")
    }

    fn classify_login(
        address: &str,
        username: &str,
        status: StatusCode,
        body: &str,
    ) -> SwitchError {
        if Self::looks_session_limited(body) {
            return SwitchError::SessionLimit {
                address: address.to_string(),
            };
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST => {
                SwitchError::AuthenticationFailed {
                    address: address.to_string(),
                    username: username.to_string(),
                }
            }
            StatusCode::GONE => SwitchError::CentralManaged {
                address: address.to_string(),
            },
            StatusCode::FORBIDDEN => {
                if Self::looks_central_managed(body) {
                    SwitchError::CentralManaged {
                        address: address.to_string(),
                    }
                } else {
                    SwitchError::AuthenticationFailed {
                        address: address.to_string(),
                        username: username.to_string(),
                    }
                }
            }
            StatusCode::NOT_FOUND => SwitchError::ApiUnavailable {
                address: address.to_string(),
                detail: "login endpoint not found; REST API may be disabled".to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => SwitchError::SessionLimit {
                address: address.to_string(),
            },
            StatusCode::SERVICE_UNAVAILABLE => SwitchError::ApiUnavailable {
                address: address.to_string(),
                detail: truncate(body),
            },
            _ => SwitchError::Unknown {
                address: address.to_string(),
                detail: format!("login failed: HTTP {} - {}", status.as_u16(), truncate(body)),
            },
        }
    }

    /// Classify a non-success status from an authenticated call. The caller
    /// handles operation-specific 404s (absent VLAN etc.) before this.
    async fn classify_authed(
        &self,
        address: &str,
        username: &str,
        status: StatusCode,
        body: &str,
    ) -> SwitchError {
        match status {
            StatusCode::UNAUTHORIZED => {
                // Session expired or was torn down on the device side.
                self.evict(address).await;
                SwitchError::AuthenticationFailed {
                    address: address.to_string(),
                    username: username.to_string(),
                }
            }
            StatusCode::GONE => SwitchError::CentralManaged {
                address: address.to_string(),
            },
            StatusCode::FORBIDDEN => {
                if Self::looks_central_managed(body) {
                    SwitchError::CentralManaged {
                        address: address.to_string(),
                    }
                } else {
                    SwitchError::PermissionDenied {
                        address: address.to_string(),
                        detail: truncate(body),
                    }
                }
            }
            StatusCode::TOO_MANY_REQUESTS => SwitchError::SessionLimit {
                address: address.to_string(),
            },
            _ => SwitchError::Unknown {
                address: address.to_string(),
                detail: format!("HTTP {} - {}", status.as_u16(), truncate(body)),
            },
        }
    }

    async fn authed_get(
        &self,
        address: &str,
        path: &str,
    ) -> Result<(Session, reqwest::Response), SwitchError> {
        let session = self.session(address).await?;
        let resp = session
            .http
            .get(format!("{}{}", self.base_url(address), path))
            .send()
            .await
            .map_err(|e| Self::transport_error(address, e))?;
        Ok((session, resp))
    }

    async fn vlan_detail(&self, address: &str, id: u16) -> Option<VlanDetail> {
        let (_, resp) = self
            .authed_get(address, &format!("/system/vlans/{}", id))
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json().await.ok()
    }

    async fn interface_detail(&self, address: &str, name: &str) -> Option<InterfaceDetail> {
        let (_, resp) = self
            .authed_get(address, &format!("/system/interfaces/{}", encode_segment(name)))
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json().await.ok()
    }
}

#[async_trait]
impl SwitchApi for RestSwitchClient {
    async fn login(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<(), SwitchError> {
        let http = self.build_http(address)?;

        let resp = http
            .post(format!("{}/login", self.base_url(address)))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| Self::transport_error(address, e))?;

        let status = resp.status();
        if status.is_success() {
            let got_cookie = resp.cookies().next().is_some();
            if !got_cookie {
                return Err(SwitchError::ApiUnavailable {
                    address: address.to_string(),
                    detail: "login succeeded but no session cookie was issued".to_string(),
                });
            }
            tracing::debug!("Authenticated to {} as {}", address, username);
            self.sessions.write().await.insert(
                address.to_string(),
                Session {
                    http,
                    username: username.to_string(),
                },
            );
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Self::classify_login(address, username, status, &body))
    }

    async fn has_session(&self, address: &str) -> bool {
        self.sessions.read().await.contains_key(address)
    }

    async fn system_info(&self, address: &str) -> Result<SystemInfo, SwitchError> {
        let (session, resp) = self.authed_get(address, "/system").await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self
                .classify_authed(address, &session.username, status, &body)
                .await);
        }
        resp.json().await.map_err(|e| SwitchError::Unknown {
            address: address.to_string(),
            detail: format!("malformed system response: {}", e),
        })
    }

    async fn list_vlans(&self, address: &str) -> Result<Vec<VlanRecord>, SwitchError> {
        let (session, resp) = self.authed_get(address, "/system/vlans").await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self
                .classify_authed(address, &session.username, status, &body)
                .await);
        }
        let index: VlanIndex = resp.json().await.map_err(|e| SwitchError::Unknown {
            address: address.to_string(),
            detail: format!("malformed VLAN index: {}", e),
        })?;

        let mut vlans = Vec::with_capacity(index.len());
        for id_str in index.keys() {
            let Ok(id) = id_str.parse::<u16>() else {
                tracing::warn!("Skipping non-numeric VLAN id '{}' from {}", id_str, address);
                continue;
            };
            if !(MIN_VLAN_ID..=MAX_VLAN_ID).contains(&id) {
                tracing::warn!("Skipping out-of-range VLAN id {} from {}", id, address);
                continue;
            }
            // Per-VLAN detail reads are best-effort; a miss falls back to a
            // synthetic name, matching how constrained switches behave under
            // session pressure.
            let detail = self.vlan_detail(address, id).await.unwrap_or_default();
            vlans.push(VlanRecord {
                id,
                name: detail.name.unwrap_or_else(|| format!("VLAN{}", id)),
                admin_state: detail.admin,
                oper_state: detail.oper_state,
            });
        }
        vlans.sort_by_key(|v| v.id);
        tracing::info!("Retrieved {} VLANs from {}", vlans.len(), address);
        Ok(vlans)
    }

    async fn create_vlan(&self, address: &str, id: u16, name: &str) -> Result<bool, SwitchError> {
        let (session, check) = self
            .authed_get(address, &format!("/system/vlans/{}", id))
            .await?;
        if check.status().is_success() {
            tracing::info!("VLAN {} already exists on {}", id, address);
            return Ok(false);
        }

        let resp = session
            .http
            .put(format!("{}/system/vlans/{}", self.base_url(address), id))
            .json(&VlanCreate {
                name: name.to_string(),
                admin: "up".to_string(),
            })
            .send()
            .await
            .map_err(|e| Self::transport_error(address, e))?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!("Created VLAN {} ({}) on {}", id, name, address);
            return Ok(true);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(self
            .classify_authed(address, &session.username, status, &body)
            .await)
    }

    async fn delete_vlan(&self, address: &str, id: u16) -> Result<bool, SwitchError> {
        let (session, check) = self
            .authed_get(address, &format!("/system/vlans/{}", id))
            .await?;
        if check.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let resp = session
            .http
            .delete(format!("{}/system/vlans/{}", self.base_url(address), id))
            .send()
            .await
            .map_err(|e| Self::transport_error(address, e))?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!("Deleted VLAN {} from {}", id, address);
            return Ok(true);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(self
            .classify_authed(address, &session.username, status, &body)
            .await)
    }

    async fn list_interfaces(&self, address: &str) -> Result<Vec<InterfaceRecord>, SwitchError> {
        let (session, resp) = self.authed_get(address, "/system/interfaces").await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(self
                .classify_authed(address, &session.username, status, &body)
                .await);
        }
        let index: InterfaceIndex = resp.json().await.map_err(|e| SwitchError::Unknown {
            address: address.to_string(),
            detail: format!("malformed interface index: {}", e),
        })?;

        let mut interfaces = Vec::with_capacity(index.len());
        for name in index.keys() {
            let detail = self.interface_detail(address, name).await.unwrap_or_default();
            interfaces.push(InterfaceRecord {
                name: name.clone(),
                description: detail.description,
                admin_state: detail.admin_state,
                link_state: detail.link_state,
            });
        }
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }

    async fn set_interface_admin(
        &self,
        address: &str,
        name: &str,
        up: bool,
    ) -> Result<(), SwitchError> {
        let session = self.session(address).await?;
        let resp = session
            .http
            .patch(format!(
                "{}/system/interfaces/{}",
                self.base_url(address),
                encode_segment(name)
            ))
            .json(&InterfacePatch {
                admin: if up { "up" } else { "down" }.to_string(),
            })
            .send()
            .await
            .map_err(|e| Self::transport_error(address, e))?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(
                "Set interface {} on {} admin {}",
                name,
                address,
                if up { "up" } else { "down" }
            );
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(self
            .classify_authed(address, &session.username, status, &body)
            .await)
    }

    async fn cleanup_sessions(&self, address: &str) {
        // Tear down our own cached session first, then fire an anonymous
        // logout in case the device tracks sessions per source.
        if let Some(session) = self.evict(address).await {
            let _ = session
                .http
                .post(format!("{}/logout", self.base_url(address)))
                .send()
                .await;
            tracing::debug!("Logged out cached session for {}", address);
        }
        if let Ok(http) = self.build_http(address) {
            let _ = http
                .post(format!("{}/logout", self.base_url(address)))
                .send()
                .await;
        }
    }
}

/// Percent-encode a path segment; vendor interface names contain '/'.
fn encode_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '/' => "%2F".to_string(),
            ' ' => "%20".to_string(),
            c => c.to_string(),
        })
        .collect()
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
