pub mod client;
pub mod error;
pub mod types;

pub use client::RestSwitchClient;
pub use error::SwitchError;

use async_trait::async_trait;

use crate::models::{InterfaceRecord, VlanRecord};
use types::SystemInfo;

/// The switch management API surface the rest of the application talks to.
///
/// Implemented by `RestSwitchClient` against the vendor's REST dialect;
/// tests substitute scripted implementations.
#[async_trait]
pub trait SwitchApi: Send + Sync {
    /// One login attempt with the given credentials. On success the client
    /// caches an authenticated session for `address`.
    async fn login(&self, address: &str, username: &str, password: &str)
        -> Result<(), SwitchError>;

    /// Whether an authenticated session is currently cached for `address`.
    async fn has_session(&self, address: &str) -> bool;

    /// Read hostname/model/firmware. Requires a cached session.
    async fn system_info(&self, address: &str) -> Result<SystemInfo, SwitchError>;

    async fn list_vlans(&self, address: &str) -> Result<Vec<VlanRecord>, SwitchError>;

    /// Returns false when the VLAN already existed (treated as success).
    async fn create_vlan(&self, address: &str, id: u16, name: &str) -> Result<bool, SwitchError>;

    /// Returns false when the VLAN did not exist.
    async fn delete_vlan(&self, address: &str, id: u16) -> Result<bool, SwitchError>;

    async fn list_interfaces(&self, address: &str) -> Result<Vec<InterfaceRecord>, SwitchError>;

    async fn set_interface_admin(
        &self,
        address: &str,
        name: &str,
        up: bool,
    ) -> Result<(), SwitchError>;

    /// Best-effort teardown of sessions on the device, used for
    /// session-limit recovery. Never fails the caller for logout errors.
    async fn cleanup_sessions(&self, address: &str);
}
