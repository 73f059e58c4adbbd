use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability status of a managed switch.
///
/// Transitions: `unknown -> {online, offline, error}`, `online <-> error`,
/// `offline -> online`, `error -> online`. No terminal state; a record can
/// always be retested, and removal deletes it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchStatus {
    Unknown,
    Online,
    Offline,
    Error,
}

/// Who owns configuration authority over the switch. Centrally-managed
/// switches reject direct writes, so the API gates write operations on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementMode {
    Standalone,
    Central,
}

/// One managed switch in the inventory, keyed by address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchRecord {
    pub address: String,
    /// Human label; falls back to the address when none was given.
    pub name: String,
    pub status: SwitchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub management_mode: ManagementMode,
}

impl SwitchRecord {
    pub fn new(address: impl Into<String>, name: Option<String>) -> Self {
        let address = address.into();
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| address.clone());
        Self {
            address,
            name,
            status: SwitchStatus::Unknown,
            last_seen: None,
            firmware_version: None,
            model: None,
            error_message: None,
            management_mode: ManagementMode::Standalone,
        }
    }

    /// Successful contact: clears any error, bumps `last_seen` (monotonic),
    /// and fills in metadata when the secondary read produced any.
    pub fn mark_online(&mut self, firmware_version: Option<String>, model: Option<String>) {
        self.status = SwitchStatus::Online;
        self.error_message = None;
        let now = Utc::now();
        if self.last_seen.map_or(true, |seen| now >= seen) {
            self.last_seen = Some(now);
        }
        if firmware_version.is_some() {
            self.firmware_version = firmware_version;
        }
        if model.is_some() {
            self.model = model;
        }
    }

    /// Classified failure: `last_seen` is left untouched.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = SwitchStatus::Error;
        self.error_message = Some(message.into());
    }

    /// Not reachable with no further detail (refused/DNS before any
    /// protocol exchange).
    pub fn mark_offline(&mut self) {
        self.status = SwitchStatus::Offline;
        self.error_message = None;
    }

    /// `error_message` must be non-empty exactly when status is `error`.
    pub fn invariant_holds(&self) -> bool {
        match self.status {
            SwitchStatus::Error => self.error_message.as_deref().is_some_and(|m| !m.is_empty()),
            _ => self.error_message.is_none(),
        }
    }
}

/// Where a credential candidate came from, in attempt-priority terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialSource {
    UserProvided,
    Default,
    Saved,
}

/// A username/password pair to try during connection resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCandidate {
    pub username: String,
    pub password: String,
    pub source: CredentialSource,
}

/// Credentials saved after a successful login, replayed on later attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCredentials {
    pub username: String,
    pub password: String,
}

/// A VLAN as read live from the switch; never persisted locally.
#[derive(Debug, Clone, Serialize)]
pub struct VlanRecord {
    pub id: u16,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oper_state: Option<String>,
}

/// A physical or logical interface as read live from the switch.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_state: Option<String>,
}

/// Result of a successful connection resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    pub address: String,
    pub status: SwitchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub management_mode: ManagementMode,
    /// Which candidate ended up working.
    pub credential_source: CredentialSource,
}

// --- API request/response types ---

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSwitchRequest {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchQuery {
    pub switch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVlanRequest {
    pub switch: String,
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchInterfaceRequest {
    pub switch: String,
    /// Vendor interface names contain '/' (e.g. "1/1/4"), so the name rides
    /// in the body instead of the URL path.
    pub name: String,
    pub admin_up: bool,
}

/// Inventory counts by status, for the dashboard header.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct InventoryCounts {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub error: usize,
    pub unknown: usize,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub switches: InventoryCounts,
    pub online_switches: Vec<SwitchRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_defaults_to_address() {
        let record = SwitchRecord::new("10.0.0.1", None);
        assert_eq!(record.name, "10.0.0.1");

        let record = SwitchRecord::new("10.0.0.1", Some("  ".to_string()));
        assert_eq!(record.name, "10.0.0.1");

        let record = SwitchRecord::new("10.0.0.1", Some("core-1".to_string()));
        assert_eq!(record.name, "core-1");
    }

    #[test]
    fn test_error_message_invariant_across_transitions() {
        let mut record = SwitchRecord::new("10.0.0.1", None);
        assert!(record.invariant_holds());

        record.mark_error("login rejected");
        assert_eq!(record.status, SwitchStatus::Error);
        assert!(record.invariant_holds());

        record.mark_online(Some("10.09.1010".to_string()), Some("6300M".to_string()));
        assert_eq!(record.status, SwitchStatus::Online);
        assert!(record.error_message.is_none());
        assert!(record.invariant_holds());

        record.mark_offline();
        assert_eq!(record.status, SwitchStatus::Offline);
        assert!(record.invariant_holds());
    }

    #[test]
    fn test_error_leaves_last_seen_untouched() {
        let mut record = SwitchRecord::new("10.0.0.1", None);
        record.mark_online(None, None);
        let seen = record.last_seen;
        assert!(seen.is_some());

        record.mark_error("unreachable");
        assert_eq!(record.last_seen, seen);
    }

    #[test]
    fn test_last_seen_monotonic() {
        let mut record = SwitchRecord::new("10.0.0.1", None);
        record.mark_online(None, None);
        let first = record.last_seen.unwrap();
        record.mark_online(None, None);
        assert!(record.last_seen.unwrap() >= first);
    }

    #[test]
    fn test_metadata_survives_read_failure() {
        let mut record = SwitchRecord::new("10.0.0.1", None);
        record.mark_online(Some("10.09".to_string()), Some("6300M".to_string()));
        // next contact where the metadata read failed
        record.mark_online(None, None);
        assert_eq!(record.firmware_version.as_deref(), Some("10.09"));
        assert_eq!(record.model.as_deref(), Some("6300M"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SwitchStatus::Online).unwrap(),
            "\"online\""
        );
        assert_eq!(
            serde_json::to_string(&ManagementMode::Central).unwrap(),
            "\"central\""
        );
    }
}
