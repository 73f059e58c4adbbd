use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- Switch REST API wire types ---

/// `GET /system` response subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
}

/// `GET /system/vlans` returns a map of VLAN id to resource URI,
/// e.g. `{"1": "/rest/v10.09/system/vlans/1"}`.
pub type VlanIndex = HashMap<String, serde_json::Value>;

/// `GET /system/vlans/{id}` response subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VlanDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub oper_state: Option<String>,
}

/// `PUT /system/vlans/{id}` body.
#[derive(Debug, Serialize)]
pub struct VlanCreate {
    pub name: String,
    pub admin: String,
}

/// `GET /system/interfaces` returns a map of interface name to resource URI.
pub type InterfaceIndex = HashMap<String, serde_json::Value>;

/// `GET /system/interfaces/{name}` response subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceDetail {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub admin_state: Option<String>,
    #[serde(default)]
    pub link_state: Option<String>,
}

/// `PATCH /system/interfaces/{name}` body.
#[derive(Debug, Serialize)]
pub struct InterfacePatch {
    pub admin: String,
}
