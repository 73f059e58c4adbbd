use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use regex_lite::Regex;

/// Valid VLAN ID range per 802.1Q.
pub const MIN_VLAN_ID: u16 = 1;
pub const MAX_VLAN_ID: u16 = 4094;

/// VLAN 1 is the default VLAN and must never be created or deleted.
pub const RESERVED_VLAN: u16 = 1;

/// VLAN names the vendor treats as reserved.
const RESERVED_VLAN_NAMES: &[&str] = &["default", "management", "native"];

fn vlan_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]{1,32}$").expect("valid pattern"))
}

/// Validate an IPv4 address (e.g., "192.168.1.1").
/// Returns true if the string is a valid dotted-decimal IPv4 address.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|p| !p.is_empty() && p.parse::<u8>().is_ok())
}

/// Validate a hostname.
/// Allows alphanumeric, hyphens, dots, and underscores. No path separators or shell metacharacters.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > 253 {
        return false;
    }
    hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

/// Validate a switch address: a dotted-decimal IPv4 address or a hostname.
pub fn is_valid_address(address: &str) -> bool {
    is_valid_ipv4(address) || is_valid_hostname(address)
}

/// Validate a VLAN ID for write operations. Returns an error message on failure.
pub fn validate_vlan_id(vlan_id: u16) -> Result<(), String> {
    if !(MIN_VLAN_ID..=MAX_VLAN_ID).contains(&vlan_id) {
        return Err(format!(
            "VLAN ID must be between {} and {}, got {}",
            MIN_VLAN_ID, MAX_VLAN_ID, vlan_id
        ));
    }
    if vlan_id == RESERVED_VLAN {
        return Err(format!("VLAN {} is reserved and cannot be modified", vlan_id));
    }
    Ok(())
}

/// Validate a VLAN name: 1-32 chars, alphanumeric/dash/underscore, not reserved.
/// Returns the trimmed name.
pub fn validate_vlan_name(name: &str) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("VLAN name cannot be empty".to_string());
    }
    if !vlan_name_pattern().is_match(name) {
        return Err(
            "VLAN name can only contain letters, numbers, dashes, and underscores (max 32 chars)"
                .to_string(),
        );
    }
    if RESERVED_VLAN_NAMES.contains(&name.to_lowercase().as_str()) {
        return Err(format!("VLAN name '{}' is reserved", name));
    }
    Ok(name.to_string())
}

/// Monotonic token issuer for discarding stale work.
///
/// Each poll sweep takes a token via `issue()`; before applying results it
/// checks `is_current()`. A newer token supersedes all older ones, so a slow
/// sweep abandons its remaining work instead of overwriting fresher state.
#[derive(Debug, Default)]
pub struct TokenGuard {
    latest: AtomicU64,
}

impl TokenGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding all previously issued tokens.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer token has been issued.
    pub fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ipv4() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(!is_valid_ipv4(""));
        assert!(!is_valid_ipv4("not-an-ip"));
        assert!(!is_valid_ipv4("256.1.1.1"));
        assert!(!is_valid_ipv4("1.2.3"));
        assert!(!is_valid_ipv4("1.2.3.4.5"));
        assert!(!is_valid_ipv4("1.2.3.-1"));
        assert!(!is_valid_ipv4("; rm -rf /"));
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address("10.0.0.1"));
        assert!(is_valid_address("switch-01.lab.local"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("switch 01"));
        assert!(!is_valid_address("host;rm"));
        assert!(!is_valid_address("host\nname"));
    }

    #[test]
    fn test_validate_vlan_id() {
        assert!(validate_vlan_id(2).is_ok());
        assert!(validate_vlan_id(4094).is_ok());
        assert!(validate_vlan_id(0).is_err());
        assert!(validate_vlan_id(4095).is_err());
        // default VLAN is reserved
        assert!(validate_vlan_id(1).is_err());
    }

    #[test]
    fn test_validate_vlan_name() {
        assert_eq!(validate_vlan_name("  Lab-Net_2  ").unwrap(), "Lab-Net_2");
        assert!(validate_vlan_name("").is_err());
        assert!(validate_vlan_name("   ").is_err());
        assert!(validate_vlan_name("has space").is_err());
        assert!(validate_vlan_name("x".repeat(33).as_str()).is_err());
        assert!(validate_vlan_name("default").is_err());
        assert!(validate_vlan_name("Native").is_err());
    }

    #[test]
    fn test_token_guard_staleness() {
        let guard = TokenGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));

        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
