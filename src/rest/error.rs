use thiserror::Error;

/// Classified failure from the switch REST client.
///
/// Every failure the client can produce maps to exactly one of these kinds;
/// raw transport errors never escape to the HTTP surface. Each kind carries a
/// stable `error_type` tag the UI switches on and a recovery suggestion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Invalid credentials for user '{username}' on switch {address}")]
    AuthenticationFailed { address: String, username: String },

    #[error("Switch {address} is centrally managed; direct API writes are blocked")]
    CentralManaged { address: String },

    #[error("User lacks required permissions on switch {address}: {detail}")]
    PermissionDenied { address: String, detail: String },

    #[error("Switch session limit reached for {address}")]
    SessionLimit { address: String },

    #[error("Cannot reach switch {address}: {detail}")]
    Connection { address: String, detail: String },

    #[error("Request to switch {address} timed out")]
    Timeout { address: String },

    #[error("REST API unavailable on switch {address}: {detail}")]
    ApiUnavailable { address: String, detail: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Unexpected error from switch {address}: {detail}")]
    Unknown { address: String, detail: String },
}

impl SwitchError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Stable taxonomy tag for API responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::CentralManaged { .. } => "central_management",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::SessionLimit { .. } => "session_limit",
            Self::Connection { .. } => "connection_error",
            Self::Timeout { .. } => "connection_timeout",
            Self::ApiUnavailable { .. } => "api_unavailable",
            Self::Validation { .. } => "validation_error",
            Self::Unknown { .. } => "unknown_error",
        }
    }

    /// Human-readable recovery hint shown alongside the error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => {
                "Check the username and password, verify the account has admin \
                 privileges, and make sure it is not locked out."
            }
            Self::CentralManaged { .. } => {
                "This switch is managed by its central controller, which blocks \
                 direct configuration. Use the central manager for writes, or \
                 disable central management if local control is needed."
            }
            Self::PermissionDenied { .. } => {
                "Authentication succeeded but the account lacks privileges for \
                 this operation. Check the account's role on the switch."
            }
            Self::SessionLimit { .. } => {
                "The switch has too many active API sessions. Use the session \
                 cleanup action, wait a few minutes for sessions to expire, or \
                 reboot the switch from its console."
            }
            Self::Connection { .. } => {
                "Check that the address is correct, the switch is powered on, \
                 and nothing on the network path blocks HTTPS."
            }
            Self::Timeout { .. } => {
                "The switch did not answer in time. Check connectivity and that \
                 the management interface is not overloaded."
            }
            Self::ApiUnavailable { .. } => {
                "The REST interface is not enabled or not in read-write mode. \
                 Enable the HTTPS server and REST access on the switch."
            }
            Self::Validation { .. } => "Correct the request input and retry.",
            Self::Unknown { .. } => {
                "Unexpected response from the switch. Check the switch logs and \
                 firmware version, then retry."
            }
        }
    }

    /// Credential-shaped failure: trying the next candidate can still help.
    /// Network and device-mode failures abort the candidate loop instead.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_tags() {
        let err = SwitchError::AuthenticationFailed {
            address: "10.0.0.1".to_string(),
            username: "admin".to_string(),
        };
        assert_eq!(err.error_type(), "authentication_failed");

        let err = SwitchError::CentralManaged {
            address: "10.0.0.1".to_string(),
        };
        assert_eq!(err.error_type(), "central_management");

        assert_eq!(
            SwitchError::validation("bad vlan").error_type(),
            "validation_error"
        );
    }

    #[test]
    fn test_only_auth_failures_continue_candidate_loop() {
        let auth = SwitchError::AuthenticationFailed {
            address: "a".to_string(),
            username: "u".to_string(),
        };
        assert!(auth.is_credential_failure());

        let net = SwitchError::Connection {
            address: "a".to_string(),
            detail: "refused".to_string(),
        };
        assert!(!net.is_credential_failure());
        assert!(!SwitchError::Timeout { address: "a".into() }.is_credential_failure());
        assert!(!SwitchError::SessionLimit { address: "a".into() }.is_credential_failure());
    }
}
