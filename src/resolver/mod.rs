use std::sync::Arc;

use crate::inventory::Store;
use crate::models::{
    ConnectionReport, CredentialCandidate, CredentialSource, ManagementMode, SavedCredentials,
    SwitchRecord, SwitchStatus,
};
use crate::rest::{SwitchApi, SwitchError};

/// Resolves reachability and working credentials for a switch.
///
/// Candidate ordering: an explicit user-supplied pair is authoritative and
/// never falls through to other candidates; otherwise the fixed default pairs
/// are tried first (cheap and common on first onboarding), then credentials
/// saved from an earlier successful login.
pub struct ConnectionResolver {
    store: Store,
    client: Arc<dyn SwitchApi>,
    defaults: Vec<(String, String)>,
}

impl ConnectionResolver {
    pub fn new(store: Store, client: Arc<dyn SwitchApi>, defaults: Vec<(String, String)>) -> Self {
        Self {
            store,
            client,
            defaults,
        }
    }

    /// Build the ordered candidate list for one resolution.
    fn candidates(
        explicit: Option<(String, String)>,
        defaults: &[(String, String)],
        saved: Option<SavedCredentials>,
    ) -> Vec<CredentialCandidate> {
        if let Some((username, password)) = explicit {
            return vec![CredentialCandidate {
                username,
                password,
                source: CredentialSource::UserProvided,
            }];
        }
        let mut candidates: Vec<CredentialCandidate> = defaults
            .iter()
            .map(|(username, password)| CredentialCandidate {
                username: username.clone(),
                password: password.clone(),
                source: CredentialSource::Default,
            })
            .collect();
        if let Some(saved) = saved {
            // Skip the saved pair if it duplicates a default already queued.
            let dup = candidates
                .iter()
                .any(|c| c.username == saved.username && c.password == saved.password);
            if !dup {
                candidates.push(CredentialCandidate {
                    username: saved.username,
                    password: saved.password,
                    source: CredentialSource::Saved,
                });
            }
        }
        candidates
    }

    /// Test connectivity to `address`, trying credential candidates in order,
    /// and update the inventory record with the outcome.
    pub async fn resolve(
        &self,
        address: &str,
        explicit: Option<(String, String)>,
    ) -> Result<ConnectionReport, SwitchError> {
        let explicit_given = explicit.is_some();
        let saved = self.store.saved_credentials(address).await;
        let candidates = Self::candidates(explicit, &self.defaults, saved);

        // One automatic cleanup + re-login per resolution; a constrained
        // switch must not be hammered with repeated session teardowns.
        let mut cleanup_spent = false;
        let mut last_username = String::new();

        for candidate in candidates {
            last_username.clone_from(&candidate.username);
            let mut attempt = self
                .client
                .login(address, &candidate.username, &candidate.password)
                .await;

            if matches!(attempt, Err(SwitchError::SessionLimit { .. })) && !cleanup_spent {
                cleanup_spent = true;
                tracing::info!("Session limit on {}; attempting session cleanup", address);
                self.client.cleanup_sessions(address).await;
                attempt = self
                    .client
                    .login(address, &candidate.username, &candidate.password)
                    .await;
            }

            match attempt {
                Ok(()) => {
                    return Ok(self.finish_login(address, &candidate).await);
                }
                Err(err) if explicit_given => {
                    // Explicit credentials are authoritative; never silently
                    // override the user's intent with defaults.
                    self.apply_failure(address, &err).await;
                    return Err(err);
                }
                Err(err) if err.is_credential_failure() => {
                    tracing::debug!(
                        "Candidate {}/{:?} rejected by {}",
                        candidate.username,
                        candidate.source,
                        address
                    );
                }
                Err(err) => {
                    // Network/device-mode failures: another password cannot
                    // help, stop immediately.
                    self.apply_failure(address, &err).await;
                    return Err(err);
                }
            }
        }

        let err = SwitchError::AuthenticationFailed {
            address: address.to_string(),
            username: last_username,
        };
        self.apply_failure(address, &err).await;
        Err(err)
    }

    /// Make sure an authenticated session exists for `address`, resolving
    /// with saved/default credentials when none is cached.
    pub async fn ensure_session(&self, address: &str) -> Result<(), SwitchError> {
        if self.client.has_session(address).await {
            return Ok(());
        }
        self.resolve(address, None).await.map(|_| ())
    }

    async fn finish_login(&self, address: &str, candidate: &CredentialCandidate) -> ConnectionReport {
        self.store
            .save_credentials(address, &candidate.username, &candidate.password)
            .await;

        // The connection already stands; a failed metadata read leaves the
        // fields absent and is not surfaced as an error.
        let (firmware, model) = match self.client.system_info(address).await {
            Ok(info) => (info.firmware_version, info.platform_name),
            Err(err) => {
                tracing::warn!("Metadata read failed for {}: {}", address, err);
                (None, None)
            }
        };

        let updated = self
            .store
            .update_switch(address, |record| {
                record.mark_online(firmware.clone(), model.clone());
            })
            .await;

        match updated {
            Some(record) => ConnectionReport {
                address: record.address,
                status: record.status,
                firmware_version: record.firmware_version,
                model: record.model,
                last_seen: record.last_seen.unwrap_or_else(chrono::Utc::now),
                management_mode: record.management_mode,
                credential_source: candidate.source,
            },
            // Record was removed mid-resolution; report the live result.
            None => ConnectionReport {
                address: address.to_string(),
                status: SwitchStatus::Online,
                firmware_version: firmware,
                model,
                last_seen: chrono::Utc::now(),
                management_mode: ManagementMode::Standalone,
                credential_source: candidate.source,
            },
        }
    }

    /// Map a classified failure onto the record state machine.
    async fn apply_failure(&self, address: &str, err: &SwitchError) {
        let message = err.to_string();
        self.store
            .update_switch(address, |record| match err {
                // Refused/DNS before any protocol exchange: offline, no detail.
                SwitchError::Connection { .. } => record.mark_offline(),
                SwitchError::CentralManaged { .. } => {
                    record.management_mode = ManagementMode::Central;
                    record.mark_error(message.clone());
                }
                _ => record.mark_error(message.clone()),
            })
            .await;
    }

    /// Local write gate: a centrally-managed record rejects writes without a
    /// network round trip, with the same error the device itself would give.
    pub fn check_write_allowed(record: &SwitchRecord) -> Result<(), SwitchError> {
        match record.management_mode {
            ManagementMode::Central => Err(SwitchError::CentralManaged {
                address: record.address.clone(),
            }),
            ManagementMode::Standalone => Ok(()),
        }
    }
}
