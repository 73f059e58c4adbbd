use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{InventoryCounts, SavedCredentials, SwitchRecord, SwitchStatus};

/// In-memory switch inventory, keyed by address.
///
/// The process is the source of truth; records live only for the lifetime of
/// the server (the dashboard re-adds switches on restart via
/// `DEFAULT_SWITCHES`). Updates are last-write-wins replaces of the record
/// keyed by address, which makes overlapping poll sweeps safe.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    switches: HashMap<String, SwitchRecord>,
    credentials: HashMap<String, SavedCredentials>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. Returns false when the address is already known.
    pub async fn add_switch(&self, record: SwitchRecord) -> bool {
        let mut inner = self.inner.write().await;
        if inner.switches.contains_key(&record.address) {
            return false;
        }
        tracing::info!("Added switch {} to inventory", record.address);
        inner.switches.insert(record.address.clone(), record);
        true
    }

    /// Remove a record and any credentials saved for it.
    pub async fn remove_switch(&self, address: &str) -> bool {
        let mut inner = self.inner.write().await;
        inner.credentials.remove(address);
        if inner.switches.remove(address).is_some() {
            tracing::info!("Removed switch {} from inventory", address);
            true
        } else {
            false
        }
    }

    pub async fn get_switch(&self, address: &str) -> Option<SwitchRecord> {
        self.inner.read().await.switches.get(address).cloned()
    }

    pub async fn has_switch(&self, address: &str) -> bool {
        self.inner.read().await.switches.contains_key(address)
    }

    /// All records, sorted by address for stable listings.
    pub async fn list_switches(&self) -> Vec<SwitchRecord> {
        let mut switches: Vec<SwitchRecord> =
            self.inner.read().await.switches.values().cloned().collect();
        switches.sort_by(|a, b| a.address.cmp(&b.address));
        switches
    }

    /// Apply a mutation to the record for `address`, if present.
    /// Returns the updated record.
    pub async fn update_switch<F>(&self, address: &str, mutate: F) -> Option<SwitchRecord>
    where
        F: FnOnce(&mut SwitchRecord),
    {
        let mut inner = self.inner.write().await;
        let record = inner.switches.get_mut(address)?;
        mutate(record);
        debug_assert!(record.invariant_holds());
        Some(record.clone())
    }

    pub async fn counts(&self) -> InventoryCounts {
        let inner = self.inner.read().await;
        let mut counts = InventoryCounts {
            total: inner.switches.len(),
            ..InventoryCounts::default()
        };
        for record in inner.switches.values() {
            match record.status {
                SwitchStatus::Online => counts.online += 1,
                SwitchStatus::Offline => counts.offline += 1,
                SwitchStatus::Error => counts.error += 1,
                SwitchStatus::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    pub async fn online_switches(&self) -> Vec<SwitchRecord> {
        self.inner
            .read()
            .await
            .switches
            .values()
            .filter(|s| s.status == SwitchStatus::Online)
            .cloned()
            .collect()
    }

    /// Remember credentials that worked for a switch.
    pub async fn save_credentials(&self, address: &str, username: &str, password: &str) {
        let mut inner = self.inner.write().await;
        inner.credentials.insert(
            address.to_string(),
            SavedCredentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        );
        tracing::debug!("Stored credentials for switch {}", address);
    }

    pub async fn saved_credentials(&self, address: &str) -> Option<SavedCredentials> {
        self.inner.read().await.credentials.get(address).cloned()
    }

    pub async fn remove_credentials(&self, address: &str) {
        self.inner.write().await.credentials.remove(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_get_remove() {
        let store = Store::new();
        assert!(store.add_switch(SwitchRecord::new("10.0.0.1", None)).await);
        assert!(!store.add_switch(SwitchRecord::new("10.0.0.1", None)).await);
        assert!(store.has_switch("10.0.0.1").await);

        assert!(store.remove_switch("10.0.0.1").await);
        assert!(!store.remove_switch("10.0.0.1").await);
        assert!(store.get_switch("10.0.0.1").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_drops_saved_credentials() {
        let store = Store::new();
        store.add_switch(SwitchRecord::new("10.0.0.1", None)).await;
        store.save_credentials("10.0.0.1", "admin", "pw").await;

        store.remove_switch("10.0.0.1").await;
        assert!(store.saved_credentials("10.0.0.1").await.is_none());
    }

    #[tokio::test]
    async fn test_update_is_last_write_wins() {
        let store = Store::new();
        store.add_switch(SwitchRecord::new("10.0.0.1", None)).await;

        store
            .update_switch("10.0.0.1", |r| r.mark_error("first"))
            .await
            .unwrap();
        let updated = store
            .update_switch("10.0.0.1", |r| r.mark_error("second"))
            .await
            .unwrap();
        assert_eq!(updated.error_message.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_counts_by_status() {
        let store = Store::new();
        store.add_switch(SwitchRecord::new("10.0.0.1", None)).await;
        store.add_switch(SwitchRecord::new("10.0.0.2", None)).await;
        store.add_switch(SwitchRecord::new("10.0.0.3", None)).await;

        store.update_switch("10.0.0.1", |r| r.mark_online(None, None)).await;
        store.update_switch("10.0.0.2", |r| r.mark_error("boom")).await;

        let counts = store.counts().await;
        assert_eq!(counts.total, 3);
        assert_eq!(counts.online, 1);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.offline, 0);
    }

    #[tokio::test]
    async fn test_listing_is_sorted_by_address() {
        let store = Store::new();
        store.add_switch(SwitchRecord::new("10.0.0.9", None)).await;
        store.add_switch(SwitchRecord::new("10.0.0.1", None)).await;

        let addresses: Vec<String> = store
            .list_switches()
            .await
            .into_iter()
            .map(|s| s.address)
            .collect();
        assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.9"]);
    }
}
