//! Single-writer document store
//!
//! Exactly one owner (the session) holds the authoritative document. Section
//! editors submit update requests through [`DocumentStore::update`]; they
//! never touch a shared mutable reference. Every applied update broadcasts
//! the new document value to subscribers, so dependents share by
//! value-replacement, not by aliasing.

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;

use crate::contract::{ConfigError, ConfigurationDocument};

/// Holds the current configuration document for one session
pub struct DocumentStore {
    current: RwLock<ConfigurationDocument>,
    tx: watch::Sender<ConfigurationDocument>,
}

impl DocumentStore {
    /// Create a store seeded with a document (fresh or loaded from a file)
    pub fn new(document: ConfigurationDocument) -> Self {
        let (tx, _) = watch::channel(document.clone());
        Self {
            current: RwLock::new(document),
            tx,
        }
    }

    /// Snapshot of the current document value
    pub fn snapshot(&self) -> ConfigurationDocument {
        self.current.read().clone()
    }

    /// Watch channel receiving every applied document value
    pub fn subscribe(&self) -> watch::Receiver<ConfigurationDocument> {
        self.tx.subscribe()
    }

    /// Apply one section update and broadcast the result
    ///
    /// A rejected update leaves the stored value and the watch channel
    /// untouched; the error tells the caller why nothing happened.
    pub fn update(&self, section: &str, patch: Value) -> Result<ConfigurationDocument, ConfigError> {
        let mut current = self.current.write();
        let next = current.apply_update(section, patch)?;
        *current = next.clone();
        // Send under the lock so subscribers observe updates in apply order
        let _ = self.tx.send(next.clone());
        Ok(next)
    }

    /// Replace the whole document (used when a stored file is loaded)
    pub fn replace(&self, document: ConfigurationDocument) {
        let mut current = self.current.write();
        *current = document.clone();
        let _ = self.tx.send(document);
    }
}
