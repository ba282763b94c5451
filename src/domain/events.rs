//! Document lifecycle events
//!
//! The wizard shell subscribes to these to refresh status displays (last
//! save, dirty indicators). Publishing failures are logged and never fail
//! the operation that produced the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by the session service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// A stored configuration was decrypted and loaded into the store
    DocumentLoaded(DocumentLoadedEvent),
    /// A section update was applied
    SectionUpdated(SectionUpdatedEvent),
    /// The configuration was exported and encrypted to disk
    ConfigurationSaved(ConfigurationSavedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLoadedEvent {
    pub client_code: String,
    /// Whether the document came from a stored file or was created fresh
    pub from_file: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUpdatedEvent {
    pub section: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSavedEvent {
    pub file_path: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn loaded(client_code: impl Into<String>, from_file: bool) -> Self {
        Self::DocumentLoaded(DocumentLoadedEvent {
            client_code: client_code.into(),
            from_file,
            timestamp: Utc::now(),
        })
    }

    pub fn section_updated(section: impl Into<String>) -> Self {
        Self::SectionUpdated(SectionUpdatedEvent {
            section: section.into(),
            timestamp: Utc::now(),
        })
    }

    pub fn saved(file_path: impl Into<String>) -> Self {
        Self::ConfigurationSaved(ConfigurationSavedEvent {
            file_path: file_path.into(),
            timestamp: Utc::now(),
        })
    }
}

/// Sink for document lifecycle events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DocumentEvent) -> anyhow::Result<()>;
}

/// No-op publisher for tests or headless use
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: DocumentEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
