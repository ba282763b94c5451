//! Session service - orchestration of the document store and collaborators
//!
//! One instance serves the whole wizard. All document mutation runs through
//! the store on the caller's (single) editing thread; the only async work is
//! the collaborator calls, each wrapped in a bounded wait.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::Config;
use crate::contract::{ConfigError, ConfigurationDocument, SessionUser};
use crate::domain::catalog;
use crate::domain::collaborators::{CipherVault, FieldCatalogApi, IdentityApi, SavedFile,
    ServiceControl};
use crate::domain::events::{DocumentEvent, EventPublisher};
use crate::domain::store::DocumentStore;

/// State held for an authenticated session
struct Session {
    user: SessionUser,
    store: Arc<DocumentStore>,
    #[allow(dead_code)]
    token: String,
}

/// Orchestrates login, editing, catalogue refresh and save
pub struct SessionService {
    config: Config,
    vault: Arc<dyn CipherVault>,
    identity: Arc<dyn IdentityApi>,
    catalog_api: Arc<dyn FieldCatalogApi>,
    service_control: Arc<dyn ServiceControl>,
    events: Arc<dyn EventPublisher>,
    session: RwLock<Option<Arc<Session>>>,
    /// Held for the duration of one save; overlapping encrypt calls would
    /// race on the same output file
    save_gate: tokio::sync::Mutex<()>,
}

impl SessionService {
    pub fn new(
        config: Config,
        vault: Arc<dyn CipherVault>,
        identity: Arc<dyn IdentityApi>,
        catalog_api: Arc<dyn FieldCatalogApi>,
        service_control: Arc<dyn ServiceControl>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            vault,
            identity,
            catalog_api,
            service_control,
            events,
            session: RwLock::new(None),
            save_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Bounded wait around every collaborator call
    async fn bounded<T, E, F>(&self, operation: &str, fut: F) -> Result<T, ConfigError>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let timeout = Duration::from_secs(self.config.call_timeout_secs);
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ConfigError::external(operation, e.to_string())),
            Err(_) => {
                tracing::warn!(operation, timeout_secs = self.config.call_timeout_secs, "collaborator call timed out");
                Err(ConfigError::Timeout {
                    operation: operation.to_string(),
                })
            }
        }
    }

    // ===== Session lifecycle =====

    /// Authenticate and seed the document store for this user
    ///
    /// An existing stored configuration is decrypted and loaded; anything
    /// wrong with it (unreadable, wrong machine key, bad JSON) falls back to
    /// a fresh document rather than failing the login.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, ConfigError> {
        let outcome = self
            .bounded("Login", self.identity.login(username, password))
            .await?;
        let profile = self
            .bounded("Profile fetch", self.identity.profile(&outcome.token))
            .await?;

        let user = SessionUser {
            username: username.to_string(),
            client_code: profile.codi_client,
            user_type: profile.tipus_usuari_id_id,
            company: profile.empresa,
        };

        let (document, from_file) = self.load_stored_document(&user).await;
        tracing::info!(username, from_file, "session started");
        let _ = self
            .events
            .publish(DocumentEvent::loaded(document.client_code.clone(), from_file))
            .await;

        let session = Arc::new(Session {
            user: user.clone(),
            store: Arc::new(DocumentStore::new(document)),
            token: outcome.token,
        });
        *self.session.write() = Some(session);
        Ok(user)
    }

    async fn load_stored_document(&self, user: &SessionUser) -> (ConfigurationDocument, bool) {
        let exists = match self
            .bounded("Configuration probe", self.vault.exists(&user.username))
            .await
        {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(error = %e, "could not probe for a stored configuration");
                false
            }
        };
        if exists {
            match self
                .bounded("Configuration load", self.vault.decrypt(None, &user.username))
                .await
                .and_then(|json| {
                    serde_json::from_str::<crate::wire::WireDocument>(&json)
                        .map_err(|e| ConfigError::external("Configuration load", e.to_string()))
                }) {
                Ok(wire) => return (crate::wire::import_document(wire), true),
                Err(e) => {
                    tracing::warn!(error = %e, "stored configuration unusable, starting fresh");
                }
            }
        }
        let mut document = ConfigurationDocument::default();
        document.client_code = if user.client_code.is_empty() {
            user.username.clone()
        } else {
            user.client_code.clone()
        };
        (document, false)
    }

    /// Drop the session; nothing survives in memory past this point
    pub fn logout(&self) {
        if self.session.write().take().is_some() {
            tracing::info!("session ended");
        }
    }

    pub fn current_user(&self) -> Result<SessionUser, ConfigError> {
        Ok(self.active()?.user.clone())
    }

    /// The single-writer store for the active session
    pub fn store(&self) -> Result<Arc<DocumentStore>, ConfigError> {
        Ok(self.active()?.store.clone())
    }

    fn active(&self) -> Result<Arc<Session>, ConfigError> {
        self.session.read().clone().ok_or(ConfigError::NotLoggedIn)
    }

    // ===== Editing =====

    /// Apply one section update from an editor
    pub async fn update_section(
        &self,
        section: &str,
        patch: Value,
    ) -> Result<ConfigurationDocument, ConfigError> {
        let session = self.active()?;
        let next = session.store.update(section, patch)?;
        let _ = self
            .events
            .publish(DocumentEvent::section_updated(section))
            .await;
        Ok(next)
    }

    // ===== Save =====

    /// Validate, export and encrypt the current document
    ///
    /// Rejected while another save is outstanding. Validation failures carry
    /// the full missing-field label list and leave everything untouched.
    pub async fn save(&self) -> Result<SavedFile, ConfigError> {
        let _guard = self
            .save_gate
            .try_lock()
            .map_err(|_| ConfigError::SaveInProgress)?;

        let session = self.active()?;
        let document = session.store.snapshot();
        let wire = crate::wire::export_document(
            &document,
            session.user.is_admin(),
            &session.user.username,
        )?;
        let json = serde_json::to_string_pretty(&wire)
            .map_err(|e| ConfigError::external("Export", e.to_string()))?;

        let saved = self
            .bounded(
                "Encrypt",
                self.vault.encrypt(&json, None, &session.user.username),
            )
            .await?;
        tracing::info!(path = %saved.path, "configuration saved");
        let _ = self
            .events
            .publish(DocumentEvent::saved(saved.path.clone()))
            .await;
        Ok(saved)
    }

    // ===== Field catalogue =====

    /// Refresh the field mappings from the remote catalogue
    ///
    /// Remote fields are joined against the currently configured links; a
    /// fetch failure or timeout keeps the current mappings and is not an
    /// error. Returns the mappings now in effect.
    pub async fn refresh_catalog(&self) -> Result<crate::contract::EntityMappings, ConfigError> {
        let session = self.active()?;
        let current = session.store.snapshot();
        let existing = if current.field_mapping_count() == 0 {
            catalog::default_field_mappings()
        } else {
            current.field_mappings.clone()
        };

        let by_entity = match self
            .bounded("Catalogue fetch", self.catalog_api.all_fields())
            .await
        {
            Ok(by_entity) => by_entity,
            Err(e) => {
                tracing::warn!(error = %e, "remote catalogue unavailable, keeping local mappings");
                return Ok(existing);
            }
        };

        let linked = catalog::link_remote_fields(&by_entity, &existing);
        let resolved = if linked.values().map(Vec::len).sum::<usize>() == 0 {
            existing
        } else {
            linked
        };

        let patch = serde_json::to_value(
            resolved
                .iter()
                .map(|(entity, links)| {
                    let links: Vec<Value> = links
                        .iter()
                        .map(|l| {
                            serde_json::json!({
                                "bitrixFieldName": l.bitrix_field,
                                "sageFieldName": l.sage_field,
                            })
                        })
                        .collect();
                    (entity.clone(), links)
                })
                .collect::<indexmap::IndexMap<String, Vec<Value>>>(),
        )
        .map_err(|e| ConfigError::external("Catalogue refresh", e.to_string()))?;
        let next = session
            .store
            .update(crate::domain::document::section::FIELD_MAPPINGS, patch)?;
        Ok(next.field_mappings)
    }

    // ===== Connector service status =====

    /// Whether the background connector service is running
    pub async fn service_status(&self) -> Result<bool, ConfigError> {
        self.bounded("Service status", self.service_control.status())
            .await
    }

    /// Ask the host to start the background connector service
    pub async fn start_service(&self) -> Result<(), ConfigError> {
        self.bounded("Service start", self.service_control.start())
            .await
    }
}
