//! External collaborator boundaries
//!
//! Every remote or host-provided operation sits behind one of these traits
//! so the session service can be exercised with in-memory implementations.
//! Implementations map their own failures into the error enums here; the
//! service turns those into user-facing [`ConfigError`](crate::contract::ConfigError)
//! values at the call site.

use async_trait::async_trait;
use indexmap::IndexMap;

/// Outcome of a successful encrypt-and-persist call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: String,
    pub message: String,
}

/// Error type for the cipher vault
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Cipher error: {0}")]
    Cipher(String),

    #[error("File error: {0}")]
    Io(String),
}

/// Encrypts and persists the configuration file, all-or-nothing
///
/// A failed call leaves no partial file; the message is reported to the
/// user verbatim.
#[async_trait]
pub trait CipherVault: Send + Sync {
    /// Encrypt `json_data` and write it to `output_path`, or to the default
    /// location for `username` when no path is given
    async fn encrypt(
        &self,
        json_data: &str,
        output_path: Option<&str>,
        username: &str,
    ) -> Result<SavedFile, VaultError>;

    /// Read and decrypt the stored configuration for `username`
    async fn decrypt(&self, file_path: Option<&str>, username: &str) -> Result<String, VaultError>;

    /// Whether a stored configuration exists for `username`
    async fn exists(&self, username: &str) -> Result<bool, VaultError>;
}

/// Token and metadata returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub first_login: bool,
}

/// Profile fields served by the identity API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub codi_client: String,
    pub tipus_usuari_id_id: String,
    pub empresa: String,
}

/// Error type for the remote identity API
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Remote identity API (login + profile)
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, IdentityError>;

    async fn profile(&self, token: &str) -> Result<UserProfile, IdentityError>;
}

/// One user field as listed by the Bitrix24 API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteField {
    pub field_name: String,
    /// Raw ENTITY_ID, e.g. "CRM_COMPANY"
    pub entity_id: String,
    pub user_type_id: String,
    pub mandatory: bool,
}

/// Error type for the remote field catalogue
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Bitrix24 API error: {0}")]
    Api(String),
}

/// Remote per-entity user-field listing
///
/// Optional collaborator: any failure falls back to the built-in catalogue
/// and never blocks the save flow.
#[async_trait]
pub trait FieldCatalogApi: Send + Sync {
    /// List user fields for one entity, keyed by raw ENTITY_ID
    async fn user_fields(&self, entity_id: &str) -> Result<Vec<RemoteField>, CatalogError>;

    /// List fields for all entities the connector cares about
    async fn all_fields(&self) -> Result<IndexMap<String, Vec<RemoteField>>, CatalogError> {
        let mut by_entity = IndexMap::new();
        for entity_id in ["CRM_COMPANY", "CRM_PRODUCT"] {
            by_entity.insert(entity_id.to_string(), self.user_fields(entity_id).await?);
        }
        Ok(by_entity)
    }
}

/// Error type for the background service control
#[derive(Debug, thiserror::Error)]
pub enum ServiceControlError {
    #[error("Service '{0}' not found")]
    NotFound(String),

    #[error("Access is denied. Administrator privileges required")]
    AccessDenied,

    #[error("Service command failed: {0}")]
    Command(String),
}

/// Background connector service lifecycle, status display only
#[async_trait]
pub trait ServiceControl: Send + Sync {
    /// Whether the connector service is currently running
    async fn status(&self) -> Result<bool, ServiceControlError>;

    /// Ask the host to start the connector service
    async fn start(&self) -> Result<(), ServiceControlError>;
}
