//! Shared test fixtures - in-memory collaborators and service builders

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use connector_config::config::Config;
use connector_config::domain::collaborators::{
    CatalogError, CipherVault, FieldCatalogApi, IdentityApi, IdentityError, LoginOutcome,
    RemoteField, SavedFile, ServiceControl, ServiceControlError, UserProfile, VaultError,
};
use connector_config::domain::NoOpEventPublisher;
use connector_config::domain::SessionService;

/// Vault that keeps "encrypted" payloads as plain JSON keyed by username
#[derive(Default)]
pub struct MemoryVault {
    files: Mutex<HashMap<String, String>>,
    pub fail_encrypt: bool,
    /// Artificial latency, for timeout tests under paused time
    pub encrypt_delay: Option<Duration>,
    pub probe_delay: Option<Duration>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(encrypt_delay: Duration) -> Self {
        Self {
            encrypt_delay: Some(encrypt_delay),
            ..Self::default()
        }
    }

    pub fn slow_probe(probe_delay: Duration) -> Self {
        Self {
            probe_delay: Some(probe_delay),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_encrypt: true,
            ..Self::default()
        }
    }

    pub fn with_stored(username: &str, json: &str) -> Self {
        let vault = Self::default();
        vault
            .files
            .lock()
            .insert(username.to_string(), json.to_string());
        vault
    }

    pub fn stored(&self, username: &str) -> Option<String> {
        self.files.lock().get(username).cloned()
    }
}

#[async_trait]
impl CipherVault for MemoryVault {
    async fn encrypt(
        &self,
        json_data: &str,
        output_path: Option<&str>,
        username: &str,
    ) -> Result<SavedFile, VaultError> {
        if let Some(delay) = self.encrypt_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_encrypt {
            return Err(VaultError::Io("disk full".to_string()));
        }
        let path = output_path
            .map(str::to_string)
            .unwrap_or_else(|| format!("/downloads/config-{username}"));
        self.files
            .lock()
            .insert(username.to_string(), json_data.to_string());
        Ok(SavedFile {
            path,
            message: "Configuration saved".to_string(),
        })
    }

    async fn decrypt(&self, _file_path: Option<&str>, username: &str) -> Result<String, VaultError> {
        self.files
            .lock()
            .get(username)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(username.to_string()))
    }

    async fn exists(&self, username: &str) -> Result<bool, VaultError> {
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.files.lock().contains_key(username))
    }
}

/// Identity API with a canned profile
pub struct StubIdentity {
    pub profile: UserProfile,
    pub reject_login: bool,
}

impl StubIdentity {
    pub fn admin() -> Self {
        Self {
            profile: UserProfile {
                codi_client: "CL-042".to_string(),
                tipus_usuari_id_id: "admin".to_string(),
                empresa: "Btic".to_string(),
            },
            reject_login: false,
        }
    }

    pub fn plain_user() -> Self {
        Self {
            profile: UserProfile {
                codi_client: "CL-042".to_string(),
                tipus_usuari_id_id: "2".to_string(),
                empresa: "Btic".to_string(),
            },
            reject_login: false,
        }
    }

    pub fn with_client_code(mut self, code: &str) -> Self {
        self.profile.codi_client = code.to_string();
        self
    }
}

#[async_trait]
impl IdentityApi for StubIdentity {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginOutcome, IdentityError> {
        if self.reject_login {
            return Err(IdentityError::Rejected {
                status: 401,
                message: "Incorrect username or password".to_string(),
            });
        }
        Ok(LoginOutcome {
            token: "tok-1".to_string(),
            first_login: false,
        })
    }

    async fn profile(&self, _token: &str) -> Result<UserProfile, IdentityError> {
        Ok(self.profile.clone())
    }
}

/// Field catalogue serving a fixed per-entity field list
#[derive(Default)]
pub struct StubCatalog {
    pub fields: IndexMap<String, Vec<RemoteField>>,
    pub fail: bool,
}

impl StubCatalog {
    pub fn unavailable() -> Self {
        Self {
            fields: IndexMap::new(),
            fail: true,
        }
    }

    pub fn with_company_fields(names: &[&str]) -> Self {
        let fields = names
            .iter()
            .map(|name| RemoteField {
                field_name: (*name).to_string(),
                entity_id: "CRM_COMPANY".to_string(),
                user_type_id: "string".to_string(),
                mandatory: false,
            })
            .collect();
        let mut by_entity = IndexMap::new();
        by_entity.insert("CRM_COMPANY".to_string(), fields);
        by_entity.insert("CRM_PRODUCT".to_string(), Vec::new());
        Self {
            fields: by_entity,
            fail: false,
        }
    }
}

#[async_trait]
impl FieldCatalogApi for StubCatalog {
    async fn user_fields(&self, entity_id: &str) -> Result<Vec<RemoteField>, CatalogError> {
        if self.fail {
            return Err(CatalogError::Connection("connection refused".to_string()));
        }
        Ok(self.fields.get(entity_id).cloned().unwrap_or_default())
    }
}

/// Service control with a toggleable running flag
#[derive(Default)]
pub struct StubServiceControl {
    running: AtomicBool,
}

#[async_trait]
impl ServiceControl for StubServiceControl {
    async fn status(&self) -> Result<bool, ServiceControlError> {
        Ok(self.running.load(Ordering::SeqCst))
    }

    async fn start(&self) -> Result<(), ServiceControlError> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Build a session service around the given collaborators
pub fn service_with(
    vault: Arc<MemoryVault>,
    identity: StubIdentity,
    catalog: StubCatalog,
) -> SessionService {
    SessionService::new(
        Config::default(),
        vault,
        Arc::new(identity),
        Arc::new(catalog),
        Arc::new(StubServiceControl::default()),
        Arc::new(NoOpEventPublisher),
    )
}

/// A minimal stored wire file that passes validation on re-export
pub fn stored_wire_json() -> String {
    serde_json::json!({
        "CodigoCliente": "CL-042",
        "DB": {
            "DB_Host": "sql.example.local",
            "DB_Host_Sage": "sage.example.local",
            "DB_Port": "1433",
            "DB_Database": "SAGE200",
            "DB_Username": "sa",
            "DB_Password": "secret",
            "IdLlicencia": "LIC-1"
        },
        "Bitrix24": {
            "API_Tenant": "https://example.bitrix24.eu/rest/1/abc/",
            "pack_empresa": true
        },
        "Empresas": [
            { "EmpresaBitrix": "10", "EmpresaSage": "1" }
        ],
        "FieldMappings": {
            "Company": [
                { "bitrixFieldName": "UF_CRM_COMPANY_RAZON", "sageFieldName": "RazonSocial" }
            ]
        }
    })
    .to_string()
}
