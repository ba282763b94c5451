//! Contract models for the connector configuration core
//!
//! These models are transport-agnostic and shared between the wizard shell,
//! the document store and the wire mappers. The wire schema lives in
//! `crate::wire`; these types carry the internal field names.

use indexmap::IndexMap;

/// Ordered map from entity name ("Company", "Product", ...) to its field links
pub type EntityMappings = IndexMap<String, Vec<FieldLink>>;

/// One client's full connector configuration
///
/// Created at login (fresh or reconstructed from a decrypted file), mutated
/// only through [`apply_update`](ConfigurationDocument::apply_update) and
/// discarded at logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationDocument {
    /// Client identifier in the exported file; session username when empty
    pub client_code: String,
    /// Sage 200 database connection settings
    pub database: DatabaseSettings,
    /// Bitrix24 tenant settings; exported only for admin sessions
    pub bitrix24: Bitrix24Settings,
    /// Bitrix24 company → Sage company code, in edit order
    pub companies: Vec<CompanyMapping>,
    /// Field links grouped by entity
    pub field_mappings: EntityMappings,
}

/// Sage 200 database connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    /// Secondary host used by the Sage side of the connector
    pub host_sage: String,
    pub port: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Connector licence key
    pub license: String,
}

/// Bitrix24 tenant settings (admin-only section)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitrix24Settings {
    /// Tenant REST endpoint, e.g. "https://example.bitrix24.eu/rest/1/..."
    pub api_tenant: String,
    /// Whether the tenant has the company pack enabled
    pub pack_empresa: bool,
}

/// One Bitrix24 company mapped to a Sage company code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyMapping {
    pub bitrix_company: String,
    pub sage_company_code: String,
}

impl CompanyMapping {
    /// Both sides filled in; required for every entry at export time
    pub fn is_complete(&self) -> bool {
        !self.bitrix_company.is_empty() && !self.sage_company_code.is_empty()
    }
}

/// One Bitrix24 field linked to a Sage field
///
/// The current representation carries only the two names; type and mandatory
/// metadata from older wizards is dropped on migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLink {
    pub bitrix_field: String,
    pub sage_field: String,
}

impl FieldLink {
    pub fn new(bitrix_field: impl Into<String>, sage_field: impl Into<String>) -> Self {
        Self {
            bitrix_field: bitrix_field.into(),
            sage_field: sage_field.into(),
        }
    }
}

/// Flat field-mapping record persisted by older wizard versions
///
/// Input to the migrator only; never written back in this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFieldMapping {
    pub bitrix_field_name: String,
    pub bitrix_field_type: String,
    pub sage_field_name: String,
    pub sage_field_description: String,
    pub is_active: bool,
    pub is_mandatory: bool,
}

/// Authenticated wizard user, built from the identity API profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    /// Client code from the profile (`codi_client`)
    pub client_code: String,
    /// Raw user type identifier from the profile (`tipus_usuari_id_id`)
    pub user_type: String,
    pub company: String,
}

impl SessionUser {
    /// Admin sessions see and export the Bitrix24 tenant section
    pub fn is_admin(&self) -> bool {
        self.user_type.eq_ignore_ascii_case("admin") || self.user_type == "1"
    }
}
