//! Wire DTOs with serde derives for the persisted configuration file
//!
//! This is the exact JSON shape the background connector service consumes.
//! Key names are part of the external contract and must not change.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root object of the persisted configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireDocument {
    #[serde(rename = "CodigoCliente")]
    pub codigo_cliente: String,

    #[serde(rename = "DB")]
    pub db: WireDatabase,

    /// Present only in configurations written by admin sessions
    #[serde(rename = "Bitrix24", skip_serializing_if = "Option::is_none", default)]
    pub bitrix24: Option<WireBitrix24>,

    #[serde(rename = "Empresas")]
    pub empresas: Vec<WireCompany>,

    /// Absent (or null) in the oldest stored files; exports always write
    /// the entity-grouped shape
    #[serde(rename = "FieldMappings", default)]
    pub field_mappings: Option<WireFieldMappings>,
}

/// Sage 200 database block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireDatabase {
    #[serde(rename = "DB_Host")]
    pub db_host: String,
    #[serde(rename = "DB_Host_Sage")]
    pub db_host_sage: String,
    #[serde(rename = "DB_Port")]
    pub db_port: String,
    #[serde(rename = "DB_Database")]
    pub db_database: String,
    #[serde(rename = "DB_Username")]
    pub db_username: String,
    #[serde(rename = "DB_Password")]
    pub db_password: String,
    #[serde(rename = "IdLlicencia")]
    pub id_llicencia: String,
}

/// Bitrix24 tenant block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireBitrix24 {
    #[serde(rename = "API_Tenant")]
    pub api_tenant: String,
    #[serde(rename = "pack_empresa")]
    pub pack_empresa: bool,
}

/// One company mapping row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireCompany {
    #[serde(rename = "EmpresaBitrix")]
    pub empresa_bitrix: String,
    #[serde(rename = "EmpresaSage")]
    pub empresa_sage: String,
}

/// Field mappings as stored on the wire
///
/// Current files carry the entity-grouped object; files written by older
/// wizard versions carry a flat array of metadata-rich records. Both
/// deserialize; serialization always produces the grouped shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireFieldMappings {
    Grouped(IndexMap<String, Vec<WireFieldLink>>),
    Legacy(Vec<WireLegacyMapping>),
}

/// One link in the entity-grouped shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireFieldLink {
    #[serde(rename = "bitrixFieldName")]
    pub bitrix_field_name: String,
    #[serde(rename = "sageFieldName")]
    pub sage_field_name: String,
}

/// One record in the legacy flat shape (read-only; never written back)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireLegacyMapping {
    #[serde(rename = "bitrixFieldName")]
    pub bitrix_field_name: String,
    #[serde(rename = "bitrixFieldType", default)]
    pub bitrix_field_type: String,
    #[serde(rename = "sageFieldName")]
    pub sage_field_name: String,
    #[serde(rename = "sageFieldDescription", default)]
    pub sage_field_description: String,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "isMandatory", default)]
    pub is_mandatory: bool,
}

fn default_active() -> bool {
    true
}
