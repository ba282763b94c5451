//! Section-scoped merge semantics for the configuration document
//!
//! Each wizard section submits a partial update as JSON. [`apply_update`]
//! merges it into a fresh document value; the input document is never
//! mutated. A malformed section key or payload rejects the whole update -
//! there are no partial writes.

use serde::Deserialize;
use serde_json::Value;

use crate::contract::{CompanyMapping, ConfigError, ConfigurationDocument, EntityMappings,
    FieldLink, LegacyFieldMapping};
use crate::domain::migration::{self, MappingsInput};

/// Section keys accepted by [`ConfigurationDocument::apply_update`]
pub mod section {
    pub const GENERAL: &str = "general";
    pub const DATABASE: &str = "database";
    pub const BITRIX24: &str = "bitrix24";
    pub const COMPANIES: &str = "companies";
    pub const FIELD_MAPPINGS: &str = "fieldMappings";
}

/// Root-level scalars ("general" section)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GeneralPatch {
    client_code: Option<String>,
}

/// Database section patch; absent keys keep their current value
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DatabasePatch {
    db_host: Option<String>,
    db_host_sage: Option<String>,
    db_port: Option<String>,
    db_database: Option<String>,
    db_username: Option<String>,
    db_password: Option<String>,
    license: Option<String>,
}

/// Bitrix24 section patch
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Bitrix24Patch {
    api_tenant: Option<String>,
    pack_empresa: Option<bool>,
}

/// One company row as the editors send it; either side may still be empty
/// while the user is typing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyEntry {
    #[serde(default)]
    bitrix_company: String,
    #[serde(default)]
    sage_company_code: String,
}

/// Company updates arrive either as a bare array or wrapped in an object,
/// depending on which editor sent them. Normalized here, at the boundary.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompaniesUpdate {
    Bare(Vec<CompanyEntry>),
    Wrapped { companies: Vec<CompanyEntry> },
}

impl CompaniesUpdate {
    fn into_mappings(self) -> Vec<CompanyMapping> {
        let entries = match self {
            Self::Bare(entries) => entries,
            Self::Wrapped { companies } => companies,
        };
        entries
            .into_iter()
            .map(|e| CompanyMapping {
                bitrix_company: e.bitrix_company,
                sage_company_code: e.sage_company_code,
            })
            .collect()
    }
}

/// One link in the entity-grouped shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkEntry {
    bitrix_field_name: String,
    sage_field_name: String,
}

/// One record in the legacy flat shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEntry {
    bitrix_field_name: String,
    #[serde(default)]
    bitrix_field_type: String,
    sage_field_name: String,
    #[serde(default)]
    sage_field_description: String,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    is_mandatory: bool,
}

fn default_true() -> bool {
    true
}

/// Field-mapping updates arrive either entity-grouped (current) or as the
/// legacy flat list (older callers and older stored files)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMappingsUpdate {
    Legacy(Vec<LegacyEntry>),
    Grouped(indexmap::IndexMap<String, Vec<LinkEntry>>),
}

impl FieldMappingsUpdate {
    fn into_mappings(self) -> EntityMappings {
        match self {
            Self::Grouped(grouped) => migration::migrate(MappingsInput::Grouped(
                grouped
                    .into_iter()
                    .map(|(entity, links)| {
                        let links = links
                            .into_iter()
                            .map(|l| FieldLink::new(l.bitrix_field_name, l.sage_field_name))
                            .collect();
                        (entity, links)
                    })
                    .collect(),
            )),
            Self::Legacy(entries) => {
                let entries: Vec<LegacyFieldMapping> = entries
                    .into_iter()
                    .map(|e| LegacyFieldMapping {
                        bitrix_field_name: e.bitrix_field_name,
                        bitrix_field_type: e.bitrix_field_type,
                        sage_field_name: e.sage_field_name,
                        sage_field_description: e.sage_field_description,
                        is_active: e.is_active,
                        is_mandatory: e.is_mandatory,
                    })
                    .collect();
                migration::migrate(MappingsInput::Legacy(entries))
            }
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(section: &str, patch: Value) -> Result<T, ConfigError> {
    serde_json::from_value(patch).map_err(|e| ConfigError::rejected(section, e.to_string()))
}

fn merge_field(target: &mut String, patch: Option<String>) {
    if let Some(value) = patch {
        *target = value;
    }
}

impl ConfigurationDocument {
    /// Merge one section's partial update into a new document value
    ///
    /// Replacement sections ("companies", "fieldMappings") swap their whole
    /// sub-structure; merge sections keep keys the patch does not mention.
    /// An unknown section or a payload that does not match the section's
    /// shape returns an error and the document stays as it was.
    pub fn apply_update(&self, section_key: &str, patch: Value) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        match section_key {
            section::GENERAL => {
                let patch: GeneralPatch = parse(section_key, patch)?;
                merge_field(&mut next.client_code, patch.client_code);
            }
            section::DATABASE => {
                let patch: DatabasePatch = parse(section_key, patch)?;
                merge_field(&mut next.database.host, patch.db_host);
                merge_field(&mut next.database.host_sage, patch.db_host_sage);
                merge_field(&mut next.database.port, patch.db_port);
                merge_field(&mut next.database.database, patch.db_database);
                merge_field(&mut next.database.username, patch.db_username);
                merge_field(&mut next.database.password, patch.db_password);
                merge_field(&mut next.database.license, patch.license);
            }
            section::BITRIX24 => {
                let patch: Bitrix24Patch = parse(section_key, patch)?;
                merge_field(&mut next.bitrix24.api_tenant, patch.api_tenant);
                if let Some(pack_empresa) = patch.pack_empresa {
                    next.bitrix24.pack_empresa = pack_empresa;
                }
            }
            section::COMPANIES => {
                let update: CompaniesUpdate = parse(section_key, patch)?;
                next.companies = update.into_mappings();
            }
            section::FIELD_MAPPINGS => {
                let update: FieldMappingsUpdate = parse(section_key, patch)?;
                next.field_mappings = update.into_mappings();
            }
            other => {
                return Err(ConfigError::rejected(other, "unknown section"));
            }
        }
        Ok(next)
    }

    /// Total field links across all entities
    pub fn field_mapping_count(&self) -> usize {
        self.field_mappings.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> ConfigurationDocument {
        let doc = ConfigurationDocument::default();
        let doc = doc
            .apply_update(
                section::DATABASE,
                json!({"dbHost": "db1", "dbDatabase": "sage200", "dbUsername": "u", "dbPassword": "p"}),
            )
            .unwrap();
        doc.apply_update(
            section::COMPANIES,
            json!([{"bitrixCompany": "Acme", "sageCompanyCode": "AC01"}]),
        )
        .unwrap()
    }

    #[test]
    fn database_patch_merges_shallowly() {
        let doc = seeded();
        let next = doc
            .apply_update(section::DATABASE, json!({"dbPort": "1433"}))
            .unwrap();
        assert_eq!(next.database.port, "1433");
        // Untouched keys survive
        assert_eq!(next.database.host, "db1");
        assert_eq!(next.database.password, "p");
    }

    #[test]
    fn empty_patch_is_a_no_op_for_merge_sections() {
        let doc = seeded();
        for key in [section::GENERAL, section::DATABASE, section::BITRIX24] {
            let next = doc.apply_update(key, json!({})).unwrap();
            assert_eq!(next, doc, "section {key}");
        }
    }

    #[test]
    fn later_updates_to_the_same_key_win() {
        let doc = seeded();
        let next = doc
            .apply_update(section::DATABASE, json!({"dbHost": "db2"}))
            .and_then(|d| d.apply_update(section::DATABASE, json!({"dbHost": "db3"})))
            .unwrap();
        assert_eq!(next.database.host, "db3");
    }

    #[test]
    fn companies_accepts_bare_array_and_wrapper_object() {
        let doc = seeded();
        let bare = doc
            .apply_update(
                section::COMPANIES,
                json!([{"bitrixCompany": "B", "sageCompanyCode": "S"}]),
            )
            .unwrap();
        let wrapped = doc
            .apply_update(
                section::COMPANIES,
                json!({"companies": [{"bitrixCompany": "B", "sageCompanyCode": "S"}]}),
            )
            .unwrap();
        assert_eq!(bare.companies, wrapped.companies);
        assert_eq!(bare.companies.len(), 1);
    }

    #[test]
    fn companies_update_is_a_full_replacement() {
        let doc = seeded();
        assert_eq!(doc.companies.len(), 1);
        let next = doc
            .apply_update(section::COMPANIES, json!([]))
            .unwrap();
        assert!(next.companies.is_empty());
    }

    #[test]
    fn companies_may_be_transiently_incomplete() {
        let doc = seeded();
        let next = doc
            .apply_update(section::COMPANIES, json!([{"bitrixCompany": "OnlyOneSide"}]))
            .unwrap();
        assert_eq!(next.companies.len(), 1);
        assert!(!next.companies[0].is_complete());
    }

    #[test]
    fn legacy_field_mappings_are_migrated_on_merge() {
        let doc = seeded();
        let next = doc
            .apply_update(
                section::FIELD_MAPPINGS,
                json!([{
                    "bitrixFieldName": "UF_CRM_COMPANY_RAZON",
                    "bitrixFieldType": "string",
                    "sageFieldName": "RazonSocial",
                    "sageFieldDescription": "Razón social",
                    "isActive": true,
                    "isMandatory": true
                }]),
            )
            .unwrap();
        assert_eq!(next.field_mapping_count(), 1);
        assert_eq!(next.field_mappings["Company"][0].sage_field, "RazonSocial");
    }

    #[test]
    fn grouped_field_mappings_are_stored_directly() {
        let doc = seeded();
        let next = doc
            .apply_update(
                section::FIELD_MAPPINGS,
                json!({"Product": [{"bitrixFieldName": "UF_CRM_PRODUCT_SKU", "sageFieldName": "CodigoArticulo"}]}),
            )
            .unwrap();
        assert_eq!(next.field_mappings["Product"].len(), 1);
    }

    #[test]
    fn unknown_section_is_rejected_without_changes() {
        let doc = seeded();
        let err = doc.apply_update("nonsense", json!({"a": 1}));
        assert!(matches!(err, Err(ConfigError::RejectedUpdate { .. })));
    }

    #[test]
    fn malformed_payload_is_rejected_without_partial_apply() {
        let doc = seeded();
        let err = doc.apply_update(section::DATABASE, json!({"dbHost": "ok", "bogus": true}));
        assert!(matches!(err, Err(ConfigError::RejectedUpdate { .. })));
        let err = doc.apply_update(section::COMPANIES, json!("not a list"));
        assert!(matches!(err, Err(ConfigError::RejectedUpdate { .. })));
    }
}
