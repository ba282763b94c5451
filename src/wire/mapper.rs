//! Mapping between the configuration document and the wire schema
//!
//! [`export_document`] is a pure function: it validates, resolves the final
//! field mappings and produces the wire value. Persisting the result through
//! the cipher vault is the caller's job.

use super::dto::*;
use crate::contract::{CompanyMapping, ConfigError, ConfigurationDocument, DatabaseSettings,
    EntityMappings, FieldLink, LegacyFieldMapping};
use crate::domain::migration::{self, MappingsInput};
use crate::domain::validation;

/// Map a document to the wire schema
///
/// Fails with [`ConfigError::Validation`] when any required field is missing;
/// the error carries the full ordered label list and nothing is produced.
/// An empty field-mapping set is replaced with the built-in default set. The
/// `Bitrix24` block is omitted entirely for non-admin sessions.
pub fn export_document(
    document: &ConfigurationDocument,
    privileged: bool,
    session_username: &str,
) -> Result<WireDocument, ConfigError> {
    let missing = validation::validate(document, privileged);
    if !missing.is_empty() {
        return Err(ConfigError::Validation {
            missing: missing.iter().map(|s| s.to_string()).collect(),
        });
    }

    let field_mappings = if document.field_mapping_count() == 0 {
        tracing::info!("no field mappings configured, exporting the default set");
        crate::domain::catalog::default_field_mappings()
    } else {
        document.field_mappings.clone()
    };

    let codigo_cliente = if document.client_code.is_empty() {
        session_username.to_string()
    } else {
        document.client_code.clone()
    };

    Ok(WireDocument {
        codigo_cliente,
        db: WireDatabase {
            db_host: document.database.host.clone(),
            db_host_sage: document.database.host_sage.clone(),
            db_port: document.database.port.clone(),
            db_database: document.database.database.clone(),
            db_username: document.database.username.clone(),
            db_password: document.database.password.clone(),
            id_llicencia: document.database.license.clone(),
        },
        bitrix24: privileged.then(|| WireBitrix24 {
            api_tenant: document.bitrix24.api_tenant.clone(),
            pack_empresa: document.bitrix24.pack_empresa,
        }),
        empresas: document
            .companies
            .iter()
            .map(|c| WireCompany {
                empresa_bitrix: c.bitrix_company.clone(),
                empresa_sage: c.sage_company_code.clone(),
            })
            .collect(),
        field_mappings: Some(grouped_to_wire(&field_mappings)),
    })
}

/// Reconstruct a document from a decrypted configuration file
///
/// Legacy flat field mappings in old files are migrated here, so the
/// in-memory document always carries the entity-grouped shape. A file with
/// no field mappings at all gets the built-in default set; the rest of the
/// stored configuration is kept.
pub fn import_document(wire: WireDocument) -> ConfigurationDocument {
    let field_mappings = match wire.field_mappings {
        None => migration::migrate(MappingsInput::Missing),
        Some(WireFieldMappings::Grouped(grouped)) => {
            let grouped: EntityMappings = grouped
                .into_iter()
                .map(|(entity, links)| {
                    let links = links
                        .into_iter()
                        .map(|l| FieldLink::new(l.bitrix_field_name, l.sage_field_name))
                        .collect();
                    (entity, links)
                })
                .collect();
            migration::migrate(MappingsInput::Grouped(grouped))
        }
        Some(WireFieldMappings::Legacy(entries)) => {
            tracing::info!(
                count = entries.len(),
                "migrating legacy flat field mappings from stored configuration"
            );
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
    };

    ConfigurationDocument {
        client_code: wire.codigo_cliente,
        database: DatabaseSettings {
            host: wire.db.db_host,
            host_sage: wire.db.db_host_sage,
            port: wire.db.db_port,
            database: wire.db.db_database,
            username: wire.db.db_username,
            password: wire.db.db_password,
            license: wire.db.id_llicencia,
        },
        bitrix24: wire
            .bitrix24
            .map(|b| crate::contract::Bitrix24Settings {
                api_tenant: b.api_tenant,
                pack_empresa: b.pack_empresa,
            })
            .unwrap_or_default(),
        companies: wire
            .empresas
            .into_iter()
            .map(|c| CompanyMapping {
                bitrix_company: c.empresa_bitrix,
                sage_company_code: c.empresa_sage,
            })
            .collect(),
        field_mappings,
    }
}

fn grouped_to_wire(mappings: &EntityMappings) -> WireFieldMappings {
    WireFieldMappings::Grouped(
        mappings
            .iter()
            .map(|(entity, links)| {
                let links = links
                    .iter()
                    .map(|l| WireFieldLink {
                        bitrix_field_name: l.bitrix_field.clone(),
                        sage_field_name: l.sage_field.clone(),
                    })
                    .collect();
                (entity.clone(), links)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog;
    use serde_json::json;

    fn valid_document() -> ConfigurationDocument {
        let mut doc = ConfigurationDocument::default();
        doc.client_code = "CLI001".to_string();
        doc.database.host = "db1".to_string();
        doc.database.host_sage = "db2".to_string();
        doc.database.port = "1433".to_string();
        doc.database.database = "sage200".to_string();
        doc.database.username = "u".to_string();
        doc.database.password = "p".to_string();
        doc.database.license = "LIC-42".to_string();
        doc.bitrix24.api_tenant = "https://example.bitrix24.eu/rest/1/abc".to_string();
        doc.bitrix24.pack_empresa = true;
        doc.companies.push(CompanyMapping {
            bitrix_company: "Acme".to_string(),
            sage_company_code: "AC01".to_string(),
        });
        doc
    }

    #[test]
    fn export_produces_the_exact_wire_keys() {
        let wire = export_document(&valid_document(), true, "ignored").unwrap();
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["CodigoCliente"], "CLI001");
        assert_eq!(value["DB"]["DB_Host"], "db1");
        assert_eq!(value["DB"]["DB_Host_Sage"], "db2");
        assert_eq!(value["DB"]["DB_Port"], "1433");
        assert_eq!(value["DB"]["DB_Database"], "sage200");
        assert_eq!(value["DB"]["DB_Username"], "u");
        assert_eq!(value["DB"]["DB_Password"], "p");
        assert_eq!(value["DB"]["IdLlicencia"], "LIC-42");
        assert_eq!(value["Bitrix24"]["API_Tenant"], "https://example.bitrix24.eu/rest/1/abc");
        assert_eq!(value["Bitrix24"]["pack_empresa"], true);
        assert_eq!(value["Empresas"][0]["EmpresaBitrix"], "Acme");
        assert_eq!(value["Empresas"][0]["EmpresaSage"], "AC01");
        assert_eq!(
            value["FieldMappings"]["Company"][0]["bitrixFieldName"],
            "UF_CRM_COMPANY_CATEGORIA"
        );
    }

    #[test]
    fn bitrix24_block_is_absent_for_non_admin_even_when_filled() {
        let wire = export_document(&valid_document(), false, "ignored").unwrap();
        assert!(wire.bitrix24.is_none());
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value.get("Bitrix24").is_none());
    }

    #[test]
    fn client_code_falls_back_to_the_session_username() {
        let mut doc = valid_document();
        doc.client_code.clear();
        // An empty client code is a validation failure...
        assert!(export_document(&doc, false, "jdoe").is_err());
        // ...but the fallback applies before serialization when set elsewhere
        doc.client_code = "CLI001".to_string();
        let wire = export_document(&doc, false, "jdoe").unwrap();
        assert_eq!(wire.codigo_cliente, "CLI001");
    }

    #[test]
    fn empty_field_mappings_export_the_default_set() {
        let doc = valid_document();
        assert_eq!(doc.field_mapping_count(), 0);
        let wire = export_document(&doc, true, "u").unwrap();
        match wire.field_mappings {
            Some(WireFieldMappings::Grouped(grouped)) => {
                assert_eq!(grouped["Company"].len(), 6);
                assert_eq!(grouped["Company"][0].bitrix_field_name, "UF_CRM_COMPANY_CATEGORIA");
            }
            other => panic!("export must be entity-grouped, got {other:?}"),
        }
    }

    #[test]
    fn export_fails_with_all_labels_and_produces_nothing() {
        let mut doc = valid_document();
        doc.companies.clear();
        let err = export_document(&doc, false, "u").unwrap_err();
        match err {
            ConfigError::Validation { missing } => {
                assert_eq!(missing, vec!["Company Mappings".to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_preserves_database_companies_and_tenant() {
        let mut doc = valid_document();
        doc.field_mappings = catalog::default_field_mappings();
        let wire = export_document(&doc, true, "u").unwrap();
        let json = serde_json::to_string_pretty(&wire).unwrap();
        let parsed: WireDocument = serde_json::from_str(&json).unwrap();
        let restored = import_document(parsed);
        assert_eq!(restored.database, doc.database);
        assert_eq!(restored.companies, doc.companies);
        assert_eq!(restored.bitrix24, doc.bitrix24);
        assert_eq!(restored.field_mappings, doc.field_mappings);
    }

    #[test]
    fn import_without_field_mappings_keeps_the_rest_and_uses_the_default_set() {
        let stored = json!({
            "CodigoCliente": "CLI001",
            "DB": {
                "DB_Host": "db1", "DB_Host_Sage": "", "DB_Port": "1433",
                "DB_Database": "sage200", "DB_Username": "u", "DB_Password": "p",
                "IdLlicencia": "LIC-42"
            },
            "Empresas": [{"EmpresaBitrix": "Acme", "EmpresaSage": "AC01"}]
        });
        let wire: WireDocument = serde_json::from_value(stored).unwrap();
        let doc = import_document(wire);
        // Nothing stored is lost
        assert_eq!(doc.database.host, "db1");
        assert_eq!(doc.database.license, "LIC-42");
        assert_eq!(doc.companies.len(), 1);
        // Absent mappings come back as the built-in default set
        assert_eq!(doc.field_mappings, catalog::default_field_mappings());
    }

    #[test]
    fn import_treats_null_field_mappings_as_absent() {
        let stored = json!({
            "CodigoCliente": "CLI001",
            "DB": {
                "DB_Host": "db1", "DB_Host_Sage": "", "DB_Port": "",
                "DB_Database": "sage200", "DB_Username": "u", "DB_Password": "p",
                "IdLlicencia": ""
            },
            "Empresas": [],
            "FieldMappings": null
        });
        let wire: WireDocument = serde_json::from_value(stored).unwrap();
        let doc = import_document(wire);
        assert_eq!(doc.database.database, "sage200");
        assert_eq!(doc.field_mappings, catalog::default_field_mappings());
    }

    #[test]
    fn import_migrates_a_legacy_flat_file() {
        let stored = json!({
            "CodigoCliente": "CLI001",
            "DB": {
                "DB_Host": "db1", "DB_Host_Sage": "", "DB_Port": "",
                "DB_Database": "sage200", "DB_Username": "u", "DB_Password": "p",
                "IdLlicencia": ""
            },
            "Empresas": [{"EmpresaBitrix": "Acme", "EmpresaSage": "AC01"}],
            "FieldMappings": [
                {
                    "bitrixFieldName": "UF_CRM_COMPANY_RAZON",
                    "bitrixFieldType": "string",
                    "sageFieldName": "RazonSocial",
                    "sageFieldDescription": "Razón social",
                    "isActive": true,
                    "isMandatory": true
                },
                {
                    "bitrixFieldName": "UF_CRM_COMPANY_EMAIL",
                    "sageFieldName": "EMail1",
                    "isActive": false
                }
            ]
        });
        let wire: WireDocument = serde_json::from_value(stored).unwrap();
        let doc = import_document(wire);
        // No Bitrix24 block in the stored file -> defaults in memory
        assert_eq!(doc.bitrix24, crate::contract::Bitrix24Settings::default());
        assert_eq!(doc.field_mapping_count(), 1);
        assert_eq!(doc.field_mappings["Company"][0].sage_field, "RazonSocial");
    }
}
