//! Built-in field catalogue
//!
//! Descriptive data for the known Bitrix24 user fields and Sage 200 company
//! fields, plus the default mapping set the connector ships with. This is
//! the fallback when the remote catalogue cannot be fetched.

use crate::contract::{EntityMappings, FieldLink};

/// Entity used when classification finds no other match
pub const COMPANY_ENTITY: &str = "Company";

/// Entity for product-related fields
pub const PRODUCT_ENTITY: &str = "Product";

/// A Bitrix24 user field known to the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitrixField {
    /// Raw field name, e.g. "UF_CRM_COMPANY_RAZON"
    pub name: &'static str,
    /// Friendly name shown in the wizard
    pub display_name: &'static str,
    /// Bitrix24 user type id
    pub field_type: &'static str,
    pub mandatory: bool,
}

/// A Sage 200 company field known to the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SageField {
    pub name: &'static str,
    pub description: &'static str,
}

/// Bitrix24 user fields offered for mapping
pub const BITRIX_FIELDS: &[BitrixField] = &[
    BitrixField { name: "UF_CRM_DRIVEFOLDERID", display_name: "Drive Folder ID", field_type: "drivefolderid", mandatory: false },
    BitrixField { name: "UF_CRM_DRIVEFOLDERLINK", display_name: "Drive Folder Link", field_type: "drivefolderlink", mandatory: false },
    BitrixField { name: "UF_CRM_635267602077F", display_name: "Photos Maps App", field_type: "custom_maps_photos_view", mandatory: false },
    BitrixField { name: "UF_LOGO", display_name: "Company Logo", field_type: "file", mandatory: false },
    BitrixField { name: "UF_CRM_ID_OFERTA_SAGE", display_name: "Sage Offer ID", field_type: "string", mandatory: false },
    BitrixField { name: "UF_CRM_ID_CARPETA_DRIVE", display_name: "Drive Folder ID", field_type: "string", mandatory: false },
    BitrixField { name: "UF_CRM_IFRAME_WIDGET_CUSTOM", display_name: "Custom Widget", field_type: "rest_iframe_widget_bit24bitrix24eu_v2", mandatory: false },
    BitrixField { name: "UF_CRM_1750860486", display_name: "Activity Guide ID", field_type: "string", mandatory: true },
    BitrixField { name: "UF_STAMP", display_name: "Company Stamp", field_type: "file", mandatory: false },
    BitrixField { name: "UF_DIRECTOR_SIGN", display_name: "Director Signature", field_type: "file", mandatory: false },
    BitrixField { name: "UF_ACCOUNTANT_SIGN", display_name: "Accountant Signature", field_type: "file", mandatory: false },
    // Fields the connector itself consumes
    BitrixField { name: "UF_CRM_COMPANY_CATEGORIA", display_name: "Company Category", field_type: "string", mandatory: true },
    BitrixField { name: "UF_CRM_COMPANY_RAZON", display_name: "Company Name", field_type: "string", mandatory: true },
    BitrixField { name: "UF_CRM_COMPANY_DIVISA", display_name: "Currency", field_type: "string", mandatory: false },
    BitrixField { name: "UF_CRM_COMPANY_DOMICILIO", display_name: "Address", field_type: "string", mandatory: false },
    BitrixField { name: "UF_CRM_COMPANY_TELEFONO", display_name: "Phone Number", field_type: "string", mandatory: false },
    BitrixField { name: "UF_CRM_COMPANY_EMAIL", display_name: "Email Address", field_type: "string", mandatory: false },
];

/// Sage 200 company fields offered for mapping
pub const SAGE_FIELDS: &[SageField] = &[
    SageField { name: "CodigoCategoriaCliente", description: "Código de categoría del cliente" },
    SageField { name: "RazonSocial", description: "Razón social de la empresa" },
    SageField { name: "CodigoDivisa", description: "Código de divisa" },
    SageField { name: "Domicilio", description: "Dirección principal" },
    SageField { name: "Domicilio2", description: "Dirección secundaria" },
    SageField { name: "Municipio", description: "Municipio" },
    SageField { name: "CodigoPostal", description: "Código postal" },
    SageField { name: "Provincia", description: "Provincia" },
    SageField { name: "Nacion", description: "País" },
    SageField { name: "CodigoNacion", description: "Código del país" },
    SageField { name: "Telefono", description: "Número de teléfono" },
    SageField { name: "EMail1", description: "Correo electrónico principal" },
    SageField { name: "IdCliente", description: "ID único del cliente" },
    SageField { name: "NombreComercial", description: "Nombre comercial" },
    SageField { name: "CIF", description: "CIF/NIF de la empresa" },
];

/// Friendly name for a Bitrix24 field, falling back to the raw name
pub fn bitrix_display_name(field_name: &str) -> &str {
    BITRIX_FIELDS
        .iter()
        .find(|f| f.name == field_name)
        .map(|f| f.display_name)
        .unwrap_or(field_name)
}

/// Map a Bitrix24 ENTITY_ID to the entity name used in the configuration
pub fn entity_display_name(entity_id: &str) -> &str {
    match entity_id {
        "CRM_COMPANY" => COMPANY_ENTITY,
        "CRM_PRODUCT" => PRODUCT_ENTITY,
        "CRM_CONTACT" => "Contact",
        "CRM_DEAL" => "Deal",
        "CRM_LEAD" => "Lead",
        other => other,
    }
}

/// The six Company links the connector uses out of the box
///
/// Exported whenever a configuration carries no field mappings at all.
pub fn default_field_mappings() -> EntityMappings {
    let links = vec![
        FieldLink::new("UF_CRM_COMPANY_CATEGORIA", "CodigoCategoriaCliente"),
        FieldLink::new("UF_CRM_COMPANY_RAZON", "RazonSocial"),
        FieldLink::new("UF_CRM_COMPANY_DIVISA", "CodigoDivisa"),
        FieldLink::new("UF_CRM_COMPANY_DOMICILIO", "Domicilio"),
        FieldLink::new("UF_CRM_COMPANY_TELEFONO", "Telefono"),
        FieldLink::new("UF_CRM_COMPANY_EMAIL", "EMail1"),
    ];
    let mut mappings = EntityMappings::new();
    mappings.insert(COMPANY_ENTITY.to_string(), links);
    mappings
}

/// Join remotely fetched fields against the links already configured
///
/// Produces the entity-grouped structure for the fields the remote catalogue
/// knows about, keeping only those that already carry a Sage relation.
/// Entities that end up empty are dropped.
pub fn link_remote_fields(
    fields_by_entity: &indexmap::IndexMap<String, Vec<crate::domain::collaborators::RemoteField>>,
    existing: &EntityMappings,
) -> EntityMappings {
    let sage_link = |bitrix_field: &str| -> Option<&str> {
        existing
            .values()
            .flatten()
            .find(|l| l.bitrix_field == bitrix_field)
            .map(|l| l.sage_field.as_str())
    };

    let mut linked = EntityMappings::new();
    for (entity_id, fields) in fields_by_entity {
        let entity = entity_display_name(entity_id).to_string();
        let links: Vec<FieldLink> = fields
            .iter()
            .filter_map(|f| {
                sage_link(&f.field_name).map(|sage| FieldLink::new(f.field_name.clone(), sage))
            })
            .collect();
        if !links.is_empty() {
            linked.insert(entity, links);
        }
    }
    linked
}
