//! Field-mapping migration
//!
//! Older wizard versions persisted field mappings as one flat list of
//! metadata-rich records. The current representation groups plain
//! bitrix/sage name pairs by entity. [`migrate`] converts the old shape,
//! passes the new shape through untouched and substitutes the built-in
//! default set when nothing usable remains.

use crate::contract::{EntityMappings, FieldLink, LegacyFieldMapping};
use crate::domain::catalog::{self, COMPANY_ENTITY, PRODUCT_ENTITY};

/// Field-mapping data as found in a configuration file or section update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingsInput {
    /// Current entity-grouped shape
    Grouped(EntityMappings),
    /// Flat list written by older wizards
    Legacy(Vec<LegacyFieldMapping>),
    /// Section absent from the stored configuration
    Missing,
}

/// Classify a Bitrix24 field name into an entity
///
/// Substring heuristic: product-marked fields go to "Product", everything
/// else to "Company". Kept as a standalone function so it can be swapped for
/// an explicit lookup without touching merge or export logic.
pub fn classify_entity(field_name: &str) -> &'static str {
    if field_name.to_ascii_uppercase().contains("PRODUCT") {
        PRODUCT_ENTITY
    } else {
        COMPANY_ENTITY
    }
}

/// Convert any stored field-mapping shape into the entity-grouped form
///
/// Pure and idempotent: feeding the output back in returns it unchanged.
pub fn migrate(input: MappingsInput) -> EntityMappings {
    match input {
        MappingsInput::Grouped(grouped) => grouped,
        MappingsInput::Missing => catalog::default_field_mappings(),
        MappingsInput::Legacy(entries) => {
            let grouped = migrate_legacy(&entries);
            if grouped.values().map(Vec::len).sum::<usize>() == 0 {
                catalog::default_field_mappings()
            } else {
                grouped
            }
        }
    }
}

/// Group a flat legacy list by entity, dropping unusable entries
///
/// An entry survives only when it is active and both field names are
/// non-empty. Type, description and mandatory metadata are dropped; the
/// newer representation is authoritative.
fn migrate_legacy(entries: &[LegacyFieldMapping]) -> EntityMappings {
    let mut grouped = EntityMappings::new();
    for entry in entries {
        if !entry.is_active {
            continue;
        }
        if entry.bitrix_field_name.is_empty() || entry.sage_field_name.is_empty() {
            continue;
        }
        let entity = classify_entity(&entry.bitrix_field_name);
        if entity == COMPANY_ENTITY && !entry.bitrix_field_name.contains("COMPANY") {
            tracing::debug!(
                field = %entry.bitrix_field_name,
                "no entity marker in field name, defaulting to Company"
            );
        }
        let links: &mut Vec<FieldLink> = grouped.entry(entity.to_string()).or_default();
        // Keep the first occurrence of a bitrix field within an entity
        if links.iter().any(|l| l.bitrix_field == entry.bitrix_field_name) {
            continue;
        }
        links.push(FieldLink::new(
            entry.bitrix_field_name.clone(),
            entry.sage_field_name.clone(),
        ));
    }
    grouped
}
