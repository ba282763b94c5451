//! Completeness checks before a configuration may be exported

use crate::contract::ConfigurationDocument;

/// Labels shown to the user, in check order
pub const LABEL_DB_HOST: &str = "Database Host";
pub const LABEL_DB_NAME: &str = "Database Name";
pub const LABEL_DB_USERNAME: &str = "Database Username";
pub const LABEL_DB_PASSWORD: &str = "Database Password";
pub const LABEL_API_TENANT: &str = "Bitrix24 API Tenant";
pub const LABEL_COMPANIES: &str = "Company Mappings";
pub const LABEL_CLIENT_CODE: &str = "Client Code";

/// Check a document for export completeness
///
/// Returns the missing-field labels in a fixed order; an empty result means
/// the document may be exported. The Bitrix24 tenant is only checked for
/// admin sessions - non-admin configurations never carry that section.
/// Field mappings are not checked here; an empty set is substituted with the
/// default mapping set at export time.
pub fn validate(document: &ConfigurationDocument, privileged: bool) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if document.database.host.is_empty() {
        missing.push(LABEL_DB_HOST);
    }
    if document.database.database.is_empty() {
        missing.push(LABEL_DB_NAME);
    }
    if document.database.username.is_empty() {
        missing.push(LABEL_DB_USERNAME);
    }
    if document.database.password.is_empty() {
        missing.push(LABEL_DB_PASSWORD);
    }
    if privileged && document.bitrix24.api_tenant.is_empty() {
        missing.push(LABEL_API_TENANT);
    }
    if document.companies.is_empty() {
        missing.push(LABEL_COMPANIES);
    }
    if document.client_code.is_empty() {
        missing.push(LABEL_CLIENT_CODE);
    }

    missing
}
