//! HTTP client for the Bitrix24 user-field catalogue

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::collaborators::{CatalogError, FieldCatalogApi, RemoteField};

#[derive(Debug, Deserialize)]
struct UserFieldListResponse {
    #[serde(default)]
    result: Vec<RawUserField>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUserField {
    #[serde(rename = "FIELD_NAME")]
    field_name: String,
    #[serde(rename = "ENTITY_ID")]
    entity_id: String,
    #[serde(rename = "USER_TYPE_ID", default)]
    user_type_id: String,
    #[serde(rename = "MANDATORY", default)]
    mandatory: String,
}

/// Catalogue client against a tenant REST endpoint
pub struct HttpFieldCatalog {
    client: Client,
    api_url: String,
}

impl HttpFieldCatalog {
    /// `api_url` is the tenant endpoint up to and including the trailing
    /// slash; the method name is appended
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
        }
    }

    fn method_for(entity_id: &str) -> &'static str {
        if entity_id == "CRM_COMPANY" {
            "crm.company.userfield.list"
        } else {
            "crm.product.userfield.list"
        }
    }
}

#[async_trait]
impl FieldCatalogApi for HttpFieldCatalog {
    async fn user_fields(&self, entity_id: &str) -> Result<Vec<RemoteField>, CatalogError> {
        let endpoint = format!("{}{}", self.api_url, Self::method_for(entity_id));
        let response = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        let body: UserFieldListResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        if let Some(error) = body.error {
            let description = body.error_description.unwrap_or(error);
            return Err(CatalogError::Api(description));
        }

        Ok(body
            .result
            .into_iter()
            .filter(|f| f.entity_id == entity_id)
            .map(|f| RemoteField {
                field_name: f.field_name,
                entity_id: f.entity_id,
                user_type_id: f.user_type_id,
                mandatory: f.mandatory == "Y",
            })
            .collect())
    }
}
