//! HTTP client for the remote identity API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::collaborators::{IdentityApi, IdentityError, LoginOutcome, UserProfile};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    #[serde(default)]
    first_login: bool,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    codi_client: String,
    tipus_usuari_id_id: String,
    empresa: String,
}

/// Identity API client (token + whoami endpoints)
pub struct HttpIdentityApi {
    client: Client,
    base_url: String,
}

impl HttpIdentityApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn rejection(status: reqwest::StatusCode, context: &str) -> IdentityError {
        let message = match status.as_u16() {
            401 => match context {
                "login" => "Username or password is not correct".to_string(),
                _ => "Authentication token expired. Please login again".to_string(),
            },
            403 => "Access forbidden. Please contact your administrator".to_string(),
            404 => format!("{context} service not found. Please contact support"),
            500..=599 => "Server error. Please try again later".to_string(),
            code => format!("Request failed with status: {code}"),
        };
        IdentityError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl IdentityApi for HttpIdentityApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, IdentityError> {
        let form = [("username", username), ("password", password)];
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| IdentityError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response.status(), "login"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;
        Ok(LoginOutcome {
            token: token.access_token,
            first_login: token.first_login,
        })
    }

    async fn profile(&self, token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .client
            .get(format!("{}/whoami", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| IdentityError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response.status(), "profile"));
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;
        Ok(UserProfile {
            codi_client: profile.codi_client,
            tipus_usuari_id_id: profile.tipus_usuari_id_id,
            empresa: profile.empresa,
        })
    }
}
