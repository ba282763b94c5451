//! Configuration for the wizard core

use serde::Deserialize;

/// Crate configuration, deserialized from the wizard's settings file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the identity API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bitrix24 tenant REST endpoint for catalogue fetches; usually taken
    /// from the document's Bitrix24 section instead
    #[serde(default)]
    pub bitrix_api_url: Option<String>,

    /// Bounded wait for every collaborator call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Padding character for the machine-bound cipher key
    #[serde(default = "default_pad_char")]
    pub cipher_pad_char: char,

    /// Windows service name of the background connector
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bitrix_api_url: None,
            call_timeout_secs: default_call_timeout_secs(),
            cipher_pad_char: default_pad_char(),
            service_name: default_service_name(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.btic.cat".to_string()
}

fn default_call_timeout_secs() -> u64 {
    10
}

fn default_pad_char() -> char {
    'T'
}

fn default_service_name() -> String {
    "ConnectorSageBitrix".to_string()
}
