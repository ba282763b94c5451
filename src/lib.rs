//! Connector Configuration Core
//!
//! Configuration engine for the Sage 200 / Bitrix24 connector wizard.
//! Holds the configuration document, applies section-scoped updates,
//! migrates legacy field mappings, validates before export and produces
//! the encrypted configuration file consumed by the connector service.

// Public exports
pub mod contract;
pub use contract::{
    error::ConfigError, CompanyMapping, ConfigurationDocument, DatabaseSettings, EntityMappings,
    FieldLink, SessionUser,
};

pub mod domain;
pub use domain::{DocumentStore, SessionService};

pub mod wire;
pub use wire::{export_document, import_document, WireDocument};

pub mod config;
pub use config::Config;

pub mod infra;
