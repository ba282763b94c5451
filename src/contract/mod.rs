//! Contract layer - public types shared with the wizard shell
//!
//! Transport-agnostic models and errors. NO serde derives on models - the
//! wire schema is owned by `crate::wire`.

pub mod error;
pub mod model;

pub use error::ConfigError;
pub use model::{
    Bitrix24Settings, CompanyMapping, ConfigurationDocument, DatabaseSettings, EntityMappings,
    FieldLink, LegacyFieldMapping, SessionUser,
};
