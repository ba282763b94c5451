//! External wire schema and mapping
//!
//! Owns the exact JSON shape of the persisted configuration file and the
//! conversions to and from the contract models.

pub mod dto;
pub mod mapper;

pub use dto::{WireBitrix24, WireCompany, WireDatabase, WireDocument, WireFieldLink,
    WireFieldMappings, WireLegacyMapping};
pub use mapper::{export_document, import_document};
