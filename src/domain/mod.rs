//! Domain layer - document model behavior and orchestration

pub mod catalog;
pub mod collaborators;
pub mod document;
pub mod events;
pub mod migration;
pub mod service;
pub mod store;
pub mod validation;

pub use collaborators::{CipherVault, FieldCatalogApi, IdentityApi, ServiceControl};
pub use events::{DocumentEvent, EventPublisher, NoOpEventPublisher};
pub use service::SessionService;
pub use store::DocumentStore;
