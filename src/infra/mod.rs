//! Infrastructure adapters for the domain collaborator traits.

pub mod catalog;
pub mod cipher;
pub mod identity;
pub mod paths;
pub mod winservice;

pub use catalog::HttpFieldCatalog;
pub use cipher::MachineKeyVault;
pub use identity::HttpIdentityApi;
pub use winservice::PowerShellServiceControl;
