//! Configuration management for the provider host

pub mod catalog;
pub mod config;
pub mod provider;
pub mod resource;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use catalog::CatalogSource;
pub use config::{Config, CONFIG_VERSION};
pub use provider::ProviderConfig;
pub use resource::ResourceDeclaration;
