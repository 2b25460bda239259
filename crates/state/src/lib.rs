//! Local state for rendered manifests

pub mod error;
pub mod manager;
pub mod state;
pub mod types;

pub use error::StateError;
pub use manager::StateManager;
pub use state::{StateFile, STATE_VERSION};
pub use types::{address, digest, ResourceState};
