//! CLI command modules

pub mod apply;
pub mod destroy;
pub mod init;
pub mod kinds;
pub mod plan;
pub mod render;
pub mod schema;
pub mod state;
pub mod validate;
