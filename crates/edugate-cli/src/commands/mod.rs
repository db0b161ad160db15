//! CLI command implementations.

pub mod can_manage;
pub mod check_route;
pub mod config;
pub mod roles;
pub mod scope;
pub mod version;
