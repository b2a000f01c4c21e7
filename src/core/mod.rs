//! Core modules: record model, inventory, validation, and index upkeep.
//!
//! Everything the CLI does is reachable from here.

pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod record;
pub mod store;
pub mod validate;
pub mod workspace;
