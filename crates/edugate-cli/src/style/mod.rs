//! Terminal output helpers.

pub mod table;

pub use table::*;
