// LogKeep - core/mod.rs
//
// Core business logic layer.
// Dependencies: platform (filesystem helpers), util.
// Must NOT depend on: app.

pub mod discovery;
pub mod export;
pub mod filter;
pub mod model;
pub mod paginate;
pub mod parser;
pub mod retention;
pub mod stats;
