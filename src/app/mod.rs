// LogKeep - app/mod.rs
//
// Application layer: request parsing and per-request orchestration.
// Dependencies: core, platform, util.

pub mod engine;
pub mod query;
