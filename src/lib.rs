// LogKeep - lib.rs
//
// Library entry point. The CLI in `main.rs` is a thin shell over
// `app::engine::LogEngine`; any other front end (an HTTP handler, a scheduled
// job) can drive the same engine.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
