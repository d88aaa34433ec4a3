pub mod common;
pub mod error;
pub mod export;
pub mod import;
pub mod io;
pub mod logging;
pub mod scene;
pub mod settings;

/// Written into generated include files.
pub const TOOL_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");
