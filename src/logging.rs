use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Flushes the logger when a command ends, whichever way it ends.
#[must_use]
pub struct LogFlushGuard {}

impl Drop for LogFlushGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

/// `RUST_LOG` still overrides the level picked by `verbose`.
pub fn init(verbose: bool, log_file: Option<&Path>) -> std::io::Result<LogFlushGuard> {
    let mut builder = Builder::new();
    builder.filter_level(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    builder.parse_default_env();

    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder.init();
    Ok(LogFlushGuard {})
}
