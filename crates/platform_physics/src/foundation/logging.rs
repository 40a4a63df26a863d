//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Library code only emits through the `log` facade; binaries call this once
/// at startup. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Log `error` and abort the current operation.
///
/// Used for programmer errors (bad handles, exhausted storage) that the
/// engine never tries to recover from.
#[track_caller]
pub(crate) fn fatal(error: impl std::fmt::Display) -> ! {
    error!("{error}");
    panic!("{error}");
}
