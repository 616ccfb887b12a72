//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level
//! - Logs go to stderr so command output on stdout stays clean
//! - Installed before the config is read; the configured level is applied
//!   afterwards through a reload handle

use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Level used until the config has been read.
pub const BOOTSTRAP_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` if set, else `verbose` → debug, else `level`.
pub fn env_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::new(format!("multichain_wallet={level},wallet={level}"))
    })
}

/// Swaps the active filter once the configured level is known.
#[derive(Clone)]
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    pub fn set_level(&self, level: &str, verbose: bool) {
        if let Err(e) = self.handle.reload(env_filter(level, verbose)) {
            eprintln!("failed to apply log level {}: {}", level, e);
        }
    }

    /// Current filter directives.
    pub fn current(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

/// Initialize the global tracing subscriber at [`BOOTSTRAP_LEVEL`].
///
/// Returns `None` when a subscriber was already installed.
pub fn init_logging(verbose: bool) -> Option<LogHandle> {
    let (filter, handle) = reload::Layer::new(env_filter(BOOTSTRAP_LEVEL, verbose));
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    match result {
        Ok(()) => Some(LogHandle { handle }),
        Err(e) => {
            eprintln!("logging already initialized: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_level_replaces_bootstrap_filter() {
        let (layer, handle) = reload::Layer::new(env_filter(BOOTSTRAP_LEVEL, false));
        let _subscriber = tracing_subscriber::registry().with(layer);
        let logs = LogHandle { handle };

        assert_eq!(logs.current(), Some(env_filter(BOOTSTRAP_LEVEL, false).to_string()));

        logs.set_level("info", false);
        assert_eq!(logs.current(), Some(env_filter("info", false).to_string()));

        logs.set_level("info", true);
        assert_eq!(logs.current(), Some(env_filter("debug", false).to_string()));
    }
}
