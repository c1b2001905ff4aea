//! `tracing` subscriber setup for the console binary and the demos.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::config::LogConfig;

/// Lets the log filter be swapped at runtime (`debug on` / `debug off`).
#[derive(Clone)]
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    default_level: String,
}

impl LogHandle {
    pub fn set_level(&self, directive: &str) -> Result<(), reload::Error> {
        let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
        self.handle.modify(|current| *current = filter)
    }

    pub fn set_debug(&self, enabled: bool) -> Result<(), reload::Error> {
        if enabled {
            self.set_level("debug")
        } else {
            let level = self.default_level.clone();
            self.set_level(&level)
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init(config: &LogConfig) -> LogHandle {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_new(&default_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(filter);
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
    LogHandle {
        handle,
        default_level,
    }
}
