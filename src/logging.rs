//! Logging setup.
//!
//! All log output goes to stderr; stdout carries only command results (the
//! JSON index, reports, `updated:`/`removed:` lines).
//!
//! Levels come from [`AppConfig`] (`log_level` plus `log_modules`
//! overrides). `RUST_LOG` takes precedence over config:
//!
//! ```bash
//! RUST_LOG=debug aboutme update src/app.py
//! RUST_LOG=aboutme::index::lock=debug aboutme build -o .claude/aboutme-index.json
//! ```

use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::utils::AppConfig;

static INIT: Once = Once::new();

/// Initialize logging with configuration.
///
/// Safe to call multiple times; only the first call takes effect. With
/// `verbose`, the default level is raised to `debug`.
pub fn init_with_config(config: &AppConfig, verbose: bool) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(config.log_filter())
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}
