//! Progress and diagnostic logging via `tracing`.
//!
//! Events go to stderr so stdout carries only the report. `SCRIPTDOC_LOG`
//! takes a full `EnvFilter` directive and wins over `-q` / `-v`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "SCRIPTDOC_LOG";

/// Default filter directive for the given verbosity flags.
pub fn default_level(quiet: bool, verbose: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, true) => "debug",
        (false, false) => "info",
    }
}

pub fn init_logging(quiet: bool, verbose: bool, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(quiet, verbose)));

    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(ansi);

    // A second init (e.g. from a test harness) keeps the first subscriber.
    let _ = Registry::default().with(filter).with(layer).try_init();
}
