use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// We force users to provide a variable name so it can be different per application.
/// We encourage it to be the application name plus `_LOG`, e.g. `DEPLOYER_LOG`.
/// If the environment variable is unset or invalid, the maximum log level is set to INFO.
///
/// # Panics
///
/// Panics if a global default subscriber has already been set.
pub fn initialize_logging(env: &str, app_name: &str) {
    let filter = EnvFilter::try_from_env(env)
        .unwrap_or_else(|_| EnvFilter::new(LevelFilter::INFO.to_string()));

    let fmt = tracing_subscriber::fmt::layer();
    Registry::default().with(filter).with(fmt).init();

    tracing::debug!(app_name, "logging initialized");
}
