use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,bouncer=debug";

/// Initialize console logging filtered by `RUST_LOG`, or [`DEFAULT_FILTER`].
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(env_filter)
}

/// Initialize console logging with explicit filter directives, ignoring `RUST_LOG`.
pub fn init_tracing_with(directives: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    install(EnvFilter::new(directives))
}

fn install(env_filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    debug!("Tracing initialized");
    Ok(())
}
