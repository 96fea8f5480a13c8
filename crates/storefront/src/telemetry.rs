//! Tracing setup for the app shell.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with `EnvFilter`.
///
/// Called once by the app shell at startup. Defaults to info level for
/// this crate if `RUST_LOG` is not set. Calling it twice panics inside
/// `tracing-subscriber`, so the shell owns the single call site.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bakehouse_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
