//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset and verbose output was requested.
pub const VERBOSE_FILTER: &str =
    "info,imgbed=debug,imgbed_core=debug,imgbed_store=debug,imgbed_manager=debug";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,imgbed=info,imgbed_manager=info";

/// Initialize console logging.
///
/// `RUST_LOG` takes precedence over the built-in filters. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
