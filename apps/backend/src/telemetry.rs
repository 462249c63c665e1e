use std::env;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Game events are `info`; HTTP plumbing stays quiet unless asked for.
const DEFAULT_FILTER: &str = "info,avalon_backend=info,actix_web=info,actix_server=warn";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the filter. `LOG_FORMAT=pretty` swaps the JSON lines
/// for human-readable output when running locally.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let pretty = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if pretty {
        registry
            .with(fmt::layer().with_target(true).compact())
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_ansi(false)
                    .json()
                    .flatten_event(true),
            )
            .try_init()
    }
}
