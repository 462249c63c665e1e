//! Test logging shared by unit and integration test binaries.
//!
//! Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`.
//! `TEST_LOG_JSON=1` switches to the same JSON shape the server emits, which
//! helps when checking structured fields such as `room_id`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_DIRECTIVE: &str = "warn";

/// Idempotent; safe to call from every test and from `ctor` hooks.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let directive = filter_directive(|name| std::env::var(name).ok());
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        // Someone else may have installed a subscriber already.
        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}

fn filter_directive<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}
