//! Structured logging setup for the binary. Library code below this
//! (`wfsk_core`) logs through the `log` facade; `tracing_log::LogTracer`
//! redirects those records into the `tracing` subscriber installed here,
//! so both facades end up on the same output, configurable with
//! `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber and the `log`-to-`tracing`
/// bridge. Defaults to `info` level when `RUST_LOG` is unset. Safe to
/// call once at process start; a second call is a no-op (errors from an
/// already-set global logger/subscriber are swallowed).
pub fn init() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
