use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Discard, Logger};

pub fn initialize_logger() -> slog::Logger {
    // TODO is this the correct sequence?
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// Returns a logger that discards everything, for tests that don't
/// assert on output.
pub fn discard_logger() -> slog::Logger {
    Logger::root(Discard, o!())
}

/// Installs an `RUST_LOG`-filtered terminal logger as the global
/// slog-scope logger. Hold the returned guard for the duration of the
/// test run.
#[cfg(feature = "env_logging")]
pub fn initialize_env_logger() -> slog_scope::GlobalLoggerGuard {
    slog_envlogger::init().expect("initialize slog-envlogger")
}
