//! Structured logging bootstrap, mirroring the terminal/debug defaults the
//! zone server's authenticator service used to wire up by hand.

pub use slog::{debug, info, o, trace, warn, Logger};

use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// Build the process-root logger. `verbose` maps to `trace` level, otherwise `info`.
pub fn init(verbose: bool) -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(if verbose { Severity::Trace } else { Severity::Info });
    builder.destination(Destination::Stderr);
    builder.build().expect("failed constructing root logger")
}

/// A logger that discards everything, for tests and library defaults.
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}
