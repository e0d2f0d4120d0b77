//! Logging setup.
//!
//! The crate logs through [`tracing`]. A client can be given its own
//! [`Dispatch`] via [`ClientBuilder::logger`](crate::ClientBuilder::logger);
//! otherwise events go to the process default installed by [`init_logger`]
//! (or by the application).

use std::io;
use std::sync::OnceLock;

use tracing::Dispatch;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Error, Result};

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Build a stdout logger (timestamp, level, message) as an injectable value.
///
/// `level` is an `EnvFilter` directive such as `"debug"`, `"info"`,
/// `"wework_finance=debug"` or `"off"`. `None` = `"info"`.
#[must_use]
pub fn stdout_logger(level: Option<&str>) -> Dispatch {
    let filter = EnvFilter::builder().parse_lossy(level.unwrap_or("info"));
    Dispatch::new(
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stdout).with_target(false))
            .with(filter),
    )
}

/// Install [`stdout_logger`] as the process-wide default. Call at most once;
/// later calls are no-ops.
pub fn init_logger(level: Option<&str>) -> Result<()> {
    let mut result = Ok(());
    LOGGER_INIT.get_or_init(|| {
        result = tracing::dispatcher::set_global_default(stdout_logger(level))
            .map_err(|e| Error::Logger(e.to_string()));
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_global_default_is_a_logger_error() {
        let _ = tracing::dispatcher::set_global_default(Dispatch::none());
        assert!(matches!(init_logger(Some("info")), Err(Error::Logger(_))));
    }
}
