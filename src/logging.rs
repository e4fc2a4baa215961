//! Diagnostics setup.
//!
//! Stdout belongs to the renderer, so logs go to a caller-supplied writer,
//! typically a file.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TRELLIS_LOG";

/// Install a global fmt subscriber writing to `writer`.
///
/// The filter is read from `TRELLIS_LOG` (for example `trellis=debug`) and
/// defaults to `warn`. Returns `false` if a global subscriber was already
/// installed.
pub fn init_logging<W>(writer: W) -> bool
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_refused() {
        init_logging(std::io::sink);
        assert!(!init_logging(std::io::sink));
    }
}
