//! Tracing subscriber setup for the command-line tool.
//!
//! Filter directives come from, in order of precedence: `EMOJIDB_LOG`,
//! `RUST_LOG`, then the `-v`/`-q` flags. Logs go to stderr so they never mix
//! with command output.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "EMOJIDB_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}
impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

fn env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    // sqlx logs every statement at INFO; keep it down unless asked for.
    EnvFilter::new(format!("{},sqlx=warn", verbosity.level()))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(verbosity: Verbosity) {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(verbosity == Verbosity::Verbose);
    let registry = tracing_subscriber::registry().with(env_filter(verbosity));
    match verbosity {
        Verbosity::Verbose => registry.with(layer.with_timer(fmt::time::uptime())).init(),
        _ => registry.with(layer.without_time().compact()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins_over_quiet() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
    }
}
