//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with panel output on stdout. The
//! filter comes from `CODEREFINE_LOG` (an `EnvFilter` directive) and falls
//! back to a level chosen by the `-v` count.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants;
use crate::env::Env;

/// Filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "coderefine=info,warn",
        _ => "coderefine=debug,info",
    }
}

/// Build the filter, preferring the environment over the `-v` count.
pub fn filter(env: &Env, verbosity: u8) -> EnvFilter {
    env.get(constants::ENV_LOG)
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(env: &Env, verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(filter(env, verbosity))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "warn");
        assert!(default_directive(1).contains("info"));
        assert!(default_directive(5).contains("debug"));
    }

    #[test]
    fn env_directive_wins() {
        let env = Env::mock([(constants::ENV_LOG, "trace")]);
        assert_eq!(filter(&env, 0).to_string(), "trace");
    }

    #[test]
    fn invalid_env_directive_falls_back() {
        let env = Env::mock([(constants::ENV_LOG, "coderefine=[")]);
        assert_eq!(filter(&env, 0).to_string(), "warn");
    }
}
