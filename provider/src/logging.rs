// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Log output setup

use tracing_subscriber::EnvFilter;

/// The filter to log with: `directives` if given and valid, `level` otherwise
fn filter(directives: Option<&str>, level: &str) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

/// Install the global log subscriber. `RUST_LOG` takes precedence over `level`.
/// Calling this more than once keeps the first subscriber.
pub fn init(level: &str) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(directives.as_deref(), level))
        .with_target(true)
        .with_line_number(true)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Log subscriber already installed");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_env_takes_precedence() {
        assert_eq!(filter(Some("iac_provider=debug"), "info").to_string(), "iac_provider=debug");
        assert_eq!(filter(None, "warn").to_string(), "warn");
        assert_eq!(filter(Some("iac_provider=loud"), "error").to_string(), "error");
    }
}
