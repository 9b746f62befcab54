//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so `report --json` keeps stdout machine readable.

use std::env;
use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Level used when `-v` is passed on the command line
const VERBOSE_LEVEL: &str = "debug";

pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { VERBOSE_LEVEL } else { config.level.as_str() };
    let filter = build_filter(env::var("RUST_LOG").ok().as_deref(), level);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr).json())
            .try_init(),
        _ => registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

fn build_filter(env_directive: Option<&str>, level: &str) -> EnvFilter {
    env_directive
        .map_or_else(|| EnvFilter::new(level), EnvFilter::new)
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "reqwest=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            format!("snowcast={level}")
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_level() {
        let filter = build_filter(None, "warn");
        assert!(filter.to_string().contains("snowcast=warn"));
    }

    #[test]
    fn test_filter_keeps_env_directive() {
        let filter = build_filter(Some("tower_http=trace"), "info");
        let rendered = filter.to_string();
        assert!(rendered.contains("tower_http=trace"));
        assert!(rendered.contains("hyper=warn"));
    }
}
