/// Configuration for the jobweave graph core
///
/// Holds the frontier resolver's depth parameter and the logging setup used by
/// binaries that embed the engine. Defaults read environment variables so the
/// surrounding runtime can tune them without code changes.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Graph resolution parameters
    pub graph: GraphConfig,
    /// Log output parameters
    pub logging: LoggingConfig,
}

/// Frontier resolver parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Multiplier applied to the node count to get the dependency depth limit.
    /// Values below 1 are treated as 1.
    pub depth_factor: usize,
}

/// Log subscriber parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string (e.g. "info", "jobweave=debug")
    pub filter: String,
    /// Whether to print the event target module
    pub with_target: bool,
}

impl GraphConfig {
    pub const DEFAULT_DEPTH_FACTOR: usize = 1;

    /// Depth limit for a workflow with `node_count` nodes
    pub fn depth_limit(&self, node_count: usize) -> usize {
        node_count.max(1).saturating_mul(self.depth_factor.max(1))
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            depth_factor: parse_depth_factor(std::env::var("JOBWEAVE_DEPTH_FACTOR").ok()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: std::env::var("JOBWEAVE_LOG").unwrap_or_else(|_| "info".to_string()),
            with_target: parse_flag(std::env::var("JOBWEAVE_LOG_TARGET").ok()),
        }
    }
}

/// Unset or unparsable values fall back to the default factor
fn parse_depth_factor(value: Option<String>) -> usize {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(GraphConfig::DEFAULT_DEPTH_FACTOR)
}

/// "1" or "true" (any case) enables the flag
fn parse_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Install a global fmt subscriber for the embedding process
///
/// The library never calls this itself. Fails if a global subscriber is
/// already set or the filter directive does not parse.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", config.filter, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_limit_scales_with_node_count() {
        let config = GraphConfig { depth_factor: 2 };
        assert_eq!(config.depth_limit(5), 10);
        assert_eq!(config.depth_limit(0), 2);
    }

    #[test]
    fn zero_factor_is_treated_as_one() {
        let config = GraphConfig { depth_factor: 0 };
        assert_eq!(config.depth_limit(3), 3);
    }

    #[test]
    fn depth_factor_env_value_falls_back_to_default() {
        assert_eq!(parse_depth_factor(Some("4".to_string())), 4);
        assert_eq!(parse_depth_factor(Some(" 3 ".to_string())), 3);
        assert_eq!(parse_depth_factor(Some("deep".to_string())), 1);
        assert_eq!(parse_depth_factor(Some("-2".to_string())), 1);
        assert_eq!(parse_depth_factor(None), GraphConfig::DEFAULT_DEPTH_FACTOR);
    }

    #[test]
    fn log_target_flag_accepts_one_or_true() {
        assert!(parse_flag(Some("1".to_string())));
        assert!(parse_flag(Some("TRUE".to_string())));
        assert!(!parse_flag(Some("yes".to_string())));
        assert!(!parse_flag(Some("0".to_string())));
        assert!(!parse_flag(None));
    }

    #[test]
    fn invalid_filter_directive_fails_tracing_setup() {
        let config = LoggingConfig {
            filter: "jobweave=notalevel".to_string(),
            with_target: false,
        };
        let err = init_tracing(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log filter"));
    }
}
