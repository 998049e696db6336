//! CLI configuration and argument parsing.

use std::time::Duration;

use clap::Parser;

use crate::error::RupError;
use crate::upgrade::gate::PollSettings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("BUILD_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Rancher service rolling upgrade CLI tool.
///
/// Upgrades the named services in place (start-first) to a new image tag
/// and finalizes each upgrade once the server reports it finishable.
#[derive(Parser, Debug, Clone)]
#[command(name = "rup")]
#[command(about = "Rancher service rolling upgrade CLI tool")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    /// Rancher API endpoint URL
    #[arg(long, env = "RANCHER_URL", default_value = "http://localhost:8080")]
    pub url: String,

    /// Rancher API access key
    #[arg(long, env = "RANCHER_ACCESS_KEY", default_value = "")]
    pub access_key: String,

    /// Rancher API secret key
    #[arg(long, env = "RANCHER_SECRET_KEY", default_value = "")]
    pub secret_key: String,

    /// Comma-separated service names to upgrade
    #[arg(short, long)]
    pub services: String,

    /// Prefix prepended verbatim to each service name to form its image
    #[arg(long, default_value = "")]
    pub image_prefix: String,

    /// Image tag to upgrade to
    #[arg(short, long, default_value = "latest")]
    pub tag: String,

    /// Number of concurrent upgrade workers
    #[arg(short, long, default_value = "5")]
    pub parallelism: usize,

    /// Seconds between finalize-availability checks
    #[arg(long, default_value = "1")]
    pub poll_interval_seconds: u64,

    /// Availability checks per service before giving up
    #[arg(long, default_value = "600")]
    pub poll_max_attempts: u32,

    /// Show the upgrade plan without invoking anything
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Log level (panic, fatal, error, warn, info, debug)
    #[arg(long, default_value = "info", env = "RUP_LOG_LEVEL")]
    pub log_level: String,
}

/// Immutable application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub access_key: String,
    pub secret_key: String,
    pub services: Vec<String>,
    pub image_prefix: String,
    pub tag: String,
    pub parallelism: usize,
    pub poll: PollSettings,
    pub dry_run: bool,
    pub log_level: String,
}

impl Config {
    /// Create config from CLI arguments. The service list is split on
    /// commas; blank entries from stray or trailing commas are dropped.
    pub fn from_args(args: Args) -> Self {
        let services = args
            .services
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            url: args.url,
            access_key: args.access_key,
            secret_key: args.secret_key,
            services,
            image_prefix: args.image_prefix,
            tag: args.tag,
            parallelism: args.parallelism,
            poll: PollSettings {
                interval: Duration::from_secs(args.poll_interval_seconds),
                max_attempts: args.poll_max_attempts,
            },
            dry_run: args.dry_run,
            log_level: normalize_log_level(&args.log_level),
        }
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), RupError> {
        if self.url.is_empty() {
            return Err(RupError::InvalidConfig("url must not be empty".to_string()));
        }
        if self.services.is_empty() {
            return Err(RupError::InvalidConfig(
                "at least one service name is required".to_string(),
            ));
        }
        if self.parallelism == 0 {
            return Err(RupError::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }
        if self.poll.max_attempts == 0 {
            return Err(RupError::InvalidConfig(
                "poll-max-attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Map the accepted log level names onto tracing levels. `panic` and
/// `fatal` have no tracing counterpart and collapse to `error`;
/// unrecognized values fall back to `info`.
pub fn normalize_log_level(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "panic" | "fatal" => "error".to_string(),
        "error" => "error".to_string(),
        "warn" => "warn".to_string(),
        "info" => "info".to_string(),
        "debug" => "debug".to_string(),
        other => {
            eprintln!("Unknown log level '{}', defaulting to info", other);
            "info".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_args(services: &str) -> Args {
        Args {
            url: "http://localhost:8080".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            services: services.to_string(),
            image_prefix: "registry.example.com/".to_string(),
            tag: "latest".to_string(),
            parallelism: 5,
            poll_interval_seconds: 1,
            poll_max_attempts: 600,
            dry_run: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_from_args_splits_services() {
        let config = Config::from_args(create_test_args("web,worker,db"));
        assert_eq!(config.services, vec!["web", "worker", "db"]);
    }

    #[test]
    fn test_from_args_drops_blank_entries() {
        let config = Config::from_args(create_test_args(" web, ,worker,"));
        assert_eq!(config.services, vec!["web", "worker"]);
    }

    #[test]
    fn test_from_args_builds_poll_settings() {
        let mut args = create_test_args("web");
        args.poll_interval_seconds = 3;
        args.poll_max_attempts = 20;

        let config = Config::from_args(args);
        assert_eq!(config.poll.interval, Duration::from_secs(3));
        assert_eq!(config.poll.max_attempts, 20);
    }

    #[test]
    fn test_validate_accepts_default_shape() {
        let config = Config::from_args(create_test_args("web"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_services() {
        let config = Config::from_args(create_test_args(" , ,"));
        assert!(matches!(
            config.validate(),
            Err(RupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_parallelism() {
        let mut args = create_test_args("web");
        args.parallelism = 0;

        let config = Config::from_args(args);
        assert!(matches!(
            config.validate(),
            Err(RupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_poll_attempts() {
        let mut args = create_test_args("web");
        args.poll_max_attempts = 0;

        let config = Config::from_args(args);
        assert!(matches!(
            config.validate(),
            Err(RupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_normalize_log_level_passthrough() {
        assert_eq!(normalize_log_level("debug"), "debug");
        assert_eq!(normalize_log_level("warn"), "warn");
    }

    #[test]
    fn test_normalize_log_level_collapses_fatal_and_panic() {
        assert_eq!(normalize_log_level("fatal"), "error");
        assert_eq!(normalize_log_level("panic"), "error");
        assert_eq!(normalize_log_level("FATAL"), "error");
    }

    #[test]
    fn test_normalize_log_level_unknown_falls_back_to_info() {
        assert_eq!(normalize_log_level("verbose"), "info");
    }
}
