//! Configuration: command-line flags with environment fallbacks, validated
//! into typed [`Settings`].

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;

use crate::error::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5002;
const DEFAULT_LOG_LEVEL: &str = "debug";
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Command-line arguments for the masterblog binary.
#[derive(Debug, Parser)]
#[command(name = "masterblog", version, about = "In-memory blog post API")]
pub struct CliArgs {
    /// Interface to listen on.
    #[arg(long, env = "MASTERBLOG_HOST", default_value = DEFAULT_HOST, value_name = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "MASTERBLOG_PORT", default_value_t = DEFAULT_PORT, value_name = "PORT")]
    pub port: u16,

    /// Base log level (trace|debug|info|warn|error). `RUST_LOG` refines it.
    #[arg(long = "log-level", env = "MASTERBLOG_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL, value_name = "LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(
        long = "log-json",
        env = "MASTERBLOG_LOG_JSON",
        value_name = "BOOL",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: bool,

    /// Requests each client may make to the collection endpoint per window.
    #[arg(
        long = "rate-limit-max-requests",
        env = "MASTERBLOG_RATE_LIMIT_MAX_REQUESTS",
        default_value_t = DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        value_name = "COUNT"
    )]
    pub rate_limit_max_requests: u32,

    /// Length of the rate limit window.
    #[arg(
        long = "rate-limit-window-seconds",
        env = "MASTERBLOG_RATE_LIMIT_WINDOW_SECONDS",
        default_value_t = DEFAULT_RATE_LIMIT_WINDOW_SECS,
        value_name = "SECONDS"
    )]
    pub rate_limit_window_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub logging: LoggingSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl Settings {
    /// Parses the process arguments and environment.
    pub fn load() -> Result<Self, Error> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self, Error> {
        let ip = IpAddr::from_str(&args.host).map_err(|source| Error::Address {
            addr: args.host.clone(),
            source,
        })?;

        let level = LevelFilter::from_str(&args.log_level)
            .map_err(|err| Error::Config(format!("log level `{}`: {err}", args.log_level)))?;
        let format = if args.log_json { LogFormat::Json } else { LogFormat::Compact };

        let max_requests = NonZeroU32::new(args.rate_limit_max_requests)
            .ok_or_else(|| Error::Config("rate limit max requests must be at least 1".into()))?;
        if args.rate_limit_window_seconds == 0 {
            return Err(Error::Config("rate limit window must be at least 1 second".into()));
        }

        Ok(Self {
            listen: SocketAddr::new(ip, args.port),
            logging: LoggingSettings { level, format },
            rate_limit: RateLimitSettings {
                max_requests,
                window: Duration::from_secs(args.rate_limit_window_seconds),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Result<Settings, Error> {
        let argv = std::iter::once("masterblog").chain(args.iter().copied());
        Settings::from_args(CliArgs::parse_from(argv))
    }

    #[test]
    fn defaults_listen_on_all_interfaces_in_debug() {
        let settings = settings(&[]).expect("valid settings");
        assert_eq!(settings.listen, "0.0.0.0:5002".parse().unwrap());
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.rate_limit.max_requests.get(), 10);
        assert_eq!(settings.rate_limit.window, Duration::from_secs(60));
    }

    #[test]
    fn cli_overrides_apply() {
        let settings = settings(&[
            "--host", "127.0.0.1",
            "--port", "8080",
            "--log-level", "warn",
            "--log-json", "yes",
            "--rate-limit-max-requests", "3",
            "--rate-limit-window-seconds", "5",
        ])
        .expect("valid settings");

        assert_eq!(settings.listen, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(settings.logging.level, LevelFilter::WARN);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.rate_limit.max_requests.get(), 3);
        assert_eq!(settings.rate_limit.window, Duration::from_secs(5));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(settings(&["--host", "example.com"]), Err(Error::Address { .. })));
        assert!(matches!(settings(&["--log-level", "loud"]), Err(Error::Config(_))));
        assert!(matches!(settings(&["--rate-limit-max-requests", "0"]), Err(Error::Config(_))));
        assert!(matches!(settings(&["--rate-limit-window-seconds", "0"]), Err(Error::Config(_))));
    }
}
