use clap::Parser;
use std::time::Duration;

/// Desktop client for the DShorts short-video generator.
#[derive(Debug, Parser)]
#[command(name = "dshorts-uploader", version, about)]
pub struct Cli {
    /// Base URL of the DShorts web server
    #[arg(long, env = "DSHORTS_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    /// Delay between two task status checks, in milliseconds
    #[arg(long, env = "DSHORTS_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Timeout applied to each HTTP request (uploads included), in seconds
    #[arg(long, env = "DSHORTS_REQUEST_TIMEOUT_SECS", default_value_t = 600)]
    request_timeout_secs: u64,

    /// How long a notification stays on screen, in seconds
    #[arg(long, env = "DSHORTS_NOTIFICATION_SECS", default_value_t = 5)]
    notification_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(600),
            notification_ttl: Duration::from_secs(5),
        }
    }
}

impl From<Cli> for ClientConfig {
    fn from(cli: Cli) -> Self {
        Self {
            server_url: cli.server_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(cli.poll_interval_ms.max(1)),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            notification_ttl: Duration::from_secs(cli.notification_secs),
        }
    }
}

impl ClientConfig {
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_server() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.notification_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_cli_trims_trailing_slash() {
        let cli = Cli::parse_from([
            "dshorts-uploader",
            "--server-url",
            "http://media-box:9000/",
            "--poll-interval-ms",
            "500",
        ]);
        let config = ClientConfig::from(cli);
        assert_eq!(config.server_url, "http://media-box:9000");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }
}
