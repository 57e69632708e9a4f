use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "course-search")]
#[command(about = "Course search server and debounced terminal client")]
pub struct Args {
    // Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve /api/search over HTTP
    Serve(ServeArgs),
    /// Interactive search against a running server, one query per line
    Client(ClientArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    // Port to run the server on
    #[arg(short, long, env = "SEARCH_PORT", default_value_t = 8080)]
    pub port: u16,

    // Course fixture to load instead of the bundled one
    #[arg(short, long, env = "SEARCH_DATASET")]
    pub dataset: Option<PathBuf>,

    // Rate limit max requests per window
    #[arg(long, env = "SEARCH_RATE_LIMIT", default_value_t = 100)]
    pub rate_limit: u32,

    // Rate limit window in seconds, at most one day
    #[arg(
        long,
        env = "SEARCH_RATE_WINDOW",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..=86_400)
    )]
    pub rate_window: u64,

    // Upper bound of the random delay injected before filtering, 0 = off
    #[arg(long, env = "SEARCH_SIMULATE_LATENCY_MS", default_value_t = 0)]
    pub simulate_latency_ms: u64,
}

impl ServeArgs {
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn simulated_latency(&self) -> Option<Duration> {
        (self.simulate_latency_ms > 0).then(|| Duration::from_millis(self.simulate_latency_ms))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ClientArgs {
    // Base url of the search server
    #[arg(short, long, env = "SEARCH_SERVER", default_value = "http://localhost:8080")]
    pub server: String,

    // Quiet period before a query is sent
    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,

    // Request timeout, none by default
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl ClientArgs {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let args = Args::try_parse_from(["course-search", "serve"]).unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };

        assert_eq!(serve.port, 8080);
        assert_eq!(serve.rate_limit, 100);
        assert_eq!(serve.rate_window(), Duration::from_secs(60));
        assert_eq!(serve.simulated_latency(), None);
        assert!(serve.dataset.is_none());
    }

    #[test]
    fn latency_flag_enables_delay() {
        let args =
            Args::try_parse_from(["course-search", "serve", "--simulate-latency-ms", "200"])
                .unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };

        assert_eq!(serve.simulated_latency(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn rate_window_is_bounded() {
        for bad in ["0", "86401", "18446744073709551615"] {
            let parsed =
                Args::try_parse_from(["course-search", "serve", "--rate-window", bad]);
            assert!(parsed.is_err(), "{bad}");
        }

        let args =
            Args::try_parse_from(["course-search", "serve", "--rate-window", "86400"]).unwrap();
        let Command::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.rate_window(), Duration::from_secs(86_400));
    }

    #[test]
    fn client_defaults() {
        let args =
            Args::try_parse_from(["course-search", "--log-format", "json", "client"]).unwrap();
        let Command::Client(client) = args.command else {
            panic!("expected client");
        };

        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(client.debounce(), Duration::from_millis(300));
        assert_eq!(client.timeout(), None);
    }
}
