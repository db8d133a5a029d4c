// WHOIS Client - Configuration
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use clap::Parser;
use tracing::Level;

// WHOIS server constants
pub const DEFAULT_WHOIS_SERVER: &str = "whois.iana.org";
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const TIMEOUT_SECONDS: u64 = 30;

// Response handling
pub const MAX_RESPONSE_SIZE: usize = 32 * 1024;
pub const MAX_LINE_SIZE: usize = 4 * 1024;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const REDIRECT_PREFIX: &str = "whois server:";

// Batch fan-out
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Settings shared by every query of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub server: String,
    pub port: u16,
    /// Print the responses of redirecting servers as well as the final one
    pub show_redirects: bool,
    pub max_redirects: usize,
    /// Applied separately to connect, write and every line read
    pub timeout: Option<Duration>,
    pub max_response_size: usize,
    /// Domains queried at the same time, at least 1
    pub concurrency: usize,
}

impl QueryConfig {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            show_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: Some(Duration::from_secs(TIMEOUT_SECONDS)),
            max_response_size: MAX_RESPONSE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_show_redirects(mut self, show_redirects: bool) -> Self {
        self.show_redirects = show_redirects;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WHOIS_SERVER, DEFAULT_WHOIS_PORT)
    }
}

// `-h` selects the server, so clap's short help flag is replaced by `--help`
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A WHOIS client that follows server referrals",
    disable_help_flag = true
)]
pub struct Cli {
    /// Domains to query
    pub domains: Vec<String>,

    /// WHOIS server to query
    #[arg(short = 'h', long = "host", default_value = DEFAULT_WHOIS_SERVER)]
    pub host: String,

    /// WHOIS server port
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_WHOIS_PORT,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Show redirect results too
    #[arg(short = 'i', long)]
    pub show_redirects: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace output (extremely verbose)
    #[arg(short, long)]
    pub trace: bool,

    /// Network timeout in seconds, 0 disables it
    #[arg(long, default_value_t = TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Maximum number of referrals followed per domain
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Number of domains queried at the same time
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.trace {
            Level::TRACE
        } else if self.debug {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    pub fn query_config(&self) -> QueryConfig {
        let timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));

        QueryConfig::new(self.host.clone(), self.port)
            .with_show_redirects(self.show_redirects)
            .with_max_redirects(self.max_redirects)
            .with_timeout(timeout)
            .with_concurrency(self.concurrency)
    }
}
