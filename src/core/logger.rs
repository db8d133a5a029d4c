// WHOIS Client - Logging and Reporting
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging setup and the reporting capability handed to the batch and output
//! stages.
//!
//! Diagnostics go through `tracing` and are written to stderr so stdout only
//! carries WHOIS responses. User-facing events are not emitted directly by the
//! batch and output code: they call a [`Reporter`], which the binary backs
//! with [`TracingReporter`] and tests back with a recording implementation.

use anyhow::{ Result, anyhow };
use tracing::{ Level, debug, error, info };
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::core::QueryResult;
use crate::services::QueryError;

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))
}

/// Receives per-domain events from the batch and output stages
pub trait Reporter: Send + Sync {
    /// A domain's query finished, successfully or not
    fn completed(&self, domain: &str, result: &QueryResult);

    /// A domain's query failed; called once per failure at output time
    fn failed(&self, domain: &str, error: &QueryError);

    /// The batch was started without any domain
    fn no_domains(&self);
}

/// Forwards reports to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn completed(&self, domain: &str, result: &QueryResult) {
        for hop in &result.hops {
            info!(domain, server = %hop.server, "Redirected");
        }
        debug!(
            domain,
            server = %result.server,
            bytes = result.response.len(),
            redirects = result.redirect_count(),
            success = result.is_success(),
            "Query finished"
        );
    }

    fn failed(&self, domain: &str, error: &QueryError) {
        error!(
            domain,
            server = error.server(),
            kind = error.kind(),
            error = %error,
            "Error querying WHOIS"
        );
    }

    fn no_domains(&self) {
        error!("No domain provided");
    }
}
