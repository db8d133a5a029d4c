//! # WHOIS Client Library
//!
//! Queries WHOIS servers over plain TCP (port 43) and follows the
//! `whois server:` referrals servers put in their responses, so a single
//! query against `whois.iana.org` ends at the registry that holds the record.
//!
//! Basic usage:
//! ```no_run
//! use whois_client::query;
//!
//! #[tokio::main]
//! async fn main() {
//!     let result = query("example.com").await;
//!     match result.error {
//!         Some(err) => eprintln!("{}", err),
//!         None => println!("{}", result.text()),
//!     }
//! }
//! ```
//!
//! Several domains at once, with custom settings:
//! ```no_run
//! use whois_client::{ QueryConfig, TracingReporter, run };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = QueryConfig::new("whois.verisign-grs.com", 43);
//!     let domains = vec!["example.com".to_string(), "example.net".to_string()];
//!     let results = run(&config, &domains, &TracingReporter).await;
//!     for (domain, result) in &results {
//!         println!("{}: {} bytes", domain, result.response.len());
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod services;

pub use crate::config::{ Cli, QueryConfig };
pub use crate::core::{
    Hop,
    QueryResult,
    Reporter,
    ResultSet,
    TracingReporter,
    execute,
    exit_status,
    run,
    run_batch,
    write_results,
};
pub use crate::services::{ Connector, QueryError, TcpConnector, WhoisClient };

/// Query one domain against the default server (`whois.iana.org:43`)
pub async fn query(domain: &str) -> QueryResult {
    let config = QueryConfig::default();
    WhoisClient::new(&config).query(&config.server, config.port, domain).await
}
