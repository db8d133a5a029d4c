//! Error types for WHOIS queries

use std::io;

use thiserror::Error;

/// Failure of one domain's query.
///
/// Read failures are deliberately absent: a server dropping the connection
/// mid-response ends the stream and the partial text is kept.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("failed to connect to WHOIS server {server}:{port}: {source}")]
    ConnectionFailed {
        server: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to send WHOIS query to {server}: {source}")]
    WriteFailed {
        server: String,
        #[source]
        source: io::Error,
    },

    #[error("too many WHOIS redirects (limit {limit}), last server was {last_server}")]
    TooManyRedirects { limit: usize, last_server: String },
}

impl QueryError {
    /// Short name of the failure, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::WriteFailed { .. } => "write_failed",
            Self::TooManyRedirects { .. } => "too_many_redirects",
        }
    }

    #[cfg(test)]
    pub fn is_connection_failed(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }

    #[cfg(test)]
    pub fn is_write_failed(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }

    #[cfg(test)]
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(self, Self::TooManyRedirects { .. })
    }

    /// Server the failing hop was talking to
    pub fn server(&self) -> &str {
        match self {
            Self::ConnectionFailed { server, .. } | Self::WriteFailed { server, .. } => server,
            Self::TooManyRedirects { last_server, .. } => last_server,
        }
    }
}
