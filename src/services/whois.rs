use std::future::Future;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{ AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader };
use tokio::net::TcpStream;
use tracing::{ debug, warn };

use crate::config::{ MAX_LINE_SIZE, QueryConfig, REDIRECT_PREFIX };
use crate::core::{ Hop, QueryResult };
use crate::services::QueryError;

/// Opens the TCP session for one hop
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, server: &str, port: u16) -> io::Result<TcpStream>;
}

/// Resolves the server name and dials it directly
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, server: &str, port: u16) -> io::Result<TcpStream> {
        TcpStream::connect((server, port)).await
    }
}

enum HopOutcome {
    Complete(Vec<u8>),
    Redirect {
        target: String,
        response: Vec<u8>,
    },
}

/// Query executor following `whois server:` referrals.
#[derive(Debug, Clone)]
pub struct WhoisClient<C = TcpConnector> {
    connector: C,
    max_redirects: usize,
    max_response_size: usize,
    timeout: Option<Duration>,
}

impl WhoisClient<TcpConnector> {
    pub fn new(config: &QueryConfig) -> Self {
        Self::with_connector(config, TcpConnector)
    }
}

impl<C: Connector> WhoisClient<C> {
    pub fn with_connector(config: &QueryConfig, connector: C) -> Self {
        Self {
            connector,
            max_redirects: config.max_redirects,
            max_response_size: config.max_response_size,
            timeout: config.timeout,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Query `domain` on `server:port`, following redirects to other servers.
    ///
    /// Every hop reuses `port`. The returned response is the text of the last
    /// server in the chain only; redirecting servers are kept in `hops`.
    ///
    /// A redirect naming the server currently queried is ignored and reading
    /// continues on the same connection. Host names are compared ignoring
    /// ASCII case, so `Whois Server: WHOIS.IANA.ORG` from `whois.iana.org`
    /// counts as such a self-redirect.
    pub async fn query(&self, server: &str, port: u16, domain: &str) -> QueryResult {
        let mut current = server.to_string();
        let mut hops = Vec::new();

        loop {
            match self.query_hop(&current, port, domain).await {
                Ok(HopOutcome::Complete(response)) => {
                    debug!("Received {} bytes from {}:{}", response.len(), current, port);
                    return QueryResult::success(current, response, hops);
                }
                Ok(HopOutcome::Redirect { target, response }) => {
                    if hops.len() >= self.max_redirects {
                        warn!("Giving up on {} after {} redirects", domain, hops.len());
                        let error = QueryError::TooManyRedirects {
                            limit: self.max_redirects,
                            last_server: current.clone(),
                        };
                        return QueryResult::failure(current, error, hops);
                    }
                    debug!("Following redirect for {}: {} -> {}", domain, current, target);
                    hops.push(Hop {
                        server: std::mem::replace(&mut current, target),
                        response,
                    });
                }
                Err(error) => {
                    debug!("Query for {} failed: {}", domain, error);
                    return QueryResult::failure(current, error, hops);
                }
            }
        }
    }

    async fn query_hop(
        &self,
        server: &str,
        port: u16,
        domain: &str
    ) -> Result<HopOutcome, QueryError> {
        debug!("Querying WHOIS server: {}:{}", server, port);

        let mut stream = with_timeout(self.timeout, self.connector.connect(server, port)).await
            .map_err(|source| QueryError::ConnectionFailed {
                server: server.to_string(),
                port,
                source,
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        // WHOIS protocol expects CRLF-terminated query
        let query = format!("{}\r\n", domain);
        with_timeout(self.timeout, async {
            stream.write_all(query.as_bytes()).await?;
            stream.flush().await
        }).await.map_err(|source| QueryError::WriteFailed {
            server: server.to_string(),
            source,
        })?;

        let mut reader = BufReader::new(stream);
        let mut response = Vec::new();
        let mut line = Vec::new();

        loop {
            line.clear();

            // The line crossing the ceiling is still read whole, but no line
            // may grow past its own limit when the server never sends a newline
            let remaining = self.max_response_size.saturating_sub(response.len());
            let mut limited = (&mut reader).take(remaining.max(MAX_LINE_SIZE) as u64);
            match with_timeout(self.timeout, limited.read_until(b'\n', &mut line)).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!("Read from {} ended after {} bytes: {}", server, response.len(), e);
                    break;
                }
            }

            response.extend_from_slice(&line);

            if line.ends_with(b"\n") {
                if let Some(target) = extract_redirect(&String::from_utf8_lossy(&line)) {
                    if !target.eq_ignore_ascii_case(server) {
                        return Ok(HopOutcome::Redirect {
                            target: target.to_string(),
                            response,
                        });
                    }
                }
            }

            if response.len() >= self.max_response_size {
                debug!("Response from {} reached {} bytes, truncating", server, response.len());
                break;
            }
        }

        Ok(HopOutcome::Complete(response))
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, future: F) -> io::Result<T>
    where F: Future<Output = io::Result<T>>
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, future).await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "operation timed out"))?,
        None => future.await,
    }
}

/// Redirect target named by a `whois server:` line, matched case-insensitively
pub fn extract_redirect(line: &str) -> Option<&str> {
    let line = line.trim();
    let prefix = line.get(..REDIRECT_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(REDIRECT_PREFIX) {
        return None;
    }

    let target = line[REDIRECT_PREFIX.len()..].trim();
    if target.is_empty() { None } else { Some(target) }
}
