// WHOIS Client - Query Results
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::borrow::Cow;

use crate::services::QueryError;

/// Response of a server that redirected the query elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub server: String,
    /// Bytes received up to and including the redirect line
    pub response: Vec<u8>,
}

/// Outcome of querying one domain, redirects included.
///
/// `response` only ever holds the final server's bytes, exactly as sent. When
/// `error` is set the response is empty: a failing redirect target never falls
/// back to the text of an earlier hop.
#[derive(Debug)]
pub struct QueryResult {
    /// Server the final hop was sent to
    pub server: String,
    pub response: Vec<u8>,
    pub error: Option<QueryError>,
    pub hops: Vec<Hop>,
}

impl QueryResult {
    pub fn success(server: impl Into<String>, response: Vec<u8>, hops: Vec<Hop>) -> Self {
        Self {
            server: server.into(),
            response,
            error: None,
            hops,
        }
    }

    pub fn failure(server: impl Into<String>, error: QueryError, hops: Vec<Hop>) -> Self {
        Self {
            server: server.into(),
            response: Vec::new(),
            error: Some(error),
            hops,
        }
    }

    /// Response decoded for display, invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.response)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn redirect_count(&self) -> usize {
        self.hops.len()
    }
}
