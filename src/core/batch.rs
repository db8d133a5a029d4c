// WHOIS Client - Batch Coordinator
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::io::{ self, Write };

use futures::stream::{ self, StreamExt };
use tracing::debug;

use crate::config::QueryConfig;
use crate::core::{ QueryResult, Reporter, exit_status, write_results };
use crate::services::{ Connector, WhoisClient };

/// Final outcome of every queried domain, keyed by domain
#[derive(Debug, Default)]
pub struct ResultSet {
    results: BTreeMap<String, QueryResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a domain's result, replacing any earlier one for the same domain
    pub fn insert(&mut self, domain: impl Into<String>, result: QueryResult) {
        self.results.insert(domain.into(), result);
    }

    pub fn get(&self, domain: &str) -> Option<&QueryResult> {
        self.results.get(domain)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryResult> {
        self.results.iter()
    }

    pub fn failure_count(&self) -> usize {
        self.results.values().filter(|result| result.is_error()).count()
    }

    /// True when there is at least one result and none of them succeeded
    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.failure_count() == self.len()
    }
}

impl FromIterator<(String, QueryResult)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, QueryResult)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (domain, result) in iter {
            set.insert(domain, result);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = (&'a String, &'a QueryResult);
    type IntoIter = btree_map::Iter<'a, String, QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Query every domain against the configured server, at most
/// `config.concurrency` at a time.
///
/// Results are merged in input order, so a domain listed twice keeps the
/// result of its later occurrence.
pub async fn run_batch<C: Connector>(
    client: &WhoisClient<C>,
    config: &QueryConfig,
    domains: &[String],
    reporter: &dyn Reporter
) -> ResultSet {
    debug!("Querying {} domain(s) on {}:{}", domains.len(), config.server, config.port);

    let queries = domains.iter().map(|domain| async move {
        let result = client.query(&config.server, config.port, domain).await;
        reporter.completed(domain, &result);
        (domain.clone(), result)
    });

    stream::iter(queries)
        .buffered(config.concurrency.max(1))
        .collect::<Vec<_>>().await
        .into_iter()
        .collect()
}

/// [`run_batch`] over plain TCP
pub async fn run(config: &QueryConfig, domains: &[String], reporter: &dyn Reporter) -> ResultSet {
    let client = WhoisClient::new(config);
    run_batch(&client, config, domains, reporter).await
}

/// Query the domains, print the responses to `out` and return the process
/// exit status. Without domains nothing is dialed and the status is 1.
pub async fn execute<C: Connector, W: Write>(
    client: &WhoisClient<C>,
    config: &QueryConfig,
    domains: &[String],
    out: &mut W,
    reporter: &dyn Reporter
) -> io::Result<u8> {
    if domains.is_empty() {
        reporter.no_domains();
        return Ok(1);
    }

    let results = run_batch(client, config, domains, reporter).await;
    write_results(out, &results, config.show_redirects, reporter)?;

    Ok(exit_status(&results))
}
