/*
 * WHOIS Client
 * Copyright (C) 2025 Akaere Networks
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use std::io;
use std::process::ExitCode;

use anyhow::{ Context, Result };
use clap::Parser;
use tracing::error;

use whois_client::core::init_logging;
use whois_client::{ Cli, TracingReporter, WhoisClient, execute };

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = init_logging(args.log_level()) {
        eprintln!("{}", e);
    }

    match run(args).await {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<u8> {
    let config = args.query_config();
    let client = WhoisClient::new(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&client, &config, &args.domains, &mut out, &TracingReporter).await
        .context("Failed to write WHOIS responses")
}
