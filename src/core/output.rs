// WHOIS Client - Output
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::{ self, Write };

use crate::core::{ Reporter, ResultSet };

/// Print every domain's response and report its error, if any.
///
/// Failed domains are still printed, with whatever response text they have
/// (empty on connection failure). With `show_redirects` the responses of the
/// redirecting servers are printed ahead of the final one.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &ResultSet,
    show_redirects: bool,
    reporter: &dyn Reporter
) -> io::Result<()> {
    for (domain, result) in results {
        if let Some(error) = &result.error {
            reporter.failed(domain, error);
        }

        if show_redirects {
            for hop in &result.hops {
                writeln!(out, "WHOIS response for {} from {} (redirected):", domain, hop.server)?;
                out.write_all(&hop.response)?;
                out.write_all(b"\n\n")?;
            }
        }

        // Response bytes go out untouched, whatever their encoding
        writeln!(out, "WHOIS response for {}:", domain)?;
        out.write_all(&result.response)?;
        out.write_all(b"\n\n")?;
    }

    out.flush()
}

/// Process exit status: 1 when every domain failed, 0 otherwise
pub fn exit_status(results: &ResultSet) -> u8 {
    if results.all_failed() { 1 } else { 0 }
}
