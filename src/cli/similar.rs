/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Metric rule files are plain text, one rule per line, blank lines ignored:
//!
//! ```text
//! a,b,1.5        # substituting a -> b costs 1.5
//! ,b,2           # inserting b costs 2
//! a,,2           # deleting a costs 2
//! T,a,b,0.5      # transposing adjacent "ab" -> "ba" costs 0.5
//! ```
//!
//! Bytes are given as single ASCII characters. An empty left/right column
//! means "no byte on this side", selecting insertion or deletion.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use log::info;

use crate::format;
use crate::metric::{Metric, Rule};
use crate::search;

pub const COMMAND_NAME: &str = "similar";

#[derive(Args, Debug)]
#[command(about = "Loads a dictionary image and runs a weighted approximate search.", long_about = None)]
pub struct CliArgs {
    pub image: PathBuf,
    pub query: String,
    /// Maximum total edit cost to accept.
    #[arg(long)]
    pub budget: f64,
    /// Path to a metric rule file. Unspecified edits default to cost 1.
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Enable adjacent-transposition edits.
    #[arg(long)]
    pub allow_transpose: bool,
    /// Keep only the `k` lowest-cost results.
    #[arg(short = 'k', long)]
    pub limit: Option<usize>,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)))
}

pub fn main(submatches: &ArgMatches) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("could not read {}", args.image.display()))?;
    let dawg = format::from_bytes(&bytes)
        .with_context(|| format!("{} is not a valid dictionary image", args.image.display()))?;

    let rules = match &args.rules {
        Some(path) => parse_rule_file(path)?,
        None => Vec::new(),
    };
    let metric = Metric::compile(&rules).context("compiling metric rule file")?;

    let results = search::similar(
        &dawg,
        args.query.as_bytes(),
        &metric,
        args.budget,
        args.allow_transpose,
        args.limit,
    );
    info!("found {} result(s) within budget {}", results.len(), args.budget);
    for (key, cost) in results {
        println!("{}\t{}", String::from_utf8_lossy(&key), cost);
    }
    Ok(())
}

fn parse_byte(field: &str) -> Result<Option<u8>> {
    if field.is_empty() {
        return Ok(None);
    }
    if field.len() != 1 {
        bail!("expected a single ASCII byte, got {field:?}");
    }
    Ok(Some(field.as_bytes()[0]))
}

fn parse_rule_line(line: &str) -> Result<Rule> {
    if let Some(rest) = line.strip_prefix("T,") {
        let mut parts = rest.splitn(3, ',');
        let a = parse_byte(parts.next().context("transpose rule missing first byte")?)?
            .context("transpose rule's first byte must not be empty")?;
        let b = parse_byte(parts.next().context("transpose rule missing second byte")?)?
            .context("transpose rule's second byte must not be empty")?;
        let cost: f64 = parts
            .next()
            .context("transpose rule missing cost")?
            .trim()
            .parse()
            .context("invalid transpose cost")?;
        return Ok(Rule::Transpose(a, b, cost));
    }

    let mut parts = line.splitn(3, ',');
    let left = parse_byte(parts.next().context("rule missing left column")?)?;
    let right = parse_byte(parts.next().context("rule missing right column")?)?;
    let cost: f64 = parts
        .next()
        .context("rule missing cost column")?
        .trim()
        .parse()
        .context("invalid cost")?;

    match (left, right) {
        (Some(a), Some(b)) => Ok(Rule::Substitute(a, b, cost)),
        (None, Some(b)) => Ok(Rule::Insert(b, cost)),
        (Some(a), None) => Ok(Rule::Delete(a, cost)),
        (None, None) => bail!("rule line must specify at least one byte: {line:?}"),
    }
}

fn parse_rule_file(path: &Path) -> Result<Vec<Rule>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(parse_rule_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_substitution() {
        assert_eq!(parse_rule_line("a,b,1.5").unwrap(), Rule::Substitute(b'a', b'b', 1.5));
    }

    #[test]
    fn parses_insert_and_delete() {
        assert_eq!(parse_rule_line(",b,2").unwrap(), Rule::Insert(b'b', 2.0));
        assert_eq!(parse_rule_line("a,,2").unwrap(), Rule::Delete(b'a', 2.0));
    }

    #[test]
    fn parses_transpose() {
        assert_eq!(parse_rule_line("T,a,b,0.5").unwrap(), Rule::Transpose(b'a', b'b', 0.5));
    }

    #[test]
    fn rejects_empty_rule() {
        assert!(parse_rule_line(",,2").is_err());
    }
}
