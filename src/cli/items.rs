/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};

use crate::format;
use crate::query;
use crate::value::Value;

pub const COMMAND_NAME: &str = "items";

#[derive(Args, Debug)]
#[command(about = "Streams every (key, value) pair under a prefix to stdout.", long_about = None)]
pub struct CliArgs {
    pub image: PathBuf,
    /// Prefix to enumerate under. Defaults to the empty prefix (every item).
    #[arg(default_value = "")]
    pub prefix: String,
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

    if !dawg.has_values {
        bail!(
            "{} carries no values; use the `keys` subcommand instead",
            args.image.display()
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (key, value) in query::items(&dawg, args.prefix.as_bytes()) {
        let value = Value::from_be_bytes(&value);
        writeln!(
            out,
            "{}\t{}",
            String::from_utf8_lossy(&key),
            u128::try_from(&value).map(|v| v.to_string()).unwrap_or_else(|_| "<overflow>".to_string())
        )?;
    }
    Ok(())
}
