/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};

use crate::format;
use crate::query;

pub const COMMAND_NAME: &str = "keys";

#[derive(Args, Debug)]
#[command(about = "Streams every key under a prefix to stdout.", long_about = None)]
pub struct CliArgs {
    pub image: PathBuf,
    /// Prefix to enumerate under. Defaults to the empty prefix (every key).
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

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    use std::io::Write;
    for key in query::keys(&dawg, args.prefix.as_bytes()) {
        writeln!(out, "{}", String::from_utf8_lossy(&key))?;
    }
    Ok(())
}
