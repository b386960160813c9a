/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};

use crate::format;

pub const COMMAND_NAME: &str = "check";

#[derive(Args, Debug)]
#[command(about = "Loads a dictionary image and reports basic statistics.", long_about = None)]
pub struct CliArgs {
    pub image: PathBuf,
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

    println!("records:     {}", dawg.records.len());
    println!("has values:  {}", dawg.has_values);
    if dawg.has_values {
        println!("values:      {}", dawg.value_table.len());
    }
    Ok(())
}
