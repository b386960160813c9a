/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use log::info;

use crate::dict::{Dict, Set};
use crate::value::Value;

pub const COMMAND_NAME: &str = "build";

#[derive(Args, Debug)]
#[command(about = "Builds a dictionary image from a newline-delimited key file.", long_about = None)]
pub struct CliArgs {
    /// Newline-delimited key file. With `--values`, each line is `key<TAB>value`.
    pub input: PathBuf,
    /// Path to write the serialized dictionary image to.
    pub output: PathBuf,
    /// Treat `input` as already sorted in strictly ascending byte order with no duplicates.
    #[arg(long)]
    pub sorted: bool,
    /// Parse a tab-separated non-negative integer value per line and build a value-carrying dictionary.
    #[arg(long)]
    pub values: bool,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)))
}

pub fn main(submatches: &ArgMatches) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;

    let contents = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;
    let file = File::create(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    let lines = contents.lines().filter(|l| !l.is_empty());

    if args.values {
        let pairs = lines
            .map(|line| {
                let (key, value) = line
                    .split_once('\t')
                    .with_context(|| format!("line missing tab-separated value: {line:?}"))?;
                let value: u64 = value
                    .parse()
                    .with_context(|| format!("invalid value on line: {line:?}"))?;
                Ok::<_, anyhow::Error>((key.as_bytes().to_vec(), Value::from(value)))
            })
            .collect::<Result<Vec<_>>>()?;
        let dict = Dict::build(pairs, args.sorted).context("building dictionary")?;
        dict.dump(&mut writer).context("writing dictionary image")?;
        info!(
            "built dictionary: {} records, {} distinct values",
            dict.record_count(),
            dict.value_count()
        );
    } else {
        let keys: Vec<Vec<u8>> = lines.map(|l| l.as_bytes().to_vec()).collect();
        let set = Set::build(keys, args.sorted).context("building set")?;
        set.dump(&mut writer).context("writing set image")?;
        info!("built set: {} records", set.record_count());
    }
    Ok(())
}
