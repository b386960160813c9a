/*
 * SPDX-FileCopyrightText: 2024 Contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bit-exact, versioned binary serialization of an [`EncodedDawg`].
//!
//! ```text
//! MAGIC (4 bytes, ASCII "DAWG")
//! VERSION (uint8)
//! FLAGS   (uint8)   bit0 = has-values
//! NUM_STATES (uint64 LE)
//! STATE_RECORDS[NUM_STATES]
//!   label:u8, flags:u8 (bit0=last, bit1=final), target:u32 (or sentinel 0xFFFFFFFF)
//!   value_ix:u32            -- present on every record iff has-values is set
//! VALUE_TABLE (only if has-values)
//!   NUM_VALUES:u32
//!   repeated: len:u32, bytes[len]
//! ```

use std::io::{Read, Write};

use crate::dawg::record::{Record, NO_CHILDREN};
use crate::dawg::EncodedDawg;
use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"DAWG";
const VERSION: u8 = 1;
const FLAG_HAS_VALUES: u8 = 0b1;

pub fn to_bytes(dawg: &EncodedDawg) -> Vec<u8> {
    let mut out = Vec::new();
    dump(dawg, &mut out).expect("writing to a Vec<u8> never fails");
    out
}

pub fn dump(dawg: &EncodedDawg, mut writer: impl Write) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_all(&[VERSION])?;
    let flags = if dawg.has_values { FLAG_HAS_VALUES } else { 0 };
    writer.write_all(&[flags])?;
    writer.write_all(&(dawg.records.len() as u64).to_le_bytes())?;

    for record in &dawg.records {
        writer.write_all(&[record.label, record.raw_flags()])?;
        writer.write_all(&record.target.to_le_bytes())?;
        if dawg.has_values {
            writer.write_all(&record.value_ix.to_le_bytes())?;
        }
    }

    if dawg.has_values {
        writer.write_all(&(dawg.value_table.len() as u32).to_le_bytes())?;
        for value in &dawg.value_table {
            writer.write_all(&(value.len() as u32).to_le_bytes())?;
            writer.write_all(value)?;
        }
    }
    Ok(())
}

pub fn from_bytes(bytes: &[u8]) -> Result<EncodedDawg> {
    load(bytes)
}

pub fn load(mut reader: impl Read) -> Result<EncodedDawg> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(Error::Parse(format!(
            "unrecognized magic bytes {:?}, expected {:?}",
            magic, MAGIC
        )));
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version).map_err(truncated)?;
    if version[0] != VERSION {
        return Err(Error::Parse(format!(
            "unsupported format version {}, expected {}",
            version[0], VERSION
        )));
    }

    let mut flags = [0u8; 1];
    reader.read_exact(&mut flags).map_err(truncated)?;
    let has_values = flags[0] & FLAG_HAS_VALUES != 0;

    let mut num_states_buf = [0u8; 8];
    reader.read_exact(&mut num_states_buf).map_err(truncated)?;
    let num_states = u64::from_le_bytes(num_states_buf);
    let num_states: usize = num_states
        .try_into()
        .map_err(|_| Error::Parse("state count does not fit in memory on this platform".to_string()))?;

    let record_width = if has_values { 10 } else { 6 };
    let mut records = Vec::with_capacity(num_states);
    let mut buf = vec![0u8; record_width];
    for _ in 0..num_states {
        reader.read_exact(&mut buf).map_err(truncated)?;
        let label = buf[0];
        let rflags = buf[1];
        let target = u32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]);
        let value_ix = if has_values {
            u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]])
        } else {
            0
        };
        records.push(Record::from_raw_flags(label, rflags, target, value_ix));
    }

    let mut value_table = Vec::new();
    if has_values {
        let mut num_values_buf = [0u8; 4];
        reader.read_exact(&mut num_values_buf).map_err(truncated)?;
        let num_values = u32::from_le_bytes(num_values_buf) as usize;
        value_table.reserve(num_values);
        for _ in 0..num_values {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf).map_err(truncated)?;
            let len = u32::from_le_bytes(len_buf) as usize;
            let mut value = vec![0u8; len];
            reader.read_exact(&mut value).map_err(truncated)?;
            value_table.push(value);
        }
    }

    validate(&records, &value_table, has_values)?;

    Ok(EncodedDawg {
        records,
        value_table,
        has_values,
    })
}

fn truncated(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::Parse("truncated dictionary image".to_string())
    } else {
        Error::Io(e)
    }
}

/// For each index `i`, the nearest index `>= i` whose record has `last =
/// true`, or `None` if no such record exists before the end of the array.
/// A sibling run starting at `s` terminates within bounds iff
/// `next_terminator(s)` is `Some`; this is exactly the condition the
/// navigator's forward scan (`run_bounds`) relies on to stay in bounds.
fn next_terminators(records: &[Record]) -> Vec<Option<usize>> {
    let mut next = vec![None; records.len()];
    let mut current = None;
    for i in (0..records.len()).rev() {
        if records[i].is_last() {
            current = Some(i);
        }
        next[i] = current;
    }
    next
}

fn validate(records: &[Record], value_table: &[Vec<u8>], has_values: bool) -> Result<()> {
    let num_records = records.len() as u32;
    let next_terminator = next_terminators(records);
    let run_terminates = |start: u32| -> bool {
        (start as usize) < records.len() && next_terminator[start as usize].is_some()
    };

    if !records.is_empty() && !run_terminates(0) {
        return Err(Error::Parse(
            "root's transition run never reaches a last=true record before the end of the array"
                .to_string(),
        ));
    }

    for (ix, record) in records.iter().enumerate() {
        if record.target != NO_CHILDREN {
            if record.target >= num_records {
                return Err(Error::Parse(format!(
                    "record {ix} has out-of-range target {}",
                    record.target
                )));
            }
            if !run_terminates(record.target) {
                return Err(Error::Parse(format!(
                    "record {ix}'s child run starting at {} never reaches a last=true record before the end of the array",
                    record.target
                )));
            }
        }
        if has_values && record.is_final() && record.value_ix as usize >= value_table.len() {
            return Err(Error::Parse(format!(
                "record {ix} has out-of-range value_ix {}",
                record.value_ix
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dawg::builder::build_sorted;
    use crate::dawg::encoder::encode;

    fn sample() -> EncodedDawg {
        encode(
            build_sorted(
                true,
                [
                    (b"foo".to_vec(), Some(vec![1])),
                    (b"bar".to_vec(), Some(vec![5])),
                    (b"foobar".to_vec(), Some(vec![3])),
                ]
                .into_iter(),
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn round_trips() {
        let original = sample();
        let bytes = to_bytes(&original);
        let loaded = from_bytes(&bytes).unwrap();
        assert_eq!(loaded.records, original.records);
        assert_eq!(loaded.value_table, original.value_table);
        assert_eq!(loaded.has_values, original.has_values);
    }

    #[test]
    fn to_bytes_is_deterministic() {
        assert_eq!(to_bytes(&sample()), to_bytes(&sample()));
    }

    #[test]
    fn rejects_bad_magic() {
        let err = from_bytes(b"xxxxhi").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rejects_truncated_image() {
        let bytes = to_bytes(&sample());
        let err = from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rejects_out_of_range_target() {
        let mut bytes = to_bytes(&sample());
        // Corrupt the first record's target field to point past the end.
        let target_offset = 4 + 1 + 1 + 8 + 2;
        bytes[target_offset..target_offset + 4].copy_from_slice(&999u32.to_le_bytes());
        let err = from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rejects_a_run_with_no_last_record() {
        // MAGIC + VERSION + FLAGS(no values) + NUM_STATES=1, then a single
        // record that is neither `last` nor `final` and has no children: the
        // root's own transition run never terminates before the end of the
        // array, which would otherwise send the navigator's forward scan for
        // the run's end out of bounds.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.push(0); // flags: no values
        bytes.extend_from_slice(&1u64.to_le_bytes()); // num_states
        bytes.push(b'a'); // label
        bytes.push(0); // flags: not last, not final
        bytes.extend_from_slice(&NO_CHILDREN.to_le_bytes()); // target

        let err = from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rejects_a_target_whose_run_never_terminates() {
        // Two records: the first targets the second's index, but the second
        // is not marked `last`, so its run runs off the end of the array.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.push(0);
        bytes.extend_from_slice(&2u64.to_le_bytes());
        // Record 0: root's only child, last=true, not final, target -> record 1.
        bytes.push(b'a');
        bytes.push(0b01);
        bytes.extend_from_slice(&1u32.to_le_bytes());
        // Record 1: not last, not final, no children.
        bytes.push(b'b');
        bytes.push(0);
        bytes.extend_from_slice(&NO_CHILDREN.to_le_bytes());

        let err = from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
