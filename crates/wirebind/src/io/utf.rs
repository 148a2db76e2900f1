// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chunked modified-UTF-8 string codec.
//!
//! Layout: `[i32 UTF-16 unit count]` followed by chunks of at most
//! [`MAX_CHUNK_UNITS`] units, each `[u16 byte length][modified UTF-8]`.
//! Modified UTF-8 encodes U+0000 as two bytes and supplementary characters
//! as two three-byte surrogates, so no encoded byte is ever zero.

use super::{DataInput, DataOutput, MAX_PREALLOC};
use crate::error::{Error, Result};

/// UTF-16 units per encoded chunk.
pub const MAX_CHUNK_UNITS: usize = 16384;

pub(super) fn write_utf(out: &mut DataOutput<'_>, value: &str) -> Result<()> {
    let units: Vec<u16> = value.encode_utf16().collect();
    out.write_len(units.len())?;

    // 3 bytes per unit keeps a full chunk below u16::MAX
    let mut encoded = Vec::with_capacity(MAX_CHUNK_UNITS.min(units.len()) * 3);
    for chunk in units.chunks(MAX_CHUNK_UNITS) {
        encoded.clear();
        for &unit in chunk {
            encode_unit(unit, &mut encoded);
        }
        // chunk length is bounded by MAX_CHUNK_UNITS * 3
        out.write_u16(encoded.len() as u16)?;
        out.write_bytes(&encoded)?;
    }
    Ok(())
}

fn encode_unit(unit: u16, buf: &mut Vec<u8>) {
    match unit {
        0x0001..=0x007F => buf.push(unit as u8),
        0x0000 | 0x0080..=0x07FF => {
            buf.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
            buf.push(0x80 | (unit & 0x3F) as u8);
        }
        _ => {
            buf.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
            buf.push(0x80 | ((unit >> 6) & 0x3F) as u8);
            buf.push(0x80 | (unit & 0x3F) as u8);
        }
    }
}

pub(super) fn read_utf(input: &mut DataInput<'_>) -> Result<String> {
    let total = input.read_len()?;
    let mut units: Vec<u16> = Vec::with_capacity(total.min(MAX_PREALLOC));

    while units.len() < total {
        let expected = (total - units.len()).min(MAX_CHUNK_UNITS);
        let len = input.read_u16()? as usize;
        let start = input.offset();
        let bytes = input.read_bytes(len)?;
        let before = units.len();
        decode_chunk(&bytes, start, &mut units)?;
        if units.len() - before != expected {
            return Err(Error::InvalidData {
                offset: start,
                reason: format!(
                    "string chunk holds {} units, expected {}",
                    units.len() - before,
                    expected
                ),
            });
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidData {
        offset: input.offset(),
        reason: "unpaired surrogate in string".into(),
    })
}

fn decode_chunk(bytes: &[u8], base: usize, units: &mut Vec<u16>) -> Result<()> {
    let malformed = |at: usize| Error::InvalidData {
        offset: base + at,
        reason: "malformed modified UTF-8".into(),
    };
    let continuation = |at: usize| -> Result<u16> {
        match bytes.get(at) {
            Some(&b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
            _ => Err(malformed(at)),
        }
    };

    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        match lead >> 4 {
            0x0..=0x7 if lead != 0 => {
                units.push(u16::from(lead));
                i += 1;
            }
            0xC | 0xD => {
                let low = continuation(i + 1)?;
                units.push((u16::from(lead & 0x1F) << 6) | low);
                i += 2;
            }
            0xE => {
                let mid = continuation(i + 1)?;
                let low = continuation(i + 2)?;
                units.push((u16::from(lead & 0x0F) << 12) | (mid << 6) | low);
                i += 3;
            }
            _ => return Err(malformed(i)),
        }
    }
    Ok(())
}
