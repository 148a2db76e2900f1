// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Big-endian data streams over byte sinks and sources.
//!
//! [`DataOutput`] and [`DataInput`] wrap any `std::io::Write` / `std::io::Read`
//! and track the number of bytes moved so decoding errors can report an
//! offset. Every sink flavor the serializer supports (growable buffer,
//! stream, text writer, fixed slice) funnels through these two types.

mod text;
mod utf;

pub use text::{TextSink, TextSource};
pub use utf::MAX_CHUNK_UNITS;

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Upper bound on speculative preallocation driven by a length read from the wire.
pub(crate) const MAX_PREALLOC: usize = 64 * 1024;

/// Generate big-endian write methods for primitive types.
macro_rules! impl_write_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> Result<()> {
            self.write_bytes(&value.to_be_bytes())
        }
    };
}

/// Generate big-endian read methods for primitive types.
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; $size];
            self.read_exact(&mut bytes)?;
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Binary writer over any byte sink.
pub struct DataOutput<'a> {
    sink: &'a mut dyn Write,
    written: usize,
}

impl<'a> DataOutput<'a> {
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Self { sink, written: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.sink.write_all(data).map_err(|source| Error::Io {
            context: "serialize",
            source,
        })?;
        self.written += data.len();
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    /// Write a nullable-slot marker: 1 when null, 0 when a payload follows.
    pub fn write_null_flag(&mut self, is_null: bool) -> Result<()> {
        self.write_u8(u8::from(is_null))
    }

    impl_write_be!(write_i8, i8);
    impl_write_be!(write_u16, u16);
    impl_write_be!(write_i16, i16);
    impl_write_be!(write_i32, i32);
    impl_write_be!(write_i64, i64);

    /// Characters are written as their 32-bit Unicode scalar value.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_bytes(&u32::from(value).to_be_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_bytes(&value.to_bits().to_be_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_bytes(&value.to_bits().to_be_bytes())
    }

    /// Length prefix for arrays and containers.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| Error::InvalidData {
            offset: self.written,
            reason: format!("length {} exceeds i32 range", len),
        })?;
        self.write_i32(len)
    }

    /// Write a string in chunked modified UTF-8.
    pub fn write_utf(&mut self, value: &str) -> Result<()> {
        utf::write_utf(self, value)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(|source| Error::Io {
            context: "flush",
            source,
        })
    }
}

/// Binary reader over any byte source.
pub struct DataInput<'a> {
    source: &'a mut dyn Read,
    offset: usize,
}

impl<'a> DataInput<'a> {
    pub fn new(source: &'a mut dyn Read) -> Self {
        Self { source, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.source
            .read_exact(buf)
            .map_err(|source| Error::DecodeIo {
                offset: self.offset,
                source,
            })?;
        self.offset += buf.len();
        Ok(())
    }

    /// Read `len` bytes without trusting `len` for the initial allocation.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC));
        let mut chunk = [0u8; 4096];
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(chunk.len());
            self.read_exact(&mut chunk[..step])?;
            out.extend_from_slice(&chunk[..step]);
            remaining -= step;
        }
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidData {
                offset,
                reason: format!("invalid boolean byte {:#04x}", other),
            }),
        }
    }

    /// Read a nullable-slot marker; returns `true` when the slot is null.
    pub fn read_null_flag(&mut self) -> Result<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::MalformedNullFlag { offset, value }),
        }
    }

    impl_read_be!(read_i8, i8, 1);
    impl_read_be!(read_u16, u16, 2);
    impl_read_be!(read_i16, i16, 2);
    impl_read_be!(read_i32, i32, 4);
    impl_read_be!(read_i64, i64, 8);
    impl_read_be!(read_u32, u32, 4);

    pub fn read_char(&mut self) -> Result<char> {
        let offset = self.offset;
        let scalar = self.read_u32()?;
        char::from_u32(scalar).ok_or_else(|| Error::InvalidData {
            offset,
            reason: format!("invalid char scalar {:#x}", scalar),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    /// Read a length prefix, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize> {
        let offset = self.offset;
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| Error::InvalidData {
            offset,
            reason: format!("negative length {}", len),
        })
    }

    /// Read a chunked modified-UTF-8 string.
    pub fn read_utf(&mut self) -> Result<String> {
        utf::read_utf(self)
    }
}

impl std::fmt::Debug for DataOutput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataOutput")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for DataInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataInput")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
