// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte adapters over text writers and strings.
//!
//! Each byte maps to the `char` with the same code point (U+0000..=U+00FF),
//! so binary payloads survive a trip through any `fmt::Write` target.

use std::fmt;
use std::io;
use std::str::Chars;

/// `io::Write` adapter that appends every byte as one `char` to a text writer.
pub struct TextSink<'a, W: fmt::Write + ?Sized> {
    writer: &'a mut W,
}

impl<'a, W: fmt::Write + ?Sized> TextSink<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<W: fmt::Write + ?Sized> io::Write for TextSink<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.writer
                .write_char(char::from(byte))
                .map_err(|_| io::Error::other("text writer rejected output"))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `io::Read` adapter over text produced by [`TextSink`].
pub struct TextSource<'a> {
    chars: Chars<'a>,
}

impl<'a> TextSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl io::Read for TextSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let Some(ch) = self.chars.next() else { break };
            buf[filled] = u8::try_from(u32::from(ch)).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("character U+{:04X} is not a byte", u32::from(ch)),
                )
            })?;
            filled += 1;
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_bytes_survive_text() {
        let mut text = String::new();
        TextSink::new(&mut text)
            .write_all(&[0x00, 0x7F, 0x80, 0xFF])
            .expect("write text");
        assert_eq!(text.chars().count(), 4);

        let mut back = Vec::new();
        TextSource::new(&text)
            .read_to_end(&mut back)
            .expect("read text");
        assert_eq!(back, [0x00, 0x7F, 0x80, 0xFF]);
    }

    #[test]
    fn test_wide_char_rejected() {
        let mut buf = [0u8; 4];
        let err = TextSource::new("a\u{20AC}")
            .read(&mut buf)
            .expect_err("euro sign is not a byte");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
