// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arbitrary-precision integers and decimals.
//!
//! Only what the wire format needs: a canonical two's-complement byte form,
//! conversions from and to machine integers, and decimal text.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Arbitrary-precision signed integer.
///
/// Stored as the minimal big-endian two's-complement byte sequence; zero is `[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger {
    bytes: Vec<u8>,
}

impl BigInteger {
    /// Build from big-endian two's-complement bytes (any sign extension is stripped).
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut bytes = bytes.to_vec();
        if bytes.is_empty() {
            bytes.push(0);
        }
        normalize(&mut bytes);
        Self { bytes }
    }

    /// Minimal big-endian two's-complement encoding.
    pub fn to_be_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn zero() -> Self {
        Self { bytes: vec![0] }
    }

    pub fn is_negative(&self) -> bool {
        self.bytes[0] & 0x80 != 0
    }

    pub fn is_zero(&self) -> bool {
        self.bytes == [0]
    }

    /// Value as `i128`, if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.bytes.len() > 16 {
            return None;
        }
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 16];
        buf[16 - self.bytes.len()..].copy_from_slice(&self.bytes);
        Some(i128::from_be_bytes(buf))
    }

    /// Big-endian unsigned magnitude, without leading zeros (zero is empty).
    fn magnitude(&self) -> Vec<u8> {
        let mut mag = self.bytes.clone();
        if self.is_negative() {
            negate(&mut mag);
        }
        let first = mag.iter().position(|&b| b != 0).unwrap_or(mag.len());
        mag.drain(..first);
        mag
    }

    fn from_magnitude(mut mag: Vec<u8>, negative: bool) -> Self {
        mag.insert(0, 0);
        if negative {
            negate(&mut mag);
        }
        Self::from_be_bytes(&mag)
    }
}

/// In-place two's-complement negation.
fn negate(bytes: &mut [u8]) {
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        let (v, c) = (!*b).overflowing_add(u8::from(carry));
        *b = v;
        carry = c;
    }
}

/// Strip redundant sign-extension bytes.
fn normalize(bytes: &mut Vec<u8>) {
    let redundant = bytes
        .windows(2)
        .take_while(|w| (w[0] == 0x00 && w[1] & 0x80 == 0) || (w[0] == 0xFF && w[1] & 0x80 != 0))
        .count();
    bytes.drain(..redundant);
}

impl From<i128> for BigInteger {
    fn from(value: i128) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl From<i64> for BigInteger {
    fn from(value: i64) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl From<i32> for BigInteger {
    fn from(value: i32) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl Default for BigInteger {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.to_i128() {
            return write!(f, "{}", v);
        }
        // Repeated division of the magnitude by 10^9.
        let mut mag = self.magnitude();
        let mut groups = Vec::new();
        while !mag.is_empty() {
            let mut rem: u64 = 0;
            for b in mag.iter_mut() {
                let cur = (rem << 8) | u64::from(*b);
                *b = (cur / 1_000_000_000) as u8;
                rem = cur % 1_000_000_000;
            }
            groups.push(rem as u32);
            let first = mag.iter().position(|&b| b != 0).unwrap_or(mag.len());
            mag.drain(..first);
        }
        if self.is_negative() {
            f.write_str("-")?;
        }
        let mut iter = groups.iter().rev();
        if let Some(head) = iter.next() {
            write!(f, "{}", head)?;
        }
        for g in iter {
            write!(f, "{:09}", g)?;
        }
        Ok(())
    }
}

impl FromStr for BigInteger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidData {
            offset: 0,
            reason: format!("'{}' is not a decimal integer", s),
        };
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if digits.is_empty() {
            return Err(invalid());
        }
        let mut mag: Vec<u8> = Vec::new();
        for ch in digits.chars() {
            let digit = ch.to_digit(10).ok_or_else(invalid)?;
            // mag = mag * 10 + digit
            let mut carry = digit;
            for b in mag.iter_mut().rev() {
                let cur = u32::from(*b) * 10 + carry;
                *b = (cur & 0xFF) as u8;
                carry = cur >> 8;
            }
            while carry > 0 {
                mag.insert(0, (carry & 0xFF) as u8);
                carry >>= 8;
            }
        }
        Ok(Self::from_magnitude(mag, negative))
    }
}

/// Arbitrary-precision decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BigDecimal {
    unscaled: BigInteger,
    scale: i32,
}

impl BigDecimal {
    pub fn new(unscaled: BigInteger, scale: i32) -> Self {
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInteger {
        &self.unscaled
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.unscaled.to_string();
        let (sign, digits) = match text.strip_prefix('-') {
            Some(d) => ("-", d),
            None => ("", text.as_str()),
        };
        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}{}", sign, digits, zeros);
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}
