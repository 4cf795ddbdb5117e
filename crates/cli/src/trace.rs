//! Request traces.
//!
//! A trace is a text file with one request per line:
//!
//! ```text
//! # comment
//! L 0x10          load the word at byte address 0x10
//! S 0x0 1234      store 1234 to byte address 0x0
//! ```
//!
//! Addresses are byte addresses in hex (`0x` prefix) or decimal. Values are
//! signed decimal or hex words.

use std::fmt;

use setcache_core::common::Word;
use thiserror::Error;

/// One request against the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Read the word at a byte address.
    Load {
        /// Byte address.
        address: u32,
    },
    /// Write a word to a byte address.
    Store {
        /// Byte address.
        address: u32,
        /// Word to write.
        value: Word,
    },
}

impl Request {
    /// Byte address targeted by the request.
    pub const fn address(&self) -> u32 {
        match *self {
            Self::Load { address } | Self::Store { address, .. } => address,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { address } => write!(f, "L {address:#x}"),
            Self::Store { address, value } => write!(f, "S {address:#x} {value}"),
        }
    }
}

/// A malformed trace line.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("trace line {line}: {message}")]
pub struct TraceError {
    /// One-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub message: String,
}

/// The request sequence of the reference walkthrough.
pub const DEMO: &[Request] = &[
    Request::Load { address: 0x00 },
    Request::Load { address: 0x01 },
    Request::Load { address: 0x10 },
    Request::Load { address: 0xF8 },
    Request::Load { address: 0x14 },
    Request::Store {
        address: 0x00,
        value: 1234,
    },
    Request::Load { address: 0x00 },
    Request::Store {
        address: 0x20,
        value: 5678,
    },
    Request::Load { address: 0x20 },
    Request::Load { address: 0x30 },
    Request::Load { address: 0x40 },
    Request::Load { address: 0x50 },
    Request::Load { address: 0x10 },
];

/// Parses a whole trace.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse(text: &str) -> Result<Vec<Request>, TraceError> {
    let mut requests = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        if let Some(request) = parse_line(raw).map_err(|message| TraceError {
            line: i + 1,
            message,
        })? {
            requests.push(request);
        }
    }
    Ok(requests)
}

fn parse_line(raw: &str) -> Result<Option<Request>, String> {
    let line = raw.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let request = match fields.as_slice() {
        [op, address] if op.eq_ignore_ascii_case("l") => Request::Load {
            address: parse_address(address)?,
        },
        [op, address, value] if op.eq_ignore_ascii_case("s") => Request::Store {
            address: parse_address(address)?,
            value: parse_word(value)?,
        },
        [op, ..] if op.eq_ignore_ascii_case("l") || op.eq_ignore_ascii_case("s") => {
            return Err(format!("wrong number of operands in `{line}`"));
        }
        [op, ..] => return Err(format!("unknown request `{op}`")),
        [] => return Ok(None),
    };
    Ok(Some(request))
}

fn parse_address(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("bad address `{text}`: {e}"))
}

fn parse_word(text: &str) -> Result<Word, String> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| format!("bad value `{text}`: {e}"))?;
    let value = if negative { -magnitude } else { magnitude };
    Word::try_from(value).map_err(|_| format!("value `{text}` does not fit in a word"))
}
