//! POP3 response-line classification
//!
//! A POP3 server answers every command with a single status line that
//! starts with `+OK` (success) or `-ERR` (failure). Some commands are
//! then followed by a dot-terminated multi-line block; that framing
//! lives in [`crate::connection`], this module only classifies status
//! lines and parses `LIST` entries.

use crate::error::{Error, Result};
use thiserror::Error as ThisError;

/// Marker prefix of a successful response line.
const OK: &str = "+OK";
/// Marker prefix of a failure response line.
const ERR: &str = "-ERR";

/// Classify one delimiter-stripped response line.
///
/// Returns the payload after the success marker (empty for a bare
/// `+OK`), or a protocol error carrying the server's failure text, the
/// fixed message `error` for a bare `-ERR`, and descriptive errors for
/// empty, short, or unrecognized lines.
///
/// The payload slice skips the marker plus exactly one separator
/// character, so a malformed success line with no separator loses its
/// first payload character. Inherited behavior, kept for wire parity.
pub(crate) fn parse_response(line: &str) -> Result<String> {
    if line.is_empty() {
        return Err(Error::protocol("empty message"));
    }

    if line.len() < 3 {
        return Err(Error::protocol(format!("line too short: {line:?}")));
    }

    if let Some(rest) = line.strip_prefix(OK) {
        return Ok(skip_separator(rest).to_string());
    }

    if let Some(rest) = line.strip_prefix(ERR) {
        if rest.is_empty() {
            return Err(Error::protocol("error"));
        }
        return Err(Error::protocol(skip_separator(rest)));
    }

    Err(Error::protocol(format!("unexpected response: {line}")))
}

/// Skip the one separator character after a response marker. The
/// skipped character may be multi-byte; exactly one char goes, never
/// more.
fn skip_separator(rest: &str) -> &str {
    let mut chars = rest.chars();
    chars.next();
    chars.as_str()
}

#[derive(Debug, ThisError)]
enum ListingError {
    #[error("unexpected end of input")]
    Truncated,

    #[error("expected integer: {0}")]
    Int(#[from] std::num::ParseIntError),
}

/// Parse one `LIST` entry of the form `<index> <size>`.
///
/// The index is the server-assigned 1-based message number, the size
/// is the message's length in bytes. Failures embed the raw input for
/// diagnosis.
pub(crate) fn parse_listing(line: &str) -> Result<(u32, u64)> {
    scan_listing(line).map_err(|e| Error::parse(format!("parse {line:?}: {e}")))
}

fn scan_listing(line: &str) -> std::result::Result<(u32, u64), ListingError> {
    let mut fields = line.split_whitespace();
    let index = fields
        .next()
        .ok_or(ListingError::Truncated)?
        .parse::<u32>()?;
    let size = fields
        .next()
        .ok_or(ListingError::Truncated)?
        .parse::<u64>()?;
    Ok((index, size))
}
