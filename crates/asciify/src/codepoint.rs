#![forbid(unsafe_code)]

//! Codepoint utilities for diagnostics and data authoring.
//!
//! Unlike the engine these are strict: malformed input is an error.

use crate::error::CodepointError;

/// Character for a hexadecimal codepoint such as `"00e9"`.
///
/// An optional `U+` or `0x` prefix is accepted. Anything else that is not
/// hex digits, or that names a surrogate or a value past U+10FFFF, fails.
///
/// ```
/// assert_eq!(asciify::encode("00e9"), Ok('é'));
/// assert!(asciify::encode("zzzz").is_err());
/// ```
pub fn encode(hex: &str) -> Result<char, CodepointError> {
    let digits = strip_prefix(hex.trim());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodepointError::InvalidHex {
            input: hex.to_string(),
        });
    }
    let value = u64::from_str_radix(digits, 16).map_err(|_| CodepointError::OutOfRange {
        value: u64::MAX,
    })?;
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .ok_or(CodepointError::OutOfRange { value })
}

/// Codepoint of a single character as zero-padded lowercase hex (`"00e9"`).
///
/// ```
/// assert_eq!(asciify::codepoint_of("é").as_deref(), Ok("00e9"));
/// assert!(asciify::codepoint_of("ab").is_err());
/// ```
pub fn codepoint_of(character: &str) -> Result<String, CodepointError> {
    let mut chars = character.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(format!("{:04x}", u32::from(ch))),
        _ => Err(CodepointError::NotSingleChar {
            count: character.chars().count(),
        }),
    }
}

fn strip_prefix(s: &str) -> &str {
    ["U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
        .unwrap_or(s)
}
