#![forbid(unsafe_code)]

//! Unicode to ASCII transliteration, one character at a time.
//!
//! Each input character is classified by script range. Eligible characters
//! are replaced by a precomputed ASCII substitution, taken from the active
//! locale's overrides if one applies and from the codepoint table otherwise.
//! Everything else passes through unchanged.
//!
//! ```
//! use asciify::ToAscii;
//!
//! assert_eq!(asciify::transliterate("Crème brûlée"), "Creme brulee");
//! assert_eq!("Łódź".to_ascii(), "Lodz");
//! ```
//!
//! # Crate layout
//!
//! - [`classifier`]: which codepoints are eligible ([`ScriptProfile`]).
//! - [`group`]: the 256-codepoint grouping of the substitution data.
//! - [`source`] / [`table`]: loading group tables once and looking up
//!   substitutions with placeholder degradation.
//! - [`locale`]: per-locale overrides and the process-wide active locale.
//! - [`engine`]: the [`Transliterator`] pipeline.
//! - [`codepoint`]: strict hex/character utilities.
//! - [`config`]: serde configuration with environment overrides.
//!
//! # Failure model
//!
//! Transliteration never fails: a character whose substitution cannot be
//! resolved becomes `"?"` and the rest of the input is unaffected. The
//! codepoint utilities are strict and return [`CodepointError`] instead.

pub mod cache;
pub mod classifier;
pub mod codepoint;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;
pub mod locale;
pub mod source;
pub mod table;

pub use classifier::{ScriptClassifier, ScriptProfile, ScriptRange};
pub use codepoint::{codepoint_of, encode};
pub use config::AsciifyConfig;
pub use engine::{Transliterator, TransliteratorBuilder};
pub use error::{CodepointError, ConfigError, LocaleError, TableError};
pub use group::{GroupId, Location};
pub use locale::{Locale, OverrideLayer, active_locale, set_active_locale};
pub use table::{CodepointTable, PLACEHOLDER};

/// Transliterate `text` with the shared Latin engine under the active locale.
#[must_use]
pub fn transliterate(text: &str) -> String {
    Transliterator::latin().transliterate(text)
}

/// Which group asset and line hold the substitution for `ch`.
///
/// ```
/// let loc = asciify::locate('é');
/// assert_eq!(loc.group.to_string(), "00");
/// assert_eq!(loc.offset, 0xe9);
/// assert_eq!(loc.to_string(), "x00.json (line 235)");
/// ```
#[must_use]
pub fn locate(ch: char) -> Location {
    Location::of(ch)
}

/// `to_ascii` on strings, forwarding to [`transliterate`].
pub trait ToAscii {
    fn to_ascii(&self) -> String;
}

impl ToAscii for str {
    fn to_ascii(&self) -> String {
        transliterate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_operations() {
        assert_eq!(transliterate("café"), "cafe");
        assert_eq!(encode("00e9"), Ok('é'));
        assert_eq!(codepoint_of("é").unwrap(), "00e9");
        let loc = locate('é');
        assert_eq!(loc.group, GroupId::new(0));
        assert_eq!(loc.line(), 0xe9 + 2);
    }

    #[test]
    fn to_ascii_forwards() {
        let owned = String::from("naïve façade");
        assert_eq!(owned.to_ascii(), "naive facade");
        assert_eq!("plain".to_ascii(), "plain");
    }
}
