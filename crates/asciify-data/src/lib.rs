#![forbid(unsafe_code)]

//! Bundled data assets for `asciify`.
//!
//! This crate only stores data. Each codepoint group (256 consecutive
//! codepoints sharing a high byte) that has substitutions is shipped as a
//! JSON array of exactly 256 strings, `data/groups/x{group}.json`, one entry
//! per line. Locale overrides are JSON objects mapping a single character to
//! its substitution, `data/locales/{locale}.json`.
//!
//! Groups without useful substitutions are deliberately absent; consumers
//! treat a missing group as "no data" rather than as a fatal condition.
//!
//! # Example
//!
//! ```
//! let latin1 = asciify_data::group(0x00).expect("Latin-1 is bundled");
//! assert!(latin1.starts_with('['));
//! assert!(asciify_data::group(0x4e).is_none());
//! assert!(asciify_data::locale("de").is_some());
//! ```

/// Identifies the lineage of the bundled substitution tables.
pub const DATA_VERSION: &str = "text-unidecode-1.23";

/// Group ids (codepoint high byte) that have a bundled table, ascending.
pub const GROUPS: &[u32] = &[
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x1e, 0x1f, 0x20, 0x21, 0xfb, 0xff,
];

/// Locale tags that have a bundled override map, ascending.
pub const LOCALES: &[&str] = &["da", "de", "nb", "sv"];

/// Raw JSON text of the table for `group`, if one is bundled.
#[must_use]
pub fn group(group: u32) -> Option<&'static str> {
    let text = match group {
        0x00 => include_str!("../data/groups/x00.json"),
        0x01 => include_str!("../data/groups/x01.json"),
        0x02 => include_str!("../data/groups/x02.json"),
        0x03 => include_str!("../data/groups/x03.json"),
        0x04 => include_str!("../data/groups/x04.json"),
        0x05 => include_str!("../data/groups/x05.json"),
        0x1e => include_str!("../data/groups/x1e.json"),
        0x1f => include_str!("../data/groups/x1f.json"),
        0x20 => include_str!("../data/groups/x20.json"),
        0x21 => include_str!("../data/groups/x21.json"),
        0xfb => include_str!("../data/groups/xfb.json"),
        0xff => include_str!("../data/groups/xff.json"),
        _ => return None,
    };
    Some(text)
}

/// Raw JSON text of the override map for a normalized locale tag, if bundled.
///
/// Tags are matched exactly; callers are expected to normalize and walk the
/// fallback chain themselves.
#[must_use]
pub fn locale(tag: &str) -> Option<&'static str> {
    let text = match tag {
        "da" => include_str!("../data/locales/da.json"),
        "de" => include_str!("../data/locales/de.json"),
        "nb" => include_str!("../data/locales/nb.json"),
        "sv" => include_str!("../data/locales/sv.json"),
        _ => return None,
    };
    Some(text)
}
