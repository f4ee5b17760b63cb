#![forbid(unsafe_code)]

//! Codepoint grouping arithmetic.
//!
//! Codepoint space is partitioned into groups of 256 consecutive values. The
//! group is the high part of the codepoint (`cp >> 8`) and the *grouped
//! offset* is the low byte (`cp & 0xFF`). Substitution data is stored one
//! asset per group, indexed by grouped offset.
//!
//! ```
//! use asciify::group::{GroupId, Location, grouped_offset};
//!
//! assert_eq!(GroupId::of(0x00E9).to_string(), "00");
//! assert_eq!(grouped_offset(0x00E9), 0xE9);
//! assert_eq!(Location::of('é').to_string(), "x00.json (line 235)");
//! ```

use std::fmt;

/// Entries per group table.
pub const GROUP_SIZE: usize = 256;

/// Identifier of a 256-codepoint group: the codepoint shifted right by 8.
///
/// Displays as lowercase hex, zero-padded to at least two digits (`"00"`,
/// `"1e"`, `"1f6"`), which is also how group assets are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Group holding `codepoint`.
    #[inline]
    #[must_use]
    pub const fn of(codepoint: u32) -> Self {
        Self(codepoint >> 8)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Last group that holds Unicode scalar values (U+10FF00..=U+10FFFF).
    pub const MAX: GroupId = GroupId(0x10FF);

    /// Whether this group lies inside the Unicode codespace.
    #[inline]
    #[must_use]
    pub const fn is_unicode(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// First codepoint in this group.
    #[inline]
    #[must_use]
    pub const fn first_codepoint(self) -> u32 {
        self.0 << 8
    }

    /// File name of this group's data asset, e.g. `x00.json`.
    #[must_use]
    pub fn asset_name(self) -> String {
        format!("x{self}.json")
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

/// Index of `codepoint` within its group.
#[inline]
#[must_use]
pub const fn grouped_offset(codepoint: u32) -> u8 {
    (codepoint & 0xFF) as u8
}

/// Where the substitution for a character lives (or would live).
///
/// Derived purely from the same arithmetic [`CodepointTable`] uses for
/// lookups, so it stays consistent with them by construction.
///
/// [`CodepointTable`]: crate::table::CodepointTable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub group: GroupId,
    pub offset: u8,
}

impl Location {
    #[must_use]
    pub const fn of(ch: char) -> Self {
        Self::of_codepoint(ch as u32)
    }

    #[must_use]
    pub const fn of_codepoint(codepoint: u32) -> Self {
        Self {
            group: GroupId::of(codepoint),
            offset: grouped_offset(codepoint),
        }
    }

    /// 1-based line of the entry inside the group asset.
    ///
    /// Assets hold one entry per line after an opening `[` line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.offset as u32 + 2
    }

    /// The codepoint this location addresses.
    #[must_use]
    pub const fn codepoint(&self) -> u32 {
        self.group.first_codepoint() | self.offset as u32
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.group.asset_name(), self.line())
    }
}
