#![forbid(unsafe_code)]

//! Codepoint substitution table with lazily loaded groups.
//!
//! [`CodepointTable`] is the fallback mapping from codepoint to ASCII
//! substitution. Group tables are fetched from a [`GroupSource`] the first
//! time any codepoint of that group is looked up, then cached for the life of
//! the table. Load failures are cached too: an asset that is missing on first
//! touch stays missing.
//!
//! # Policy
//!
//! - Codepoints `<= 128` bypass the table and map to themselves.
//! - Values past U+10FFFF are [`TableError::NotFound`] without touching the
//!   cache.
//! - Any failure (missing or malformed asset, offset past the end of a short
//!   table) degrades to [`PLACEHOLDER`] in [`CodepointTable::lookup`].
//!   [`CodepointTable::try_lookup`] exposes the classified error instead.

use std::fmt;
use std::sync::Arc;

use crate::cache::LoadOnceMap;
use crate::error::TableError;
use crate::group::{GroupId, Location, grouped_offset};
use crate::source::{BundledSource, GroupSource, GroupTable};

/// Substitution emitted when a lookup fails.
pub const PLACEHOLDER: &str = "?";

/// Highest codepoint returned unchanged without consulting the table.
pub const IDENTITY_MAX: u32 = 128;

type LoadOutcome = Result<Arc<GroupTable>, TableError>;

/// Codepoint to substitution mapping over a [`GroupSource`].
pub struct CodepointTable {
    source: Box<dyn GroupSource>,
    groups: LoadOnceMap<GroupId, LoadOutcome>,
}

impl CodepointTable {
    pub fn new(source: impl GroupSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            groups: LoadOnceMap::new(),
        }
    }

    /// Table over the bundled data asset.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(BundledSource)
    }

    /// Substitution for `codepoint`, never failing.
    #[must_use]
    pub fn lookup(&self, codepoint: u32) -> String {
        let mut out = String::new();
        self.push_substitution(codepoint, &mut out);
        out
    }

    /// Substitution for `codepoint`, or the reason none is available.
    pub fn try_lookup(&self, codepoint: u32) -> Result<String, TableError> {
        if let Some(ch) = identity(codepoint) {
            return Ok(ch.to_string());
        }
        let loc = Location::of_codepoint(codepoint);
        let table = self.group(loc.group)?;
        entry(&table, loc.group, loc.offset).map(str::to_owned)
    }

    /// Where the substitution for `ch` lives. Consistent with [`Self::lookup`].
    #[must_use]
    pub fn locate(&self, ch: char) -> Location {
        Location::of(ch)
    }

    /// Append the substitution for `codepoint` to `out`.
    pub fn push_substitution(&self, codepoint: u32, out: &mut String) {
        if let Some(ch) = identity(codepoint) {
            out.push(ch);
            return;
        }
        let group = GroupId::of(codepoint);
        let resolved = self.group(group).and_then(|table| {
            let substitution = entry(&table, group, grouped_offset(codepoint))?;
            out.push_str(substitution);
            Ok(())
        });
        if let Err(err) = resolved {
            tracing::trace!(codepoint, group = %err.group(), error = %err, "substituting placeholder");
            out.push_str(PLACEHOLDER);
        }
    }

    /// Resolve a group table, loading it on first reference.
    pub fn group(&self, group: GroupId) -> Result<Arc<GroupTable>, TableError> {
        if !group.is_unicode() {
            return Err(TableError::NotFound { group });
        }
        self.groups.get_or_load(&group, |&group| self.load(group))
    }

    /// Groups whose load has completed (successfully or not), ascending.
    #[must_use]
    pub fn loaded_groups(&self) -> Vec<GroupId> {
        let mut groups = self.groups.keys();
        groups.sort_unstable();
        groups
    }

    /// Number of source loads performed so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.groups.load_count()
    }

    fn load(&self, group: GroupId) -> LoadOutcome {
        match self.source.load(group) {
            Ok(table) => {
                tracing::debug!(
                    group = %group,
                    entries = table.len(),
                    source = %self.source.describe(),
                    "loaded codepoint group"
                );
                Ok(Arc::new(table))
            }
            Err(err @ TableError::NotFound { .. }) => {
                tracing::debug!(
                    group = %group,
                    source = %self.source.describe(),
                    "no data for codepoint group"
                );
                Err(err)
            }
            Err(err) => {
                tracing::warn!(
                    group = %group,
                    source = %self.source.describe(),
                    error = %err,
                    "codepoint group unavailable, characters in it will be substituted with a placeholder"
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for CodepointTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodepointTable")
            .field("source", &self.source.describe())
            .field("groups", &self.groups)
            .finish()
    }
}

#[inline]
fn identity(codepoint: u32) -> Option<char> {
    if codepoint <= IDENTITY_MAX {
        char::from_u32(codepoint)
    } else {
        None
    }
}

fn entry(table: &GroupTable, group: GroupId, offset: u8) -> Result<&str, TableError> {
    table.get(offset).ok_or(TableError::OffsetOutOfBounds {
        group,
        offset,
        len: table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use tracing_test::traced_test;

    #[test]
    fn ascii_bypasses_the_table() {
        let table = CodepointTable::new(StaticSource::new());
        for cp in 0..=IDENTITY_MAX {
            let expected = char::from_u32(cp).unwrap().to_string();
            assert_eq!(table.lookup(cp), expected);
        }
        assert_eq!(table.load_count(), 0);
    }

    #[test]
    fn bundled_lookups() {
        let table = CodepointTable::bundled();
        assert_eq!(table.lookup('é' as u32), "e");
        assert_eq!(table.lookup('Æ' as u32), "AE");
        assert_eq!(table.lookup('Ł' as u32), "L");
        assert_eq!(table.lookup('ﬁ' as u32), "fi");
        assert_eq!(table.lookup('Ａ' as u32), "A");
        assert_eq!(table.try_lookup('ö' as u32).unwrap(), "o");
    }

    #[test]
    fn lookup_and_locate_agree() {
        let table = CodepointTable::bundled();
        let ch = 'ạ';
        let loc = table.locate(ch);
        assert_eq!(loc.group, GroupId::of(ch as u32));
        assert_eq!(loc.offset, grouped_offset(ch as u32));
        let group = table.group(loc.group).unwrap();
        assert_eq!(group.get(loc.offset), Some(table.lookup(ch as u32).as_str()));
    }

    #[test]
    fn missing_group_degrades_to_placeholder() {
        let table = CodepointTable::new(StaticSource::new());
        assert_eq!(table.lookup(0x4E2D), PLACEHOLDER);
        assert_eq!(
            table.try_lookup(0x4E2D),
            Err(TableError::NotFound {
                group: GroupId::new(0x4E)
            })
        );
    }

    #[test]
    fn values_past_unicode_are_not_cached() {
        let table = CodepointTable::bundled();
        for cp in (0x11_0000u32..).step_by(0x100).take(5_000) {
            assert_eq!(table.lookup(cp), PLACEHOLDER);
        }
        assert_eq!(table.lookup(u32::MAX), PLACEHOLDER);
        assert!(matches!(
            table.try_lookup(0x11_0000),
            Err(TableError::NotFound { .. })
        ));
        assert_eq!(table.load_count(), 0);
        assert!(table.loaded_groups().is_empty());
    }

    #[test]
    fn short_table_reports_offset_out_of_bounds() {
        let short = GroupTable::new(GroupId::new(1), ["A", "a"]).unwrap();
        let table = CodepointTable::new(StaticSource::new().with_table(GroupId::new(1), short));
        assert_eq!(table.lookup(0x0101), "a");
        assert_eq!(table.lookup(0x0102), PLACEHOLDER);
        assert!(matches!(
            table.try_lookup(0x0102),
            Err(TableError::OffsetOutOfBounds { offset: 2, len: 2, .. })
        ));
    }

    #[test]
    fn empty_entries_drop_the_character() {
        let source = StaticSource::new().with_entries([(0x0301, "")]).unwrap();
        let table = CodepointTable::new(source);
        assert_eq!(table.lookup(0x0301), "");
    }

    #[test]
    fn each_group_is_loaded_once() {
        let table = CodepointTable::bundled();
        for ch in "éèêëàâäôöûü".chars() {
            table.lookup(ch as u32);
        }
        table.lookup(0x4E2D);
        table.lookup(0x4E2E);
        assert_eq!(table.load_count(), 2);
        assert_eq!(table.loaded_groups(), vec![GroupId::new(0), GroupId::new(0x4E)]);
    }

    #[test]
    fn push_substitution_appends() {
        let table = CodepointTable::bundled();
        let mut out = String::from("caf");
        table.push_substitution('é' as u32, &mut out);
        table.push_substitution('!' as u32, &mut out);
        assert_eq!(out, "cafe!");
    }

    struct BrokenSource;

    impl GroupSource for BrokenSource {
        fn load(&self, group: GroupId) -> Result<GroupTable, TableError> {
            GroupTable::from_json(group, "not json")
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    #[traced_test]
    fn malformed_group_warns_once() {
        let table = CodepointTable::new(BrokenSource);
        assert_eq!(table.lookup(0x00E9), PLACEHOLDER);
        assert_eq!(table.lookup(0x00EA), PLACEHOLDER);
        assert_eq!(table.load_count(), 1);
        assert!(logs_contain("codepoint group unavailable"));
        assert!(logs_contain("x00.json is malformed"));
    }
}
