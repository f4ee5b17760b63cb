#![forbid(unsafe_code)]

//! Group table sources.
//!
//! A [`GroupSource`] produces the [`GroupTable`] for a group id. The table
//! cache in [`crate::table`] calls it at most once per group, so sources
//! are free to do blocking I/O.
//!
//! | Source | Backing |
//! |--------|---------|
//! | [`BundledSource`] | tables compiled in from `asciify-data` |
//! | [`DirectorySource`] | `x{group}.json` files in a directory |
//! | [`StaticSource`] | tables supplied in memory |
//!
//! Asset format: a JSON array of strings indexed by grouped offset. Empty
//! strings are valid entries (the character is dropped). Arrays shorter than
//! 256 entries are accepted and leave the tail unmapped.

use std::fmt;
use std::io;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::error::TableError;
use crate::group::{GROUP_SIZE, GroupId, grouped_offset};

/// Substitutions for one group, indexed by grouped offset. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTable {
    entries: Box<[Box<str>]>,
}

impl GroupTable {
    /// Build a table from entries in offset order.
    pub fn new<I, S>(group: GroupId, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        let entries: Box<[Box<str>]> = entries.into_iter().map(Into::into).collect();
        if entries.len() > GROUP_SIZE {
            return Err(TableError::Malformed {
                group,
                reason: format!("{} entries, at most {GROUP_SIZE} allowed", entries.len()),
            });
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array asset.
    pub fn from_json(group: GroupId, text: &str) -> Result<Self, TableError> {
        let entries: Vec<String> =
            serde_json::from_str(text).map_err(|err| TableError::Malformed {
                group,
                reason: err.to_string(),
            })?;
        Self::new(group, entries)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, offset: u8) -> Option<&str> {
        self.entries.get(usize::from(offset)).map(|entry| &**entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Produces group tables on demand.
pub trait GroupSource: Send + Sync {
    /// Load the table for `group`.
    ///
    /// Return [`TableError::NotFound`] when the source has no asset for the
    /// group; the caller degrades gracefully.
    fn load(&self, group: GroupId) -> Result<GroupTable, TableError>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Tables compiled into the binary from the `asciify-data` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl GroupSource for BundledSource {
    fn load(&self, group: GroupId) -> Result<GroupTable, TableError> {
        let text = asciify_data::group(group.get()).ok_or(TableError::NotFound { group })?;
        GroupTable::from_json(group, text)
    }

    fn describe(&self) -> String {
        format!("bundled ({})", asciify_data::DATA_VERSION)
    }
}

/// Tables read from `x{group}.json` files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn asset_path(&self, group: GroupId) -> PathBuf {
        self.root.join(group.asset_name())
    }
}

impl GroupSource for DirectorySource {
    fn load(&self, group: GroupId) -> Result<GroupTable, TableError> {
        let path = self.asset_path(group);
        let text = std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => TableError::NotFound { group },
            _ => TableError::Unreadable {
                group,
                reason: format!("{}: {err}", path.display()),
            },
        })?;
        GroupTable::from_json(group, &text)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Tables held in memory, keyed by group.
#[derive(Default, Clone)]
pub struct StaticSource {
    tables: FxHashMap<GroupId, GroupTable>,
}

impl StaticSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, group: GroupId, table: GroupTable) -> Self {
        self.tables.insert(group, table);
        self
    }

    /// Register sparse substitutions for individual codepoints.
    ///
    /// Offsets not listed map to the empty string.
    pub fn with_entries<'a>(
        mut self,
        entries: impl IntoIterator<Item = (u32, &'a str)>,
    ) -> Result<Self, TableError> {
        let mut staged: FxHashMap<GroupId, Vec<Box<str>>> = FxHashMap::default();
        for (codepoint, value) in entries {
            let group = GroupId::of(codepoint);
            let slots = staged.entry(group).or_insert_with(|| {
                match self.tables.get(&group) {
                    Some(existing) => (0..GROUP_SIZE)
                        .map(|i| existing.entries.get(i).cloned().unwrap_or_default())
                        .collect(),
                    None => vec![Box::<str>::default(); GROUP_SIZE],
                }
            });
            slots[usize::from(grouped_offset(codepoint))] = value.into();
        }
        for (group, slots) in staged {
            self.tables.insert(group, GroupTable::new(group, slots)?);
        }
        Ok(self)
    }
}

impl GroupSource for StaticSource {
    fn load(&self, group: GroupId) -> Result<GroupTable, TableError> {
        self.tables
            .get(&group)
            .cloned()
            .ok_or(TableError::NotFound { group })
    }

    fn describe(&self) -> String {
        format!("static ({} groups)", self.tables.len())
    }
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups: Vec<_> = self.tables.keys().copied().collect();
        groups.sort();
        f.debug_struct("StaticSource").field("groups", &groups).finish()
    }
}
