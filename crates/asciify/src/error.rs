#![forbid(unsafe_code)]

//! Error types.
//!
//! The crate has two error tiers. Table and locale errors never escape the
//! engine: they are classified here so logs say *why* a character degraded
//! to the placeholder, then mapped to that placeholder by the caller.
//! Codepoint and config errors are returned to the caller as-is.

use std::path::PathBuf;

use thiserror::Error;

use crate::group::GroupId;

/// Failure to resolve a substitution from a codepoint group table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("group asset {} not found", group.asset_name())]
    NotFound { group: GroupId },

    #[error("group asset {} is malformed: {reason}", group.asset_name())]
    Malformed { group: GroupId, reason: String },

    #[error("group asset {} could not be read: {reason}", group.asset_name())]
    Unreadable { group: GroupId, reason: String },

    #[error("offset {offset:#04x} is past the end of group {group} ({len} entries)")]
    OffsetOutOfBounds { group: GroupId, offset: u8, len: usize },
}

impl TableError {
    /// The group whose asset produced this error.
    #[must_use]
    pub fn group(&self) -> GroupId {
        match self {
            Self::NotFound { group }
            | Self::Malformed { group, .. }
            | Self::Unreadable { group, .. }
            | Self::OffsetOutOfBounds { group, .. } => *group,
        }
    }
}

/// Failure to load a locale override map. A missing map is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("override map for locale {locale:?} is malformed: {reason}")]
    Malformed { locale: String, reason: String },

    #[error("override map for locale {locale:?} could not be read: {reason}")]
    Unreadable { locale: String, reason: String },
}

/// Invalid input to the codepoint utilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodepointError {
    #[error("invalid codepoint: {input:?} is not a hexadecimal number")]
    InvalidHex { input: String },

    #[error("invalid codepoint: {value:#x} is not a Unicode scalar value")]
    OutOfRange { value: u64 },

    #[error("expected exactly one character, got {count}")]
    NotSingleChar { count: usize },
}

/// Failure to load or apply configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown script profile: {name:?}")]
    UnknownProfile { name: String },

    #[error("invalid script ranges: {message}")]
    InvalidRanges { message: String },
}

impl ConfigError {
    #[must_use]
    pub(crate) fn invalid_ranges(message: impl Into<String>) -> Self {
        Self::InvalidRanges {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
