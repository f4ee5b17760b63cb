#![forbid(unsafe_code)]

//! Locale override layer.
//!
//! Some characters romanize differently by language: German writes `ö` as
//! `oe` where the generic table says `o`. An [`OverrideLayer`] holds one
//! immutable character-to-substitution map per locale and is consulted
//! before the codepoint table. A miss is never an error; it just means the
//! table decides.
//!
//! # Locale tags and fallback
//!
//! [`Locale`] normalizes tags to lowercase with `-` separators. Lookups walk
//! from the most specific tag to the least specific: `de-AT` consults
//! `de-at`, then `de`. The empty tag ([`Locale::none`]) has no maps at all.
//!
//! # Active locale
//!
//! [`active_locale`] / [`set_active_locale`] hold a process-wide default used
//! by engines that were not given a locale explicitly. It is meant to be set
//! once during startup by a single writer. Each transliteration call reads
//! it once, so a concurrent change never splits one call across two locales,
//! but it can affect calls that start afterwards on any thread. Code that
//! needs isolation should pass a locale explicitly
//! ([`Transliterator::transliterate_with`]).
//!
//! [`Transliterator::transliterate_with`]: crate::engine::Transliterator::transliterate_with
//!
//! # Example
//!
//! ```
//! use asciify::locale::{Locale, OverrideLayer};
//!
//! let layer = OverrideLayer::bundled();
//! let de = Locale::new("de_AT");
//! assert_eq!(layer.try_override('ö', &de).as_deref(), Some("oe"));
//! assert_eq!(layer.try_override('é', &de), None);
//! assert_eq!(layer.try_override('ö', &Locale::none()), None);
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cache::LoadOnceMap;
use crate::error::LocaleError;

/// Character to substitution map for one locale.
pub type OverrideMap = FxHashMap<char, Box<str>>;

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Normalized locale tag.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Normalize `tag`: trim, lowercase, `_` becomes `-`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let normalized: String = tag
            .trim()
            .chars()
            .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        Self(normalized.into())
    }

    /// The locale without overrides.
    #[must_use]
    pub fn none() -> Self {
        Self(Arc::from(""))
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tags to consult, most specific first: `de-at-x` yields `de-at-x`,
    /// `de-at`, `de`.
    pub fn fallback_chain(&self) -> impl Iterator<Item = &str> + '_ {
        let mut next = (!self.0.is_empty()).then_some(&*self.0);
        std::iter::from_fn(move || {
            let current = next?;
            next = current
                .rfind('-')
                .map(|idx| &current[..idx])
                .filter(|parent| !parent.is_empty());
            Some(current)
        })
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locale({:?})", &*self.0)
    }
}

// ---------------------------------------------------------------------------
// Ambient active locale
// ---------------------------------------------------------------------------

fn active_slot() -> &'static ArcSwap<Locale> {
    static ACTIVE: OnceLock<ArcSwap<Locale>> = OnceLock::new();
    ACTIVE.get_or_init(|| ArcSwap::from_pointee(Locale::none()))
}

/// Process-wide default locale. [`Locale::none`] until set.
#[must_use]
pub fn active_locale() -> Locale {
    Locale::clone(&active_slot().load())
}

/// Replace the process-wide default locale.
///
/// Intended for startup configuration by a single writer; see the module
/// docs for what concurrent callers observe.
pub fn set_active_locale(locale: impl Into<Locale>) {
    let locale = locale.into();
    tracing::debug!(locale = %locale, "active locale changed");
    active_slot().store(Arc::new(locale));
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Produces override maps by normalized locale tag.
pub trait OverrideSource: Send + Sync {
    /// Whether an asset exists for `tag`. Tags reported absent are never
    /// loaded or cached.
    fn contains(&self, tag: &str) -> bool;

    /// Load the map for one tag (no fallback). `Ok(None)` when absent.
    fn load(&self, tag: &str) -> Result<Option<OverrideMap>, LocaleError>;

    fn describe(&self) -> String;
}

/// Parse a JSON object of single characters to substitutions.
pub fn parse_override_map(tag: &str, text: &str) -> Result<OverrideMap, LocaleError> {
    let raw: FxHashMap<String, String> =
        serde_json::from_str(text).map_err(|err| LocaleError::Malformed {
            locale: tag.to_string(),
            reason: err.to_string(),
        })?;
    raw.into_iter()
        .map(|(key, value)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok((ch, value.into_boxed_str())),
                _ => Err(LocaleError::Malformed {
                    locale: tag.to_string(),
                    reason: format!("key {key:?} is not a single character"),
                }),
            }
        })
        .collect()
}

/// Override maps compiled in from `asciify-data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledOverrides;

impl OverrideSource for BundledOverrides {
    fn contains(&self, tag: &str) -> bool {
        asciify_data::locale(tag).is_some()
    }

    fn load(&self, tag: &str) -> Result<Option<OverrideMap>, LocaleError> {
        asciify_data::locale(tag)
            .map(|text| parse_override_map(tag, text))
            .transpose()
    }

    fn describe(&self) -> String {
        "bundled".to_string()
    }
}

/// Override maps read from `{tag}.json` files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryOverrides {
    root: PathBuf,
}

impl DirectoryOverrides {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset path for `tag`, or `None` for tags that are not plain
    /// alphanumeric-and-dash (keeps path traversal out).
    fn asset_path(&self, tag: &str) -> Option<PathBuf> {
        let plain = !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        plain.then(|| self.root.join(format!("{tag}.json")))
    }
}

impl OverrideSource for DirectoryOverrides {
    fn contains(&self, tag: &str) -> bool {
        self.asset_path(tag).is_some_and(|path| path.exists())
    }

    fn load(&self, tag: &str) -> Result<Option<OverrideMap>, LocaleError> {
        let Some(path) = self.asset_path(tag) else {
            return Ok(None);
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => parse_override_map(tag, &text).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LocaleError::Unreadable {
                locale: tag.to_string(),
                reason: format!("{}: {err}", path.display()),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// A source with no maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideSource for NoOverrides {
    fn contains(&self, _tag: &str) -> bool {
        false
    }

    fn load(&self, _tag: &str) -> Result<Option<OverrideMap>, LocaleError> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// Override maps for one locale's fallback chain, most specific first.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOverrides {
    maps: SmallVec<[Arc<OverrideMap>; 2]>,
}

impl ResolvedOverrides {
    #[inline]
    #[must_use]
    pub fn get(&self, ch: char) -> Option<&str> {
        self.maps
            .iter()
            .find_map(|map| map.get(&ch))
            .map(|value| &**value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Per-locale override maps, each loaded once and immutable afterwards.
///
/// Only tags the source holds (or that were seeded) occupy the cache, so
/// resolving arbitrary caller-supplied locales does not grow it.
pub struct OverrideLayer {
    source: Box<dyn OverrideSource>,
    maps: LoadOnceMap<Box<str>, Option<Arc<OverrideMap>>>,
}

impl OverrideLayer {
    pub fn new(source: impl OverrideSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            maps: LoadOnceMap::new(),
        }
    }

    /// Layer over the bundled locale maps.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(BundledOverrides)
    }

    /// Layer with no maps.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(NoOverrides)
    }

    /// Install a map for `locale` ahead of any load, replacing what the
    /// source would provide for that exact tag.
    ///
    /// Has no effect if the tag was already resolved.
    #[must_use]
    pub fn with_map<'a>(
        self,
        locale: impl Into<Locale>,
        entries: impl IntoIterator<Item = (char, &'a str)>,
    ) -> Self {
        let locale = locale.into();
        let map: OverrideMap = entries
            .into_iter()
            .map(|(ch, value)| (ch, Box::from(value)))
            .collect();
        self.maps.seed(Box::from(locale.as_str()), Some(Arc::new(map)));
        self
    }

    /// Maps for `locale`'s fallback chain.
    #[must_use]
    pub fn resolve(&self, locale: &Locale) -> ResolvedOverrides {
        let maps = locale
            .fallback_chain()
            .filter_map(|tag| self.map(tag))
            .collect();
        ResolvedOverrides { maps }
    }

    /// Override for `ch` under `locale`, or `None` to fall through.
    #[must_use]
    pub fn try_override(&self, ch: char, locale: &Locale) -> Option<String> {
        self.resolve(locale).get(ch).map(str::to_owned)
    }

    fn map(&self, tag: &str) -> Option<Arc<OverrideMap>> {
        let key: Box<str> = Box::from(tag);
        if let Some(cached) = self.maps.get(&key) {
            return cached;
        }
        if !self.source.contains(tag) {
            return None;
        }
        self.maps.get_or_load(&key, |tag| self.load(tag))
    }

    fn load(&self, tag: &str) -> Option<Arc<OverrideMap>> {
        match self.source.load(tag) {
            Ok(Some(map)) => {
                tracing::debug!(
                    locale = tag,
                    entries = map.len(),
                    source = %self.source.describe(),
                    "loaded locale overrides"
                );
                Some(Arc::new(map))
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    locale = tag,
                    source = %self.source.describe(),
                    error = %err,
                    "ignoring locale overrides"
                );
                None
            }
        }
    }
}

impl fmt::Debug for OverrideLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideLayer")
            .field("source", &self.source.describe())
            .field("maps", &self.maps)
            .finish()
    }
}
