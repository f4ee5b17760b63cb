#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`AsciifyConfig`] is plain serde data, loadable from JSON and overridable
//! from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ASCIIFY_PROFILE` | `profile` (`latin` or `normalizable`) |
//! | `ASCIIFY_LOCALE` | `locale` |
//! | `ASCIIFY_DATA_DIR` | `data_dir` |
//! | `ASCIIFY_LOCALE_DIR` | `locale_dir` |
//!
//! Empty variables are ignored.
//!
//! ```
//! use asciify::config::AsciifyConfig;
//! use asciify::classifier::ScriptProfile;
//!
//! let config = AsciifyConfig::from_json_str(r#"{ "profile": "normalizable", "locale": "de" }"#)?;
//! assert_eq!(config.profile, ScriptProfile::Normalizable);
//! let engine = config.build();
//! assert_eq!(engine.transliterate("Göthe Жук"), "Goethe Zhuk");
//! # Ok::<(), asciify::error::ConfigError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::ScriptProfile;
use crate::engine::Transliterator;
use crate::error::{ConfigError, Result};
use crate::locale::{DirectoryOverrides, Locale, OverrideLayer};
use crate::source::DirectorySource;
use crate::table::CodepointTable;

pub const ENV_PROFILE: &str = "ASCIIFY_PROFILE";
pub const ENV_LOCALE: &str = "ASCIIFY_LOCALE";
pub const ENV_DATA_DIR: &str = "ASCIIFY_DATA_DIR";
pub const ENV_LOCALE_DIR: &str = "ASCIIFY_LOCALE_DIR";

/// Engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsciifyConfig {
    /// Classifier range set.
    pub profile: ScriptProfile,
    /// Locale pinned on the engine. `None` follows the active locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Directory of `x{group}.json` tables replacing the bundled ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Directory of `{locale}.json` override maps replacing the bundled ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_dir: Option<PathBuf>,
}

impl AsciifyConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Apply `ASCIIFY_*` environment variables.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(profile) = get(ENV_PROFILE) {
            self.profile = profile.parse()?;
        }
        if let Some(locale) = get(ENV_LOCALE) {
            self.locale = Some(locale);
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = get(ENV_LOCALE_DIR) {
            self.locale_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Build an engine. Parts left at their defaults use the process-wide
    /// bundled caches.
    #[must_use]
    pub fn build(&self) -> Transliterator {
        let mut builder = Transliterator::builder().profile(self.profile);
        if let Some(dir) = &self.data_dir {
            builder = builder.table(Arc::new(CodepointTable::new(DirectorySource::new(dir))));
        }
        if let Some(dir) = &self.locale_dir {
            builder = builder.overrides(Arc::new(OverrideLayer::new(DirectoryOverrides::new(dir))));
        }
        if let Some(locale) = &self.locale {
            builder = builder.locale(Locale::new(locale));
        }
        tracing::debug!(
            profile = self.profile.name(),
            locale = self.locale.as_deref().unwrap_or("<active>"),
            data_dir = ?self.data_dir,
            locale_dir = ?self.locale_dir,
            "building transliterator"
        );
        builder.build()
    }
}
