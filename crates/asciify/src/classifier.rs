#![forbid(unsafe_code)]

//! Script-range classification.
//!
//! A [`ScriptClassifier`] decides whether a codepoint is *eligible* for
//! substitution. Ineligible characters pass through the engine unchanged,
//! which keeps scripts the tables cannot romanize sensibly (CJK, Arabic,
//! emoji, ...) intact instead of replacing them with noise.
//!
//! Two range sets ship with the crate, selected by [`ScriptProfile`]:
//!
//! - [`LATIN_RANGES`]: Latin blocks plus the symbol blocks that mostly hold
//!   Latin letterforms (letterlike symbols, ligatures, fullwidth forms).
//! - [`NORMALIZABLE_RANGES`]: the Latin set plus Greek, Cyrillic, Armenian
//!   and the combining mark blocks.
//!
//! Both are plain data fed to the same classifier.
//!
//! # Example
//!
//! ```
//! use asciify::classifier::{ScriptClassifier, ScriptProfile};
//!
//! let latin = ScriptClassifier::for_profile(ScriptProfile::Latin);
//! assert!(latin.is_eligible('é' as u32));
//! assert!(!latin.is_eligible('ж' as u32));
//!
//! let wide = ScriptClassifier::for_profile(ScriptProfile::Normalizable);
//! assert!(wide.is_eligible('ж' as u32));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inclusive codepoint range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRange {
    pub low: u32,
    pub high: u32,
}

impl ScriptRange {
    #[must_use]
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, codepoint: u32) -> bool {
        self.low <= codepoint && codepoint <= self.high
    }
}

impl fmt::Display for ScriptRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}..={:04X}", self.low, self.high)
    }
}

/// Latin script blocks.
pub const LATIN_RANGES: &[ScriptRange] = &[
    // Basic Latin, Latin-1 Supplement, Latin Extended-A/B, IPA Extensions,
    // Spacing Modifier Letters
    ScriptRange::new(0x0000, 0x02FF),
    // Phonetic Extensions (+ Supplement)
    ScriptRange::new(0x1D00, 0x1DBF),
    // Latin Extended Additional
    ScriptRange::new(0x1E00, 0x1EFF),
    // Superscripts and Subscripts
    ScriptRange::new(0x2070, 0x209F),
    // Letterlike Symbols, Number Forms
    ScriptRange::new(0x2100, 0x218F),
    // Latin Extended-C
    ScriptRange::new(0x2C60, 0x2C7F),
    // Latin Extended-D
    ScriptRange::new(0xA720, 0xA7FF),
    // Latin Extended-E
    ScriptRange::new(0xAB30, 0xAB6F),
    // Alphabetic Presentation Forms (ligatures)
    ScriptRange::new(0xFB00, 0xFB4F),
    // Halfwidth and Fullwidth Forms
    ScriptRange::new(0xFF00, 0xFFEF),
];

/// Latin plus the other scripts whose letters decompose to Latin-like
/// substitutions, and the combining marks that accompany them.
pub const NORMALIZABLE_RANGES: &[ScriptRange] = &[
    ScriptRange::new(0x0000, 0x02FF),
    // Combining Diacritical Marks
    ScriptRange::new(0x0300, 0x036F),
    // Greek and Coptic
    ScriptRange::new(0x0370, 0x03FF),
    // Cyrillic, Cyrillic Supplement
    ScriptRange::new(0x0400, 0x052F),
    // Armenian
    ScriptRange::new(0x0530, 0x058F),
    // Cyrillic Extended-C
    ScriptRange::new(0x1C80, 0x1C8F),
    ScriptRange::new(0x1D00, 0x1DBF),
    // Combining Diacritical Marks Supplement
    ScriptRange::new(0x1DC0, 0x1DFF),
    ScriptRange::new(0x1E00, 0x1EFF),
    // Greek Extended
    ScriptRange::new(0x1F00, 0x1FFF),
    ScriptRange::new(0x2070, 0x209F),
    // Combining Diacritical Marks for Symbols
    ScriptRange::new(0x20D0, 0x20FF),
    ScriptRange::new(0x2100, 0x218F),
    ScriptRange::new(0x2C60, 0x2C7F),
    // Cyrillic Extended-A
    ScriptRange::new(0x2DE0, 0x2DFF),
    // Cyrillic Extended-B
    ScriptRange::new(0xA640, 0xA69F),
    ScriptRange::new(0xA720, 0xA7FF),
    ScriptRange::new(0xAB30, 0xAB6F),
    // Alphabetic Presentation Forms (includes the Armenian ligatures)
    ScriptRange::new(0xFB00, 0xFB4F),
    // Combining Half Marks
    ScriptRange::new(0xFE20, 0xFE2F),
    ScriptRange::new(0xFF00, 0xFFEF),
];

/// Named range set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptProfile {
    /// [`LATIN_RANGES`].
    #[default]
    Latin,
    /// [`NORMALIZABLE_RANGES`].
    Normalizable,
}

impl ScriptProfile {
    #[must_use]
    pub const fn ranges(self) -> &'static [ScriptRange] {
        match self {
            Self::Latin => LATIN_RANGES,
            Self::Normalizable => NORMALIZABLE_RANGES,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::Normalizable => "normalizable",
        }
    }
}

impl FromStr for ScriptProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin" => Ok(Self::Latin),
            "normalizable" => Ok(Self::Normalizable),
            _ => Err(ConfigError::UnknownProfile {
                name: s.to_string(),
            }),
        }
    }
}

/// Decides eligibility from an ordered set of disjoint inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptClassifier {
    ranges: Cow<'static, [ScriptRange]>,
}

impl ScriptClassifier {
    /// Classifier over a custom range set.
    ///
    /// Ranges must satisfy `low <= high` and be strictly ascending without
    /// overlap.
    pub fn new(ranges: Vec<ScriptRange>) -> Result<Self, ConfigError> {
        validate(&ranges)?;
        Ok(Self {
            ranges: Cow::Owned(ranges),
        })
    }

    #[must_use]
    pub const fn for_profile(profile: ScriptProfile) -> Self {
        Self {
            ranges: Cow::Borrowed(profile.ranges()),
        }
    }

    #[must_use]
    pub fn ranges(&self) -> &[ScriptRange] {
        &self.ranges
    }

    /// Whether `codepoint` falls in any configured range.
    ///
    /// Any `u32` is accepted; values past U+10FFFF are simply unmatched.
    #[inline]
    #[must_use]
    pub fn is_eligible(&self, codepoint: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(codepoint))
    }
}

impl Default for ScriptClassifier {
    fn default() -> Self {
        Self::for_profile(ScriptProfile::default())
    }
}

fn validate(ranges: &[ScriptRange]) -> Result<(), ConfigError> {
    for range in ranges {
        if range.low > range.high {
            return Err(ConfigError::invalid_ranges(format!(
                "range {:04X}..={:04X} is inverted",
                range.low, range.high
            )));
        }
    }
    for pair in ranges.windows(2) {
        if pair[0].high >= pair[1].low {
            return Err(ConfigError::invalid_ranges(format!(
                "range {} overlaps or precedes {}",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}
