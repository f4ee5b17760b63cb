#![forbid(unsafe_code)]

//! Transliteration engine.
//!
//! [`Transliterator`] runs every input character through a three-stage
//! pipeline and concatenates the results in input order:
//!
//! 1. **Classify**: characters outside the classifier's ranges pass through
//!    unchanged.
//! 2. **Override**: the locale override layer gets the first chance to
//!    substitute.
//! 3. **Table**: the codepoint table supplies the substitution. Codepoints
//!    `<= 128` map to themselves and unresolvable ones to the placeholder.
//!
//! The engine never fails. Beyond the shared load-once caches in the table
//! and override layer it holds no mutable state, so one engine can serve any
//! number of threads.
//!
//! # Shared engines
//!
//! [`Transliterator::latin`] and [`Transliterator::normalizable`] are
//! process-wide engines over the bundled data. They share one
//! [`CodepointTable`] and one [`OverrideLayer`], so a group loaded through one
//! is cached for the other.
//!
//! # Example
//!
//! ```
//! use asciify::engine::Transliterator;
//! use asciify::locale::Locale;
//!
//! let engine = Transliterator::latin();
//! assert_eq!(engine.transliterate_with("Ærøskøbing", &Locale::none()), "AEroskobing");
//! assert_eq!(engine.transliterate_with("Ærøskøbing", &Locale::new("da")), "Aeroeskoebing");
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::classifier::{ScriptClassifier, ScriptProfile};
use crate::locale::{self, Locale, OverrideLayer, ResolvedOverrides};
use crate::table::{CodepointTable, PLACEHOLDER};

/// Per-character Unicode to ASCII transliterator.
#[derive(Clone)]
pub struct Transliterator {
    classifier: ScriptClassifier,
    table: Arc<CodepointTable>,
    overrides: Arc<OverrideLayer>,
    locale: Option<Locale>,
}

impl Transliterator {
    #[must_use]
    pub fn builder() -> TransliteratorBuilder {
        TransliteratorBuilder::default()
    }

    /// Shared engine with the Latin range set.
    #[must_use]
    pub fn latin() -> &'static Transliterator {
        static LATIN: OnceLock<Transliterator> = OnceLock::new();
        LATIN.get_or_init(|| Self::shared(ScriptProfile::Latin))
    }

    /// Shared engine with the broader normalizable range set.
    #[must_use]
    pub fn normalizable() -> &'static Transliterator {
        static NORMALIZABLE: OnceLock<Transliterator> = OnceLock::new();
        NORMALIZABLE.get_or_init(|| Self::shared(ScriptProfile::Normalizable))
    }

    /// Shared engine for `profile`.
    #[must_use]
    pub fn for_profile(profile: ScriptProfile) -> &'static Transliterator {
        match profile {
            ScriptProfile::Latin => Self::latin(),
            ScriptProfile::Normalizable => Self::normalizable(),
        }
    }

    fn shared(profile: ScriptProfile) -> Self {
        Self {
            classifier: ScriptClassifier::for_profile(profile),
            table: shared_table(),
            overrides: shared_overrides(),
            locale: None,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &ScriptClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn table(&self) -> &CodepointTable {
        &self.table
    }

    #[must_use]
    pub fn overrides(&self) -> &OverrideLayer {
        &self.overrides
    }

    /// Locale used when none is passed: the pinned one, else the active one.
    #[must_use]
    pub fn effective_locale(&self) -> Locale {
        self.locale.clone().unwrap_or_else(locale::active_locale)
    }

    /// Copy of this engine pinned to `locale`. Shares caches with `self`.
    #[must_use]
    pub fn with_locale(&self, locale: impl Into<Locale>) -> Self {
        Self {
            locale: Some(locale.into()),
            ..self.clone()
        }
    }

    /// Transliterate `text` under [`Self::effective_locale`].
    #[must_use]
    pub fn transliterate(&self, text: &str) -> String {
        self.transliterate_with(text, &self.effective_locale())
    }

    /// Transliterate `text` under an explicit locale.
    #[must_use]
    pub fn transliterate_with(&self, text: &str, locale: &Locale) -> String {
        let mut out = String::with_capacity(text.len());
        let pass = self.pass(locale);
        for ch in text.chars() {
            pass.push_char(ch, &mut out);
        }
        out
    }

    /// Transliterate one character under [`Self::effective_locale`].
    #[must_use]
    pub fn transliterate_char(&self, ch: char) -> String {
        let mut out = String::new();
        self.pass(&self.effective_locale()).push_char(ch, &mut out);
        out
    }

    /// Transliterate UTF-16 text. Each unpaired surrogate becomes the
    /// placeholder.
    #[must_use]
    pub fn transliterate_utf16(&self, units: &[u16]) -> String {
        let mut out = String::with_capacity(units.len());
        let pass = self.pass(&self.effective_locale());
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(ch) => pass.push_char(ch, &mut out),
                Err(err) => {
                    tracing::trace!(unit = err.unpaired_surrogate(), "unpaired surrogate");
                    out.push_str(PLACEHOLDER);
                }
            }
        }
        out
    }

    /// Transliterate possibly invalid UTF-8. Each maximal invalid sequence
    /// becomes the placeholder.
    #[must_use]
    pub fn transliterate_bytes(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        let pass = self.pass(&self.effective_locale());
        for chunk in bytes.utf8_chunks() {
            for ch in chunk.valid().chars() {
                pass.push_char(ch, &mut out);
            }
            if !chunk.invalid().is_empty() {
                out.push_str(PLACEHOLDER);
            }
        }
        out
    }

    fn pass(&self, locale: &Locale) -> Pass<'_> {
        Pass {
            engine: self,
            overrides: self.overrides.resolve(locale),
        }
    }
}

impl fmt::Debug for Transliterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transliterator")
            .field("ranges", &self.classifier.ranges().len())
            .field("table", &self.table)
            .field("overrides", &self.overrides)
            .field("locale", &self.locale)
            .finish()
    }
}

/// One transliteration call: the locale's override maps are resolved once up
/// front so the whole input sees the same locale.
struct Pass<'a> {
    engine: &'a Transliterator,
    overrides: ResolvedOverrides,
}

impl Pass<'_> {
    #[inline]
    fn push_char(&self, ch: char, out: &mut String) {
        let codepoint = u32::from(ch);
        if !self.engine.classifier.is_eligible(codepoint) {
            out.push(ch);
            return;
        }
        if let Some(substitution) = self.overrides.get(ch) {
            out.push_str(substitution);
            return;
        }
        self.engine.table.push_substitution(codepoint, out);
    }
}

fn shared_table() -> Arc<CodepointTable> {
    static TABLE: OnceLock<Arc<CodepointTable>> = OnceLock::new();
    Arc::clone(TABLE.get_or_init(|| Arc::new(CodepointTable::bundled())))
}

fn shared_overrides() -> Arc<OverrideLayer> {
    static OVERRIDES: OnceLock<Arc<OverrideLayer>> = OnceLock::new();
    Arc::clone(OVERRIDES.get_or_init(|| Arc::new(OverrideLayer::bundled())))
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Transliterator`].
///
/// Unset parts default to the shared bundled table and overrides and the
/// Latin classifier.
#[derive(Default)]
pub struct TransliteratorBuilder {
    classifier: Option<ScriptClassifier>,
    table: Option<Arc<CodepointTable>>,
    overrides: Option<Arc<OverrideLayer>>,
    locale: Option<Locale>,
}

impl TransliteratorBuilder {
    #[must_use]
    pub fn profile(mut self, profile: ScriptProfile) -> Self {
        self.classifier = Some(ScriptClassifier::for_profile(profile));
        self
    }

    #[must_use]
    pub fn classifier(mut self, classifier: ScriptClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<Arc<CodepointTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    #[must_use]
    pub fn overrides(mut self, overrides: impl Into<Arc<OverrideLayer>>) -> Self {
        self.overrides = Some(overrides.into());
        self
    }

    /// Pin a locale instead of following the active locale.
    #[must_use]
    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Transliterator {
        Transliterator {
            classifier: self.classifier.unwrap_or_default(),
            table: self.table.unwrap_or_else(shared_table),
            overrides: self.overrides.unwrap_or_else(shared_overrides),
            locale: self.locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ScriptRange;
    use crate::source::StaticSource;

    fn none() -> Locale {
        Locale::none()
    }

    #[test]
    fn ascii_passes_through() {
        let engine = Transliterator::latin();
        let input = "Hello, World! 0123456789 ~`!@#$%^&*()_+-=[]{}|;':\",./<>?\t\n";
        assert_eq!(engine.transliterate_with(input, &none()), input);
    }

    #[test]
    fn cafe() {
        assert_eq!(Transliterator::latin().transliterate_with("café", &none()), "cafe");
    }

    #[test]
    fn latin_leaves_other_scripts_alone() {
        let engine = Transliterator::latin();
        assert_eq!(engine.transliterate_with("Ωmega", &none()), "Ωmega");
        assert_eq!(engine.transliterate_with("中文 naïve", &none()), "中文 naive");
        assert_eq!(engine.transliterate_with("😀", &none()), "😀");
    }

    #[test]
    fn normalizable_romanizes_greek_and_cyrillic() {
        let engine = Transliterator::normalizable();
        assert_eq!(engine.transliterate_with("Жук", &none()), "Zhuk");
        assert_eq!(engine.transliterate_with("Ωμέγα", &none()), "Omega");
        assert_eq!(engine.transliterate_with("e\u{0301}", &none()), "e");
        assert_eq!(engine.transliterate_with("中", &none()), "中");
    }

    #[test]
    fn override_takes_precedence_over_table() {
        let engine = Transliterator::latin();
        assert_eq!(engine.transliterate_with("Köln", &none()), "Koln");
        assert_eq!(engine.transliterate_with("Köln", &Locale::new("de")), "Koeln");
        assert_eq!(engine.transliterate_with("Straße", &Locale::new("de-DE")), "Strasse");
    }

    #[test]
    fn override_only_applies_to_eligible_characters() {
        let overrides = OverrideLayer::empty().with_map("xx", [('ж', "zh!"), ('é', "E!")]);
        let engine = Transliterator::builder().overrides(overrides).build();
        let xx = Locale::new("xx");
        assert_eq!(engine.transliterate_with("жé", &xx), "жE!");
    }

    #[test]
    fn override_applies_even_to_ascii() {
        let overrides = OverrideLayer::empty().with_map("amp", [('&', "and")]);
        let engine = Transliterator::builder().overrides(overrides).build();
        assert_eq!(engine.transliterate_with("a & b", &Locale::new("amp")), "a and b");
    }

    #[test]
    fn missing_group_yields_placeholder_without_disturbing_neighbours() {
        let ranges = vec![ScriptRange::new(0x0000, 0x02FF), ScriptRange::new(0x4E00, 0x4EFF)];
        let engine = Transliterator::builder()
            .classifier(ScriptClassifier::new(ranges).unwrap())
            .table(CodepointTable::new(StaticSource::new().with_entries([(0xE9, "e")]).unwrap()))
            .build();
        assert_eq!(engine.transliterate_with("é中é", &none()), "e?e");
    }

    #[test]
    fn pinned_locale_beats_active_locale() {
        let engine = Transliterator::latin().with_locale("de");
        assert_eq!(engine.effective_locale(), Locale::new("de"));
        assert_eq!(engine.transliterate("ö"), "oe");
        assert_eq!(engine.transliterate_char('ü'), "ue");
    }

    #[test]
    fn utf16_unpaired_surrogates_become_placeholders() {
        let engine = Transliterator::latin().with_locale(Locale::none());
        let mut units: Vec<u16> = "café".encode_utf16().collect();
        units.insert(1, 0xD800);
        units.push(0xDC00);
        assert_eq!(engine.transliterate_utf16(&units), "c?afe?");

        let pair: Vec<u16> = "a😀b".encode_utf16().collect();
        assert_eq!(engine.transliterate_utf16(&pair), "a😀b");
    }

    #[test]
    fn invalid_utf8_becomes_placeholders() {
        let engine = Transliterator::latin().with_locale(Locale::none());
        let mut bytes = "caf".as_bytes().to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice("é".as_bytes());
        bytes.extend_from_slice(&[0xC3]);
        assert_eq!(engine.transliterate_bytes(&bytes), "caf?e?");
        assert_eq!(engine.transliterate_bytes(b""), "");
    }

    #[test]
    fn shared_engines_share_one_table() {
        let latin = Transliterator::latin();
        let wide = Transliterator::normalizable();
        assert!(std::ptr::eq(latin.table(), wide.table()));
        assert!(std::ptr::eq(latin.overrides(), wide.overrides()));
        assert!(std::ptr::eq(
            Transliterator::for_profile(ScriptProfile::Latin),
            latin
        ));
    }

    #[test]
    fn builder_defaults_to_latin_and_shared_data() {
        let engine = Transliterator::builder().build();
        assert_eq!(engine.classifier(), &ScriptClassifier::default());
        assert!(std::ptr::eq(engine.table(), Transliterator::latin().table()));
    }

    #[test]
    fn empty_input() {
        assert_eq!(Transliterator::latin().transliterate_with("", &none()), "");
    }
}
