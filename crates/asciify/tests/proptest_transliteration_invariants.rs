//! Property-based invariant tests for the transliteration engine.
//!
//! 1. Codepoints <= 128 are returned unchanged
//! 2. Transliteration is idempotent
//! 3. Eligible characters never survive as non-ASCII (above U+0080)
//! 4. Ineligible characters pass through unchanged
//! 5. Output preserves input order (per-character concatenation)
//! 6. Classifier boundaries are inclusive, neighbours are excluded
//! 7. locate() agrees with the group/offset arithmetic and with lookup()
//! 8. Arbitrary strings, UTF-16 and bytes never panic
//! 9. encode/codepoint_of round-trip for every scalar value

use asciify::classifier::{LATIN_RANGES, NORMALIZABLE_RANGES, ScriptClassifier, ScriptProfile};
use asciify::group::{GroupId, grouped_offset};
use asciify::{Locale, Transliterator, codepoint_of, encode, locate};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn engines() -> [&'static Transliterator; 2] {
    [Transliterator::latin(), Transliterator::normalizable()]
}

fn locales() -> [Locale; 4] {
    [
        Locale::none(),
        Locale::new("de"),
        Locale::new("da"),
        Locale::new("sv-SE"),
    ]
}

/// Characters drawn mostly from the eligible blocks, with some noise.
fn mixed_text() -> impl Strategy<Value = String> {
    let ch = prop_oneof![
        4 => (0x20u32..0x7F).prop_map(|c| char::from_u32(c).unwrap()),
        4 => (0x80u32..0x250).prop_map(|c| char::from_u32(c).unwrap()),
        2 => (0x370u32..0x530).prop_map(|c| char::from_u32(c).unwrap()),
        2 => (0x1E00u32..0x2000).prop_map(|c| char::from_u32(c).unwrap()),
        1 => (0xFF00u32..0xFFF0).prop_map(|c| char::from_u32(c).unwrap()),
        1 => any::<char>(),
    ];
    prop::collection::vec(ch, 0..64).prop_map(|chars| chars.into_iter().collect())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Identity on plain ASCII
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ascii_is_identity(cp in 0u32..=128) {
        let ch = char::from_u32(cp).unwrap();
        let input = ch.to_string();
        for engine in engines() {
            prop_assert_eq!(engine.transliterate_with(&input, &Locale::none()), input.clone());
        }
    }

    #[test]
    fn ascii_strings_are_identity(input in "[ -~\t\n]{0,80}") {
        for engine in engines() {
            for locale in locales() {
                prop_assert_eq!(engine.transliterate_with(&input, &locale), input.clone());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn transliteration_is_idempotent(input in mixed_text()) {
        for engine in engines() {
            for locale in locales() {
                let once = engine.transliterate_with(&input, &locale);
                let twice = engine.transliterate_with(&once, &locale);
                prop_assert_eq!(once, twice);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 + 4 + 5. Per-character behaviour and ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn output_is_concatenation_of_per_char_results(input in mixed_text()) {
        for engine in engines() {
            let locale = Locale::new("de");
            let whole = engine.transliterate_with(&input, &locale);
            let pieces: String = input
                .chars()
                .map(|ch| engine.transliterate_with(&ch.to_string(), &locale))
                .collect();
            prop_assert_eq!(whole, pieces);
        }
    }

    #[test]
    fn eligible_characters_become_ascii(input in mixed_text()) {
        for engine in engines() {
            for ch in input.chars() {
                let out = engine.transliterate_with(&ch.to_string(), &Locale::none());
                if engine.classifier().is_eligible(u32::from(ch)) {
                    prop_assert!(
                        out.chars().all(|c| u32::from(c) <= 128),
                        "{:?} -> {:?}", ch, out
                    );
                } else {
                    prop_assert_eq!(out, ch.to_string());
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Classifier boundaries
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn classifier_boundaries_are_inclusive() {
    for (profile, ranges) in [
        (ScriptProfile::Latin, LATIN_RANGES),
        (ScriptProfile::Normalizable, NORMALIZABLE_RANGES),
    ] {
        let classifier = ScriptClassifier::for_profile(profile);
        for range in ranges {
            assert!(classifier.is_eligible(range.low), "{profile:?} {range}");
            assert!(classifier.is_eligible(range.high), "{profile:?} {range}");
            if range.low > 0 && !ranges.iter().any(|r| r.contains(range.low - 1)) {
                assert!(!classifier.is_eligible(range.low - 1), "{profile:?} {range}");
            }
            if !ranges.iter().any(|r| r.contains(range.high + 1)) {
                assert!(!classifier.is_eligible(range.high + 1), "{profile:?} {range}");
            }
        }
    }
}

proptest! {
    #[test]
    fn classifier_matches_range_membership(cp in any::<u32>()) {
        for profile in [ScriptProfile::Latin, ScriptProfile::Normalizable] {
            let classifier = ScriptClassifier::for_profile(profile);
            let expected = profile.ranges().iter().any(|r| r.low <= cp && cp <= r.high);
            prop_assert_eq!(classifier.is_eligible(cp), expected);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. locate() consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn locate_matches_arithmetic(ch in any::<char>()) {
        let cp = u32::from(ch);
        let loc = locate(ch);
        prop_assert_eq!(loc.group, GroupId::of(cp));
        prop_assert_eq!(loc.offset, grouped_offset(cp));
        prop_assert_eq!(loc.codepoint(), cp);
        prop_assert_eq!(loc.line(), u32::from(loc.offset) + 2);
    }

    #[test]
    fn locate_points_at_lookup_entry(cp in 0x81u32..0x250) {
        let table = Transliterator::latin().table();
        let ch = char::from_u32(cp).unwrap();
        let loc = locate(ch);
        let group = table.group(loc.group).unwrap();
        prop_assert_eq!(group.get(loc.offset).unwrap(), table.lookup(cp));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_strings_never_panic(input in any::<String>()) {
        for engine in engines() {
            let _ = engine.transliterate_with(&input, &Locale::new("de"));
        }
    }

    #[test]
    fn arbitrary_utf16_never_panics(units in prop::collection::vec(any::<u16>(), 0..64)) {
        let engine = Transliterator::latin().with_locale(Locale::none());
        let out = engine.transliterate_utf16(&units);
        if let Ok(text) = String::from_utf16(&units) {
            prop_assert_eq!(out, engine.transliterate_with(&text, &Locale::none()));
        }
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let engine = Transliterator::normalizable().with_locale(Locale::none());
        let out = engine.transliterate_bytes(&bytes);
        if let Ok(text) = std::str::from_utf8(&bytes) {
            prop_assert_eq!(out, engine.transliterate_with(text, &Locale::none()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Codepoint utilities
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn encode_inverts_codepoint_of(ch in any::<char>()) {
        let hex = codepoint_of(&ch.to_string()).unwrap();
        prop_assert!(hex.len() >= 4);
        prop_assert_eq!(hex.clone(), hex.to_ascii_lowercase());
        prop_assert_eq!(encode(&hex).unwrap(), ch);
    }

    #[test]
    fn encode_rejects_non_hex(input in "[g-zG-Z]{1,8}") {
        prop_assert!(encode(&input).is_err());
    }
}
