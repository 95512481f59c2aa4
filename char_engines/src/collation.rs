// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-level sort keys.
//!
//! Text is decomposed to NFD and split into collation elements: a base character (or a tailored
//! contraction) together with the combining marks that follow it. Each element contributes one
//! weight to each of three levels, and the levels are concatenated with a separator byte:
//!
//! ```text
//! primary weights 0x01 secondary weights 0x01 tertiary weights
//! ```
//!
//! - Primary weights are three bytes per element and distinguish base letters, ignoring case.
//! - Secondary weights are `0x02` for an element without marks; each mark adds three bytes.
//! - Tertiary weights are one byte per element for its case.
//!
//! Every weight starts with a byte of at least `0x02`, so the separator sorts below any weight and
//! a key whose elements are a prefix of another's sorts first.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;
use icu_normalizer::DecomposingNormalizerBorrowed;
use icu_properties::props::{GeneralCategory, GeneralCategoryGroup};
use icu_properties::CodePointMapData;

const LEVEL_SEPARATOR: u8 = 0x01;
const NO_MARKS: u8 = 0x02;
const MARK_BASE: u32 = 0x03_0000;
const PRIMARY_BASE: u32 = 0x02_0000;
// Untailored characters sort after every tailored element.
const UNTAILORED_BASE: u32 = 0x01_0000;

const CASE_LOWER: u8 = 0x02;
const CASE_TITLE: u8 = 0x03;
const CASE_UPPER: u8 = 0x04;

/// Options for building sort keys and comparing strings.
///
/// The default compares with full sensitivity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollationOptions {
    /// Drop the case level, so that `a` and `A` compare equal.
    pub ignore_case: bool,
    /// Drop the diacritic level, so that `e` and `é` compare equal.
    pub ignore_diacritics: bool,
}

/// A binary sort key. Comparing two keys bytewise gives the collation order of their sources.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(Vec<u8>);

impl SortKey {
    /// The key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the key, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SortKey(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Produces sort keys and compares strings for one writing system.
///
/// Without tailoring, base letters sort by code point of their lowercase form. A tailoring
/// ([`with_primary_order`](Self::with_primary_order)) puts a list of elements first, in the given
/// order; elements may be contractions such as `ch` that sort as a single letter.
#[derive(Clone, Debug, Default)]
pub struct CollatingEngine {
    // Keyed by first character, longest contraction first.
    tailoring: HashMap<char, Vec<(Vec<char>, u32)>>,
}

impl CollatingEngine {
    /// Creates an untailored engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose primary order starts with the whitespace-separated elements of
    /// `order`.
    ///
    /// Elements are compared without case. An element listed twice keeps its first position.
    ///
    /// ```
    /// use char_engines::{CollatingEngine, CollationOptions};
    /// use core::cmp::Ordering;
    ///
    /// // Spanish traditional order: "ch" is a letter between "c" and "d".
    /// let engine = CollatingEngine::with_primary_order("a b c ch d");
    /// let opts = CollationOptions::default();
    /// assert_eq!(engine.compare("chico", "cuna", opts), Ordering::Greater);
    /// assert_eq!(engine.compare("chico", "dama", opts), Ordering::Less);
    /// ```
    pub fn with_primary_order(order: &str) -> Self {
        let nfd = DecomposingNormalizerBorrowed::new_nfd();
        let mut tailoring: HashMap<char, Vec<(Vec<char>, u32)>> = HashMap::new();
        let mut weight = 0_u32;
        for element in order.split_whitespace() {
            let chars: Vec<char> = nfd.normalize(element).chars().map(fold_case).collect();
            let entries = tailoring.entry(chars[0]).or_default();
            if entries.iter().any(|(existing, _)| *existing == chars) {
                log::debug!("ignoring repeated collation element {element:?}");
                continue;
            }
            weight += 1;
            entries.push((chars, weight));
        }
        for entries in tailoring.values_mut() {
            entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        }
        Self { tailoring }
    }

    /// Returns `true` if this engine has a tailored primary order.
    pub fn is_tailored(&self) -> bool {
        !self.tailoring.is_empty()
    }

    /// Builds the sort key of `text`.
    pub fn sort_key(&self, text: &str, options: CollationOptions) -> SortKey {
        let decomposed = DecomposingNormalizerBorrowed::new_nfd().normalize(text);
        let gc = CodePointMapData::<GeneralCategory>::new();
        let chars: Vec<char> = decomposed
            .chars()
            .filter(|&ch| {
                !matches!(gc.get(ch), GeneralCategory::Control | GeneralCategory::Format)
            })
            .collect();

        let mut primary = Vec::with_capacity(chars.len() * 3);
        let mut secondary = Vec::with_capacity(chars.len());
        let mut tertiary = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let (weight, len) = self.primary_weight(&chars[i..]);
            push_u24(&mut primary, PRIMARY_BASE + weight);
            tertiary.push(case_weight(gc.get(chars[i])));
            secondary.push(NO_MARKS);
            i += len;
            while let Some(&mark) = chars.get(i) {
                if !GeneralCategoryGroup::Mark.contains(gc.get(mark)) {
                    break;
                }
                push_u24(&mut secondary, MARK_BASE + u32::from(mark));
                i += 1;
            }
        }

        let mut key = primary;
        if !options.ignore_diacritics {
            key.push(LEVEL_SEPARATOR);
            key.extend_from_slice(&secondary);
        }
        if !options.ignore_case {
            key.push(LEVEL_SEPARATOR);
            key.extend_from_slice(&tertiary);
        }
        SortKey(key)
    }

    /// Compares two strings. This always agrees with comparing their sort keys.
    pub fn compare(&self, a: &str, b: &str, options: CollationOptions) -> Ordering {
        compare_sort_keys(
            self.sort_key(a, options).as_bytes(),
            self.sort_key(b, options).as_bytes(),
        )
    }

    /// Returns the primary weight of the element at the start of `chars` and how many
    /// characters it spans.
    fn primary_weight(&self, chars: &[char]) -> (u32, usize) {
        let first = fold_case(chars[0]);
        if let Some(entries) = self.tailoring.get(&first) {
            for (element, weight) in entries {
                let matches = element.len() <= chars.len()
                    && element
                        .iter()
                        .zip(chars)
                        .all(|(&e, &ch)| e == fold_case(ch));
                if matches {
                    return (*weight, element.len());
                }
            }
        }
        (UNTAILORED_BASE + u32::from(first), 1)
    }
}

/// Compares two sort keys bytewise.
pub fn compare_sort_keys(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(lower), None) => lower,
        _ => ch,
    }
}

fn case_weight(gc: GeneralCategory) -> u8 {
    match gc {
        GeneralCategory::UppercaseLetter => CASE_UPPER,
        GeneralCategory::TitlecaseLetter => CASE_TITLE,
        _ => CASE_LOWER,
    }
}

fn push_u24(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes()[1..]);
}

#[cfg(test)]
mod tests {
    use super::{CollatingEngine, CollationOptions, compare_sort_keys};
    use alloc::vec::Vec;
    use core::cmp::Ordering;

    const STRICT: CollationOptions = CollationOptions {
        ignore_case: false,
        ignore_diacritics: false,
    };

    fn sorted(
        engine: &CollatingEngine,
        words: &[&'static str],
        opts: CollationOptions,
    ) -> Vec<&'static str> {
        let mut words = words.to_vec();
        words.sort_by(|a, b| engine.compare(a, b, opts));
        words
    }

    #[test]
    fn levels_order_base_then_marks_then_case() {
        let engine = CollatingEngine::new();
        assert_eq!(
            sorted(&engine, &["cote", "Côte", "côte", "coté", "Cote", "co"], STRICT),
            ["co", "cote", "Cote", "coté", "côte", "Côte"]
        );
    }

    #[test]
    fn ignore_options_drop_levels() {
        let engine = CollatingEngine::new();
        let no_case = CollationOptions {
            ignore_case: true,
            ..STRICT
        };
        let no_marks = CollationOptions {
            ignore_diacritics: true,
            ..STRICT
        };
        assert_eq!(engine.compare("abc", "ABC", no_case), Ordering::Equal);
        assert_eq!(engine.compare("abc", "ABC", STRICT), Ordering::Less);
        assert_eq!(engine.compare("résumé", "resume", no_marks), Ordering::Equal);
        assert_eq!(engine.compare("résumé", "Resume", no_marks), Ordering::Less);
        let both = CollationOptions {
            ignore_case: true,
            ignore_diacritics: true,
        };
        assert_eq!(engine.compare("Résumé", "resume", both), Ordering::Equal);
    }

    #[test]
    fn precomposed_and_decomposed_are_equal() {
        let engine = CollatingEngine::new();
        assert_eq!(engine.sort_key("é", STRICT), engine.sort_key("e\u{301}", STRICT));
    }

    #[test]
    fn tailored_contractions() {
        let engine = CollatingEngine::with_primary_order("a b c ch d e h i");
        assert!(engine.is_tailored());
        assert_eq!(
            sorted(&engine, &["dedo", "chico", "cuna", "Chile", "hola"], STRICT),
            ["cuna", "chico", "Chile", "dedo", "hola"]
        );
        // Untailored letters sort after tailored ones.
        assert_eq!(engine.compare("z", "a", STRICT), Ordering::Greater);
        assert_eq!(engine.compare("x", "i", STRICT), Ordering::Greater);
    }

    #[test]
    fn repeated_elements_keep_first_position() {
        let engine = CollatingEngine::with_primary_order("b a b");
        assert_eq!(engine.compare("b", "a", STRICT), Ordering::Less);
    }

    #[test]
    fn compare_agrees_with_keys() {
        let engine = CollatingEngine::with_primary_order("ŋ n");
        let words = ["", "a", "A", "ŋa", "na", "Ñ", "n\u{303}a", "a\u{0}b", "ab", "Zz"];
        for opts in [
            STRICT,
            CollationOptions {
                ignore_case: true,
                ignore_diacritics: true,
            },
        ] {
            for a in words {
                for b in words {
                    let ka = engine.sort_key(a, opts);
                    let kb = engine.sort_key(b, opts);
                    assert_eq!(
                        engine.compare(a, b, opts),
                        compare_sort_keys(ka.as_bytes(), kb.as_bytes()),
                        "{a:?} vs {b:?}"
                    );
                    assert_eq!(engine.compare(a, b, opts), ka.cmp(&kb));
                }
            }
        }
    }

    #[test]
    fn control_characters_are_ignored() {
        let engine = CollatingEngine::new();
        assert_eq!(engine.compare("a\u{0}b", "ab", STRICT), Ordering::Equal);
        assert_eq!(engine.compare("a\u{200d}b", "ab", STRICT), Ordering::Equal);
    }
}
