// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::iter::Peekable;
use core::ops::Range;

use icu_normalizer::{ComposingNormalizerBorrowed, DecomposingNormalizerBorrowed};
use icu_properties::props::{
    BidiClass, CanonicalCombiningClass, GeneralCategory, GeneralCategoryGroup, LineBreak,
    Lowercase, Script, Uppercase,
};
use icu_properties::{CodePointMapData, CodePointSetData};
use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter};
use ts_string::NormalizationForm;

use crate::Error;

/// How good a line break before a character would be, best first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BreakWeight {
    /// The previous character forces a line break.
    Hard,
    /// A break between words.
    Word,
    /// A break between grapheme clusters inside a word.
    Letter,
    /// No break is possible inside a grapheme cluster.
    None,
}

/// Per-character Unicode classification for one writing system.
///
/// All property data comes from ICU's compiled data. The only per-writing-system state is a set
/// of extra characters that count as word-forming, such as an apostrophe used as a glottal stop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterPropertyEngine {
    // Sorted and deduplicated.
    word_forming: Vec<char>,
}

impl CharacterPropertyEngine {
    /// Creates an engine with no word-forming overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this engine that also treats `chars` as word-forming.
    pub fn with_word_forming_overrides(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.word_forming.extend(chars);
        self.word_forming.sort_unstable();
        self.word_forming.dedup();
        self
    }

    /// The extra word-forming characters, in code point order.
    pub fn word_forming_overrides(&self) -> &[char] {
        &self.word_forming
    }

    /// The Unicode general category of `ch`.
    pub fn general_category(&self, ch: char) -> GeneralCategory {
        CodePointMapData::<GeneralCategory>::new().get(ch)
    }

    fn is_in(&self, ch: char, group: GeneralCategoryGroup) -> bool {
        group.contains(self.general_category(ch))
    }

    /// Returns `true` for letters (`L*`).
    pub fn is_letter(&self, ch: char) -> bool {
        self.is_in(ch, GeneralCategoryGroup::Letter)
    }

    /// Returns `true` for letters, marks, and the writing system's extra word-forming characters.
    pub fn is_word_forming(&self, ch: char) -> bool {
        self.word_forming.binary_search(&ch).is_ok()
            || self.is_letter(ch)
            || self.is_mark(ch)
    }

    /// Returns `true` for punctuation (`P*`) that is not an extra word-forming character.
    pub fn is_punctuation(&self, ch: char) -> bool {
        self.word_forming.binary_search(&ch).is_err()
            && self.is_in(ch, GeneralCategoryGroup::Punctuation)
    }

    /// Returns `true` for numbers (`N*`).
    pub fn is_number(&self, ch: char) -> bool {
        self.is_in(ch, GeneralCategoryGroup::Number)
    }

    /// Returns `true` for separators (`Z*`).
    pub fn is_separator(&self, ch: char) -> bool {
        self.is_in(ch, GeneralCategoryGroup::Separator)
    }

    /// Returns `true` for symbols (`S*`).
    pub fn is_symbol(&self, ch: char) -> bool {
        self.is_in(ch, GeneralCategoryGroup::Symbol)
    }

    /// Returns `true` for combining marks (`M*`).
    pub fn is_mark(&self, ch: char) -> bool {
        self.is_in(ch, GeneralCategoryGroup::Mark)
    }

    /// Returns `true` for control characters (`Cc`).
    pub fn is_control(&self, ch: char) -> bool {
        self.general_category(ch) == GeneralCategory::Control
    }

    /// Returns `true` if `ch` has the Unicode `Uppercase` property.
    pub fn is_upper(&self, ch: char) -> bool {
        CodePointSetData::new::<Uppercase>().contains(ch)
    }

    /// Returns `true` if `ch` has the Unicode `Lowercase` property.
    pub fn is_lower(&self, ch: char) -> bool {
        CodePointSetData::new::<Lowercase>().contains(ch)
    }

    /// Returns `true` for titlecase letters (`Lt`), such as `ǅ`.
    pub fn is_title(&self, ch: char) -> bool {
        self.general_category(ch) == GeneralCategory::TitlecaseLetter
    }

    /// The bidirectional class of `ch`.
    pub fn bidi_category(&self, ch: char) -> BidiClass {
        CodePointMapData::<BidiClass>::new().get(ch)
    }

    /// The script of `ch`.
    pub fn script(&self, ch: char) -> Script {
        CodePointMapData::<Script>::new().get(ch)
    }

    /// The canonical combining class of `ch`; 0 for starters.
    pub fn combining_class(&self, ch: char) -> u8 {
        CodePointMapData::<CanonicalCombiningClass>::new()
            .get(ch)
            .to_icu4c_value()
    }

    /// The line break class of `ch`.
    pub fn line_break_property(&self, ch: char) -> LineBreak {
        CodePointMapData::<LineBreak>::new().get(ch)
    }

    /// Returns `true` if a line must break after `ch`.
    pub fn is_mandatory_break(&self, ch: char) -> bool {
        matches!(
            self.line_break_property(ch),
            LineBreak::MandatoryBreak
                | LineBreak::CarriageReturn
                | LineBreak::LineFeed
                | LineBreak::NextLine
        )
    }

    /// The simple lowercase mapping of `ch`.
    ///
    /// Characters whose full mapping is longer than one character map to themselves.
    pub fn to_lower(&self, ch: char) -> char {
        single(ch.to_lowercase()).unwrap_or(ch)
    }

    /// The simple uppercase mapping of `ch`.
    pub fn to_upper(&self, ch: char) -> char {
        single(ch.to_uppercase()).unwrap_or(ch)
    }

    /// The simple titlecase mapping of `ch`.
    pub fn to_title(&self, ch: char) -> char {
        match ch {
            'Ǆ'..='ǆ' => 'ǅ',
            'Ǉ'..='ǉ' => 'ǈ',
            'Ǌ'..='ǌ' => 'ǋ',
            'Ǳ'..='ǳ' => 'ǲ',
            _ => self.to_upper(ch),
        }
    }

    /// Lowercases `text` with the full case mappings.
    pub fn to_lower_str(&self, text: &str) -> String {
        text.to_lowercase()
    }

    /// Uppercases `text` with the full case mappings.
    pub fn to_upper_str(&self, text: &str) -> String {
        text.to_uppercase()
    }

    /// Titlecases the first letter of each word and lowercases the rest.
    ///
    /// A word starts at a word-forming character that follows a character which is not.
    pub fn to_title_str(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_word = false;
        for ch in text.chars() {
            let word_forming = self.is_word_forming(ch);
            if word_forming && !in_word && self.is_letter(ch) {
                out.push(self.to_title(ch));
            } else if word_forming {
                out.extend(ch.to_lowercase());
            } else {
                out.push(ch);
            }
            in_word = word_forming;
        }
        out
    }

    /// The canonical decomposition (NFD) of `ch`.
    pub fn decomposition(&self, ch: char) -> String {
        let mut buf = [0; 4];
        DecomposingNormalizerBorrowed::new_nfd()
            .normalize(ch.encode_utf8(&mut buf))
            .into_owned()
    }

    /// The compatibility decomposition (NFKD) of `ch`.
    pub fn full_decomposition(&self, ch: char) -> String {
        let mut buf = [0; 4];
        DecomposingNormalizerBorrowed::new_nfkd()
            .normalize(ch.encode_utf8(&mut buf))
            .into_owned()
    }

    /// Normalizes `text` to `form`.
    pub fn normalize(&self, text: &str, form: NormalizationForm) -> String {
        let mut out = String::with_capacity(text.len());
        form.normalize_to(text, &mut out);
        out
    }

    /// Removes nonspacing marks from `text` and returns the result in NFC.
    pub fn strip_diacritics(&self, text: &str) -> String {
        let stripped: String = DecomposingNormalizerBorrowed::new_nfd()
            .normalize(text)
            .chars()
            .filter(|&ch| self.general_category(ch) != GeneralCategory::NonspacingMark)
            .collect();
        ComposingNormalizerBorrowed::new_nfc()
            .normalize(&stripped)
            .into_owned()
    }

    /// Computes how good a line break before each character of `text[range]` would be.
    ///
    /// The result has one entry per character in `range`. The whole of `text` is used as
    /// context, so a weight near the edge of `range` is the same as for the full text. The first
    /// character of `text` always gets [`BreakWeight::None`].
    pub fn line_break_info(
        &self,
        text: &str,
        range: Range<usize>,
    ) -> Result<Vec<BreakWeight>, Error> {
        Error::check_range(text, &range)?;
        let mut lines = LineSegmenter::new_for_non_complex_scripts(LineBreakOptions::default())
            .segment_str(text)
            .peekable();
        let mut graphemes = GraphemeClusterSegmenter::new()
            .segment_str(text)
            .peekable();

        let mut weights = Vec::with_capacity(range.len());
        let mut prev = None;
        for (ich, ch) in text.char_indices() {
            if ich >= range.end {
                break;
            }
            let is_line = advance_to(&mut lines, ich);
            let is_grapheme = advance_to(&mut graphemes, ich);
            if ich >= range.start {
                weights.push(match prev {
                    Some(prev) if is_line && self.is_mandatory_break(prev) => BreakWeight::Hard,
                    Some(_) if is_line => BreakWeight::Word,
                    Some(_) if is_grapheme => BreakWeight::Letter,
                    _ => BreakWeight::None,
                });
            }
            prev = Some(ch);
        }
        Ok(weights)
    }
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Skips boundaries before `pos` and reports whether `pos` itself is one.
fn advance_to(boundaries: &mut Peekable<impl Iterator<Item = usize>>, pos: usize) -> bool {
    while boundaries.next_if(|&b| b < pos).is_some() {}
    boundaries.peek() == Some(&pos)
}

#[cfg(test)]
mod tests {
    use super::{BreakWeight, CharacterPropertyEngine};
    use crate::ErrorKind;
    use icu_properties::props::{BidiClass, GeneralCategory, LineBreak, Script};
    use ts_string::NormalizationForm;

    #[test]
    fn classification() {
        let cpe = CharacterPropertyEngine::new();
        assert_eq!(cpe.general_category('a'), GeneralCategory::LowercaseLetter);
        assert!(cpe.is_letter('ж'));
        assert!(cpe.is_mark('\u{301}'));
        assert!(cpe.is_number('٣'));
        assert!(cpe.is_punctuation('!'));
        assert!(cpe.is_separator(' '));
        assert!(cpe.is_symbol('+'));
        assert!(cpe.is_control('\u{7}'));
        assert!(cpe.is_upper('Q') && !cpe.is_lower('Q'));
        assert!(cpe.is_lower('q'));
        assert!(cpe.is_title('ǅ'));
        assert_eq!(cpe.bidi_category('א'), BidiClass::RightToLeft);
        assert_eq!(cpe.bidi_category('1'), BidiClass::EuropeanNumber);
        assert_eq!(cpe.script('Ω'), Script::Greek);
        assert_eq!(cpe.combining_class('\u{301}'), 230);
        assert_eq!(cpe.combining_class('a'), 0);
        assert_eq!(cpe.line_break_property('\n'), LineBreak::LineFeed);
    }

    #[test]
    fn word_forming_overrides() {
        let plain = CharacterPropertyEngine::new();
        assert!(!plain.is_word_forming('\''));
        assert!(plain.is_punctuation('\''));

        let cpe = plain.with_word_forming_overrides(['\'', 'ʼ', '\'']);
        assert_eq!(cpe.word_forming_overrides(), &['\'', 'ʼ']);
        assert!(cpe.is_word_forming('\''));
        assert!(!cpe.is_punctuation('\''));
        assert!(cpe.is_word_forming('e'));
        assert!(!cpe.is_word_forming('-'));
    }

    #[test]
    fn case_mapping() {
        let cpe = CharacterPropertyEngine::new();
        assert_eq!(cpe.to_lower('Σ'), 'σ');
        assert_eq!(cpe.to_upper('ß'), 'ß');
        assert_eq!(cpe.to_title('ǆ'), 'ǅ');
        assert_eq!(cpe.to_title('x'), 'X');
        assert_eq!(cpe.to_upper_str("straße"), "STRASSE");
        assert_eq!(cpe.to_title_str("hELLO wide-world"), "Hello Wide-World");
        let cpe = cpe.with_word_forming_overrides(['\'']);
        assert_eq!(cpe.to_title_str("ba'al o'neil"), "Ba'al O'neil");
    }

    #[test]
    fn decompositions() {
        let cpe = CharacterPropertyEngine::new();
        assert_eq!(cpe.decomposition('é'), "e\u{301}");
        assert_eq!(cpe.decomposition('ﬁ'), "ﬁ");
        assert_eq!(cpe.full_decomposition('ﬁ'), "fi");
        assert_eq!(cpe.normalize("e\u{301}", NormalizationForm::Nfc), "é");
        assert_eq!(cpe.strip_diacritics("Crème brûlée"), "Creme brulee");
    }

    #[test]
    fn line_break_weights() {
        let cpe = CharacterPropertyEngine::new();
        let text = "ab cd\ne\u{301}f";
        let weights = cpe.line_break_info(text, 0..text.len()).unwrap();
        assert_eq!(
            weights,
            [
                BreakWeight::None,   // a
                BreakWeight::Letter, // b
                BreakWeight::Letter, // ' '
                BreakWeight::Word,   // c
                BreakWeight::Letter, // d
                BreakWeight::Letter, // '\n'
                BreakWeight::Hard,   // e
                BreakWeight::None,   // U+0301
                BreakWeight::Letter, // f
            ]
        );
        // Sub-ranges use the whole text as context.
        assert_eq!(cpe.line_break_info(text, 3..5).unwrap(), weights[3..5]);
        assert!(BreakWeight::Hard < BreakWeight::Word);
    }

    #[test]
    fn line_break_info_rejects_bad_ranges() {
        let cpe = CharacterPropertyEngine::new();
        let err = cpe.line_break_info("é", 0..1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        let err = cpe.line_break_info("ab", 1..3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
        let (start, end) = (2, 1);
        let err = cpe.line_break_info("ab", start..end).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }
}
