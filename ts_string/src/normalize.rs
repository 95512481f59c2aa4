// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use icu_normalizer::{ComposingNormalizerBorrowed, DecomposingNormalizerBorrowed};

use crate::TsString;
use crate::run::{self, Run};

/// A Unicode normalization form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NormalizationForm {
    /// Canonical composition.
    #[default]
    Nfc,
    /// Canonical decomposition.
    Nfd,
    /// Compatibility composition.
    Nfkc,
    /// Compatibility decomposition.
    Nfkd,
}

impl NormalizationForm {
    /// Normalizes `text` to this form, appending to `out`.
    pub fn normalize_to(self, text: &str, out: &mut String) {
        match self {
            Self::Nfc => out.push_str(&ComposingNormalizerBorrowed::new_nfc().normalize(text)),
            Self::Nfkc => out.push_str(&ComposingNormalizerBorrowed::new_nfkc().normalize(text)),
            Self::Nfd => out.push_str(&DecomposingNormalizerBorrowed::new_nfd().normalize(text)),
            Self::Nfkd => out.push_str(&DecomposingNormalizerBorrowed::new_nfkd().normalize(text)),
        }
    }

    /// Returns `true` if `text` is already in this form.
    pub fn is_normalized(self, text: &str) -> bool {
        match self {
            Self::Nfc => ComposingNormalizerBorrowed::new_nfc().is_normalized(text),
            Self::Nfkc => ComposingNormalizerBorrowed::new_nfkc().is_normalized(text),
            Self::Nfd => DecomposingNormalizerBorrowed::new_nfd().is_normalized(text),
            Self::Nfkd => DecomposingNormalizerBorrowed::new_nfkd().is_normalized(text),
        }
    }
}

impl TsString {
    /// Returns this string normalized to `form`.
    ///
    /// Each run is normalized on its own so that run boundaries survive; a base character and a
    /// combining mark in different runs are never composed together.
    pub fn normalized(&self, form: NormalizationForm) -> Self {
        if self.is_normalized(form) {
            return self.clone();
        }
        let mut text = String::with_capacity(self.len());
        let mut runs = Vec::with_capacity(self.run_count());
        for info in self.runs() {
            form.normalize_to(&self.text()[info.range], &mut text);
            runs.push(Run {
                end: text.len(),
                props: info.props,
            });
        }
        let empty_props = self.run_slice()[0].props.clone();
        Self::from_parts(text, run::normalize_runs(runs, &empty_props))
    }

    /// Returns `true` if every run is in `form`.
    pub fn is_normalized(&self, form: NormalizationForm) -> bool {
        self.runs()
            .all(|info| form.is_normalized(&self.text()[info.range]))
    }
}

#[cfg(test)]
mod tests {
    use super::NormalizationForm;
    use crate::{StrBuilder, TsString};
    use text_props::TextProps;

    #[test]
    fn decomposes_each_run() {
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "é", None).unwrap();
        bldr.replace(2..2, "ü", Some(&TextProps::with_ws(2))).unwrap();
        let s = bldr.build();
        assert!(s.is_normalized(NormalizationForm::Nfc));
        assert!(!s.is_normalized(NormalizationForm::Nfd));

        let nfd = s.normalized(NormalizationForm::Nfd);
        assert_eq!(nfd.text(), "e\u{301}u\u{308}");
        assert_eq!(nfd.bounds_of_run(0).unwrap(), 0..3);
        assert_eq!(nfd.bounds_of_run(1).unwrap(), 3..6);
        assert_eq!(nfd.normalized(NormalizationForm::Nfc), s);
    }

    #[test]
    fn marks_in_separate_runs_stay_apart() {
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "e", None).unwrap();
        bldr.replace(1..1, "\u{301}", Some(&TextProps::with_ws(2)))
            .unwrap();
        let s = bldr.build();
        assert_eq!(s.normalized(NormalizationForm::Nfc), s);
    }

    #[test]
    fn compatibility_forms() {
        let s = TsString::new("ﬁ", TextProps::empty());
        assert_eq!(s.normalized(NormalizationForm::Nfkc).text(), "fi");
        assert_eq!(s.normalized(NormalizationForm::Nfc).text(), "ﬁ");
    }
}
