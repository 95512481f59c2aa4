// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use text_props::TextProps;
use ts_string::TsString;

use crate::Error;

/// Text with formatting that a render engine can lay out.
///
/// Offsets are UTF-8 byte offsets into the whole text.
pub trait TextSource {
    /// The length of the text in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the text is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text in `range`.
    fn text(&self, range: Range<usize>) -> Result<&str, Error>;

    /// The range of the run containing `ich` and its properties.
    ///
    /// `ich == len` resolves to the last run.
    fn props_at(&self, ich: usize) -> Result<(Range<usize>, TextProps), Error>;

    /// The writing system of the character at `ich`.
    fn ws_at(&self, ich: usize) -> Result<Option<u32>, Error> {
        Ok(self.props_at(ich)?.1.ws())
    }
}

impl TextSource for TsString {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn text(&self, range: Range<usize>) -> Result<&str, Error> {
        self.text()
            .get(range.clone())
            .ok_or_else(|| Error::invalid_range(range, Self::len(self)))
    }

    fn props_at(&self, ich: usize) -> Result<(Range<usize>, TextProps), Error> {
        let irun = self.run_at(ich)?;
        Ok((self.bounds_of_run(irun)?, self.props_of_run(irun)?.clone()))
    }
}

/// Collects the runs of `source` that overlap `range`, clipped to it.
pub(crate) fn runs_in(
    source: &dyn TextSource,
    range: Range<usize>,
) -> Result<Vec<(Range<usize>, TextProps)>, Error> {
    let mut runs = Vec::new();
    let mut pos = range.start;
    loop {
        let (run, props) = source.props_at(pos)?;
        let end = run.end.min(range.end);
        runs.push((pos..end, props));
        if end >= range.end || run.end <= pos {
            break;
        }
        pos = end;
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::{TextSource, runs_in};
    use crate::ErrorKind;
    use text_props::TextProps;
    use ts_string::{StrBuilder, TsString};

    #[test]
    fn ts_string_is_a_text_source() {
        let mut bldr = StrBuilder::new(TextProps::with_ws(1));
        bldr.replace(0..0, "abc", None).unwrap();
        bldr.replace(3..3, "def", Some(&TextProps::with_ws(2)))
            .unwrap();
        let s = bldr.build();
        let source: &dyn TextSource = &s;
        assert_eq!(source.len(), 6);
        assert_eq!(source.text(2..4).unwrap(), "cd");
        assert_eq!(source.props_at(4).unwrap().0, 3..6);
        assert_eq!(source.ws_at(6).unwrap(), Some(2));
        assert_eq!(source.text(4..9).unwrap_err().kind(), ErrorKind::InvalidRange);
        assert_eq!(source.props_at(9).unwrap_err().kind(), ErrorKind::Source);

        let runs = runs_in(source, 1..5).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0, 1..3);
        assert_eq!(runs[1].0, 3..5);
    }

    #[test]
    fn empty_source_has_one_run() {
        let s = TsString::empty(TextProps::with_ws(3));
        let runs = runs_in(&s, 0..0).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].1.ws(), Some(3));
    }
}
