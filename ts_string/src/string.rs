// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use text_props::TextProps;

use crate::run::{self, Run, RunInfo};
use crate::{Error, IncStrBuilder, StrBuilder};

/// An immutable string partitioned into runs, each carrying one [`TextProps`].
///
/// Offsets are UTF-8 byte offsets and must lie on character boundaries. The runs are ordered,
/// contiguous, and cover the whole text; adjacent runs always have different properties. An
/// empty string has exactly one (empty) run, which records the properties new text typed into
/// it should get.
///
/// Cloning is cheap: the text and run table are shared.
///
/// ```
/// use text_props::TextProps;
/// use ts_string::TsString;
///
/// let s = TsString::new("hello", TextProps::with_ws(1));
/// assert_eq!(s.run_count(), 1);
/// assert_eq!(s.bounds_of_run(0).unwrap(), 0..5);
/// assert_eq!(s.run_at(5).unwrap(), 0);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TsString {
    text: Arc<str>,
    runs: Arc<[Run]>,
}

impl TsString {
    /// Creates a string with a single run.
    pub fn new(text: &str, props: TextProps) -> Self {
        Self {
            text: Arc::from(text),
            runs: Arc::from([Run {
                end: text.len(),
                props,
            }]),
        }
    }

    /// Creates an empty string whose lone run carries `props`.
    pub fn empty(props: TextProps) -> Self {
        Self::new("", props)
    }

    /// Creates a string from already-normalized parts.
    pub(crate) fn from_parts(text: String, runs: Vec<Run>) -> Self {
        debug_assert!(
            runs.last().is_some_and(|run| run.end == text.len()),
            "run table must cover the text"
        );
        Self {
            text: Arc::from(text),
            runs: Arc::from(runs),
        }
    }

    pub(crate) fn run_slice(&self) -> &[Run] {
        &self.runs
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The number of runs; never zero.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the index of the run containing `ich`.
    ///
    /// `ich == len()` is accepted and resolves to the final run, so that an insertion point at
    /// the end of the text has properties to inherit.
    pub fn run_at(&self, ich: usize) -> Result<usize, Error> {
        run::run_at(&self.text, &self.runs, ich)
    }

    /// Returns the bounds and properties of run `irun`.
    pub fn fetch_run_info(&self, irun: usize) -> Result<RunInfo, Error> {
        run::run_info(&self.runs, irun)
    }

    /// Returns the bounds of run `irun`.
    pub fn bounds_of_run(&self, irun: usize) -> Result<Range<usize>, Error> {
        run::run_bounds(&self.runs, irun)
    }

    /// Returns the properties of run `irun`.
    pub fn props_of_run(&self, irun: usize) -> Result<&TextProps, Error> {
        self.runs
            .get(irun)
            .map(|run| &run.props)
            .ok_or_else(|| Error::run_out_of_bounds(irun, self.runs.len()))
    }

    /// Returns the text of run `irun`.
    pub fn run_text(&self, irun: usize) -> Result<&str, Error> {
        let range = self.bounds_of_run(irun)?;
        Ok(&self.text[range])
    }

    /// Returns the properties in effect at `ich`.
    pub fn props_at(&self, ich: usize) -> Result<&TextProps, Error> {
        let irun = self.run_at(ich)?;
        Ok(&self.runs[irun].props)
    }

    /// Returns the writing system in effect at `ich`, if any.
    pub fn ws_at(&self, ich: usize) -> Result<Option<u32>, Error> {
        Ok(self.props_at(ich)?.ws())
    }

    /// Iterates over the runs in order.
    pub fn runs(&self) -> impl ExactSizeIterator<Item = RunInfo> + '_ {
        (0..self.runs.len()).map(|irun| RunInfo {
            range: run::run_start(&self.runs, irun)..self.runs[irun].end,
            props: self.runs[irun].props.clone(),
        })
    }

    /// Returns a new string holding `range` of this one, with its formatting.
    ///
    /// An empty range yields an empty string carrying the properties at `range.start`.
    pub fn substring(&self, range: Range<usize>) -> Result<Self, Error> {
        run::validate_range(&self.text, &range)?;
        let empty_props = self.props_at(range.start)?.clone();
        let mut runs = Vec::new();
        for (irun, run) in self.runs.iter().enumerate() {
            let start = run::run_start(&self.runs, irun);
            if run.end <= range.start || start >= range.end {
                continue;
            }
            runs.push(Run {
                end: run.end.min(range.end) - range.start,
                props: run.props.clone(),
            });
        }
        let runs = run::normalize_runs(runs, &empty_props);
        Ok(Self::from_parts(String::from(&self.text[range]), runs))
    }

    /// Returns a builder initialized with this string.
    ///
    /// The builder owns its own copy; editing it never affects `self`.
    pub fn to_builder(&self) -> StrBuilder {
        StrBuilder::from_ts_string(self)
    }

    /// Returns an incremental builder initialized with this string.
    ///
    /// Appended text gets the properties of the final run.
    pub fn to_inc_builder(&self) -> IncStrBuilder {
        IncStrBuilder::from_ts_string(self)
    }
}

impl Default for TsString {
    fn default() -> Self {
        Self::empty(TextProps::empty())
    }
}

impl fmt::Display for TsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for TsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for info in self.runs() {
            list.entry(&(&self.text[info.range.clone()], info.props));
        }
        list.finish()
    }
}
