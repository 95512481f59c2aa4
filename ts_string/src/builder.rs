// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use text_props::{IntProp, IntPropCode, StrPropCode, TextProps};

use crate::run::{self, Run, RunInfo};
use crate::{Error, TsString};

/// A mutable structured string.
///
/// Edits are applied to byte ranges of the current text; run boundaries are split and re-merged
/// after every edit so the builder always satisfies the same run invariants as [`TsString`].
#[derive(Clone, Debug)]
pub struct StrBuilder {
    text: String,
    runs: Vec<Run>,
}

impl StrBuilder {
    /// Creates an empty builder whose lone run carries `props`.
    pub fn new(props: TextProps) -> Self {
        Self {
            text: String::new(),
            runs: vec![Run { end: 0, props }],
        }
    }

    pub(crate) fn from_ts_string(source: &TsString) -> Self {
        Self {
            text: String::from(source.text()),
            runs: source.run_slice().to_vec(),
        }
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The number of runs; never zero.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the index of the run containing `ich`; `len()` resolves to the final run.
    pub fn run_at(&self, ich: usize) -> Result<usize, Error> {
        run::run_at(&self.text, &self.runs, ich)
    }

    /// Returns the bounds and properties of run `irun`.
    pub fn fetch_run_info(&self, irun: usize) -> Result<RunInfo, Error> {
        run::run_info(&self.runs, irun)
    }

    /// Returns the properties in effect at `ich`.
    pub fn props_at(&self, ich: usize) -> Result<&TextProps, Error> {
        let irun = self.run_at(ich)?;
        Ok(&self.runs[irun].props)
    }

    /// Replaces `range` with `text`.
    ///
    /// With `props` of `None` the new text takes the properties of the character at
    /// `range.start`, or of the preceding character when `range.start` is the end of the text.
    /// Replacing with an empty string deletes the range.
    pub fn replace(
        &mut self,
        range: Range<usize>,
        text: &str,
        props: Option<&TextProps>,
    ) -> Result<(), Error> {
        run::validate_range(&self.text, &range)?;
        let props = match props {
            Some(props) => props.clone(),
            None => self.inherited_props(range.start)?,
        };
        let new_run = Run {
            end: text.len(),
            props: props.clone(),
        };
        let inserted = if text.is_empty() {
            &[][..]
        } else {
            core::slice::from_ref(&new_run)
        };
        self.runs = run::splice_runs(&self.runs, range.clone(), inserted, &props);
        self.text.replace_range(range, text);
        Ok(())
    }

    /// Replaces `range` with a copy of `source`, including its formatting.
    pub fn replace_ts_string(
        &mut self,
        range: Range<usize>,
        source: &TsString,
    ) -> Result<(), Error> {
        run::validate_range(&self.text, &range)?;
        let empty_props = if source.is_empty() {
            self.inherited_props(range.start)?
        } else {
            source.run_slice()[0].props.clone()
        };
        let inserted = if source.is_empty() {
            &[][..]
        } else {
            source.run_slice()
        };
        self.runs = run::splice_runs(&self.runs, range.clone(), inserted, &empty_props);
        self.text.replace_range(range, source.text());
        Ok(())
    }

    /// Gives every character of `range` exactly `props`.
    ///
    /// On an empty builder this sets the properties of the lone empty run.
    pub fn set_props(&mut self, range: Range<usize>, props: &TextProps) -> Result<(), Error> {
        self.edit_props(range, |_| props.clone())
    }

    /// Sets (or with `None`, removes) one integer property over `range`, keeping all others.
    pub fn set_int_prop_values(
        &mut self,
        range: Range<usize>,
        code: IntPropCode,
        value: Option<IntProp>,
    ) -> Result<(), Error> {
        self.edit_props(range, |props| {
            let mut bldr = props.to_builder();
            match value {
                Some(prop) => bldr.set_int_prop(code, prop.var, prop.value),
                None => bldr.clear_int_prop(code),
            };
            bldr.build()
        })
    }

    /// Sets one string property over `range`, keeping all others. An empty value removes it.
    pub fn set_str_prop_value(
        &mut self,
        range: Range<usize>,
        code: StrPropCode,
        value: &str,
    ) -> Result<(), Error> {
        self.edit_props(range, |props| {
            let mut bldr = props.to_builder();
            bldr.set_str_prop(code, value);
            bldr.build()
        })
    }

    /// Removes all text, keeping the properties of the first run for the empty run.
    pub fn clear(&mut self) {
        let props = self.runs[0].props.clone();
        self.text.clear();
        self.runs = vec![Run { end: 0, props }];
    }

    /// Crystallizes the current state into a new immutable string.
    ///
    /// The builder remains usable afterwards.
    pub fn build(&self) -> TsString {
        TsString::from_parts(self.text.clone(), self.runs.clone())
    }

    fn inherited_props(&self, ich: usize) -> Result<TextProps, Error> {
        let irun = if ich > 0 && ich == self.text.len() {
            self.runs.len() - 1
        } else {
            self.run_at(ich)?
        };
        Ok(self.runs[irun].props.clone())
    }

    fn edit_props(
        &mut self,
        range: Range<usize>,
        mut edit: impl FnMut(&TextProps) -> TextProps,
    ) -> Result<(), Error> {
        run::validate_range(&self.text, &range)?;
        if self.text.is_empty() {
            self.runs[0].props = edit(&self.runs[0].props);
            return Ok(());
        }
        if range.is_empty() {
            return Ok(());
        }
        let mut pieces = Vec::new();
        for (irun, run) in self.runs.iter().enumerate() {
            let start = run::run_start(&self.runs, irun);
            if run.end <= range.start || start >= range.end {
                continue;
            }
            pieces.push(Run {
                end: run.end.min(range.end) - range.start,
                props: edit(&run.props),
            });
        }
        let empty_props = self.runs[0].props.clone();
        self.runs = run::splice_runs(&self.runs, range, &pieces, &empty_props);
        Ok(())
    }
}
