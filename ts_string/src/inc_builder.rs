// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use text_props::{IntProp, IntPropCode, PropsBuilder, StrPropCode, TextProps, Variation};

use crate::TsString;
use crate::run::{self, Run};

/// An append-only builder for structured strings.
///
/// Text is appended with the *current* properties, which are edited in place with the
/// `set_*` methods. This is cheaper than [`StrBuilder`](crate::StrBuilder) when a string is
/// produced front to back, as when parsing or generating text.
///
/// ```
/// use text_props::{IntPropCode, Variation};
/// use ts_string::IncStrBuilder;
///
/// let mut bldr = IncStrBuilder::new();
/// bldr.set_int_prop_values(IntPropCode::WS, Some((Variation::Default, 1)));
/// bldr.append("plain ");
/// bldr.set_int_prop_values(IntPropCode::BOLD, Some((Variation::Enum, 1)));
/// bldr.append("bold");
/// let s = bldr.build();
/// assert_eq!(s.run_count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IncStrBuilder {
    text: String,
    runs: Vec<Run>,
    current: PropsBuilder,
}

impl IncStrBuilder {
    /// Creates an empty builder with no current properties.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_ts_string(source: &TsString) -> Self {
        let runs = source.run_slice();
        let current = runs
            .last()
            .map(|run| run.props.to_builder())
            .unwrap_or_default();
        Self {
            text: String::from(source.text()),
            runs: if source.is_empty() {
                Vec::new()
            } else {
                runs.to_vec()
            },
            current,
        }
    }

    /// The text appended so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The properties the next appended text will get.
    pub fn current_props(&self) -> TextProps {
        self.current.build()
    }

    /// Appends `text` with the current properties.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        let props = self.current.build();
        let end = self.text.len();
        match self.runs.last_mut() {
            Some(last) if last.props == props => last.end = end,
            _ => self.runs.push(Run { end, props }),
        }
    }

    /// Appends a copy of `source` with its own formatting.
    ///
    /// The current properties become those of the last run of `source`.
    pub fn append_ts_string(&mut self, source: &TsString) {
        let base = self.text.len();
        for info in source.runs() {
            if info.range.is_empty() {
                continue;
            }
            self.text.push_str(&source.text()[info.range.clone()]);
            let end = base + info.range.end;
            match self.runs.last_mut() {
                Some(last) if last.props == info.props => last.end = end,
                _ => self.runs.push(Run {
                    end,
                    props: info.props,
                }),
            }
        }
        if let Some(last) = source.run_slice().last() {
            self.current = last.props.to_builder();
        }
    }

    /// Sets (or with `None`, removes) an integer property of the current properties.
    pub fn set_int_prop_values(
        &mut self,
        code: IntPropCode,
        value: Option<(Variation, i32)>,
    ) {
        match value {
            Some((var, value)) => self.current.set_int_prop(code, var, value),
            None => self.current.clear_int_prop(code),
        };
    }

    /// Sets an integer property of the current properties from an [`IntProp`].
    pub fn set_int_prop(&mut self, code: IntPropCode, prop: IntProp) {
        self.current.set_int_prop(code, prop.var, prop.value);
    }

    /// Sets a string property of the current properties. An empty value removes it.
    pub fn set_str_prop_value(&mut self, code: StrPropCode, value: &str) {
        self.current.set_str_prop(code, value);
    }

    /// Replaces the current properties.
    pub fn set_props(&mut self, props: &TextProps) {
        self.current = props.to_builder();
    }

    /// Clears the current properties. Text already appended keeps its formatting.
    pub fn clear_props(&mut self) {
        self.current.clear();
    }

    /// Removes all text and clears the current properties.
    pub fn clear(&mut self) {
        self.text.clear();
        self.runs.clear();
        self.current.clear();
    }

    /// Crystallizes the appended text into an immutable string.
    ///
    /// An empty builder produces an empty string carrying the current properties.
    pub fn build(&self) -> TsString {
        let empty_props = self.current.build();
        let runs = if self.runs.is_empty() {
            vec![Run {
                end: 0,
                props: empty_props,
            }]
        } else {
            run::normalize_runs(self.runs.clone(), &empty_props)
        };
        TsString::from_parts(self.text.clone(), runs)
    }
}

#[cfg(test)]
mod tests {
    use super::IncStrBuilder;
    use crate::TsString;
    use text_props::{IntPropCode, StrPropCode, TextProps, Variation};

    #[test]
    fn appends_merge_equal_props() {
        let mut bldr = IncStrBuilder::new();
        bldr.set_int_prop_values(IntPropCode::WS, Some((Variation::Default, 2)));
        bldr.append("ab");
        bldr.append("");
        bldr.append("cd");
        let s = bldr.build();
        assert_eq!(s, TsString::new("abcd", TextProps::with_ws(2)));
    }

    #[test]
    fn prop_changes_start_new_runs() {
        let mut bldr = IncStrBuilder::new();
        bldr.append("a");
        bldr.set_str_prop_value(StrPropCode::FONT_FAMILY, "Doulos SIL");
        bldr.append("b");
        bldr.clear_props();
        bldr.append("c");
        let s = bldr.build();
        assert_eq!(s.run_count(), 3);
        assert_eq!(s.props_of_run(0).unwrap(), s.props_of_run(2).unwrap());
        assert_eq!(
            s.props_of_run(1).unwrap().str_prop(StrPropCode::FONT_FAMILY),
            Some("Doulos SIL")
        );
    }

    #[test]
    fn append_ts_string_and_continue() {
        let mut bldr = IncStrBuilder::new();
        bldr.set_int_prop_values(IntPropCode::WS, Some((Variation::Default, 1)));
        bldr.append("x");
        bldr.append_ts_string(&TsString::new("yz", TextProps::with_ws(5)));
        bldr.append("!");
        let s = bldr.build();
        assert_eq!(s.text(), "xyz!");
        assert_eq!(s.run_count(), 2);
        assert_eq!(s.bounds_of_run(1).unwrap(), 1..4);
        assert_eq!(s.ws_at(3).unwrap(), Some(5));
    }

    #[test]
    fn empty_builder_builds_empty_string() {
        let mut bldr = IncStrBuilder::new();
        bldr.set_int_prop_values(IntPropCode::WS, Some((Variation::Default, 4)));
        let s = bldr.build();
        assert!(s.is_empty());
        assert_eq!(s.props_of_run(0).unwrap().ws(), Some(4));
    }

    #[test]
    fn resumes_from_string() {
        let mut bldr = TsString::new("ab", TextProps::with_ws(3)).to_inc_builder();
        bldr.append("c");
        assert_eq!(bldr.build(), TsString::new("abc", TextProps::with_ws(3)));
    }
}
