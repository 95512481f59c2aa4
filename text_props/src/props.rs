// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt;

use smallvec::SmallVec;

use crate::{IntProp, IntPropCode, StrPropCode, Variation};

type IntProps = SmallVec<[(IntPropCode, IntProp); 4]>;
type StrProps = SmallVec<[(StrPropCode, Arc<str>); 2]>;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
struct PropsData {
    // Both sorted by code, at most one entry per code.
    ints: IntProps,
    strs: StrProps,
}

/// An immutable set of text properties.
///
/// Cloning is cheap: the entries are shared. Two property sets compare equal when they hold the
/// same entries, regardless of how they were built.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TextProps {
    data: Arc<PropsData>,
}

impl TextProps {
    /// A property set with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Convenience for a property set holding only a writing system.
    ///
    /// Writing system ids are stored as `i32`; an id above `i32::MAX` cannot be represented and
    /// gives an empty set.
    #[must_use]
    pub fn with_ws(ws: u32) -> Self {
        let Ok(value) = i32::try_from(ws) else {
            return Self::empty();
        };
        let mut bldr = PropsBuilder::new();
        bldr.set_int_prop(IntPropCode::WS, Variation::Default, value);
        bldr.build()
    }

    /// Returns `true` if the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.ints.is_empty() && self.data.strs.is_empty()
    }

    /// Returns the value of an integer property, if present.
    #[must_use]
    pub fn int_prop(&self, code: IntPropCode) -> Option<IntProp> {
        find(&self.data.ints, code).map(|ix| self.data.ints[ix].1)
    }

    /// Returns the value of a string property, if present.
    #[must_use]
    pub fn str_prop(&self, code: StrPropCode) -> Option<&str> {
        find(&self.data.strs, code).map(|ix| &*self.data.strs[ix].1)
    }

    /// The number of integer properties.
    #[must_use]
    pub fn int_prop_count(&self) -> usize {
        self.data.ints.len()
    }

    /// The integer property at `index`, in ascending code order.
    #[must_use]
    pub fn int_prop_at(&self, index: usize) -> Option<(IntPropCode, IntProp)> {
        self.data.ints.get(index).copied()
    }

    /// The number of string properties.
    #[must_use]
    pub fn str_prop_count(&self) -> usize {
        self.data.strs.len()
    }

    /// The string property at `index`, in ascending code order.
    #[must_use]
    pub fn str_prop_at(&self, index: usize) -> Option<(StrPropCode, &str)> {
        self.data
            .strs
            .get(index)
            .map(|(code, value)| (*code, &**value))
    }

    /// Iterates over the integer properties in ascending code order.
    pub fn int_props(&self) -> impl ExactSizeIterator<Item = (IntPropCode, IntProp)> + '_ {
        self.data.ints.iter().copied()
    }

    /// Iterates over the string properties in ascending code order.
    pub fn str_props(&self) -> impl ExactSizeIterator<Item = (StrPropCode, &str)> + '_ {
        self.data.strs.iter().map(|(code, value)| (*code, &**value))
    }

    /// The writing system, if one is set.
    #[must_use]
    pub fn ws(&self) -> Option<u32> {
        self.int_prop(IntPropCode::WS)
            .and_then(|prop| u32::try_from(prop.value).ok())
    }

    /// Returns a builder initialized with these properties.
    #[must_use]
    pub fn to_builder(&self) -> PropsBuilder {
        PropsBuilder {
            data: PropsData::clone(&self.data),
        }
    }

    /// Returns `true` if both values share the same storage.
    ///
    /// This is a fast pre-check; equal sets built separately do not share storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for TextProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (code, prop) in self.int_props() {
            map.entry(&code, &prop);
        }
        for (code, value) in self.str_props() {
            map.entry(&code, &value);
        }
        map.finish()
    }
}

/// A mutable staging area for building a [`TextProps`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PropsBuilder {
    data: PropsData,
}

impl PropsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an integer property, replacing any existing value.
    pub fn set_int_prop(&mut self, code: IntPropCode, var: Variation, value: i32) -> &mut Self {
        let prop = IntProp::new(var, value);
        match find(&self.data.ints, code) {
            Some(ix) => self.data.ints[ix].1 = prop,
            None => {
                let ix = self.data.ints.partition_point(|(c, _)| *c < code);
                self.data.ints.insert(ix, (code, prop));
            }
        }
        self
    }

    /// Removes an integer property.
    pub fn clear_int_prop(&mut self, code: IntPropCode) -> &mut Self {
        if let Some(ix) = find(&self.data.ints, code) {
            self.data.ints.remove(ix);
        }
        self
    }

    /// Sets a string property. An empty value removes the property.
    pub fn set_str_prop(&mut self, code: StrPropCode, value: &str) -> &mut Self {
        if value.is_empty() {
            return self.clear_str_prop(code);
        }
        match find(&self.data.strs, code) {
            Some(ix) => self.data.strs[ix].1 = Arc::from(value),
            None => {
                let ix = self.data.strs.partition_point(|(c, _)| *c < code);
                self.data.strs.insert(ix, (code, Arc::from(value)));
            }
        }
        self
    }

    /// Removes a string property.
    pub fn clear_str_prop(&mut self, code: StrPropCode) -> &mut Self {
        if let Some(ix) = find(&self.data.strs, code) {
            self.data.strs.remove(ix);
        }
        self
    }

    /// Returns the value of an integer property, if set.
    #[must_use]
    pub fn int_prop(&self, code: IntPropCode) -> Option<IntProp> {
        find(&self.data.ints, code).map(|ix| self.data.ints[ix].1)
    }

    /// Returns the value of a string property, if set.
    #[must_use]
    pub fn str_prop(&self, code: StrPropCode) -> Option<&str> {
        find(&self.data.strs, code).map(|ix| &*self.data.strs[ix].1)
    }

    /// The number of integer properties set.
    #[must_use]
    pub fn int_prop_count(&self) -> usize {
        self.data.ints.len()
    }

    /// The number of string properties set.
    #[must_use]
    pub fn str_prop_count(&self) -> usize {
        self.data.strs.len()
    }

    /// Copies every property of `other` into this builder, overriding existing values.
    pub fn merge_from(&mut self, other: &TextProps) -> &mut Self {
        for (code, prop) in other.int_props() {
            self.set_int_prop(code, prop.var, prop.value);
        }
        for (code, value) in other.str_props() {
            self.set_str_prop(code, value);
        }
        self
    }

    /// Removes every property.
    pub fn clear(&mut self) {
        self.data.ints.clear();
        self.data.strs.clear();
    }

    /// Crystallizes the current state into an immutable property set.
    ///
    /// The builder remains usable afterwards.
    #[must_use]
    pub fn build(&self) -> TextProps {
        TextProps {
            data: Arc::new(self.data.clone()),
        }
    }
}

impl fmt::Debug for PropsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropsBuilder").field(&self.build()).finish()
    }
}

fn find<C: Ord + Copy, V>(entries: &[(C, V)], code: C) -> Option<usize> {
    entries.binary_search_by(|(c, _)| c.cmp(&code)).ok()
}

#[cfg(test)]
mod tests {
    use super::{PropsBuilder, TextProps};
    use crate::{IntProp, IntPropCode, StrPropCode, Toggle, Variation};

    fn bold_ws(ws: i32) -> TextProps {
        let mut bldr = PropsBuilder::new();
        bldr.set_int_prop(IntPropCode::BOLD, Variation::Enum, Toggle::On.to_i32())
            .set_int_prop(IntPropCode::WS, Variation::Default, ws);
        bldr.build()
    }

    #[test]
    fn with_ws_never_wraps() {
        let max = i32::MAX as u32;
        assert_eq!(TextProps::with_ws(max).ws(), Some(max));
        for ws in [max + 1, u32::MAX] {
            let props = TextProps::with_ws(ws);
            assert!(props.is_empty());
            assert_eq!(props.ws(), None);
        }
    }

    #[test]
    fn entries_are_sorted_by_code() {
        let props = bold_ws(7);
        assert_eq!(props.int_prop_count(), 2);
        assert_eq!(props.int_prop_at(0).map(|(c, _)| c), Some(IntPropCode::WS));
        assert_eq!(props.int_prop_at(1).map(|(c, _)| c), Some(IntPropCode::BOLD));
        assert_eq!(props.int_prop_at(2), None);
        assert_eq!(props.ws(), Some(7));
    }

    #[test]
    fn equality_ignores_build_order() {
        let mut bldr = PropsBuilder::new();
        bldr.set_int_prop(IntPropCode::WS, Variation::Default, 7)
            .set_int_prop(IntPropCode::BOLD, Variation::Enum, 1);
        let other = bldr.build();
        let props = bold_ws(7);
        assert_eq!(props, other);
        assert!(!props.ptr_eq(&other));
        assert!(props.ptr_eq(&props.clone()));
        assert_ne!(props, bold_ws(8));
    }

    #[test]
    fn builder_replaces_and_clears() {
        let mut bldr = bold_ws(1).to_builder();
        bldr.set_int_prop(IntPropCode::BOLD, Variation::Enum, Toggle::Off.to_i32());
        assert_eq!(
            bldr.int_prop(IntPropCode::BOLD),
            Some(IntProp::new(Variation::Enum, 0))
        );
        bldr.clear_int_prop(IntPropCode::BOLD);
        bldr.set_str_prop(StrPropCode::FONT_FAMILY, "Gentium");
        let props = bldr.build();
        assert_eq!(props.int_prop(IntPropCode::BOLD), None);
        assert_eq!(props.str_prop(StrPropCode::FONT_FAMILY), Some("Gentium"));

        let mut bldr = props.to_builder();
        bldr.set_str_prop(StrPropCode::FONT_FAMILY, "");
        assert_eq!(bldr.str_prop_count(), 0);
        bldr.clear();
        assert!(bldr.build().is_empty());
    }

    #[test]
    fn merge_overrides() {
        let mut bldr = TextProps::with_ws(3).to_builder();
        bldr.merge_from(&bold_ws(4));
        let props = bldr.build();
        assert_eq!(props.ws(), Some(4));
        assert!(props.int_prop(IntPropCode::BOLD).is_some());
    }

    #[test]
    fn negative_ws_is_not_a_ws() {
        let mut bldr = PropsBuilder::new();
        bldr.set_int_prop(IntPropCode::WS, Variation::Default, -1);
        assert_eq!(bldr.build().ws(), None);
    }
}
