// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable text property sets.
//!
//! Every run of a structured string carries one [`TextProps`]: a small map from a fixed
//! vocabulary of property codes to either an integer value with a [`Variation`] or a string value.
//! Property sets are immutable and cheap to clone; [`PropsBuilder`] produces modified copies.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
//!
//! ## Example
//!
//! ```
//! use text_props::{IntPropCode, PropsBuilder, StrPropCode, Toggle, Variation};
//!
//! let mut bldr = PropsBuilder::new();
//! bldr.set_int_prop(IntPropCode::WS, Variation::Default, 1);
//! bldr.set_int_prop(IntPropCode::BOLD, Variation::Enum, Toggle::On.to_i32());
//! bldr.set_str_prop(StrPropCode::FONT_FAMILY, "Charis SIL");
//! let props = bldr.build();
//!
//! assert_eq!(props.ws(), Some(1));
//! assert_eq!(props.str_prop(StrPropCode::FONT_FAMILY), Some("Charis SIL"));
//! assert_eq!(props.int_prop_count(), 2);
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod code;
mod props;
mod values;

pub use code::{IntPropCode, StrPropCode};
pub use props::{PropsBuilder, TextProps};
pub use values::{
    Alignment, Color, IntProp, ParseEnumError, Superscript, Toggle, Underline, Variation,
};
