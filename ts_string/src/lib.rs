// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable structured strings.
//!
//! A [`TsString`] is UTF-8 text partitioned into *runs*, each carrying one
//! [`TextProps`](text_props::TextProps). Offsets are byte offsets into the text and must lie on
//! character boundaries. Runs always cover the whole text, adjacent runs never have equal
//! properties, and an empty string has exactly one empty run so that it still carries properties.
//!
//! Strings are edited through [`StrBuilder`] (random-access replacement) or built front to back
//! with [`IncStrBuilder`]. Both produce new strings; a [`TsString`] never changes.
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables `std` support in `text_props`.
//!
//! ## Example
//!
//! ```
//! use text_props::{IntPropCode, PropsBuilder, TextProps, Variation};
//! use ts_string::TsString;
//!
//! let s = TsString::new("hello world", TextProps::with_ws(1));
//! let mut bldr = s.to_builder();
//! let mut bold = PropsBuilder::new();
//! bold.set_int_prop(IntPropCode::WS, Variation::Default, 1)
//!     .set_int_prop(IntPropCode::BOLD, Variation::Enum, 1);
//! bldr.set_props(6..11, &bold.build()).unwrap();
//! let s = bldr.build();
//!
//! assert_eq!(s.run_count(), 2);
//! assert_eq!(s.run_at(8).unwrap(), 1);
//! assert_eq!(s.run_text(1).unwrap(), "world");
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

extern crate alloc;

mod builder;
mod error;
mod format;
mod inc_builder;
mod normalize;
mod run;
mod string;
mod xml;

pub use builder::StrBuilder;
pub use error::{BoundaryInfo, Endpoint, Error, ErrorKind};
pub use inc_builder::IncStrBuilder;
pub use normalize::NormalizationForm;
pub use run::RunInfo;
pub use string::TsString;
pub use xml::{write_escaped_attr, write_escaped_text};
