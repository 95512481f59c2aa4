// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unicode character property and collating engines.
//!
//! A [`CharacterPropertyEngine`] answers per-character questions (general category, bidi class,
//! case, decomposition, line break class) and computes line break opportunities over a buffer.
//! A [`CollatingEngine`] turns text into binary [`SortKey`]s whose bytewise order is the
//! collation order, optionally ignoring case or diacritics.
//!
//! Both engines are backed by ICU's compiled data and hold only the small amount of
//! per-writing-system state needed on top of it.
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables `std` support in `ts_string`.
//!
//! ## Example
//!
//! ```
//! use char_engines::{BreakWeight, CharacterPropertyEngine};
//!
//! let cpe = CharacterPropertyEngine::new();
//! assert!(cpe.is_letter('ß'));
//! assert_eq!(cpe.decomposition('ñ'), "n\u{303}");
//!
//! let weights = cpe.line_break_info("to be", 0..5).unwrap();
//! assert_eq!(weights[3], BreakWeight::Word);
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

mod collation;
mod error;
mod props;

pub use collation::{CollatingEngine, CollationOptions, SortKey, compare_sort_keys};
pub use error::{Error, ErrorKind};
pub use props::{BreakWeight, CharacterPropertyEngine};

/// Unicode property value types returned by [`CharacterPropertyEngine`].
pub use icu_properties::props::{BidiClass, GeneralCategory, LineBreak, Script};
