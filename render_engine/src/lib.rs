// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking and measured text segments.
//!
//! A [`RenderEngine`] lays out text from a [`TextSource`] on a [`Graphics`] surface, one
//! [`Segment`] at a time. Each call to [`RenderEngine::find_break_point`] consumes as much text
//! as fits in the available width, stopping at writing system and direction changes, at hard
//! breaks, or at the best line break opportunity before the overflow. The [`BreakOutcome`] tells
//! the caller why the segment ended.
//!
//! A [`Segment`] answers the geometry questions of an editor: where an insertion point is drawn,
//! which character a click hits, and where the arrow keys move.
//!
//! [`ParagraphBreaker`] drives the engines to lay out a whole paragraph into [`Line`]s. Engines
//! are chosen per writing system through a [`RendererProvider`]; a [`RendererRegistry`] builds
//! them by [`RendererKind`].
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables `std` support in `ts_string` and `text_props`.
//!
//! ## Example
//!
//! ```
//! use render_engine::{
//!     BreakRequest, EndSegmentType, FixedPitchGraphics, RenderEngine, RomRenderEngine,
//! };
//! use text_props::TextProps;
//! use ts_string::TsString;
//!
//! let text = TsString::new("hello world", TextProps::with_ws(1));
//! let engine = RomRenderEngine::new();
//! let gr = FixedPitchGraphics::new();
//! let out = engine
//!     .find_break_point(&gr, &text, None, &BreakRequest::new(0..text.len(), 40.0))
//!     .unwrap();
//! assert_eq!(out.end_type, EndSegmentType::OkayBreak);
//! assert_eq!(out.lim, 6);
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

mod engine;
mod error;
mod graphics;
mod justify;
mod paragraph;
mod registry;
mod request;
mod segment;
mod source;

pub use engine::{RenderEngine, RomRenderEngine};
pub use error::{Error, ErrorKind};
pub use graphics::{FixedPitchGraphics, FontMetrics, Graphics};
pub use justify::{Justifier, SpaceJustifier};
pub use paragraph::{Line, ParagraphBreaker, ParagraphOptions};
pub use registry::{
    EngineConstructor, EngineSettings, RendererKind, RendererProvider, RendererRegistry,
};
pub use request::{
    BreakOutcome, BreakRequest, EndSegmentType, IpValidity, LineBreakWeight, TrailingWhitespace,
};
pub use segment::{Rect, Segment};
pub use source::TextSource;
