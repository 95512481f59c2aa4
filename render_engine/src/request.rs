// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use char_engines::BreakWeight;

use crate::Segment;

/// The quality of a line break opportunity, best first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LineBreakWeight {
    /// Between words.
    #[default]
    Word,
    /// After a hyphen inside a word.
    Hyphen,
    /// Between letters (grapheme clusters) of a word.
    Letter,
    /// Anywhere, even inside a grapheme cluster.
    Clip,
}

impl LineBreakWeight {
    /// Maps a character property engine weight for a break after `prev`.
    pub(crate) fn from_break_weight(weight: BreakWeight, prev: Option<char>) -> Self {
        match weight {
            BreakWeight::Hard | BreakWeight::Word
                if matches!(prev, Some('-' | '\u{ad}' | '\u{2010}')) =>
            {
                Self::Hyphen
            }
            BreakWeight::Hard | BreakWeight::Word => Self::Word,
            BreakWeight::Letter => Self::Letter,
            BreakWeight::None => Self::Clip,
        }
    }
}

/// Why a segment ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EndSegmentType {
    /// The segment reaches the end of the requested text.
    NoMore,
    /// The segment ends after a mandatory line break.
    HardBreak,
    /// The segment ends at a break no worse than the preferred weight.
    OkayBreak,
    /// The segment ends at a break worse than preferred, or at a forced break.
    BadBreak,
    /// The segment ends where the writing system or direction changes; the line continues.
    WsBreak,
    /// Nothing fit; no segment was produced.
    NothingFit,
}

impl EndSegmentType {
    /// Returns `true` if a line ends after a segment with this end type.
    pub fn ends_line(self) -> bool {
        !matches!(self, Self::WsBreak | Self::NothingFit)
    }
}

/// How a break request treats whitespace at the end of the segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrailingWhitespace {
    /// Trailing whitespace stays in the segment and may hang past the available width.
    #[default]
    Mixed,
    /// The segment holds only the whitespace at the start of the range.
    OnlyWhite,
    /// Trailing whitespace is left out of the segment.
    NoWhite,
}

/// Whether an offset is a valid insertion point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IpValidity {
    /// The caret may be placed here.
    Valid,
    /// The offset is inside a character or grapheme cluster.
    Invalid,
    /// The offset is outside the segment.
    Unknown,
}

/// Parameters of a single [`find_break_point`](crate::RenderEngine::find_break_point) call.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakRequest {
    /// The text to lay out.
    pub range: Range<usize>,
    /// The segment must end at or before this offset.
    pub backtrack_lim: usize,
    /// When `true`, ending at `range.end` requires a break opportunity there, unless it is the
    /// end of the text. When `false`, the segment may stop at `range.end` regardless.
    pub need_final_break: bool,
    /// The segment starts a line, so at least one grapheme is placed when nothing else fits.
    pub starting_line: bool,
    /// The available width in pixels.
    pub max_width: f32,
    /// The worst break that still counts as a good break.
    pub pref_break: LineBreakWeight,
    /// The worst break that may be used at all.
    pub max_break: LineBreakWeight,
    /// Trailing whitespace handling.
    pub trailing_ws: TrailingWhitespace,
    /// The base direction of the paragraph.
    pub paragraph_rtl: bool,
}

impl BreakRequest {
    /// Creates a request for `range` that starts a line, prefers word breaks and allows a forced
    /// break when nothing else fits.
    pub fn new(range: Range<usize>, max_width: f32) -> Self {
        Self {
            backtrack_lim: range.end,
            range,
            need_final_break: true,
            starting_line: true,
            max_width,
            pref_break: LineBreakWeight::Word,
            max_break: LineBreakWeight::Clip,
            trailing_ws: TrailingWhitespace::Mixed,
            paragraph_rtl: false,
        }
    }
}

/// The result of a break search.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakOutcome {
    /// The new segment, unless nothing fit.
    pub segment: Option<Segment>,
    /// Where the segment ends, or `range.start` when nothing fit.
    pub lim: usize,
    /// The width of the segment.
    pub width: f32,
    /// Why the segment ended.
    pub end_type: EndSegmentType,
}

impl BreakOutcome {
    pub(crate) fn nothing_fit(start: usize) -> Self {
        Self {
            segment: None,
            lim: start,
            width: 0.0,
            end_type: EndSegmentType::NothingFit,
        }
    }
}
