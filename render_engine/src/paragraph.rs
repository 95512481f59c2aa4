// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Laying out a whole paragraph.

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;

use crate::{
    BreakOutcome, BreakRequest, EndSegmentType, Error, Graphics, Justifier, LineBreakWeight,
    RendererProvider, Segment, TextSource,
};

/// Options that apply to every line of a paragraph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParagraphOptions {
    /// The available width of each line in pixels.
    pub max_width: f32,
    /// The worst break that still counts as a good break.
    pub pref_break: LineBreakWeight,
    /// The worst break used before falling back to a forced break.
    pub max_break: LineBreakWeight,
    /// The base direction of the paragraph.
    pub paragraph_rtl: bool,
}

impl ParagraphOptions {
    /// Left-to-right lines of `max_width` that prefer word breaks.
    pub fn new(max_width: f32) -> Self {
        Self {
            max_width,
            pref_break: LineBreakWeight::Word,
            max_break: LineBreakWeight::Clip,
            paragraph_rtl: false,
        }
    }
}

/// One line of a paragraph: segments in logical order.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// The text covered by the line.
    pub range: Range<usize>,
    /// The segments of the line.
    pub segments: SmallVec<[Segment; 2]>,
    /// Total width of the segments.
    pub width: f32,
    /// Largest ascent of the segments.
    pub ascent: f32,
    /// Largest descent of the segments.
    pub descent: f32,
}

impl Line {
    fn new(segments: SmallVec<[Segment; 2]>) -> Self {
        let start = segments.first().map_or(0, |s| s.range().start);
        let end = segments.last().map_or(start, Segment::lim);
        let mut line = Self {
            range: start..end,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            segments,
        };
        for seg in &line.segments {
            line.width += seg.width();
            line.ascent = line.ascent.max(seg.ascent());
            line.descent = line.descent.max(seg.descent());
        }
        line
    }

    /// Height of the line box.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Why the line ended.
    pub fn end_type(&self) -> EndSegmentType {
        self.segments
            .last()
            .map_or(EndSegmentType::NoMore, Segment::end_type)
    }
}

/// Breaks a paragraph into lines, one [`find_break_point`](crate::RenderEngine::find_break_point)
/// call per segment.
///
/// Each segment is laid out by the engine the provider returns for its writing system. When the
/// next segment of a line does not fit at all, the previous segment is broken again at an earlier
/// opportunity.
pub struct ParagraphBreaker<'a> {
    provider: &'a mut dyn RendererProvider,
    gr: &'a dyn Graphics,
    source: &'a dyn TextSource,
    justifier: Option<&'a dyn Justifier>,
    options: ParagraphOptions,
    pos: usize,
    done: bool,
}

impl core::fmt::Debug for ParagraphBreaker<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParagraphBreaker")
            .field("options", &self.options)
            .field("pos", &self.pos)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'a> ParagraphBreaker<'a> {
    /// Creates a breaker for all of `source`.
    pub fn new(
        provider: &'a mut dyn RendererProvider,
        gr: &'a dyn Graphics,
        source: &'a dyn TextSource,
        justifier: Option<&'a dyn Justifier>,
        options: ParagraphOptions,
    ) -> Self {
        Self {
            provider,
            gr,
            source,
            justifier,
            options,
            pos: 0,
            done: false,
        }
    }

    /// The offset where the next line starts.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Lays out the next line, or returns `None` after the last one.
    ///
    /// An empty paragraph has one empty line. A paragraph that ends in a hard break has no empty
    /// line after it.
    pub fn break_next(&mut self) -> Result<Option<Line>, Error> {
        let len = self.source.len();
        if self.done || (self.pos >= len && len > 0) {
            self.done = true;
            return Ok(None);
        }

        let mut segments: SmallVec<[Segment; 2]> = SmallVec::new();
        let mut used = 0.0;
        loop {
            let start = segments.last().map_or(self.pos, Segment::lim);
            let out = self.find(start, None, used, segments.is_empty())?;
            let Some(seg) = out.segment else {
                match segments.pop() {
                    // Break the previous segment earlier instead.
                    Some(prev) => {
                        used -= prev.width();
                        let range = prev.range();
                        let retry =
                            self.find(range.start, Some(range.end), used, segments.is_empty())?;
                        segments.push(retry.segment.unwrap_or(prev));
                    }
                    None => {
                        let mut options = self.options;
                        options.max_break = LineBreakWeight::Clip;
                        let out = self.find_with(start, None, used, true, &options)?;
                        if let Some(seg) = out.segment {
                            segments.push(seg);
                        }
                    }
                }
                break;
            };
            used += seg.width();
            let ends_line = seg.end_type().ends_line();
            segments.push(seg);
            if ends_line || used >= self.options.max_width {
                break;
            }
        }

        if segments.is_empty() {
            self.done = true;
            return Ok(None);
        }
        let line = Line::new(segments);
        log::trace!("line {:?} width {}", line.range, line.width);
        self.pos = line.range.end;
        if self.pos >= len {
            self.done = true;
        }
        Ok(Some(line))
    }

    /// Lays out every remaining line.
    pub fn break_all(&mut self) -> Result<Vec<Line>, Error> {
        let mut lines = Vec::new();
        while let Some(line) = self.break_next()? {
            lines.push(line);
        }
        Ok(lines)
    }

    fn find(
        &mut self,
        start: usize,
        backtrack_lim: Option<usize>,
        used: f32,
        starting_line: bool,
    ) -> Result<BreakOutcome, Error> {
        let options = self.options;
        self.find_with(start, backtrack_lim, used, starting_line, &options)
    }

    fn find_with(
        &mut self,
        start: usize,
        backtrack_lim: Option<usize>,
        used: f32,
        starting_line: bool,
        options: &ParagraphOptions,
    ) -> Result<BreakOutcome, Error> {
        let len = self.source.len();
        let ws = self.source.ws_at(start)?;
        let engine = self.provider.renderer_for(ws);
        let mut req = BreakRequest::new(start..len, options.max_width - used);
        if let Some(lim) = backtrack_lim {
            req.backtrack_lim = lim;
        }
        req.starting_line = starting_line;
        req.pref_break = options.pref_break;
        req.max_break = options.max_break;
        req.paragraph_rtl = options.paragraph_rtl;
        engine.find_break_point(self.gr, self.source, self.justifier, &req)
    }
}
