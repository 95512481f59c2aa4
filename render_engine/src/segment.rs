// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::source::runs_in;
use crate::{
    EndSegmentType, Error, Graphics, IpValidity, Justifier, LineBreakWeight, TextSource,
};

/// An axis-aligned rectangle in segment coordinates, with `y` growing downwards from the top of
/// the segment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl Rect {
    /// The width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// The height of the rectangle.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Glyph {
    pub(crate) offset: usize,
    pub(crate) ch: char,
    pub(crate) advance: f32,
    pub(crate) stretch: f32,
    pub(crate) break_before: LineBreakWeight,
}

/// A measured run of text produced by a render engine, with one direction and one writing
/// system.
///
/// Positions are in pixels from the left edge of the segment. Offsets are byte offsets into the
/// text source the segment was made from.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    range: Range<usize>,
    glyphs: Vec<Glyph>,
    ascent: f32,
    descent: f32,
    end_type: EndSegmentType,
    direction_depth: u8,
}

impl Segment {
    pub(crate) fn new(
        range: Range<usize>,
        glyphs: Vec<Glyph>,
        end_type: EndSegmentType,
        direction_depth: u8,
    ) -> Self {
        Self {
            range,
            glyphs,
            ascent: 0.0,
            descent: 0.0,
            end_type,
            direction_depth,
        }
    }

    /// The text range covered by the segment.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The end of the text range covered by the segment.
    pub fn lim(&self) -> usize {
        self.range.end
    }

    /// Total advance, including stretch and trailing whitespace.
    pub fn width(&self) -> f32 {
        self.glyphs.iter().map(|g| g.advance + g.stretch).sum()
    }

    /// Advance without trailing whitespace.
    pub fn visible_width(&self) -> f32 {
        let visible = self
            .glyphs
            .iter()
            .rposition(|g| !g.ch.is_whitespace())
            .map_or(0, |i| i + 1);
        self.glyphs[..visible]
            .iter()
            .map(|g| g.advance + g.stretch)
            .sum()
    }

    /// Height of the line box.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Distance from the baseline to the top.
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Distance from the baseline to the bottom.
    pub fn descent(&self) -> f32 {
        self.descent
    }

    /// How far ink extends left of the segment. Simple glyphs never overhang.
    pub fn left_overhang(&self) -> f32 {
        0.0
    }

    /// How far ink extends right of the segment.
    pub fn right_overhang(&self) -> f32 {
        0.0
    }

    /// Why the segment ended.
    pub fn end_type(&self) -> EndSegmentType {
        self.end_type
    }

    /// Returns `true` if the segment runs right to left.
    pub fn is_rtl(&self) -> bool {
        self.direction_depth % 2 == 1
    }

    /// The bidi embedding level of the segment.
    pub fn direction_depth(&self) -> u8 {
        self.direction_depth
    }

    /// Changes the embedding level, for example when the paragraph direction changes. An odd
    /// depth makes the segment right to left.
    pub fn set_direction_depth(&mut self, depth: u8) {
        self.direction_depth = depth;
    }

    /// Byte offsets of the characters in the segment, in logical order.
    pub fn char_offsets(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.glyphs.iter().map(|g| g.offset)
    }

    /// The text of the segment.
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// The index of the glyph starting at `ich`, or the glyph count for the segment end.
    fn glyph_index(&self, ich: usize) -> Result<usize, Error> {
        if ich == self.range.end {
            return Ok(self.glyphs.len());
        }
        self.glyphs
            .binary_search_by_key(&ich, |g| g.offset)
            .map_err(|_| Error::invalid_offset(ich, self.range()))
    }

    fn offset_of(&self, index: usize) -> usize {
        self.glyphs.get(index).map_or(self.range.end, |g| g.offset)
    }

    fn logical_x(&self, index: usize) -> f32 {
        self.glyphs[..index]
            .iter()
            .map(|g| g.advance + g.stretch)
            .sum()
    }

    fn visual_x(&self, logical: f32) -> f32 {
        if self.is_rtl() {
            self.width() - logical
        } else {
            logical
        }
    }

    /// Glyph indices where a cluster starts, plus the glyph count.
    fn cluster_starts(&self) -> Vec<usize> {
        let mut starts: Vec<usize> = self
            .glyphs
            .iter()
            .enumerate()
            .filter(|&(i, g)| i == 0 || g.break_before < LineBreakWeight::Clip)
            .map(|(i, _)| i)
            .collect();
        starts.push(self.glyphs.len());
        starts
    }

    /// The horizontal position of an insertion point before the character at `ich`.
    pub fn position_of_ip(&self, ich: usize) -> Result<f32, Error> {
        let index = self.glyph_index(ich)?;
        Ok(self.visual_x(self.logical_x(index)))
    }

    /// The rectangle covering the part of `range` inside this segment, or `None` if they do not
    /// overlap.
    pub fn position_of_range(&self, range: Range<usize>) -> Option<Rect> {
        let start = range.start.max(self.range.start);
        let end = range.end.min(self.range.end);
        if range.start >= range.end || start >= end {
            return None;
        }
        let a = self.position_of_ip(start).ok()?;
        let b = self.position_of_ip(end).ok()?;
        Some(Rect {
            x0: a.min(b),
            y0: 0.0,
            x1: a.max(b),
            y1: self.height(),
        })
    }

    /// The insertion point closest to `x`, and whether it is associated with the character before
    /// it.
    pub fn point_to_char(&self, x: f32) -> (usize, bool) {
        let width = self.width();
        let logical = if self.is_rtl() { width - x } else { x };
        if logical <= 0.0 || self.glyphs.is_empty() {
            return (self.range.start, false);
        }
        if logical >= width {
            return (self.range.end, true);
        }
        let starts = self.cluster_starts();
        for pair in starts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let xa = self.logical_x(a);
            let xb = self.logical_x(b);
            if logical < xb {
                return if logical < (xa + xb) / 2.0 {
                    (self.offset_of(a), false)
                } else {
                    (self.offset_of(b), true)
                };
            }
        }
        (self.range.end, true)
    }

    /// Returns `true` if the caret may be placed at `ich`.
    pub fn is_valid_insertion_point(&self, ich: usize) -> IpValidity {
        if !self.range.contains(&ich) && ich != self.range.end {
            return IpValidity::Unknown;
        }
        match self.glyph_index(ich) {
            Ok(index) if index == 0 || index == self.glyphs.len() => IpValidity::Valid,
            Ok(index) if self.glyphs[index].break_before < LineBreakWeight::Clip => {
                IpValidity::Valid
            }
            _ => IpValidity::Invalid,
        }
    }

    /// How good a line break before the character at `ich` would be.
    pub fn can_break_before(&self, ich: usize) -> Result<LineBreakWeight, Error> {
        let index = self.glyph_index(ich)?;
        self.glyphs
            .get(index)
            .map(|g| g.break_before)
            .ok_or_else(|| Error::invalid_offset(ich, self.range()))
    }

    /// The insertion point one cluster away from `ich` in the visual direction given by
    /// `forward` (towards the right).
    ///
    /// Returns `None` when the move leaves the segment. An insertion point at the start of the
    /// segment associated with the previous character, or at the end associated with the next
    /// one, belongs to the neighboring segment, so it also yields `None`.
    pub fn arrow_key_position(
        &self,
        ich: usize,
        assoc_prev: bool,
        forward: bool,
    ) -> Result<Option<(usize, bool)>, Error> {
        let index = self.cluster_boundary(ich)?;
        let at_start = index == 0;
        let at_end = index == self.glyphs.len();
        let owned_by_prev = at_start && assoc_prev && !self.glyphs.is_empty();
        let owned_by_next = at_end && !assoc_prev && !at_start;
        if owned_by_prev || owned_by_next {
            return Ok(None);
        }
        Ok(self
            .step(index, forward != self.is_rtl())
            .map(|(next, logical_forward)| (self.offset_of(next), logical_forward)))
    }

    /// The other end of a selection extended by one cluster from `ich` in the visual direction
    /// given by `forward`, or `None` if it leaves the segment.
    pub fn extend_selection_position(
        &self,
        ich: usize,
        forward: bool,
    ) -> Result<Option<usize>, Error> {
        let index = self.cluster_boundary(ich)?;
        Ok(self
            .step(index, forward != self.is_rtl())
            .map(|(next, _)| self.offset_of(next)))
    }

    fn cluster_boundary(&self, ich: usize) -> Result<usize, Error> {
        match self.is_valid_insertion_point(ich) {
            IpValidity::Valid => self.glyph_index(ich),
            _ => Err(Error::invalid_offset(ich, self.range())),
        }
    }

    /// Moves one cluster from glyph `index` in logical order.
    fn step(&self, index: usize, logical_forward: bool) -> Option<(usize, bool)> {
        let starts = self.cluster_starts();
        if logical_forward {
            starts
                .iter()
                .find(|&&s| s > index)
                .map(|&next| (next, true))
        } else {
            starts
                .iter()
                .rev()
                .find(|&&s| s < index)
                .map(|&prev| (prev, false))
        }
    }

    /// Spreads `extra` pixels over the segment with `justifier`, replacing any earlier stretch.
    pub fn set_stretch(&mut self, extra: f32, justifier: &dyn Justifier) {
        let stretch = justifier.stretch(&self.text(), extra);
        for (i, glyph) in self.glyphs.iter_mut().enumerate() {
            glyph.stretch = stretch.get(i).copied().unwrap_or(0.0);
        }
    }

    /// Measures the segment again, for example after the resolution of `gr` changed.
    pub fn recompute(&mut self, gr: &dyn Graphics, source: &dyn TextSource) -> Result<(), Error> {
        let runs = runs_in(source, self.range())?;
        let mut glyphs = self.glyphs.iter_mut().peekable();
        for (range, props) in &runs {
            while let Some(glyph) = glyphs.next_if(|g| g.offset < range.end) {
                glyph.advance = gr.advance(glyph.ch, props);
            }
        }
        self.measure_metrics(gr, &runs);
        Ok(())
    }

    pub(crate) fn measure_metrics(
        &mut self,
        gr: &dyn Graphics,
        runs: &[(Range<usize>, text_props::TextProps)],
    ) {
        self.ascent = 0.0;
        self.descent = 0.0;
        for (_, props) in runs {
            let metrics = gr.font_metrics(props);
            self.ascent = self.ascent.max(metrics.ascent);
            self.descent = self.descent.max(metrics.descent);
        }
    }
}
