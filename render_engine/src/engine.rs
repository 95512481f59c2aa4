// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy break search.

use alloc::vec::Vec;
use core::fmt;

use char_engines::CharacterPropertyEngine;
use text_props::{IntPropCode, Toggle};
use unicode_bidi::{BidiInfo, Level};

use crate::segment::Glyph;
use crate::source::runs_in;
use crate::{
    BreakOutcome, BreakRequest, EndSegmentType, EngineSettings, Error, Graphics, Justifier,
    LineBreakWeight, RendererKind, Segment, TextSource, TrailingWhitespace,
};

/// A service that finds line breaks and produces measured segments.
pub trait RenderEngine: fmt::Debug + Send + Sync {
    /// Which kind of engine this is.
    fn kind(&self) -> RendererKind;

    /// Lays out as much of `req.range` as fits in `req.max_width`.
    ///
    /// Domain outcomes such as "nothing fit" are reported through
    /// [`BreakOutcome::end_type`]; errors are reserved for invalid requests and failing sources.
    fn find_break_point(
        &self,
        gr: &dyn Graphics,
        source: &dyn TextSource,
        justifier: Option<&dyn Justifier>,
        req: &BreakRequest,
    ) -> Result<BreakOutcome, Error>;
}

/// The engine for scripts that need no shaping: one glyph per character, advancing in a single
/// direction.
#[derive(Clone, Debug, Default)]
pub struct RomRenderEngine {
    cpe: CharacterPropertyEngine,
    right_to_left: bool,
}

impl RomRenderEngine {
    /// Creates an engine for left-to-right writing systems.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine configured for one writing system.
    pub fn with_settings(settings: &EngineSettings) -> Self {
        Self {
            cpe: CharacterPropertyEngine::new(),
            right_to_left: settings.right_to_left,
        }
    }

    /// Returns `true` if the writing system runs right to left.
    pub fn is_rtl(&self) -> bool {
        self.right_to_left
    }

    /// Finds where the text starting at `start` stops having one writing system and one bidi
    /// level, and what that level is.
    fn uniform_stretch(
        &self,
        source: &dyn TextSource,
        text: &str,
        start: usize,
        lim: usize,
        paragraph_rtl: bool,
    ) -> Result<(usize, u8), Error> {
        let ws = source.ws_at(start)?;
        let mut end = start;
        let mut rtl_prop = false;
        while end < lim {
            let (run, props) = source.props_at(end)?;
            if props.ws() != ws {
                break;
            }
            if end == start {
                rtl_prop = props
                    .int_prop(IntPropCode::RIGHT_TO_LEFT)
                    .is_some_and(|prop| prop.value == Toggle::On.to_i32());
            }
            end = run.end.min(lim);
        }

        let para = if paragraph_rtl {
            Level::rtl()
        } else {
            Level::ltr()
        };
        let (same, mut depth) = if start == end {
            (0, para.number())
        } else {
            let info = BidiInfo::new(&text[start..end], Some(para));
            let first = info.levels[0];
            let same = info
                .levels
                .iter()
                .position(|&level| level != first)
                .unwrap_or(end - start);
            (same, first.number())
        };
        // Text left at the base level still reads right to left; embedded levels stay as
        // resolved so that digits keep level 2.
        if (self.right_to_left || rtl_prop) && depth == 0 {
            depth = 1;
        }
        Ok((start + same, depth))
    }
}

impl RenderEngine for RomRenderEngine {
    fn kind(&self) -> RendererKind {
        RendererKind::Rom
    }

    fn find_break_point(
        &self,
        gr: &dyn Graphics,
        source: &dyn TextSource,
        justifier: Option<&dyn Justifier>,
        req: &BreakRequest,
    ) -> Result<BreakOutcome, Error> {
        let len = source.len();
        let text = source.text(0..len)?;
        check_request(text, req)?;
        let start = req.range.start;
        let lim = req.backtrack_lim.clamp(start, req.range.end);
        if start == lim && lim < req.range.end {
            return Ok(BreakOutcome::nothing_fit(start));
        }
        let (seg_lim, depth) = self.uniform_stretch(source, text, start, lim, req.paragraph_rtl)?;

        // Characters of the stretch, plus the one after it so that the break weight at
        // `seg_lim` is known.
        let info_end = text[seg_lim..]
            .chars()
            .next()
            .map_or(seg_lim, |ch| seg_lim + ch.len_utf8());
        let chars: Vec<(usize, char)> = text[start..info_end]
            .char_indices()
            .map(|(i, ch)| (start + i, ch))
            .collect();
        let mut prev = text[..start].chars().next_back();
        let break_before: Vec<LineBreakWeight> = self
            .cpe
            .line_break_info(text, start..info_end)?
            .into_iter()
            .zip(&chars)
            .map(|(weight, &(_, ch))| {
                let weight = LineBreakWeight::from_break_weight(weight, prev);
                prev = Some(ch);
                weight
            })
            .collect();
        let n = if seg_lim < info_end {
            chars.len() - 1
        } else {
            chars.len()
        };
        let weight_at_lim = break_before.get(n).copied().unwrap_or(LineBreakWeight::Word);

        let is_hard_break = |i: usize| {
            let ch = chars[i].1;
            self.cpe.is_mandatory_break(ch)
                && !(ch == '\r' && chars.get(i + 1).is_some_and(|&(_, next)| next == '\n'))
        };
        let scan_n = match req.trailing_ws {
            TrailingWhitespace::OnlyWhite => {
                let white = (0..n)
                    .take_while(|&i| chars[i].1.is_whitespace() && !is_hard_break(i))
                    .count();
                if white == 0 {
                    return Ok(BreakOutcome::nothing_fit(start));
                }
                white
            }
            _ => n,
        };

        let runs = runs_in(source, start..seg_lim)?;
        let mut run_idx = 0;
        let mut glyphs = Vec::with_capacity(scan_n);
        let mut x = 0.0_f32;
        // Break opportunities seen so far, as glyph counts.
        let mut pref = None;
        let mut max = None;
        let mut cluster = None;
        let mut forcing = false;
        let mut end = None;
        for (i, &(offset, ch)) in chars[..scan_n].iter().enumerate() {
            let weight = break_before[i];
            if i > 0 {
                if forcing && weight < LineBreakWeight::Clip {
                    end = Some((i, EndSegmentType::BadBreak));
                    break;
                }
                if weight <= req.pref_break {
                    pref = Some(i);
                }
                if weight <= req.max_break {
                    max = Some(i);
                }
                if weight < LineBreakWeight::Clip {
                    cluster = Some(i);
                }
            }
            while run_idx + 1 < runs.len() && runs[run_idx].0.end <= offset {
                run_idx += 1;
            }
            let advance = gr.advance(ch, &runs[run_idx].1);

            // Whitespace hangs past the available width.
            if !forcing && !ch.is_whitespace() && x + advance > req.max_width {
                if let Some(i) = pref {
                    end = Some((i, EndSegmentType::OkayBreak));
                    break;
                }
                if let Some(i) = max {
                    end = Some((i, EndSegmentType::BadBreak));
                    break;
                }
                if !req.starting_line || req.max_break < LineBreakWeight::Clip {
                    return Ok(BreakOutcome::nothing_fit(start));
                }
                match cluster {
                    Some(i) => {
                        end = Some((i, EndSegmentType::BadBreak));
                        break;
                    }
                    // Keep the first grapheme even though it overflows.
                    None => forcing = true,
                }
            }

            glyphs.push(Glyph {
                offset,
                ch,
                advance,
                stretch: 0.0,
                break_before: weight,
            });
            x += advance;
            if is_hard_break(i) {
                end = Some((i + 1, EndSegmentType::HardBreak));
                break;
            }
        }

        let (count, end_type) = match end {
            Some(end) => end,
            None if seg_lim == len && scan_n == n => (scan_n, EndSegmentType::NoMore),
            None if forcing => (scan_n, EndSegmentType::BadBreak),
            None if scan_n < n => (scan_n, EndSegmentType::OkayBreak),
            None if seg_lim < lim => (scan_n, EndSegmentType::WsBreak),
            None if lim == req.range.end && !req.need_final_break => {
                (scan_n, EndSegmentType::NoMore)
            }
            None if weight_at_lim <= req.pref_break => (scan_n, EndSegmentType::OkayBreak),
            None if weight_at_lim <= req.max_break => (scan_n, EndSegmentType::BadBreak),
            // The end of the range is no place to break; back up.
            None => match (pref, max, cluster) {
                (Some(i), _, _) => (i, EndSegmentType::OkayBreak),
                (None, Some(i), _) => (i, EndSegmentType::BadBreak),
                (None, None, cluster)
                    if req.starting_line && req.max_break >= LineBreakWeight::Clip =>
                {
                    (cluster.unwrap_or(scan_n), EndSegmentType::BadBreak)
                }
                _ => return Ok(BreakOutcome::nothing_fit(start)),
            },
        };
        glyphs.truncate(count);

        if req.trailing_ws == TrailingWhitespace::NoWhite {
            while glyphs
                .last()
                .is_some_and(|g| g.ch.is_whitespace() && !self.cpe.is_mandatory_break(g.ch))
            {
                glyphs.pop();
            }
            if glyphs.is_empty() && start < seg_lim {
                return Ok(BreakOutcome::nothing_fit(start));
            }
        }

        let seg_end = chars
            .get(glyphs.len())
            .filter(|_| glyphs.len() < n)
            .map_or(seg_lim, |&(offset, _)| offset);
        let mut segment = Segment::new(start..seg_end, glyphs, end_type, depth);
        segment.measure_metrics(gr, &runs_in(source, start..seg_end)?);
        if let Some(justifier) = justifier {
            if matches!(
                end_type,
                EndSegmentType::OkayBreak | EndSegmentType::BadBreak
            ) {
                let extra = req.max_width - segment.visible_width();
                if extra > 0.0 {
                    segment.set_stretch(extra, justifier);
                }
            }
        }
        Ok(BreakOutcome {
            lim: seg_end,
            width: segment.width(),
            end_type,
            segment: Some(segment),
        })
    }
}

fn check_request(text: &str, req: &BreakRequest) -> Result<(), Error> {
    let range = &req.range;
    let valid = range.start <= range.end
        && range.end <= text.len()
        && text.is_char_boundary(range.start)
        && text.is_char_boundary(range.end)
        && (req.backtrack_lim >= text.len() || text.is_char_boundary(req.backtrack_lim));
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_range(range.clone(), text.len()))
    }
}
