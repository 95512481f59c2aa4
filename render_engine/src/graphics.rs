// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use char_engines::{CharacterPropertyEngine, GeneralCategory};
use text_props::{IntPropCode, TextProps, Variation};

/// Vertical metrics of the font selected by a property set, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line.
    pub descent: f32,
}

/// The measuring side of a drawing surface.
pub trait Graphics {
    /// Vertical metrics for text with `props`.
    fn font_metrics(&self, props: &TextProps) -> FontMetrics;

    /// Horizontal advance of `ch` drawn with `props`, in pixels.
    fn advance(&self, ch: char, props: &TextProps) -> f32;

    /// Horizontal and vertical resolution in dots per inch.
    fn dpi(&self) -> (u32, u32);
}

/// A [`Graphics`] where every spacing character has the same advance.
///
/// The advance is `advance_ratio` times the font size; marks, format characters and controls
/// have no advance. The font size comes from [`IntPropCode::FONT_SIZE`] in millipoints and
/// defaults to `default_font_size`.
#[derive(Clone, Debug)]
pub struct FixedPitchGraphics {
    /// Resolution in dots per inch.
    pub dpi: (u32, u32),
    /// Advance of a spacing character as a fraction of the font size.
    pub advance_ratio: f32,
    /// Ascent as a fraction of the font size. The descent is the remainder.
    pub ascent_ratio: f32,
    /// Font size in millipoints used when the properties do not set one.
    pub default_font_size: i32,
    cpe: CharacterPropertyEngine,
}

impl Default for FixedPitchGraphics {
    fn default() -> Self {
        Self {
            dpi: (72, 72),
            advance_ratio: 0.5,
            ascent_ratio: 0.8,
            default_font_size: 10_000,
            cpe: CharacterPropertyEngine::new(),
        }
    }
}

impl FixedPitchGraphics {
    /// Creates a surface at 72 dpi with a 10 point default font, where characters advance half
    /// the font size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this surface with a different resolution.
    pub fn with_dpi(mut self, x: u32, y: u32) -> Self {
        self.dpi = (x, y);
        self
    }

    /// Font size in pixels for `props`.
    pub fn font_size_px(&self, props: &TextProps) -> f32 {
        let millipoints = match props.int_prop(IntPropCode::FONT_SIZE) {
            Some(prop) if prop.var == Variation::MilliPoint && prop.value > 0 => prop.value,
            _ => self.default_font_size,
        };
        millipoints as f32 / 1000.0 * self.dpi.1 as f32 / 72.0
    }
}

impl Graphics for FixedPitchGraphics {
    fn font_metrics(&self, props: &TextProps) -> FontMetrics {
        let size = self.font_size_px(props);
        FontMetrics {
            ascent: size * self.ascent_ratio,
            descent: size * (1.0 - self.ascent_ratio),
        }
    }

    fn advance(&self, ch: char, props: &TextProps) -> f32 {
        let zero_width = self.cpe.is_mark(ch)
            || matches!(
                self.cpe.general_category(ch),
                GeneralCategory::Control | GeneralCategory::Format
            );
        if zero_width {
            0.0
        } else {
            self.font_size_px(props) * self.advance_ratio
        }
    }

    fn dpi(&self) -> (u32, u32) {
        self.dpi
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedPitchGraphics, Graphics};
    use text_props::{IntPropCode, PropsBuilder, TextProps, Variation};

    #[test]
    fn sizes_follow_font_size_and_dpi() {
        let gr = FixedPitchGraphics::new();
        let plain = TextProps::empty();
        assert_eq!(gr.advance('a', &plain), 5.0);
        assert_eq!(gr.advance('\u{301}', &plain), 0.0);
        assert_eq!(gr.advance('\n', &plain), 0.0);
        let metrics = gr.font_metrics(&plain);
        assert!((metrics.ascent + metrics.descent - 10.0).abs() < 1e-4);

        let mut big = PropsBuilder::new();
        big.set_int_prop(IntPropCode::FONT_SIZE, Variation::MilliPoint, 20_000);
        let big = big.build();
        assert_eq!(gr.advance('a', &big), 10.0);

        let hi_res = FixedPitchGraphics::new().with_dpi(144, 144);
        assert_eq!(hi_res.dpi(), (144, 144));
        assert_eq!(hi_res.advance('a', &plain), 10.0);
    }
}
