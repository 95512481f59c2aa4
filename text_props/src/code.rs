// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Identifies an integer-valued text property.
///
/// The associated constants cover the vocabulary understood by this workspace. Other codes are
/// carried through unchanged so that data written by newer producers survives a round trip.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntPropCode(pub u16);

/// Identifies a string-valued text property.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrPropCode(pub u16);

macro_rules! prop_codes {
    ($ty:ident { $($(#[$meta:meta])* $name:ident = $value:literal, $xml:literal;)* }) => {
        impl $ty {
            $(
                $(#[$meta])*
                pub const $name: Self = Self($value);
            )*

            /// Returns the short name used for this code in XML, if it is a known code.
            #[must_use]
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($xml),)*
                    _ => None,
                }
            }

            /// Looks up a known code by its XML name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($xml => Some(Self::$name),)*
                    _ => None,
                }
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}({name})", stringify!($ty)),
                    None => write!(f, "{}({})", stringify!($ty), self.0),
                }
            }
        }
    };
}

prop_codes!(IntPropCode {
    /// Writing system of the text.
    WS = 1, "ws";
    /// Italic, as a [`Toggle`](crate::Toggle).
    ITALIC = 2, "italic";
    /// Bold, as a [`Toggle`](crate::Toggle).
    BOLD = 3, "bold";
    /// Superscript or subscript, as a [`Superscript`](crate::Superscript).
    SUPERSCRIPT = 4, "superscript";
    /// Underline style, as an [`Underline`](crate::Underline).
    UNDERLINE = 5, "underline";
    /// Font size in millipoints.
    FONT_SIZE = 6, "fontsize";
    /// Baseline offset in millipoints.
    OFFSET = 7, "offset";
    /// Text color, as a packed [`Color`](crate::Color).
    FORE_COLOR = 8, "forecolor";
    /// Background color.
    BACK_COLOR = 9, "backcolor";
    /// Underline color.
    UNDERLINE_COLOR = 10, "undercolor";
    /// Writing system used for paragraph-level defaults.
    BASE_WS = 16, "wsBase";
    /// Paragraph alignment, as an [`Alignment`](crate::Alignment).
    ALIGN = 17, "align";
    /// First line indent in millipoints.
    FIRST_INDENT = 18, "firstIndent";
    /// Leading indent in millipoints.
    LEADING_INDENT = 19, "leadingIndent";
    /// Trailing indent in millipoints.
    TRAILING_INDENT = 20, "trailingIndent";
    /// Space before the paragraph in millipoints.
    SPACE_BEFORE = 21, "spaceBefore";
    /// Space after the paragraph in millipoints.
    SPACE_AFTER = 22, "spaceAfter";
    /// Line height in millipoints, or relative.
    LINE_HEIGHT = 24, "lineHeight";
    /// Whether spelling should be checked.
    SPELL_CHECK = 26, "spellcheck";
    /// Keep the paragraph on the same page as the next one.
    KEEP_WITH_NEXT = 27, "keepWithNext";
    /// Keep the lines of the paragraph together.
    KEEP_TOGETHER = 28, "keepTogether";
    /// Whether the text may be edited.
    EDITABLE = 29, "editable";
    /// Paragraph direction, as a [`Toggle`](crate::Toggle).
    RIGHT_TO_LEFT = 30, "rightToLeft";
    /// Top border width in millipoints.
    BORDER_TOP = 31, "borderTop";
    /// Bottom border width in millipoints.
    BORDER_BOTTOM = 32, "borderBottom";
    /// Leading border width in millipoints.
    BORDER_LEADING = 33, "borderLeading";
    /// Trailing border width in millipoints.
    BORDER_TRAILING = 34, "borderTrailing";
    /// Border color.
    BORDER_COLOR = 35, "borderColor";
});

prop_codes!(StrPropCode {
    /// Font family name.
    FONT_FAMILY = 1, "fontFamily";
    /// Character style name.
    CHAR_STYLE = 2, "charStyle";
    /// Paragraph style name.
    PARA_STYLE = 3, "paraStyle";
    /// Named style applied to the run.
    NAMED_STYLE = 4, "namedStyle";
    /// Space separated list of tag identifiers.
    TAGS = 5, "tags";
    /// Embedded object data.
    OBJ_DATA = 6, "objData";
    /// Font variation settings, e.g. `wght=700`.
    FONT_VARIATIONS = 7, "fontVariations";
    /// Per writing system style overrides.
    WS_STYLE = 8, "wsStyle";
    /// Font used for bullets and numbering.
    BULLET_NUMBER_FONT = 9, "bulNumFontInfo";
});

#[cfg(test)]
mod tests {
    use super::{IntPropCode, StrPropCode};
    use alloc::format;

    #[test]
    fn names_round_trip() {
        assert_eq!(IntPropCode::BOLD.name(), Some("bold"));
        assert_eq!(IntPropCode::from_name("bold"), Some(IntPropCode::BOLD));
        assert_eq!(StrPropCode::from_name("fontFamily"), Some(StrPropCode::FONT_FAMILY));
        assert_eq!(IntPropCode::from_name("nope"), None);
    }

    #[test]
    fn unknown_codes_debug_numerically() {
        assert_eq!(format!("{:?}", IntPropCode(999)), "IntPropCode(999)");
        assert_eq!(format!("{:?}", IntPropCode::WS), "IntPropCode(ws)");
    }
}
