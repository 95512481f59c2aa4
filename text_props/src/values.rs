// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// How an integer property value is to be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variation {
    /// The value has no unit; its meaning depends on the property.
    #[default]
    Default,
    /// The value is a length in thousandths of a point.
    MilliPoint,
    /// The value is relative to the inherited value, in units of 1/10000.
    Relative,
    /// The value is one of the property's enumerated values.
    Enum,
}

impl Variation {
    /// Returns the wire value of this variation.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::MilliPoint => 1,
            Self::Relative => 2,
            Self::Enum => 3,
        }
    }

    /// Parses a wire value.
    pub const fn from_u8(value: u8) -> Result<Self, ParseEnumError> {
        Ok(match value {
            0 => Self::Default,
            1 => Self::MilliPoint,
            2 => Self::Relative,
            3 => Self::Enum,
            _ => {
                return Err(ParseEnumError {
                    kind: "Variation",
                    value: value as i32,
                })
            }
        })
    }

    /// Returns the short name used for this variation in XML.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::MilliPoint => "mpt",
            Self::Relative => "rel",
            Self::Enum => "enum",
        }
    }

    /// Looks up a variation by its XML name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "default" => Self::Default,
            "mpt" => Self::MilliPoint,
            "rel" => Self::Relative,
            "enum" => Self::Enum,
            _ => return None,
        })
    }
}

/// An integer property value together with its variation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntProp {
    /// How `value` is to be interpreted.
    pub var: Variation,
    /// The raw value.
    pub value: i32,
}

impl IntProp {
    /// Creates a new integer property value.
    #[must_use]
    pub const fn new(var: Variation, value: i32) -> Self {
        Self { var, value }
    }
}

/// Error returned when an integer does not name a value of an enumerated property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: i32,
}

impl ParseEnumError {
    /// The rejected value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid {} value", self.value, self.kind)
    }
}

impl core::error::Error for ParseEnumError {}

macro_rules! int_enum {
    ($(#[$meta:meta])* $ty:ident { $($(#[$vmeta:meta])* $variant:ident = $value:literal,)* }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($(#[$vmeta])* $variant,)*
        }

        impl $ty {
            /// Returns the integer value stored in a property for this variant.
            #[must_use]
            pub const fn to_i32(self) -> i32 {
                match self {
                    $(Self::$variant => $value,)*
                }
            }
        }

        impl TryFrom<i32> for $ty {
            type Error = ParseEnumError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)*
                    _ => Err(ParseEnumError {
                        kind: stringify!($ty),
                        value,
                    }),
                }
            }
        }
    };
}

int_enum!(
    /// Value of a boolean-like property such as bold or italic.
    Toggle {
        /// The property is off.
        Off = 0,
        /// The property is on.
        On = 1,
        /// The inherited value is inverted.
        Invert = 2,
    }
);

int_enum!(
    /// Paragraph alignment.
    ///
    /// `Leading` and `Trailing` follow the paragraph direction; `Left` and `Right` do not.
    Alignment {
        /// Aligned to the start of the line.
        Leading = 0,
        /// Aligned to the left edge.
        Left = 1,
        /// Centered.
        Center = 2,
        /// Aligned to the right edge.
        Right = 3,
        /// Aligned to the end of the line.
        Trailing = 4,
        /// Stretched to fill the line.
        Justify = 5,
    }
);

int_enum!(
    /// Underline style.
    Underline {
        /// No underline.
        None = 0,
        /// Dotted line.
        Dotted = 1,
        /// Dashed line.
        Dashed = 2,
        /// Single solid line.
        Single = 3,
        /// Double solid line.
        Double = 4,
        /// Line through the text.
        Strikethrough = 5,
        /// Wavy line, as used for spelling errors.
        Squiggle = 6,
    }
);

int_enum!(
    /// Vertical position of the text.
    Superscript {
        /// Normal position.
        None = 0,
        /// Raised and reduced.
        Super = 1,
        /// Lowered and reduced.
        Sub = 2,
    }
);

/// A packed color value, laid out as `0x00BBGGRR`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// The transparent color, which lets the background show through.
    pub const TRANSPARENT: Self = Self(0xC000_0000);
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Packs the given channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) | ((g as u32) << 8) | ((b as u32) << 16))
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Returns `true` for [`Color::TRANSPARENT`].
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.0 == Self::TRANSPARENT.0
    }

    /// Returns the value as stored in an integer property.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0 as i32
    }

    /// Reinterprets an integer property value as a color.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        Self(value as u32)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            f.write_str("Color(transparent)")
        } else {
            write!(f, "Color(#{:02x}{:02x}{:02x})", self.r(), self.g(), self.b())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Alignment, Color, Toggle, Underline, Variation};
    use alloc::format;

    #[test]
    fn enum_values() {
        assert_eq!(Toggle::try_from(1), Ok(Toggle::On));
        assert_eq!(Alignment::Justify.to_i32(), 5);
        assert_eq!(Underline::try_from(6), Ok(Underline::Squiggle));
        let err = Toggle::try_from(7).unwrap_err();
        assert_eq!(err.value(), 7);
        assert_eq!(format!("{err}"), "7 is not a valid Toggle value");
    }

    #[test]
    fn variation_wire_values() {
        for var in [
            Variation::Default,
            Variation::MilliPoint,
            Variation::Relative,
            Variation::Enum,
        ] {
            assert_eq!(Variation::from_u8(var.to_u8()), Ok(var));
            assert_eq!(Variation::from_name(var.name()), Some(var));
        }
        assert!(Variation::from_u8(9).is_err());
    }

    #[test]
    fn color_channels() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
        assert_eq!(Color::from_i32(c.to_i32()), c);
        assert!(Color::TRANSPARENT.is_transparent());
        assert_eq!(format!("{c:?}"), "Color(#123456)");
    }
}
