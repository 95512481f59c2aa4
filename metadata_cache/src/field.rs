// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::{BitOr, BitOrAssign};

/// Numeric class identifier: module number times 1000 plus class number.
pub type ClassId = u32;

/// Numeric field identifier: class id times 1000 plus field number.
pub type FieldId = u32;

macro_rules! field_types {
    ($($(#[$meta:meta])* $variant:ident = $value:literal,)*) => {
        /// The type of a field.
        ///
        /// The discriminants are the type codes stored with the schema.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum FieldType {
            $($(#[$meta])* $variant = $value,)*
        }

        impl FieldType {
            /// Every field type, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The type code.
            #[must_use]
            pub const fn code(self) -> u32 {
                self as u32
            }

            /// Looks up a type by its code.
            #[must_use]
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// The name used for the type in schema files.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Looks up a type by name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

field_types! {
    /// A truth value.
    Boolean = 1,
    /// A 32-bit integer.
    Integer = 2,
    /// A fixed-point decimal.
    Numeric = 3,
    /// A floating point number.
    Float = 4,
    /// A point in time.
    Time = 5,
    /// A 128-bit unique identifier.
    Guid = 6,
    /// Picture data.
    Image = 7,
    /// A date that may be approximate or BC.
    GenDate = 8,
    /// Arbitrary bytes.
    Binary = 9,
    /// One formatted string.
    String = 13,
    /// Formatted strings, one per writing system.
    MultiString = 14,
    /// One plain string.
    Unicode = 15,
    /// Plain strings, one per writing system.
    MultiUnicode = 16,
    /// Owns at most one object.
    OwningAtom = 23,
    /// Refers to at most one object.
    ReferenceAtom = 24,
    /// Owns an unordered set of objects.
    OwningCollection = 25,
    /// Refers to an unordered set of objects.
    ReferenceCollection = 26,
    /// Owns an ordered list of objects.
    OwningSequence = 27,
    /// Refers to an ordered list of objects.
    ReferenceSequence = 28,
}

impl FieldType {
    /// Returns `true` for fields whose values are objects of another class.
    #[must_use]
    pub const fn is_object(self) -> bool {
        FieldTypeMask::OBJECT.contains(self)
    }

    /// The object field type for an owning or reference relation with `cardinality`
    /// (`atomic`, `col` or `seq`).
    #[must_use]
    pub fn from_relation(owning: bool, cardinality: &str) -> Option<Self> {
        Some(match (owning, cardinality) {
            (true, "atomic") => Self::OwningAtom,
            (true, "col") => Self::OwningCollection,
            (true, "seq") => Self::OwningSequence,
            (false, "atomic") => Self::ReferenceAtom,
            (false, "col") => Self::ReferenceCollection,
            (false, "seq") => Self::ReferenceSequence,
            _ => return None,
        })
    }
}

/// A set of field types, for filtering field lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldTypeMask(u32);

impl FieldTypeMask {
    /// No types.
    pub const NONE: Self = Self(0);
    /// Values stored in the object itself.
    pub const BASIC: Self = Self::of(FieldType::Boolean)
        .with(FieldType::Integer)
        .with(FieldType::Numeric)
        .with(FieldType::Float)
        .with(FieldType::Time)
        .with(FieldType::Guid)
        .with(FieldType::Image)
        .with(FieldType::GenDate)
        .with(FieldType::Binary)
        .with(FieldType::String)
        .with(FieldType::MultiString)
        .with(FieldType::Unicode)
        .with(FieldType::MultiUnicode);
    /// Owned objects.
    pub const OWNING: Self = Self::of(FieldType::OwningAtom)
        .with(FieldType::OwningCollection)
        .with(FieldType::OwningSequence);
    /// Referenced objects.
    pub const REFERENCE: Self = Self::of(FieldType::ReferenceAtom)
        .with(FieldType::ReferenceCollection)
        .with(FieldType::ReferenceSequence);
    /// Owned or referenced objects.
    pub const OBJECT: Self = Self(Self::OWNING.0 | Self::REFERENCE.0);
    /// Every type.
    pub const ALL: Self = Self(Self::BASIC.0 | Self::OBJECT.0);

    /// The set holding only `ty`.
    #[must_use]
    pub const fn of(ty: FieldType) -> Self {
        Self(1 << ty.code())
    }

    /// This set plus `ty`.
    #[must_use]
    pub const fn with(self, ty: FieldType) -> Self {
        Self(self.0 | Self::of(ty).0)
    }

    /// Returns `true` if `ty` is in the set.
    #[must_use]
    pub const fn contains(self, ty: FieldType) -> bool {
        self.0 & Self::of(ty).0 != 0
    }

    /// The raw bits, one per type code.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl From<FieldType> for FieldTypeMask {
    fn from(ty: FieldType) -> Self {
        Self::of(ty)
    }
}

impl BitOr for FieldTypeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldTypeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldType, FieldTypeMask};

    #[test]
    fn codes_and_names() {
        for &ty in FieldType::ALL {
            assert_eq!(FieldType::from_code(ty.code()), Some(ty));
            assert_eq!(FieldType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(FieldType::from_code(10), None);
        assert_eq!(FieldType::MultiUnicode.code(), 16);
    }

    #[test]
    fn masks_partition_types() {
        for &ty in FieldType::ALL {
            assert!(FieldTypeMask::ALL.contains(ty));
            assert_ne!(
                FieldTypeMask::BASIC.contains(ty),
                FieldTypeMask::OBJECT.contains(ty)
            );
            assert_eq!(ty.is_object(), FieldTypeMask::OBJECT.contains(ty));
        }
        let strings = FieldTypeMask::of(FieldType::String) | FieldType::Unicode.into();
        assert!(strings.contains(FieldType::Unicode));
        assert!(!strings.contains(FieldType::MultiUnicode));
        assert_eq!(
            FieldType::from_relation(true, "seq"),
            Some(FieldType::OwningSequence)
        );
        assert_eq!(FieldType::from_relation(false, "many"), None);
    }
}
