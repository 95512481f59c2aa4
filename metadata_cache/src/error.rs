// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Error type for schema loading and lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    id: Option<u32>,
    name: Option<String>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The class or field id involved, if any.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    /// The class or field name, or the parser message, involved if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn new(kind: ErrorKind, id: Option<u32>, name: Option<&str>) -> Self {
        Self {
            kind,
            id,
            name: name.map(String::from),
        }
    }

    pub(crate) fn unknown_class(clid: u32) -> Self {
        Self::new(ErrorKind::UnknownClass, Some(clid), None)
    }

    pub(crate) fn unknown_field(flid: u32) -> Self {
        Self::new(ErrorKind::UnknownField, Some(flid), None)
    }

    pub(crate) fn malformed_xml(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedXml,
            id: None,
            name: Some(detail.into()),
        }
    }
}

/// Kinds of errors that can occur in the metadata cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No class has the given id or name.
    UnknownClass,
    /// No field has the given id.
    UnknownField,
    /// A class with the same id or name already exists.
    DuplicateClass,
    /// A field with the same id, or the same name in its class, already exists.
    DuplicateField,
    /// A class names a base class that does not exist.
    UnknownBase,
    /// Base classes would form a cycle.
    InheritanceCycle,
    /// An object field has no destination class, or a basic field has one.
    InvalidSignature,
    /// The schema document could not be read.
    MalformedXml,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or_default();
        let id = self.id.unwrap_or_default();
        match self.kind {
            ErrorKind::UnknownClass if self.id.is_some() => write!(f, "no class has id {id}"),
            ErrorKind::UnknownClass => write!(f, "no class is named {name:?}"),
            ErrorKind::UnknownField => write!(f, "no field has id {id}"),
            ErrorKind::DuplicateClass => write!(f, "class {name:?} ({id}) is defined twice"),
            ErrorKind::DuplicateField => write!(f, "field {name:?} ({id}) is defined twice"),
            ErrorKind::UnknownBase => write!(f, "class {id} has unknown base class {name:?}"),
            ErrorKind::InheritanceCycle => {
                write!(f, "class {name:?} ({id}) inherits from itself")
            }
            ErrorKind::InvalidSignature => {
                write!(f, "field {name:?} ({id}) has a signature that does not fit its type")
            }
            ErrorKind::MalformedXml => write!(f, "malformed schema XML: {name}"),
        }
    }
}

impl core::error::Error for Error {}
