// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error type for building a check-in form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    id: u32,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The changelist id that was rejected.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn new(kind: ErrorKind, id: u32) -> Self {
        Self { kind, id }
    }
}

/// Kinds of errors that can occur when filling in a check-in form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Id 0 belongs to the default changelist, which has no entry.
    ReservedId,
    /// A changelist with the same id is already listed.
    DuplicateChangeList,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::ReservedId => {
                write!(f, "changelist id {} is reserved for the default changelist", self.id)
            }
            ErrorKind::DuplicateChangeList => {
                write!(f, "changelist {} is listed twice", self.id)
            }
        }
    }
}

impl core::error::Error for Error {}
