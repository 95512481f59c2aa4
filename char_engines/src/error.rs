// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Range;

/// Errors that can occur when querying a character engine over a text buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    range: Range<usize>,
    len: usize,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the requested range.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the length of the text at the time of the request.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks that `range` is an ordered range of character boundaries in `text`.
    pub(crate) fn check_range(text: &str, range: &Range<usize>) -> Result<(), Self> {
        let kind = if range.start > range.end {
            ErrorKind::InvalidRange
        } else if range.end > text.len() {
            ErrorKind::InvalidBounds
        } else if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            ErrorKind::NotOnCharBoundary
        } else {
            return Ok(());
        };
        Err(Self {
            kind,
            range: range.clone(),
            len: text.len(),
        })
    }
}

/// Kinds of errors that can occur when querying a character engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The range extends past the end of the text.
    InvalidBounds,
    /// The range start is greater than its end.
    InvalidRange,
    /// An endpoint of the range is inside a character.
    NotOnCharBoundary,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Range { start, end } = self.range;
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {start}..{end} is out of bounds for text of length {}",
                self.len
            ),
            ErrorKind::InvalidRange => write!(f, "range start {start} is greater than end {end}"),
            ErrorKind::NotOnCharBoundary => {
                write!(f, "range {start}..{end} is not on character boundaries")
            }
        }
    }
}

impl core::error::Error for Error {}
