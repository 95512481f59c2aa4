// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::Range;

/// Errors that can occur when breaking text or querying a segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    range: Range<usize>,
    bounds: Range<usize>,
    source: Option<ts_string::Error>,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the offending range. For a single offset this is empty.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the valid range the request was checked against.
    pub fn bounds(&self) -> Range<usize> {
        self.bounds.clone()
    }

    pub(crate) fn invalid_range(range: Range<usize>, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            range,
            bounds: 0..len,
            source: None,
        }
    }

    pub(crate) fn invalid_offset(ich: usize, bounds: Range<usize>) -> Self {
        Self {
            kind: ErrorKind::InvalidOffset,
            range: ich..ich,
            bounds,
            source: None,
        }
    }
}

impl From<ts_string::Error> for Error {
    fn from(err: ts_string::Error) -> Self {
        Self {
            kind: ErrorKind::Source,
            range: err.start()..err.end(),
            bounds: 0..err.len(),
            source: Some(err),
        }
    }
}

impl From<char_engines::Error> for Error {
    fn from(err: char_engines::Error) -> Self {
        Self::invalid_range(err.range(), err.len())
    }
}

/// Kinds of errors that can occur when breaking text or querying a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A break request range is reversed, outside the text, or not on character boundaries.
    InvalidRange,
    /// An offset is outside the segment or not a character boundary in it.
    InvalidOffset,
    /// The text source reported an error.
    Source,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidRange => write!(
                f,
                "range {}..{} is not a valid range of character boundaries in {}..{}",
                self.range.start, self.range.end, self.bounds.start, self.bounds.end
            ),
            ErrorKind::InvalidOffset => write!(
                f,
                "offset {} is not a character boundary in segment {}..{}",
                self.range.start, self.bounds.start, self.bounds.end
            ),
            ErrorKind::Source => match &self.source {
                Some(err) => write!(f, "text source error: {err}"),
                None => f.write_str("text source error"),
            },
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &(dyn core::error::Error + 'static))
    }
}
