// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Rich error type for structured string operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus contextual information about the
/// attempted range or index and, when relevant, the enclosing UTF-8 character span at
/// the offending index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The start of the caller-provided range (or the offending index).
    start: usize,

    /// The end (exclusive) of the caller-provided range.
    end: usize,

    /// The length of the text (or the run count, for run errors) at the time of failure.
    len: usize,

    /// Extra detail for boundary-related errors, when available.
    boundary: Option<BoundaryInfo>,

    /// Message for format errors.
    detail: Option<String>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports source length context; an `is_empty` method would be misleading and unused."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The length of the underlying text, or the run count for [`ErrorKind::RunOutOfBounds`].
    pub fn len(&self) -> usize {
        self.len
    }

    /// Extra details for boundary-related errors, if available.
    pub fn boundary(&self) -> Option<BoundaryInfo> {
        self.boundary
    }

    /// The message for [`ErrorKind::MalformedFormat`], [`ErrorKind::MalformedXml`] and
    /// [`ErrorKind::FormatOverflow`].
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::new(ErrorKind::InvalidBounds, start, end, len)
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::new(ErrorKind::InvalidRange, start, end, len)
    }

    pub(crate) fn run_out_of_bounds(irun: usize, run_count: usize) -> Self {
        Self::new(ErrorKind::RunOutOfBounds, irun, irun, run_count)
    }

    pub(crate) fn malformed_format(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(ErrorKind::MalformedFormat, 0, 0, 0)
        }
    }

    pub(crate) fn format_overflow(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(ErrorKind::FormatOverflow, 0, 0, 0)
        }
    }

    pub(crate) fn malformed_xml(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(ErrorKind::MalformedXml, 0, 0, 0)
        }
    }

    pub(crate) fn not_on_char_boundary(
        text: &str,
        start: usize,
        end: usize,
        which: Endpoint,
        index: usize,
    ) -> Self {
        let (cs, ce) = enclosing_char_span(text, index).unwrap_or((index, index));
        Self {
            boundary: Some(BoundaryInfo {
                which,
                index,
                char_start: cs,
                char_end: ce,
            }),
            ..Self::new(ErrorKind::NotOnCharBoundary, start, end, text.len())
        }
    }

    fn new(kind: ErrorKind, start: usize, end: usize, len: usize) -> Self {
        Self {
            kind,
            start,
            end,
            len,
            boundary: None,
            detail: None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
            ErrorKind::NotOnCharBoundary => {
                if let Some(b) = self.boundary {
                    let which = match b.which {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    write!(
                        f,
                        "range {}..{}: {} index {} not on UTF-8 boundary (char {}..{})",
                        self.start, self.end, which, b.index, b.char_start, b.char_end
                    )
                } else {
                    write!(
                        f,
                        "range {}..{} not on UTF-8 boundary",
                        self.start, self.end
                    )
                }
            }
            ErrorKind::RunOutOfBounds => write!(
                f,
                "run index {} out of bounds for run count {}",
                self.start, self.len
            ),
            ErrorKind::MalformedFormat => write!(
                f,
                "malformed run format: {}",
                self.detail.as_deref().unwrap_or("unknown error")
            ),
            ErrorKind::MalformedXml => write!(
                f,
                "malformed string XML: {}",
                self.detail.as_deref().unwrap_or("unknown error")
            ),
            ErrorKind::FormatOverflow => write!(
                f,
                "string does not fit the run format: {}",
                self.detail.as_deref().unwrap_or("unknown limit")
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided offsets were out of bounds relative to the text length.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,

    /// Either `start` or `end` was not aligned to a UTF-8 character boundary.
    NotOnCharBoundary,

    /// A run index was not less than the run count.
    RunOutOfBounds,

    /// Binary run format data could not be decoded.
    MalformedFormat,

    /// XML string data could not be decoded.
    MalformedXml,

    /// A count or offset exceeded the width of its field in the binary run format.
    FormatOverflow,
}

/// Identifies which endpoint of a range failed boundary validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint of the range.
    Start,

    /// The `end` endpoint of the range.
    End,
}

/// Details about an offending index that was not on a UTF-8 character boundary.
///
/// Returned by [`Error::boundary`] when the error kind is
/// [`ErrorKind::NotOnCharBoundary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Which endpoint (`start` or `end`) was invalid.
    pub which: Endpoint,

    /// The offending byte index.
    pub index: usize,

    /// The start byte index of the enclosing UTF-8 codepoint.
    pub char_start: usize,

    /// The end byte index (exclusive) of the enclosing UTF-8 codepoint.
    pub char_end: usize,
}

fn enclosing_char_span(text: &str, index: usize) -> Option<(usize, usize)> {
    if index > text.len() {
        return None;
    }
    if text.is_char_boundary(index) {
        return Some((index, index));
    }
    // A UTF-8 sequence is at most four bytes, so both boundaries are within three steps.
    let start = (index.saturating_sub(3)..index)
        .rev()
        .find(|&i| text.is_char_boundary(i))?;
    let end = (index + 1..=text.len()).find(|&i| text.is_char_boundary(i))?;
    Some((start, end))
}
