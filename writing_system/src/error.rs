// Copyright 2026 the Fieldtext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

use crate::WsId;

/// Error type for writing system factory operations.
///
/// Carries a non-exhaustive [`ErrorKind`] together with the writing system or locale the failing
/// call was about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    ws: Option<WsId>,
    detail: Option<String>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The writing system involved, if any.
    pub fn ws(&self) -> Option<WsId> {
        self.ws
    }

    /// The locale string or parser message involved, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub(crate) fn invalid_locale(locale: &str) -> Self {
        Self {
            kind: ErrorKind::InvalidLocale,
            ws: None,
            detail: Some(locale.into()),
        }
    }

    pub(crate) fn duplicate_locale(locale: String, ws: WsId) -> Self {
        Self {
            kind: ErrorKind::DuplicateLocale,
            ws: Some(ws),
            detail: Some(locale),
        }
    }

    pub(crate) fn duplicate_id(ws: WsId) -> Self {
        Self {
            kind: ErrorKind::DuplicateId,
            ws: Some(ws),
            detail: None,
        }
    }

    pub(crate) fn unknown_ws(ws: WsId) -> Self {
        Self {
            kind: ErrorKind::UnknownWs,
            ws: Some(ws),
            detail: None,
        }
    }

    pub(crate) fn shut_down() -> Self {
        Self {
            kind: ErrorKind::ShutDown,
            ws: None,
            detail: None,
        }
    }

    pub(crate) fn malformed_xml(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedXml,
            ws: None,
            detail: Some(detail.into()),
        }
    }

    pub(crate) fn write() -> Self {
        Self {
            kind: ErrorKind::Write,
            ws: None,
            detail: None,
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::write()
    }
}

/// Kinds of errors that can occur in the writing system factory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A locale string could not be parsed.
    InvalidLocale,
    /// A writing system with the same locale is already registered.
    DuplicateLocale,
    /// A writing system with the same id is already registered.
    DuplicateId,
    /// No writing system has the given id.
    UnknownWs,
    /// The factory has been shut down.
    ShutDown,
    /// Persisted writing systems could not be read.
    MalformedXml,
    /// The output sink reported an error.
    Write,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail.as_deref().unwrap_or_default();
        match (self.kind, self.ws) {
            (ErrorKind::InvalidLocale, _) => write!(f, "{detail:?} is not a valid locale"),
            (ErrorKind::DuplicateLocale, Some(ws)) => {
                write!(f, "locale {detail} is already used by writing system {ws}")
            }
            (ErrorKind::DuplicateId, Some(ws)) => {
                write!(f, "writing system {ws} is already registered")
            }
            (ErrorKind::UnknownWs, Some(ws)) => write!(f, "no writing system has id {ws}"),
            (ErrorKind::ShutDown, _) => {
                f.write_str("the writing system factory has been shut down")
            }
            (ErrorKind::MalformedXml, _) => write!(f, "malformed writing system XML: {detail}"),
            (ErrorKind::Write, _) => f.write_str("failed to write writing systems"),
            (kind, _) => write!(f, "{kind:?}"),
        }
    }
}

impl core::error::Error for Error {}
