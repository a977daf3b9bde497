//! Error and advisory types.
//!
//! Structural problems with a container are returned as [`ExtractError`] and abort
//! the job. Findings that only reduce confidence in the result are recorded as
//! [`Advisory`] values on the extraction instead.

use thiserror::Error;

use crate::container::PayloadKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{kind} container does not appear to be a valid Xbox executable (missing XBEH signature)")]
    InvalidContainer { kind: PayloadKind },

    #[error("{kind} container has no STM32 preamble")]
    PreambleNotFound { kind: PayloadKind },

    #[error(
        "{kind} payload at 0x{start:x} may be truncated: does not appear to be 0x{len:X} bytes long"
    )]
    TruncatedPayload {
        kind: PayloadKind,
        start: usize,
        len: usize,
    },

    #[error("release tag {tag:?} contains a path separator")]
    InvalidReleaseTag { tag: String },

    #[error("firmware version marker not found")]
    VersionNotFound,

    #[error("malformed XBE header: {0}")]
    MalformedHeader(String),
}

/// A non-fatal finding raised while extracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The version marker is missing, so the name falls back to the tag or a placeholder.
    VersionNotFound,
    /// `ENCODER_CONEXANT` is absent; the binary may be obfuscated.
    MaybeObfuscated,
}
