// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Crate error type.
//!
//! Four kinds of failure reach callers. Resource errors carry the OS error and,
//! where one exists, the path. `CorruptIndex` covers every truncated or malformed
//! blob: decoders never read past the mapped region. `MalformedQuery` is a
//! per-request failure in service mode and an exit code in batch mode.
//! Policy outcomes (word too frequent, word too long) are not errors at all;
//! they are logged and skipped.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptIndex(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedQuery(msg.into())
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn create(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Create {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the request itself rather than the index or
    /// the machine; a query service reports these and keeps serving.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Error::MalformedQuery(_) | Error::InvalidConfig(_))
    }
}
