// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  Nothing here is recoverable; the
//! binary reports the error and exits, but the variants carry enough
//! context (line numbers, paths, pixel coordinates) for a library
//! caller to decide for itself.

use std::io;
use std::path::Path;

/// The failure taxonomy for loading, rendering and writing.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The command line was incomplete or malformed.
    #[fail(display = "usage: {}", message)]
    Usage {
        /// What was wrong, usually clap's own message.
        message: String,
    },

    /// A color table could not be built.  `line` is 1-based; a line of
    /// zero means the problem is the table as a whole.
    #[fail(display = "syntax error reading line {}: {}", line, message)]
    Parse {
        /// The offending line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A numeric argument did not parse or did not describe a usable
    /// viewport.
    #[fail(display = "invalid {}: {}", name, value)]
    InvalidArgument {
        /// The argument name.
        name: String,
        /// The rejected value, or the reason it was rejected.
        value: String,
    },

    /// A file could not be opened, read or written.
    #[fail(display = "{}: {}", path, cause)]
    Io {
        /// The file involved.
        path: String,
        /// The underlying failure.
        #[cause]
        cause: io::Error,
    },

    /// A worker could not finish its range.
    #[fail(display = "render failed at pixel ({}, {}): {}", x, y, message)]
    Computation {
        /// Column of the pixel being computed.
        x: usize,
        /// Row of the pixel being computed.
        y: usize,
        /// What went wrong.
        message: String,
    },
}

impl RenderError {
    pub(crate) fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        RenderError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        RenderError::InvalidArgument {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn io(path: &Path, cause: io::Error) -> Self {
        RenderError::Io {
            path: path.display().to_string(),
            cause,
        }
    }

    /// A worker thread died without reporting which pixel it was on.
    pub(crate) fn worker_panicked() -> Self {
        RenderError::Computation {
            x: 0,
            y: 0,
            message: "worker thread panicked".to_string(),
        }
    }
}
