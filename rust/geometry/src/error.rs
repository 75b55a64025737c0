// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for checked geometry construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the checked constructors.
///
/// The simplifier, deriver and packer never return these; they degrade to
/// defined fallbacks instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate line: length {length} does not exceed tolerance {tolerance}")]
    DegenerateLine { length: f64, tolerance: f64 },

    #[error("Degenerate arc: {0}")]
    DegenerateArc(String),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
}
