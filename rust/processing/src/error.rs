// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving a host through a build
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Host operation failed: {0}")]
    Host(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Room {room} has no usable boundary")]
    NoBoundary { room: String },

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Settings(err.to_string())
    }
}
