// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

/// A generic error report: an error message to show the user.
#[derive(Debug)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl std::error::Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

/// Shorthand to construct a failed `Fallible`.
pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

impl From<std::io::Error> for ErrorReport {
    fn from(err: std::io::Error) -> Self {
        ErrorReport::new(err.to_string())
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(err: rusqlite::Error) -> Self {
        ErrorReport::new(err.to_string())
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(err: serde_json::Error) -> Self {
        ErrorReport::new(err.to_string())
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(err: toml::de::Error) -> Self {
        ErrorReport::new(err.to_string())
    }
}

impl From<chrono::ParseError> for ErrorReport {
    fn from(err: chrono::ParseError) -> Self {
        ErrorReport::new(err.to_string())
    }
}
