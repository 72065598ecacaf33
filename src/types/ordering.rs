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

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

/// The order in which the selected books' chapters are scheduled.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookOrdering {
    /// The books' order as given.
    #[default]
    Canonical,
    /// Books reordered by the static historical chronology table.
    Chronological,
    /// A random permutation of all selected chapters.
    Shuffled,
}

impl Display for BookOrdering {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BookOrdering::Canonical => write!(f, "canonical"),
            BookOrdering::Chronological => write!(f, "chronological"),
            BookOrdering::Shuffled => write!(f, "shuffled"),
        }
    }
}
