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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// A reference to a single chapter, e.g. "Genesis 3".
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRef {
    pub book: String,
    pub chapter: u32,
}

impl ChapterRef {
    pub fn new(book: impl Into<String>, chapter: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
        }
    }
}

impl Display for ChapterRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

impl FromStr for ChapterRef {
    type Err = ErrorReport;

    /// Parse a reference like "Genesis 3" or "1 Kings 17". The last
    /// whitespace-separated token is the chapter number; everything before
    /// it is the book name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((book, chapter)) = s.rsplit_once(' ') else {
            return Err(ErrorReport::new(format!("invalid chapter reference: {s}")));
        };
        let book = book.trim();
        let chapter: u32 = chapter
            .parse()
            .map_err(|_| ErrorReport::new(format!("invalid chapter number: {chapter}")))?;
        if book.is_empty() || chapter == 0 {
            return Err(ErrorReport::new(format!("invalid chapter reference: {s}")));
        }
        Ok(ChapterRef::new(book, chapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ChapterRef::new("Genesis", 3).to_string(), "Genesis 3");
    }

    #[test]
    fn test_parse() {
        let r: ChapterRef = "Genesis 3".parse().unwrap();
        assert_eq!(r, ChapterRef::new("Genesis", 3));
        let r: ChapterRef = "1 Kings 17".parse().unwrap();
        assert_eq!(r, ChapterRef::new("1 Kings", 17));
        let r: ChapterRef = "Song of Solomon 2".parse().unwrap();
        assert_eq!(r, ChapterRef::new("Song of Solomon", 2));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("Genesis".parse::<ChapterRef>().is_err());
        assert!("Genesis zero".parse::<ChapterRef>().is_err());
        assert!("Genesis 0".parse::<ChapterRef>().is_err());
    }
}
