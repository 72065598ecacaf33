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

use std::collections::HashMap;
use std::sync::OnceLock;

/// Book-level historical reading order. Chapters within a book keep their
/// natural order; correctness of this table is assumed, not derived.
const CHRONOLOGICAL_ORDER: &[&str] = &[
    "Genesis",
    "Job",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "Psalms",
    "1 Kings",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "2 Kings",
    "Joel",
    "Amos",
    "Jonah",
    "Hosea",
    "Micah",
    "Isaiah",
    "Nahum",
    "Zephaniah",
    "Habakkuk",
    "Jeremiah",
    "Lamentations",
    "Obadiah",
    "Ezekiel",
    "Daniel",
    "Haggai",
    "Zechariah",
    "Esther",
    "Ezra",
    "Nehemiah",
    "Malachi",
    "1 Chronicles",
    "2 Chronicles",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "James",
    "Galatians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Corinthians",
    "2 Corinthians",
    "Romans",
    "Colossians",
    "Philemon",
    "Ephesians",
    "Philippians",
    "1 Timothy",
    "Titus",
    "1 Peter",
    "2 Peter",
    "2 Timothy",
    "Hebrews",
    "Jude",
    "1 John",
    "2 John",
    "3 John",
    "Revelation",
];

/// A book of the canon: its name and the verse count of each chapter.
pub struct Book {
    name: String,
    verses: Vec<u32>,
}

impl Book {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chapter_count(&self) -> u32 {
        self.verses.len() as u32
    }

    /// The verse count of a 1-based chapter number.
    pub fn verse_count(&self, chapter: u32) -> Option<u32> {
        if chapter == 0 {
            return None;
        }
        self.verses.get((chapter - 1) as usize).copied()
    }
}

/// The static table of the 66 books: chapter counts, verse counts per
/// chapter, and the chronological book ordering.
pub struct Canon {
    books: Vec<Book>,
    index: HashMap<String, usize>,
    chronology: HashMap<String, usize>,
}

impl Canon {
    pub fn get() -> &'static Canon {
        static CANON: OnceLock<Canon> = OnceLock::new();
        CANON.get_or_init(|| parse_canon(include_str!("canon.tsv")))
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn book(&self, name: &str) -> Option<&Book> {
        self.index.get(name).map(|i| &self.books[*i])
    }

    pub fn chapter_count(&self, name: &str) -> Option<u32> {
        self.book(name).map(|b| b.chapter_count())
    }

    pub fn verse_count(&self, name: &str, chapter: u32) -> Option<u32> {
        self.book(name).and_then(|b| b.verse_count(chapter))
    }

    /// Position of a book in the chronological reading order.
    pub fn chronological_position(&self, name: &str) -> Option<usize> {
        self.chronology.get(name).copied()
    }
}

fn parse_canon(source: &str) -> Canon {
    let mut books = Vec::new();
    let mut index = HashMap::new();
    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (name, verses) = line
            .split_once('\t')
            .expect("canon table line is missing a tab");
        let verses: Vec<u32> = verses
            .split(',')
            .map(|v| v.parse().expect("canon table verse count is not a number"))
            .collect();
        index.insert(name.to_string(), books.len());
        books.push(Book {
            name: name.to_string(),
            verses,
        });
    }
    let chronology = CHRONOLOGICAL_ORDER
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();
    Canon {
        books,
        index,
        chronology,
    }
}
