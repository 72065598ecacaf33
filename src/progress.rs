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

use serde::Serialize;

use crate::canon::Canon;
use crate::types::action::ChapterAction;
use crate::types::chapter::ChapterRef;
use crate::types::timestamp::Timestamp;

/// One appended action in a chapter's log.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub action: ChapterAction,
    pub at: Timestamp,
}

/// A chapter of a plan day together with its append-only action log.
#[derive(Clone, Debug)]
pub struct ChapterProgress {
    pub chapter: ChapterRef,
    pub actions: Vec<ActionRecord>,
}

impl ChapterProgress {
    pub fn new(chapter: ChapterRef) -> Self {
        Self {
            chapter,
            actions: Vec::new(),
        }
    }

    /// Latest action wins. A chapter with no actions is unchecked.
    pub fn latest_state(&self) -> ChapterAction {
        self.actions
            .last()
            .map(|a| a.action)
            .unwrap_or(ChapterAction::Unchecked)
    }

    pub fn is_checked(&self) -> bool {
        self.latest_state() == ChapterAction::Checked
    }
}

/// A chapter added to a day by a catch-up adjustment, tagged with the
/// overdue day it came from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpChapter {
    pub chapter: ChapterRef,
    pub original_day_number: u32,
}

/// Per-day progress: the effective chapter list (base chapters plus
/// catch-up additions) with action logs, and the derived completion state.
#[derive(Clone, Debug)]
pub struct ProgressEntry {
    pub day_number: u32,
    /// Action logs for every effective chapter, base chapters first.
    pub chapters: Vec<ChapterProgress>,
    /// The catch-up additions merged into `chapters`.
    pub added_chapters: Vec<CatchUpChapter>,
    pub started_reading_at: Option<Timestamp>,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
}

impl ProgressEntry {
    pub fn new(day_number: u32, chapters: &[ChapterRef]) -> Self {
        Self {
            day_number,
            chapters: chapters
                .iter()
                .map(|c| ChapterProgress::new(c.clone()))
                .collect(),
            added_chapters: Vec::new(),
            started_reading_at: None,
            completed: false,
            completed_at: None,
        }
    }

    pub fn chapter_progress(&self, chapter: &ChapterRef) -> Option<&ChapterProgress> {
        self.chapters.iter().find(|c| &c.chapter == chapter)
    }

    /// Derive completion from the action logs: true iff every effective
    /// chapter's latest action is checked. A day with no chapters is
    /// vacuously complete.
    pub fn derive_completed(&self) -> bool {
        self.chapters.iter().all(|c| c.is_checked())
    }

    /// Chapters whose latest state is not checked.
    pub fn unread_chapters(&self) -> Vec<ChapterRef> {
        self.chapters
            .iter()
            .filter(|c| !c.is_checked())
            .map(|c| c.chapter.clone())
            .collect()
    }
}

/// Totals of chapters and verses whose latest state is checked, for
/// display. Verse counts come from the canon table; scheduling never
/// depends on them.
pub fn read_totals(entries: &[ProgressEntry], canon: &Canon) -> (u32, u32) {
    let mut chapters = 0;
    let mut verses = 0;
    for entry in entries {
        for chapter in &entry.chapters {
            if chapter.is_checked() {
                chapters += 1;
                verses += canon
                    .verse_count(&chapter.chapter.book, chapter.chapter.chapter)
                    .unwrap_or(0);
            }
        }
    }
    (chapters, verses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: ChapterAction) -> ActionRecord {
        ActionRecord {
            action,
            at: Timestamp::now(),
        }
    }

    #[test]
    fn test_latest_action_wins() {
        let mut progress = ChapterProgress::new(ChapterRef::new("Genesis", 1));
        assert_eq!(progress.latest_state(), ChapterAction::Unchecked);
        progress.actions.push(record(ChapterAction::Checked));
        assert_eq!(progress.latest_state(), ChapterAction::Checked);
        progress.actions.push(record(ChapterAction::Unchecked));
        assert_eq!(progress.latest_state(), ChapterAction::Unchecked);
        // History is preserved: both actions remain in the log.
        assert_eq!(progress.actions.len(), 2);
    }

    #[test]
    fn test_derive_completed() {
        let chapters = vec![ChapterRef::new("Genesis", 1), ChapterRef::new("Genesis", 2)];
        let mut entry = ProgressEntry::new(1, &chapters);
        assert!(!entry.derive_completed());
        entry.chapters[0].actions.push(record(ChapterAction::Checked));
        assert!(!entry.derive_completed());
        entry.chapters[1].actions.push(record(ChapterAction::Checked));
        assert!(entry.derive_completed());
        entry.chapters[0]
            .actions
            .push(record(ChapterAction::Unchecked));
        assert!(!entry.derive_completed());
    }

    #[test]
    fn test_empty_day_is_vacuously_complete() {
        let entry = ProgressEntry::new(1, &[]);
        assert!(entry.derive_completed());
    }

    #[test]
    fn test_unread_chapters() {
        let chapters = vec![ChapterRef::new("Genesis", 1), ChapterRef::new("Genesis", 2)];
        let mut entry = ProgressEntry::new(1, &chapters);
        entry.chapters[0].actions.push(record(ChapterAction::Checked));
        assert_eq!(entry.unread_chapters(), vec![ChapterRef::new("Genesis", 2)]);
    }

    #[test]
    fn test_read_totals() {
        use crate::canon::Canon;
        let chapters = vec![ChapterRef::new("Genesis", 1), ChapterRef::new("Psalms", 117)];
        let mut entry = ProgressEntry::new(1, &chapters);
        entry.chapters[0].actions.push(record(ChapterAction::Checked));
        entry.chapters[1].actions.push(record(ChapterAction::Checked));
        let (chapters_read, verses_read) = read_totals(&[entry], Canon::get());
        assert_eq!(chapters_read, 2);
        // Genesis 1 has 31 verses, Psalm 117 has 2.
        assert_eq!(verses_read, 33);
    }
}
