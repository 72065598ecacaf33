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

use crate::cmd::require_active_plan;
use crate::db::Database;
use crate::error::Fallible;
use crate::plan::PlanDay;
use crate::progress::ProgressEntry;

pub fn list_days(directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    let entries = db.get_progress_for_plan(plan_id)?;
    let by_day: HashMap<u32, &ProgressEntry> =
        entries.iter().map(|e| (e.day_number, e)).collect();
    for day in &plan.days {
        println!("{}", render_day(day, by_day.get(&day.day_number).copied()));
    }
    Ok(())
}

/// One line per day: completion marker, date, checked count, chapters.
/// Catch-up additions are prefixed with `+`.
fn render_day(day: &PlanDay, entry: Option<&ProgressEntry>) -> String {
    let (marker, checked, total, chapters) = match entry {
        Some(entry) => {
            let checked = entry.chapters.iter().filter(|c| c.is_checked()).count();
            let total = entry.chapters.len();
            let base = day.chapters.len();
            let mut chapters: Vec<String> = Vec::with_capacity(total);
            for (i, chapter) in entry.chapters.iter().enumerate() {
                if i < base {
                    chapters.push(chapter.chapter.to_string());
                } else {
                    chapters.push(format!("+{}", chapter.chapter));
                }
            }
            let marker = if entry.completed { 'x' } else { ' ' };
            (marker, checked, total, chapters)
        }
        None => {
            let chapters: Vec<String> = day.chapters.iter().map(|c| c.to_string()).collect();
            (' ', 0, day.chapters.len(), chapters)
        }
    };
    let tag = if day.is_catch_up { " (catch-up)" } else { "" };
    format!(
        "[{marker}] {:>3}. {} [{checked}/{total}] {}{tag}",
        day.day_number,
        day.date,
        chapters.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ActionRecord;
    use crate::types::action::ChapterAction;
    use crate::types::chapter::ChapterRef;
    use crate::types::date::Date;
    use crate::types::timestamp::Timestamp;

    fn day() -> PlanDay {
        PlanDay {
            day_number: 3,
            date: Date::parse("2026-01-03").unwrap(),
            chapters: vec![ChapterRef::new("Genesis", 5), ChapterRef::new("Genesis", 6)],
            is_catch_up: false,
        }
    }

    #[test]
    fn test_render_day_without_progress() {
        let rendered = render_day(&day(), None);
        assert_eq!(rendered, "[ ]   3. 2026-01-03 [0/2] Genesis 5, Genesis 6");
    }

    #[test]
    fn test_render_day_partially_read() {
        let day = day();
        let mut entry = ProgressEntry::new(3, &day.chapters);
        entry.chapters[0].actions.push(ActionRecord {
            action: ChapterAction::Checked,
            at: Timestamp::now(),
        });
        let rendered = render_day(&day, Some(&entry));
        assert_eq!(rendered, "[ ]   3. 2026-01-03 [1/2] Genesis 5, Genesis 6");
    }

    #[test]
    fn test_render_day_with_addition() {
        let day = day();
        let mut chapters = day.chapters.clone();
        chapters.push(ChapterRef::new("Genesis", 1));
        let mut entry = ProgressEntry::new(3, &chapters);
        entry.completed = true;
        let rendered = render_day(&day, Some(&entry));
        assert_eq!(
            rendered,
            "[x]   3. 2026-01-03 [0/3] Genesis 5, Genesis 6, +Genesis 1"
        );
    }

    #[test]
    fn test_render_catch_up_day() {
        let mut day = day();
        day.is_catch_up = true;
        let rendered = render_day(&day, None);
        assert!(rendered.ends_with("(catch-up)"));
    }
}
