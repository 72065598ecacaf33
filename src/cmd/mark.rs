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

use crate::cmd::require_active_plan;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::plan::ReadingPlan;
use crate::types::action::ChapterAction;
use crate::types::chapter::ChapterRef;
use crate::types::timestamp::Timestamp;

pub fn check_chapter(day: u32, chapter: &str, directory: Option<String>) -> Fallible<()> {
    mark_chapter(day, chapter, ChapterAction::Checked, directory)
}

pub fn uncheck_chapter(day: u32, chapter: &str, directory: Option<String>) -> Fallible<()> {
    mark_chapter(day, chapter, ChapterAction::Unchecked, directory)
}

fn mark_chapter(
    day: u32,
    chapter: &str,
    action: ChapterAction,
    directory: Option<String>,
) -> Fallible<()> {
    let chapter: ChapterRef = chapter.parse()?;
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    validate_day(&plan, day)?;
    let at = Timestamp::now();
    // Membership is validated inside set_chapter_action; only stamp the
    // one-shot started_reading_at once the action actually landed.
    let completed = db.set_chapter_action(plan_id, day, &chapter, action, at)?;
    if action == ChapterAction::Checked {
        db.set_started_reading_at(plan_id, day, at)?;
    }
    match action {
        ChapterAction::Checked => println!("Checked {chapter}."),
        ChapterAction::Unchecked => println!("Unchecked {chapter}."),
    }
    if completed {
        println!("Day {day} complete.");
    }
    Ok(())
}

pub fn complete_day(day: u32, directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    validate_day(&plan, day)?;
    let at = Timestamp::now();
    db.set_started_reading_at(plan_id, day, at)?;
    db.mark_day_complete(plan_id, day, at)?;
    println!("Day {day} complete.");
    Ok(())
}

fn validate_day(plan: &ReadingPlan, day: u32) -> Fallible<()> {
    if !plan.days.iter().any(|d| d.day_number == day) {
        return fail(format!("no such day: {day}."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::db::PlanId;
    use crate::plan::PlanConfig;
    use crate::plan::generate;
    use crate::types::date::Date;
    use crate::types::ordering::BookOrdering;

    /// Genesis over 25 days, saved as the active plan.
    fn setup() -> (TempDir, Database, PlanId) {
        let dir = tempfile::tempdir().unwrap();
        let directory = dir.path().display().to_string();
        let config = PlanConfig {
            start_date: Date::parse("2026-01-01").unwrap(),
            end_date: Date::parse("2026-01-25").unwrap(),
            excluded_weekdays: Vec::new(),
            books: vec!["Genesis".to_string()],
            ordering: BookOrdering::Canonical,
            reverse_order: false,
            daily_psalm: false,
            daily_proverb: false,
            randomize_psalms: false,
            randomize_proverbs: false,
        };
        let db = Database::open_in(Some(directory)).unwrap();
        let plan_id = db.save_plan(&generate(&config).unwrap()).unwrap();
        (dir, db, plan_id)
    }

    #[test]
    fn test_failed_check_writes_nothing() -> Fallible<()> {
        let (dir, db, plan_id) = setup();
        let directory = Some(dir.path().display().to_string());
        // Malachi is not part of day 3.
        assert!(check_chapter(3, "Malachi 1", directory).is_err());
        // The failed check must not create a progress entry or stamp
        // started_reading_at.
        assert!(db.get_progress_for_plan(plan_id)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_check_stamps_started_reading_at() -> Fallible<()> {
        let (dir, db, plan_id) = setup();
        let directory = Some(dir.path().display().to_string());
        check_chapter(3, "Genesis 5", directory)?;
        let entries = db.get_progress_for_plan(plan_id)?;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].started_reading_at.is_some());
        Ok(())
    }

    #[test]
    fn test_uncheck_does_not_stamp_started_reading_at() -> Fallible<()> {
        let (dir, db, plan_id) = setup();
        let directory = Some(dir.path().display().to_string());
        uncheck_chapter(3, "Genesis 5", directory)?;
        let entries = db.get_progress_for_plan(plan_id)?;
        assert!(entries[0].started_reading_at.is_none());
        Ok(())
    }
}
