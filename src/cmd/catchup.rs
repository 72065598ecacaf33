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

use crate::catchup::dedicated_days;
use crate::catchup::suggest_spread;
use crate::cmd::require_active_plan;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::progress::CatchUpChapter;
use crate::types::date::Date;

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum CatchUpMode {
    /// Spread the overdue chapters over the remaining days.
    Spread,
    /// Append dedicated catch-up days after the plan's last day.
    Dedicated,
}

impl Display for CatchUpMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatchUpMode::Spread => write!(f, "spread"),
            CatchUpMode::Dedicated => write!(f, "dedicated"),
        }
    }
}

pub fn catch_up(
    mode: CatchUpMode,
    max_per_day: usize,
    apply: bool,
    directory: Option<String>,
) -> Fallible<()> {
    if max_per_day == 0 {
        return fail("--max-per-day must be at least 1.");
    }
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    let entries = db.get_progress_for_plan(plan_id)?;
    let today = Date::today();
    match mode {
        CatchUpMode::Spread => {
            let suggestion = suggest_spread(&plan.days, &entries, today, max_per_day);
            if suggestion.assignments.is_empty() && suggestion.remainder.is_empty() {
                println!("Nothing to catch up on.");
                return Ok(());
            }
            for assignment in &suggestion.assignments {
                println!(
                    "Day {}: add {}.",
                    assignment.day_number,
                    describe_chapters(&assignment.added)
                );
            }
            if !suggestion.remainder.is_empty() {
                println!(
                    "{} chapters do not fit in the remaining days. Consider `--mode dedicated`.",
                    suggestion.remainder.len()
                );
            }
            if apply {
                for assignment in &suggestion.assignments {
                    db.add_catch_up_additions(plan_id, assignment.day_number, &assignment.added)?;
                }
                println!("Applied.");
            }
        }
        CatchUpMode::Dedicated => {
            let new_days = dedicated_days(&plan.days, &entries, today, max_per_day);
            if new_days.is_empty() {
                println!("Nothing to catch up on.");
                return Ok(());
            }
            for day in &new_days {
                let chapters: Vec<String> =
                    day.chapters.iter().map(|c| c.to_string()).collect();
                println!(
                    "Day {} ({}): {}.",
                    day.day_number,
                    day.date,
                    chapters.join(", ")
                );
            }
            if apply {
                db.append_catch_up_days(plan_id, &new_days)?;
                println!("Applied.");
            }
        }
    }
    Ok(())
}

fn describe_chapters(added: &[CatchUpChapter]) -> String {
    let chapters: Vec<String> = added
        .iter()
        .map(|c| format!("{} (from day {})", c.chapter, c.original_day_number))
        .collect();
    chapters.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chapter::ChapterRef;

    #[test]
    fn test_describe_chapters() {
        let added = vec![
            CatchUpChapter {
                chapter: ChapterRef::new("Genesis", 1),
                original_day_number: 1,
            },
            CatchUpChapter {
                chapter: ChapterRef::new("Genesis", 2),
                original_day_number: 2,
            },
        ];
        assert_eq!(
            describe_chapters(&added),
            "Genesis 1 (from day 1), Genesis 2 (from day 2)"
        );
    }
}
