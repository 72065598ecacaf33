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
use std::collections::HashSet;

use crate::plan::PlanDay;
use crate::progress::CatchUpChapter;
use crate::progress::ProgressEntry;
use crate::types::chapter::ChapterRef;
use crate::types::date::Date;

/// Extra chapters proposed for one future day.
#[derive(Clone, Debug)]
pub struct CatchUpAssignment {
    pub day_number: u32,
    pub added: Vec<CatchUpChapter>,
}

/// The result of spread-mode catch-up. Chapters that do not fit in the
/// remaining future days end up in `remainder` rather than being dropped.
#[derive(Clone, Debug)]
pub struct CatchUpSuggestion {
    pub assignments: Vec<CatchUpAssignment>,
    pub remainder: Vec<CatchUpChapter>,
}

fn entries_by_day(entries: &[ProgressEntry]) -> HashMap<u32, &ProgressEntry> {
    entries.iter().map(|e| (e.day_number, e)).collect()
}

fn is_completed(entries: &HashMap<u32, &ProgressEntry>, day_number: u32) -> bool {
    entries
        .get(&day_number)
        .map(|e| e.completed)
        .unwrap_or(false)
}

/// Signed schedule position: positive means ahead of schedule, negative
/// behind. Days scheduled strictly before today and not completed count
/// against; days scheduled today or later but already completed count in
/// favor.
pub fn days_ahead_behind(days: &[PlanDay], entries: &[ProgressEntry], today: Date) -> i64 {
    let entries = entries_by_day(entries);
    let mut ahead: i64 = 0;
    let mut behind: i64 = 0;
    for day in days {
        let completed = is_completed(&entries, day.day_number);
        if day.date < today && !completed {
            behind += 1;
        } else if day.date >= today && completed {
            ahead += 1;
        }
    }
    ahead - behind
}

/// All not-yet-read chapters of overdue, incomplete days, each tagged with
/// the day it was scheduled on. Days with no progress entry contribute
/// their whole chapter list. Chapters an earlier catch-up already
/// redistributed (as an addition on some other day, or onto a dedicated
/// catch-up day) are excluded, so applying a suggestion and running
/// catch-up again does not re-suggest the same chapters.
pub fn overdue_backlog(
    days: &[PlanDay],
    entries: &[ProgressEntry],
    today: Date,
) -> Vec<CatchUpChapter> {
    // Spread-mode additions carry their origin day, so the exclusion is
    // exact per (chapter, origin) pair.
    let assigned: HashSet<(&ChapterRef, u32)> = entries
        .iter()
        .flat_map(|e| e.added_chapters.iter())
        .map(|a| (&a.chapter, a.original_day_number))
        .collect();
    // Dedicated catch-up days drop the origin tag, so their chapters are
    // excluded by reference alone.
    let rescheduled: HashSet<&ChapterRef> = days
        .iter()
        .filter(|d| d.is_catch_up)
        .flat_map(|d| d.chapters.iter())
        .collect();
    let entries = entries_by_day(entries);
    let mut backlog = Vec::new();
    let mut days: Vec<&PlanDay> = days.iter().collect();
    days.sort_by_key(|d| d.day_number);
    for day in days {
        if day.date >= today {
            continue;
        }
        let unread = match entries.get(&day.day_number) {
            Some(entry) => {
                if entry.completed {
                    continue;
                }
                entry.unread_chapters()
            }
            None => day.chapters.clone(),
        };
        for chapter in unread {
            if assigned.contains(&(&chapter, day.day_number)) {
                continue;
            }
            // An overdue catch-up day's own chapters stay reachable.
            if !day.is_catch_up && rescheduled.contains(&chapter) {
                continue;
            }
            backlog.push(CatchUpChapter {
                chapter,
                original_day_number: day.day_number,
            });
        }
    }
    backlog
}

/// Spread mode: distribute the overdue backlog across future plan days in
/// chronological order, adding at most `max_per_day` extra chapters to
/// each. Already-completed future days are left alone. Chapters that do
/// not fit are returned in the remainder.
pub fn suggest_spread(
    days: &[PlanDay],
    entries: &[ProgressEntry],
    today: Date,
    max_per_day: usize,
) -> CatchUpSuggestion {
    let by_day = entries_by_day(entries);
    let mut backlog = overdue_backlog(days, entries, today).into_iter();
    let mut future: Vec<&PlanDay> = days.iter().filter(|d| d.date >= today).collect();
    future.sort_by_key(|d| d.day_number);

    let mut assignments = Vec::new();
    for day in future {
        if is_completed(&by_day, day.day_number) {
            continue;
        }
        let existing = by_day
            .get(&day.day_number)
            .map(|e| e.added_chapters.len())
            .unwrap_or(0);
        let capacity = max_per_day.saturating_sub(existing);
        let added: Vec<CatchUpChapter> = backlog.by_ref().take(capacity).collect();
        if added.is_empty() {
            continue;
        }
        assignments.push(CatchUpAssignment {
            day_number: day.day_number,
            added,
        });
    }
    CatchUpSuggestion {
        assignments,
        remainder: backlog.collect(),
    }
}

/// Dedicated mode: chunk the overdue backlog into brand-new days appended
/// after the plan's last day, `max_per_day` chapters each, dated
/// sequentially starting tomorrow.
pub fn dedicated_days(
    days: &[PlanDay],
    entries: &[ProgressEntry],
    today: Date,
    max_per_day: usize,
) -> Vec<PlanDay> {
    let backlog = overdue_backlog(days, entries, today);
    if backlog.is_empty() || max_per_day == 0 {
        return Vec::new();
    }
    let last_day_number = days.iter().map(|d| d.day_number).max().unwrap_or(0);
    let mut new_days = Vec::new();
    let mut date = today.succ();
    let mut day_number = last_day_number;
    for chunk in backlog.chunks(max_per_day) {
        day_number += 1;
        new_days.push(PlanDay {
            day_number,
            date,
            chapters: chunk.iter().map(|c| c.chapter.clone()).collect(),
            is_catch_up: true,
        });
        date = date.succ();
    }
    new_days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chapter::ChapterRef;

    /// A plan of `n` days starting 2026-01-01, one Genesis chapter per day.
    fn days(n: u32) -> Vec<PlanDay> {
        let mut date = Date::parse("2026-01-01").unwrap();
        let mut days = Vec::new();
        for i in 1..=n {
            days.push(PlanDay {
                day_number: i,
                date,
                chapters: vec![ChapterRef::new("Genesis", i)],
                is_catch_up: false,
            });
            date = date.succ();
        }
        days
    }

    fn completed_entry(day: &PlanDay) -> ProgressEntry {
        let mut entry = ProgressEntry::new(day.day_number, &day.chapters);
        entry.completed = true;
        entry
    }

    #[test]
    fn test_ten_days_behind() {
        // Days 1-10 in the past, all incomplete; today is day 11.
        let days = days(14);
        let today = Date::parse("2026-01-11").unwrap();
        assert_eq!(days_ahead_behind(&days, &[], today), -10);
    }

    #[test]
    fn test_ahead_of_schedule() {
        let days = days(14);
        let today = Date::parse("2026-01-01").unwrap();
        let entries: Vec<ProgressEntry> = days[..3].iter().map(completed_entry).collect();
        assert_eq!(days_ahead_behind(&days, &entries, today), 3);
    }

    #[test]
    fn test_on_schedule() {
        let days = days(14);
        let today = Date::parse("2026-01-03").unwrap();
        let entries: Vec<ProgressEntry> = days[..2].iter().map(completed_entry).collect();
        assert_eq!(days_ahead_behind(&days, &entries, today), 0);
    }

    #[test]
    fn test_spread_distribution() {
        // Scenario: 10 overdue chapters, max 3 per future day.
        let days = days(14);
        let today = Date::parse("2026-01-11").unwrap();
        let suggestion = suggest_spread(&days, &[], today, 3);
        let sizes: Vec<usize> = suggestion.assignments.iter().map(|a| a.added.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        assert_eq!(
            suggestion.assignments[0]
                .added
                .iter()
                .map(|c| c.original_day_number)
                .collect::<Vec<u32>>(),
            vec![1, 2, 3]
        );
        assert!(suggestion.remainder.is_empty());
    }

    #[test]
    fn test_spread_overflow_reported() {
        // 10 overdue chapters, but only 2 future days of capacity 3.
        let days = days(12);
        let today = Date::parse("2026-01-11").unwrap();
        let suggestion = suggest_spread(&days, &[], today, 3);
        let assigned: usize = suggestion.assignments.iter().map(|a| a.added.len()).sum();
        assert_eq!(assigned, 6);
        assert_eq!(suggestion.remainder.len(), 4);
    }

    #[test]
    fn test_spread_skips_completed_days() {
        let days = days(14);
        let today = Date::parse("2026-01-11").unwrap();
        // Only day 1 is read; day 11 was completed early.
        let entries = vec![completed_entry(&days[0]), completed_entry(&days[10])];
        let suggestion = suggest_spread(&days, &entries, today, 3);
        let targets: Vec<u32> = suggestion.assignments.iter().map(|a| a.day_number).collect();
        assert_eq!(targets, vec![12, 13, 14]);
        // 9 overdue chapters over 3 days of 3.
        assert!(suggestion.remainder.is_empty());
    }

    #[test]
    fn test_spread_is_not_resuggested_after_apply() {
        // 10 overdue chapters spread over days 11-14, then the resulting
        // additions recorded on those days' entries. A second run must
        // find nothing left to assign.
        let days = days(14);
        let today = Date::parse("2026-01-11").unwrap();
        let first = suggest_spread(&days, &[], today, 3);
        assert!(!first.assignments.is_empty());
        let mut entries = Vec::new();
        for assignment in &first.assignments {
            let day = &days[(assignment.day_number - 1) as usize];
            let mut effective = day.chapters.clone();
            effective.extend(assignment.added.iter().map(|a| a.chapter.clone()));
            let mut entry = ProgressEntry::new(assignment.day_number, &effective);
            entry.added_chapters = assignment.added.clone();
            entries.push(entry);
        }
        let second = suggest_spread(&days, &entries, today, 3);
        assert!(second.assignments.is_empty());
        assert!(second.remainder.is_empty());
    }

    #[test]
    fn test_dedicated_is_not_resuggested_after_apply() {
        // Appending the dedicated days to the plan empties the backlog.
        let mut days = days(12);
        let today = Date::parse("2026-01-11").unwrap();
        let first = dedicated_days(&days, &[], today, 3);
        assert_eq!(first.len(), 4);
        days.extend(first);
        assert!(dedicated_days(&days, &[], today, 3).is_empty());
        assert!(overdue_backlog(&days, &[], today).is_empty());
    }

    #[test]
    fn test_overdue_dedicated_day_is_respread() {
        // A dedicated catch-up day that itself falls behind contributes
        // its own unread chapters to the next backlog.
        let mut days = days(3);
        let today = Date::parse("2026-01-10").unwrap();
        days.push(PlanDay {
            day_number: 4,
            date: Date::parse("2026-01-05").unwrap(),
            chapters: vec![ChapterRef::new("Exodus", 1)],
            is_catch_up: true,
        });
        let backlog = overdue_backlog(&days, &[], today);
        assert!(
            backlog
                .iter()
                .any(|c| c.chapter == ChapterRef::new("Exodus", 1))
        );
    }

    #[test]
    fn test_backlog_only_unread_chapters() {
        let days = days(5);
        let today = Date::parse("2026-01-04").unwrap();
        // Day 1 half-read: mark its only chapter checked via the log.
        let mut entry = ProgressEntry::new(1, &days[0].chapters);
        entry.chapters[0].actions.push(crate::progress::ActionRecord {
            action: crate::types::action::ChapterAction::Checked,
            at: crate::types::timestamp::Timestamp::now(),
        });
        let backlog = overdue_backlog(&days, &[entry], today);
        // Days 2 and 3 remain; day 1's chapter is already read.
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog[0].original_day_number, 2);
        assert_eq!(backlog[1].original_day_number, 3);
    }

    #[test]
    fn test_dedicated_days() {
        let days = days(12);
        let today = Date::parse("2026-01-11").unwrap();
        let new_days = dedicated_days(&days, &[], today, 3);
        assert_eq!(new_days.len(), 4);
        assert_eq!(new_days[0].day_number, 13);
        assert_eq!(new_days[0].date, Date::parse("2026-01-12").unwrap());
        assert_eq!(new_days[0].chapters.len(), 3);
        assert_eq!(new_days[3].day_number, 16);
        assert_eq!(new_days[3].chapters.len(), 1);
        for day in &new_days {
            assert!(day.is_catch_up);
        }
    }

    #[test]
    fn test_dedicated_days_empty_backlog() {
        let days = days(5);
        let today = Date::parse("2026-01-01").unwrap();
        assert!(dedicated_days(&days, &[], today, 3).is_empty());
    }
}
