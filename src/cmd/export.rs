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
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::canon::Canon;
use crate::cmd::require_active_plan;
use crate::db::Database;
use crate::db::PlanId;
use crate::error::Fallible;
use crate::plan::PlanConfig;
use crate::plan::ReadingPlan;
use crate::progress::ActionRecord;
use crate::progress::CatchUpChapter;
use crate::progress::ProgressEntry;
use crate::progress::read_totals;
use crate::types::chapter::ChapterRef;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum ExportFormat {
    /// JSON output.
    Json,
    /// A Markdown table.
    Markdown,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

pub fn export_plan(format: ExportFormat, directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    let entries = db.get_progress_for_plan(plan_id)?;
    match format {
        ExportFormat::Json => {
            let export = get_export(plan_id, &plan, &entries);
            let json = serde_json::to_string_pretty(&export)?;
            println!("{json}");
        }
        ExportFormat::Markdown => {
            print!("{}", render_markdown(&plan, &entries));
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    plan_id: PlanId,
    generated_at: Timestamp,
    config: PlanConfig,
    total_days: u32,
    total_chapters: u32,
    verse_stats: VerseStats,
    timeline: Vec<DayExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerseStats {
    chapters_read: u32,
    verses_read: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayExport {
    day_number: u32,
    date: Date,
    is_catch_up: bool,
    chapters: Vec<ChapterExport>,
    added_chapters: Vec<CatchUpChapter>,
    started_reading_at: Option<Timestamp>,
    completed: bool,
    completed_at: Option<Timestamp>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterExport {
    chapter: ChapterRef,
    checked: bool,
    actions: Vec<ActionRecord>,
}

fn get_export(plan_id: PlanId, plan: &ReadingPlan, entries: &[ProgressEntry]) -> Export {
    let by_day: HashMap<u32, &ProgressEntry> =
        entries.iter().map(|e| (e.day_number, e)).collect();
    let (chapters_read, verses_read) = read_totals(entries, Canon::get());
    let mut timeline = Vec::with_capacity(plan.days.len());
    for day in &plan.days {
        let day_export = match by_day.get(&day.day_number) {
            Some(entry) => DayExport {
                day_number: day.day_number,
                date: day.date,
                is_catch_up: day.is_catch_up,
                chapters: entry
                    .chapters
                    .iter()
                    .map(|c| ChapterExport {
                        chapter: c.chapter.clone(),
                        checked: c.is_checked(),
                        actions: c.actions.clone(),
                    })
                    .collect(),
                added_chapters: entry.added_chapters.clone(),
                started_reading_at: entry.started_reading_at,
                completed: entry.completed,
                completed_at: entry.completed_at,
            },
            None => DayExport {
                day_number: day.day_number,
                date: day.date,
                is_catch_up: day.is_catch_up,
                chapters: day
                    .chapters
                    .iter()
                    .map(|c| ChapterExport {
                        chapter: c.clone(),
                        checked: false,
                        actions: Vec::new(),
                    })
                    .collect(),
                added_chapters: Vec::new(),
                started_reading_at: None,
                completed: false,
                completed_at: None,
            },
        };
        timeline.push(day_export);
    }
    Export {
        plan_id,
        generated_at: Timestamp::now(),
        config: plan.config.clone(),
        total_days: plan.total_days,
        total_chapters: plan.total_chapters,
        verse_stats: VerseStats {
            chapters_read,
            verses_read,
        },
        timeline,
    }
}

/// Render the plan as a Markdown table, one row per day. Checked chapters
/// are struck through.
fn render_markdown(plan: &ReadingPlan, entries: &[ProgressEntry]) -> String {
    let by_day: HashMap<u32, &ProgressEntry> =
        entries.iter().map(|e| (e.day_number, e)).collect();
    let mut out = String::new();
    let _ = writeln!(out, "| Day | Date | Chapters | Done |");
    let _ = writeln!(out, "|-----|------|----------|------|");
    for day in &plan.days {
        let (chapters, done) = match by_day.get(&day.day_number) {
            Some(entry) => {
                let chapters: Vec<String> = entry
                    .chapters
                    .iter()
                    .map(|c| {
                        if c.is_checked() {
                            format!("~~{}~~", c.chapter)
                        } else {
                            c.chapter.to_string()
                        }
                    })
                    .collect();
                (chapters, entry.completed)
            }
            None => {
                let chapters: Vec<String> =
                    day.chapters.iter().map(|c| c.to_string()).collect();
                (chapters, false)
            }
        };
        let done = if done { "yes" } else { "" };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            day.day_number,
            day.date,
            chapters.join(", "),
            done
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanDay;
    use crate::progress::ChapterProgress;
    use crate::types::action::ChapterAction;
    use crate::types::ordering::BookOrdering;

    fn plan() -> ReadingPlan {
        let config = PlanConfig {
            start_date: Date::parse("2026-01-01").unwrap(),
            end_date: Date::parse("2026-01-02").unwrap(),
            excluded_weekdays: Vec::new(),
            books: vec!["Genesis".to_string()],
            ordering: BookOrdering::Canonical,
            reverse_order: false,
            daily_psalm: false,
            daily_proverb: false,
            randomize_psalms: false,
            randomize_proverbs: false,
        };
        let days = vec![
            PlanDay {
                day_number: 1,
                date: Date::parse("2026-01-01").unwrap(),
                chapters: vec![ChapterRef::new("Genesis", 1)],
                is_catch_up: false,
            },
            PlanDay {
                day_number: 2,
                date: Date::parse("2026-01-02").unwrap(),
                chapters: vec![ChapterRef::new("Genesis", 2)],
                is_catch_up: false,
            },
        ];
        ReadingPlan {
            config,
            days,
            total_days: 2,
            total_chapters: 2,
            avg_chapters_per_day: 1.0,
        }
    }

    fn completed_entry(day_number: u32, chapter: ChapterRef) -> ProgressEntry {
        let mut entry = ProgressEntry::new(day_number, &[chapter.clone()]);
        entry.chapters = vec![ChapterProgress {
            chapter,
            actions: vec![ActionRecord {
                action: ChapterAction::Checked,
                at: Timestamp::now(),
            }],
        }];
        entry.completed = true;
        entry
    }

    #[test]
    fn test_render_markdown() {
        let plan = plan();
        let entries = vec![completed_entry(1, ChapterRef::new("Genesis", 1))];
        let rendered = render_markdown(&plan, &entries);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "| Day | Date | Chapters | Done |");
        assert_eq!(lines[2], "| 1 | 2026-01-01 | ~~Genesis 1~~ | yes |");
        assert_eq!(lines[3], "| 2 | 2026-01-02 | Genesis 2 |  |");
    }

    #[test]
    fn test_export_json_shape() -> Fallible<()> {
        let plan = plan();
        let entries = vec![completed_entry(1, ChapterRef::new("Genesis", 1))];
        let export = get_export(7, &plan, &entries);
        let json = serde_json::to_string(&export)?;
        assert!(json.contains("\"planId\":7"));
        assert!(json.contains("\"dayNumber\":1"));
        assert!(json.contains("\"checked\":true"));
        assert!(json.contains("\"completed\":false"));
        // Genesis 1 has 31 verses.
        assert!(json.contains("\"verseStats\":{\"chaptersRead\":1,\"versesRead\":31}"));
        Ok(())
    }
}
