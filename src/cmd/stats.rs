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
use serde::Serialize;

use crate::canon::Canon;
use crate::catchup::days_ahead_behind;
use crate::cmd::require_active_plan;
use crate::cmd::status::describe_position;
use crate::db::Database;
use crate::error::Fallible;
use crate::plan::ReadingPlan;
use crate::progress::ProgressEntry;
use crate::progress::read_totals;
use crate::streak::calculate_streak;
use crate::types::date::Date;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    total_days: u32,
    days_completed: u32,
    total_chapters: u32,
    chapters_read: u32,
    verses_read: u32,
    current_streak: u32,
    days_ahead_behind: i64,
}

pub fn print_stats(format: StatsFormat, directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    let entries = db.get_progress_for_plan(plan_id)?;
    let stats = get_stats(&plan, &entries, Date::today());
    match format {
        StatsFormat::Text => {
            println!("Days completed: {}/{}", stats.days_completed, stats.total_days);
            println!(
                "Chapters read: {}/{}",
                stats.chapters_read, stats.total_chapters
            );
            println!("Verses read: {}", stats.verses_read);
            println!("Current streak: {}", stats.current_streak);
            println!("Schedule: {}", describe_position(stats.days_ahead_behind));
        }
        StatsFormat::Json => {
            let json = serde_json::to_string_pretty(&stats)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn get_stats(plan: &ReadingPlan, entries: &[ProgressEntry], today: Date) -> Stats {
    let (chapters_read, verses_read) = read_totals(entries, Canon::get());
    Stats {
        total_days: plan.days.len() as u32,
        days_completed: entries.iter().filter(|e| e.completed).count() as u32,
        total_chapters: plan.total_chapters,
        chapters_read,
        verses_read,
        current_streak: calculate_streak(entries),
        days_ahead_behind: days_ahead_behind(&plan.days, entries, today),
    }
}
