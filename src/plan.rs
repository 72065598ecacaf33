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

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

use crate::canon::Canon;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::chapter::ChapterRef;
use crate::types::date::Date;
use crate::types::ordering::BookOrdering;

/// User input for plan generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    pub start_date: Date,
    pub end_date: Date,
    /// Weekdays to skip, Sunday = 0.
    #[serde(default)]
    pub excluded_weekdays: Vec<u8>,
    pub books: Vec<String>,
    #[serde(default)]
    pub ordering: BookOrdering,
    #[serde(default)]
    pub reverse_order: bool,
    #[serde(default)]
    pub daily_psalm: bool,
    #[serde(default)]
    pub daily_proverb: bool,
    #[serde(default)]
    pub randomize_psalms: bool,
    #[serde(default)]
    pub randomize_proverbs: bool,
}

/// One scheduled reading day. Days past the end of the chapter supply have
/// an empty chapter list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub day_number: u32,
    pub date: Date,
    pub chapters: Vec<ChapterRef>,
    #[serde(default)]
    pub is_catch_up: bool,
}

/// A generated plan. Immutable once created; regeneration replaces it
/// wholesale. Catch-up days are additive records, never edits to `days`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPlan {
    pub config: PlanConfig,
    pub days: Vec<PlanDay>,
    pub total_days: u32,
    pub total_chapters: u32,
    pub avg_chapters_per_day: f64,
}

/// Generate a plan from a configuration. Pure and deterministic except for
/// shuffled ordering and randomized Psalm/Proverb injection, which are
/// seeded by call-time randomness.
pub fn generate(config: &PlanConfig) -> Fallible<ReadingPlan> {
    let canon = Canon::get();
    validate(config, canon)?;

    let dates = schedulable_dates(config);
    if dates.is_empty() {
        return fail("the date range contains no schedulable days.");
    }

    let mut rng = rand::thread_rng();
    let sequence = flatten_sequence(config, canon, &mut rng);

    // Front-load chapters: ceil(total / days) per day, so the final days
    // receive the remainder (possibly nothing).
    let chapters_per_day = sequence.len().div_ceil(dates.len());
    let mut days: Vec<PlanDay> = Vec::with_capacity(dates.len());
    let mut supply = sequence.into_iter();
    for (i, date) in dates.into_iter().enumerate() {
        let chapters: Vec<ChapterRef> = supply.by_ref().take(chapters_per_day).collect();
        days.push(PlanDay {
            day_number: (i + 1) as u32,
            date,
            chapters,
            is_catch_up: false,
        });
    }

    if config.daily_psalm {
        inject_daily_book(&mut days, "Psalms", config.randomize_psalms, canon, &mut rng);
    }
    if config.daily_proverb {
        inject_daily_book(
            &mut days,
            "Proverbs",
            config.randomize_proverbs,
            canon,
            &mut rng,
        );
    }

    let total_days = days.len() as u32;
    let total_chapters: u32 = days.iter().map(|d| d.chapters.len() as u32).sum();
    let avg_chapters_per_day = total_chapters as f64 / total_days as f64;
    Ok(ReadingPlan {
        config: config.clone(),
        days,
        total_days,
        total_chapters,
        avg_chapters_per_day,
    })
}

fn validate(config: &PlanConfig, canon: &Canon) -> Fallible<()> {
    if config.books.is_empty() {
        return fail("the book list is empty.");
    }
    if config.start_date > config.end_date {
        return fail("the start date is after the end date.");
    }
    for weekday in &config.excluded_weekdays {
        if *weekday > 6 {
            return fail(format!("invalid weekday: {weekday} (must be 0-6)."));
        }
    }
    let excluded: HashSet<u8> = config.excluded_weekdays.iter().copied().collect();
    if excluded.len() == 7 {
        return fail("every weekday is excluded.");
    }
    for book in &config.books {
        if canon.book(book).is_none() {
            return fail(format!("unknown book: {book}."));
        }
    }
    Ok(())
}

/// Walk the calendar from start to end inclusive, skipping excluded
/// weekdays.
fn schedulable_dates(config: &PlanConfig) -> Vec<Date> {
    let excluded: HashSet<u8> = config.excluded_weekdays.iter().copied().collect();
    let mut dates = Vec::new();
    let mut date = config.start_date;
    while date <= config.end_date {
        if !excluded.contains(&date.weekday_index()) {
            dates.push(date);
        }
        date = date.succ();
    }
    dates
}

/// Build the flat chapter sequence in the configured order.
fn flatten_sequence<R: Rng>(config: &PlanConfig, canon: &Canon, rng: &mut R) -> Vec<ChapterRef> {
    let mut books: Vec<&str> = config.books.iter().map(|b| b.as_str()).collect();
    if config.ordering == BookOrdering::Chronological {
        books.sort_by_key(|b| canon.chronological_position(b).unwrap_or(usize::MAX));
    }
    let mut sequence = Vec::new();
    for book in books {
        let count = canon.chapter_count(book).unwrap_or(0);
        for chapter in 1..=count {
            sequence.push(ChapterRef::new(book, chapter));
        }
    }
    if config.ordering == BookOrdering::Shuffled {
        sequence.shuffle(rng);
    }
    if config.reverse_order {
        sequence.reverse();
    }
    sequence
}

/// Append one chapter of `book` to every day: sequential cycling, or a
/// random chapter per day (with replacement) if `randomize` is set.
fn inject_daily_book<R: Rng>(
    days: &mut [PlanDay],
    book: &str,
    randomize: bool,
    canon: &Canon,
    rng: &mut R,
) {
    let count = match canon.chapter_count(book) {
        Some(count) => count,
        None => return,
    };
    for (i, day) in days.iter_mut().enumerate() {
        let chapter = if randomize {
            rng.gen_range(1..=count)
        } else {
            (i as u32 % count) + 1
        };
        day.chapters.push(ChapterRef::new(book, chapter));
    }
}
