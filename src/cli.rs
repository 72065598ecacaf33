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

use clap::Parser;

use crate::cmd::catchup::CatchUpMode;
use crate::cmd::export::ExportFormat;
use crate::cmd::stats::StatsFormat;
use crate::error::Fallible;
use crate::error::fail;
use crate::plan::PlanConfig;
use crate::types::date::Date;
use crate::types::ordering::BookOrdering;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Generate a new reading plan, replacing the active one.
    Plan {
        /// First day of the plan (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
        /// Last day of the plan (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        /// Books to read, comma-separated.
        #[arg(long, value_delimiter = ',')]
        books: Vec<String>,
        /// Book ordering.
        #[arg(long, default_value_t = BookOrdering::Canonical)]
        order: BookOrdering,
        /// Weekdays to skip, comma-separated, Sunday = 0.
        #[arg(long, value_delimiter = ',')]
        skip_weekdays: Vec<u8>,
        /// Read the chapter sequence back to front.
        #[arg(long)]
        reverse: bool,
        /// Add one Psalm to every day.
        #[arg(long)]
        daily_psalm: bool,
        /// Add one Proverbs chapter to every day.
        #[arg(long)]
        daily_proverb: bool,
        /// Pick the daily Psalm at random instead of cycling.
        #[arg(long)]
        random_psalms: bool,
        /// Pick the daily Proverbs chapter at random instead of cycling.
        #[arg(long)]
        random_proverbs: bool,
        /// Read the plan configuration from a TOML file instead of flags.
        #[arg(long)]
        config: Option<String>,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// List the active plan's days with their progress.
    Days {
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Mark a chapter as read, e.g. `check 3 "Genesis 7"`.
    Check {
        /// The day number.
        day: u32,
        /// The chapter, e.g. "Genesis 7".
        chapter: String,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Mark a chapter as unread.
    Uncheck {
        /// The day number.
        day: u32,
        /// The chapter, e.g. "Genesis 7".
        chapter: String,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Mark every chapter of a day as read.
    Complete {
        /// The day number.
        day: u32,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Show schedule position and reading streak.
    Status {
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Suggest a catch-up adjustment for overdue days.
    CatchUp {
        /// How to absorb the overdue chapters.
        #[arg(long, default_value_t = CatchUpMode::Spread)]
        mode: CatchUpMode,
        /// Maximum extra chapters per day.
        #[arg(long, default_value_t = 3)]
        max_per_day: usize,
        /// Apply the suggestion instead of just printing it.
        #[arg(long)]
        apply: bool,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Print reading statistics.
    Stats {
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Export the active plan and its progress.
    Export {
        /// Output format.
        #[arg(long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// List stored plans, newest first.
    History {
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
    /// Delete a stored plan and all its progress.
    Delete {
        /// The plan id, as shown by `history`.
        plan: i64,
        /// Optional path to the plan directory.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Plan {
            start,
            end,
            books,
            order,
            skip_weekdays,
            reverse,
            daily_psalm,
            daily_proverb,
            random_psalms,
            random_proverbs,
            config,
            directory,
        } => {
            let config: PlanConfig = match config {
                Some(path) => crate::cmd::plan::config_from_file(&path)?,
                None => {
                    let Some(start) = start else {
                        return fail("--start is required (or use --config).");
                    };
                    let Some(end) = end else {
                        return fail("--end is required (or use --config).");
                    };
                    PlanConfig {
                        start_date: Date::parse(&start)?,
                        end_date: Date::parse(&end)?,
                        excluded_weekdays: skip_weekdays,
                        books,
                        ordering: order,
                        reverse_order: reverse,
                        daily_psalm,
                        daily_proverb,
                        randomize_psalms: random_psalms,
                        randomize_proverbs: random_proverbs,
                    }
                }
            };
            crate::cmd::plan::generate_plan(&config, directory)
        }
        Command::Days { directory } => crate::cmd::days::list_days(directory),
        Command::Check {
            day,
            chapter,
            directory,
        } => crate::cmd::mark::check_chapter(day, &chapter, directory),
        Command::Uncheck {
            day,
            chapter,
            directory,
        } => crate::cmd::mark::uncheck_chapter(day, &chapter, directory),
        Command::Complete { day, directory } => crate::cmd::mark::complete_day(day, directory),
        Command::Status { directory } => crate::cmd::status::print_status(directory),
        Command::CatchUp {
            mode,
            max_per_day,
            apply,
            directory,
        } => crate::cmd::catchup::catch_up(mode, max_per_day, apply, directory),
        Command::Stats { format, directory } => crate::cmd::stats::print_stats(format, directory),
        Command::Export { format, directory } => {
            crate::cmd::export::export_plan(format, directory)
        }
        Command::History { directory } => crate::cmd::history::list_history(directory),
        Command::Delete { plan, directory } => crate::cmd::history::delete_plan(plan, directory),
    }
}
