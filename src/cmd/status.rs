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

use crate::catchup::days_ahead_behind;
use crate::cmd::require_active_plan;
use crate::db::Database;
use crate::error::Fallible;
use crate::streak::calculate_streak;
use crate::types::date::Date;

pub fn print_status(directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let (plan_id, plan) = require_active_plan(&db)?;
    let entries = db.get_progress_for_plan(plan_id)?;
    let today = Date::today();
    let position = days_ahead_behind(&plan.days, &entries, today);
    let streak = calculate_streak(&entries);
    let completed = entries.iter().filter(|e| e.completed).count();
    println!(
        "Plan {plan_id}: {} to {}, {completed} of {} days completed.",
        plan.config.start_date, plan.config.end_date, plan.total_days
    );
    println!("Schedule: {}.", describe_position(position));
    println!("Streak: {streak} {}.", plural(streak as i64, "day"));
    Ok(())
}

pub fn describe_position(position: i64) -> String {
    if position == 0 {
        "on schedule".to_string()
    } else if position > 0 {
        format!("{position} {} ahead", plural(position, "day"))
    } else {
        format!("{} {} behind", -position, plural(-position, "day"))
    }
}

fn plural(n: i64, noun: &str) -> String {
    if n == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_position() {
        assert_eq!(describe_position(0), "on schedule");
        assert_eq!(describe_position(1), "1 day ahead");
        assert_eq!(describe_position(3), "3 days ahead");
        assert_eq!(describe_position(-1), "1 day behind");
        assert_eq!(describe_position(-10), "10 days behind");
    }
}
