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

use crate::db::Database;
use crate::db::PlanId;
use crate::error::Fallible;

pub fn list_history(directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    let history = db.plan_history()?;
    if history.is_empty() {
        println!("No plans.");
        return Ok(());
    }
    for summary in history {
        let marker = if summary.active { "*" } else { " " };
        println!(
            "{marker} {}: {} to {}, {} chapters over {} days (created {}).",
            summary.plan_id,
            summary.start_date,
            summary.end_date,
            summary.total_chapters,
            summary.total_days,
            summary.created_at.local_date()
        );
    }
    Ok(())
}

pub fn delete_plan(plan_id: PlanId, directory: Option<String>) -> Fallible<()> {
    let db = Database::open_in(directory)?;
    db.delete_plan(plan_id)?;
    println!("Deleted plan {plan_id}.");
    Ok(())
}
