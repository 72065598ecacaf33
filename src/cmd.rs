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

pub mod catchup;
pub mod days;
pub mod export;
pub mod history;
pub mod mark;
pub mod plan;
pub mod stats;
pub mod status;

use crate::db::Database;
use crate::db::PlanId;
use crate::error::Fallible;
use crate::error::fail;
use crate::plan::ReadingPlan;

/// Load the active plan or report that none exists.
pub(crate) fn require_active_plan(db: &Database) -> Fallible<(PlanId, ReadingPlan)> {
    match db.active_plan()? {
        Some(result) => Ok(result),
        None => fail("no active plan. Generate one with `lectio plan`."),
    }
}
