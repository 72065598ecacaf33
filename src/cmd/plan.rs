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
use crate::error::Fallible;
use crate::plan::PlanConfig;
use crate::plan::ReadingPlan;
use crate::plan::generate;

/// Generate a plan from the given configuration and store it as the
/// active plan.
pub fn generate_plan(config: &PlanConfig, directory: Option<String>) -> Fallible<()> {
    let plan: ReadingPlan = generate(config)?;
    let db = Database::open_in(directory)?;
    let plan_id = db.save_plan(&plan)?;
    println!(
        "Generated plan {plan_id}: {} chapters over {} days ({:.1} chapters/day), {} to {}.",
        plan.total_chapters,
        plan.total_days,
        plan.avg_chapters_per_day,
        config.start_date,
        config.end_date
    );
    Ok(())
}

/// Read a plan configuration from a TOML file.
pub fn config_from_file(path: &str) -> Fallible<PlanConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: PlanConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::ordering::BookOrdering;

    #[test]
    fn test_config_from_file() -> Fallible<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"
startDate = "2026-01-01"
endDate = "2026-02-19"
books = ["Genesis"]
ordering = "chronological"
excludedWeekdays = [0, 6]
dailyPsalm = true
"#
        )?;
        let config = config_from_file(file.path().to_str().unwrap())?;
        assert_eq!(config.books, vec!["Genesis".to_string()]);
        assert_eq!(config.ordering, BookOrdering::Chronological);
        assert_eq!(config.excluded_weekdays, vec![0, 6]);
        assert!(config.daily_psalm);
        assert!(!config.daily_proverb);
        assert!(!config.reverse_order);
        Ok(())
    }

    #[test]
    fn test_config_from_file_invalid() -> Fallible<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "books = [\"Genesis\"]")?;
        assert!(config_from_file(file.path().to_str().unwrap()).is_err());
        Ok(())
    }
}
