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

use crate::progress::ProgressEntry;

/// Count consecutive completed days ending at the most recent entry. Day
/// numbers are assigned sequentially by the generator, so they stand in
/// for chronological order. Returns 0 if the most recent entry is
/// incomplete: the streak must be live, it is not a best-ever streak.
pub fn calculate_streak(entries: &[ProgressEntry]) -> u32 {
    let mut entries: Vec<&ProgressEntry> = entries.iter().collect();
    entries.sort_by_key(|e| e.day_number);
    let Some(last) = entries.last() else {
        return 0;
    };
    if !last.completed {
        return 0;
    }
    let mut streak = 1;
    let mut previous = last.day_number;
    for entry in entries.iter().rev().skip(1) {
        if entry.day_number == previous - 1 && entry.completed {
            streak += 1;
            previous = entry.day_number;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day_number: u32, completed: bool) -> ProgressEntry {
        let mut entry = ProgressEntry::new(day_number, &[]);
        entry.completed = completed;
        entry
    }

    #[test]
    fn test_empty() {
        assert_eq!(calculate_streak(&[]), 0);
    }

    #[test]
    fn test_most_recent_incomplete_is_zero() {
        // Prior history is irrelevant when the latest day is incomplete.
        let entries = vec![entry(1, true), entry(2, true), entry(3, false)];
        assert_eq!(calculate_streak(&entries), 0);
    }

    #[test]
    fn test_consecutive_run() {
        let entries = vec![entry(1, true), entry(2, true), entry(3, true)];
        assert_eq!(calculate_streak(&entries), 3);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let entries = vec![entry(1, true), entry(2, false), entry(3, true), entry(4, true)];
        assert_eq!(calculate_streak(&entries), 2);
    }

    #[test]
    fn test_missing_day_breaks_streak() {
        // No entry for day 3 at all.
        let entries = vec![entry(1, true), entry(2, true), entry(4, true)];
        assert_eq!(calculate_streak(&entries), 1);
    }

    #[test]
    fn test_unsorted_input() {
        let entries = vec![entry(3, true), entry(1, true), entry(2, true)];
        assert_eq!(calculate_streak(&entries), 3);
    }
}
