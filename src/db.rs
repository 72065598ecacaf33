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

use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::plan::PlanConfig;
use crate::plan::PlanDay;
use crate::plan::ReadingPlan;
use crate::progress::ActionRecord;
use crate::progress::CatchUpChapter;
use crate::progress::ProgressEntry;
use crate::types::action::ChapterAction;
use crate::types::chapter::ChapterRef;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

pub type PlanId = i64;

/// How many plans to keep: the active plan plus history.
const PLAN_HISTORY_CAP: i64 = 10;

/// A plan row without its days, for history listings.
pub struct PlanSummary {
    pub plan_id: PlanId,
    pub created_at: Timestamp,
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: u32,
    pub total_chapters: u32,
    pub active: bool,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Open the database in the given directory, defaulting to the current
    /// directory.
    pub fn open_in(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let db_path: PathBuf = directory.join("lectio.db");
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        Database::new(db_path)
    }

    /// Persist a freshly generated plan as the active plan, deactivating
    /// the previous one and pruning history beyond the cap.
    pub fn save_plan(&self, plan: &ReadingPlan) -> Fallible<PlanId> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        tx.execute("update plans set active = 0;", [])?;
        let config = serde_json::to_string(&plan.config)?;
        let plan_id: PlanId = tx.query_row(
            "insert into plans (created_at, config, total_days, total_chapters, active) values (?, ?, ?, ?, 1) returning plan_id;",
            (Timestamp::now(), config, plan.total_days, plan.total_chapters),
            |row| row.get(0),
        )?;
        insert_days(&tx, plan_id, &plan.days)?;
        // Cap the history: keep the newest plans, cascade-delete the rest.
        tx.execute(
            "delete from plans where plan_id not in (select plan_id from plans order by plan_id desc limit ?);",
            [PLAN_HISTORY_CAP],
        )?;
        tx.commit()?;
        log::debug!("Saved plan {plan_id}.");
        Ok(plan_id)
    }

    /// Load the active plan, with any dedicated catch-up days merged into
    /// its day list.
    pub fn active_plan(&self) -> Fallible<Option<(PlanId, ReadingPlan)>> {
        let conn = self.acquire();
        let mut stmt = conn.prepare(
            "select plan_id, config, total_days, total_chapters from plans where active = 1;",
        )?;
        let mut rows = stmt.query([])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let plan_id: PlanId = row.get(0)?;
        let config: String = row.get(1)?;
        let config: PlanConfig = serde_json::from_str(&config)?;
        let total_days: u32 = row.get(2)?;
        let total_chapters: u32 = row.get(3)?;
        drop(rows);
        drop(stmt);
        let days = load_days(&conn, plan_id)?;
        let avg_chapters_per_day = if total_days > 0 {
            total_chapters as f64 / total_days as f64
        } else {
            0.0
        };
        Ok(Some((
            plan_id,
            ReadingPlan {
                config,
                days,
                total_days,
                total_chapters,
                avg_chapters_per_day,
            },
        )))
    }

    /// All stored plans, newest first.
    pub fn plan_history(&self) -> Fallible<Vec<PlanSummary>> {
        let conn = self.acquire();
        let mut stmt = conn.prepare(
            "select plan_id, created_at, config, total_days, total_chapters, active from plans order by plan_id desc;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let config: String = row.get(2)?;
            let config: PlanConfig = serde_json::from_str(&config)?;
            summaries.push(PlanSummary {
                plan_id: row.get(0)?,
                created_at: row.get(1)?,
                start_date: config.start_date,
                end_date: config.end_date,
                total_days: row.get(3)?,
                total_chapters: row.get(4)?,
                active: row.get(5)?,
            });
        }
        Ok(summaries)
    }

    /// Delete a plan. Cascades to its days, progress, actions, and
    /// catch-up records.
    pub fn delete_plan(&self, plan_id: PlanId) -> Fallible<()> {
        let conn = self.acquire();
        let deleted = conn.execute("delete from plans where plan_id = ?;", [plan_id])?;
        if deleted == 0 {
            return fail(format!("no such plan: {plan_id}."));
        }
        Ok(())
    }

    /// Idempotent: create an empty progress entry for the day if none
    /// exists. Existing entries (and their action logs) are never
    /// overwritten.
    pub fn ensure_day_progress(&self, plan_id: PlanId, day_number: u32) -> Fallible<()> {
        let conn = self.acquire();
        ensure_entry(&conn, plan_id, day_number)?;
        Ok(())
    }

    /// Append a checked/unchecked action to a chapter's log and re-derive
    /// the day's completion. Returns the new completion state.
    /// `completed_at` is set or cleared only on the transition edge.
    pub fn set_chapter_action(
        &self,
        plan_id: PlanId,
        day_number: u32,
        chapter: &ChapterRef,
        action: ChapterAction,
        at: Timestamp,
    ) -> Fallible<bool> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        ensure_entry(&tx, plan_id, day_number)?;
        let entry = load_entry(&tx, plan_id, day_number)?;
        if entry.chapter_progress(chapter).is_none() {
            return fail(format!("{chapter} is not part of day {day_number}."));
        }
        insert_action(&tx, plan_id, day_number, chapter, action, at)?;
        let completed = rederive_completion(&tx, plan_id, day_number, at)?;
        tx.commit()?;
        Ok(completed)
    }

    /// Force-append a checked action for every chapter not already
    /// checked, then mark the day complete. Idempotent if the day is
    /// already complete.
    pub fn mark_day_complete(
        &self,
        plan_id: PlanId,
        day_number: u32,
        at: Timestamp,
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        ensure_entry(&tx, plan_id, day_number)?;
        let entry = load_entry(&tx, plan_id, day_number)?;
        if entry.completed {
            tx.commit()?;
            return Ok(());
        }
        for chapter in entry.unread_chapters() {
            insert_action(&tx, plan_id, day_number, &chapter, ChapterAction::Checked, at)?;
        }
        rederive_completion(&tx, plan_id, day_number, at)?;
        tx.commit()?;
        Ok(())
    }

    /// One-shot: record when the user first started reading the day.
    pub fn set_started_reading_at(
        &self,
        plan_id: PlanId,
        day_number: u32,
        at: Timestamp,
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        ensure_entry(&tx, plan_id, day_number)?;
        tx.execute(
            "update day_progress set started_reading_at = ? where plan_id = ? and day_number = ? and started_reading_at is null;",
            (at, plan_id, day_number),
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Apply a spread-mode catch-up adjustment: append the given chapters
    /// to the day's effective list. The day's own plan row is untouched.
    pub fn add_catch_up_additions(
        &self,
        plan_id: PlanId,
        day_number: u32,
        additions: &[CatchUpChapter],
    ) -> Fallible<()> {
        if additions.is_empty() {
            return Ok(());
        }
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        ensure_entry(&tx, plan_id, day_number)?;
        let mut position: i64 = tx.query_row(
            "select count(*) from catch_up_additions where plan_id = ? and day_number = ?;",
            (plan_id, day_number),
            |row| row.get(0),
        )?;
        for addition in additions {
            tx.execute(
                "insert into catch_up_additions (plan_id, day_number, position, book, chapter, original_day_number) values (?, ?, ?, ?, ?, ?);",
                (
                    plan_id,
                    day_number,
                    position,
                    &addition.chapter.book,
                    addition.chapter.chapter,
                    addition.original_day_number,
                ),
            )?;
            position += 1;
        }
        rederive_completion(&tx, plan_id, day_number, Timestamp::now())?;
        tx.commit()?;
        Ok(())
    }

    /// Apply a dedicated-mode catch-up: insert brand-new days after the
    /// plan's last day, tagged as catch-up days.
    pub fn append_catch_up_days(&self, plan_id: PlanId, days: &[PlanDay]) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        insert_days(&tx, plan_id, days)?;
        tx.commit()?;
        Ok(())
    }

    /// All progress entries for a plan, input to every derived computation
    /// (streak, catch-up, stats, export).
    pub fn get_progress_for_plan(&self, plan_id: PlanId) -> Fallible<Vec<ProgressEntry>> {
        let conn = self.acquire();
        let mut stmt = conn
            .prepare("select day_number from day_progress where plan_id = ? order by day_number;")?;
        let mut rows = stmt.query([plan_id])?;
        let mut day_numbers = Vec::new();
        while let Some(row) = rows.next()? {
            let day_number: u32 = row.get(0)?;
            day_numbers.push(day_number);
        }
        drop(rows);
        drop(stmt);
        let mut entries = Vec::new();
        for day_number in day_numbers {
            entries.push(load_entry(&conn, plan_id, day_number)?);
        }
        Ok(entries)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["plans"], |row| row.get(0))?;
    Ok(count > 0)
}

fn insert_days(conn: &Connection, plan_id: PlanId, days: &[PlanDay]) -> Fallible<()> {
    for day in days {
        conn.execute(
            "insert into plan_days (plan_id, day_number, date, is_catch_up) values (?, ?, ?, ?);",
            (plan_id, day.day_number, day.date, day.is_catch_up),
        )?;
        for (position, chapter) in day.chapters.iter().enumerate() {
            conn.execute(
                "insert into day_chapters (plan_id, day_number, position, book, chapter) values (?, ?, ?, ?, ?);",
                (plan_id, day.day_number, position as i64, &chapter.book, chapter.chapter),
            )?;
        }
    }
    Ok(())
}

fn load_days(conn: &Connection, plan_id: PlanId) -> Fallible<Vec<PlanDay>> {
    let mut stmt = conn.prepare(
        "select day_number, date, is_catch_up from plan_days where plan_id = ? order by day_number;",
    )?;
    let mut rows = stmt.query([plan_id])?;
    let mut days = Vec::new();
    while let Some(row) = rows.next()? {
        days.push(PlanDay {
            day_number: row.get(0)?,
            date: row.get(1)?,
            chapters: Vec::new(),
            is_catch_up: row.get(2)?,
        });
    }
    drop(rows);
    drop(stmt);
    for day in &mut days {
        day.chapters = load_day_chapters(conn, plan_id, day.day_number)?;
    }
    Ok(days)
}

fn load_day_chapters(
    conn: &Connection,
    plan_id: PlanId,
    day_number: u32,
) -> Fallible<Vec<ChapterRef>> {
    let mut stmt = conn.prepare(
        "select book, chapter from day_chapters where plan_id = ? and day_number = ? order by position;",
    )?;
    let mut rows = stmt.query((plan_id, day_number))?;
    let mut chapters = Vec::new();
    while let Some(row) = rows.next()? {
        let book: String = row.get(0)?;
        let chapter: u32 = row.get(1)?;
        chapters.push(ChapterRef::new(book, chapter));
    }
    Ok(chapters)
}

fn load_additions(
    conn: &Connection,
    plan_id: PlanId,
    day_number: u32,
) -> Fallible<Vec<CatchUpChapter>> {
    let mut stmt = conn.prepare(
        "select book, chapter, original_day_number from catch_up_additions where plan_id = ? and day_number = ? order by position;",
    )?;
    let mut rows = stmt.query((plan_id, day_number))?;
    let mut additions = Vec::new();
    while let Some(row) = rows.next()? {
        let book: String = row.get(0)?;
        let chapter: u32 = row.get(1)?;
        additions.push(CatchUpChapter {
            chapter: ChapterRef::new(book, chapter),
            original_day_number: row.get(2)?,
        });
    }
    Ok(additions)
}

fn ensure_entry(conn: &Connection, plan_id: PlanId, day_number: u32) -> Fallible<()> {
    conn.execute(
        "insert or ignore into day_progress (plan_id, day_number) values (?, ?);",
        (plan_id, day_number),
    )?;
    Ok(())
}

fn insert_action(
    conn: &Connection,
    plan_id: PlanId,
    day_number: u32,
    chapter: &ChapterRef,
    action: ChapterAction,
    at: Timestamp,
) -> Fallible<()> {
    conn.execute(
        "insert into chapter_actions (plan_id, day_number, book, chapter, action, created_at) values (?, ?, ?, ?, ?, ?);",
        (plan_id, day_number, &chapter.book, chapter.chapter, action, at),
    )?;
    Ok(())
}

/// Reconstruct a day's progress entry: effective chapters (base plus
/// additions) with their action logs folded in insertion order.
fn load_entry(conn: &Connection, plan_id: PlanId, day_number: u32) -> Fallible<ProgressEntry> {
    let base = load_day_chapters(conn, plan_id, day_number)?;
    let additions = load_additions(conn, plan_id, day_number)?;
    let mut effective = base;
    effective.extend(additions.iter().map(|a| a.chapter.clone()));
    let mut entry = ProgressEntry::new(day_number, &effective);
    entry.added_chapters = additions;

    let mut stmt = conn.prepare(
        "select book, chapter, action, created_at from chapter_actions where plan_id = ? and day_number = ? order by action_id;",
    )?;
    let mut rows = stmt.query((plan_id, day_number))?;
    while let Some(row) = rows.next()? {
        let book: String = row.get(0)?;
        let chapter: u32 = row.get(1)?;
        let action: ChapterAction = row.get(2)?;
        let at: Timestamp = row.get(3)?;
        let chapter = ChapterRef::new(book, chapter);
        if let Some(progress) = entry.chapters.iter_mut().find(|c| c.chapter == chapter) {
            progress.actions.push(ActionRecord { action, at });
        }
    }
    drop(rows);
    drop(stmt);

    let mut stmt = conn.prepare(
        "select started_reading_at, completed, completed_at from day_progress where plan_id = ? and day_number = ?;",
    )?;
    let mut rows = stmt.query((plan_id, day_number))?;
    if let Some(row) = rows.next()? {
        entry.started_reading_at = row.get(0)?;
        entry.completed = row.get(1)?;
        entry.completed_at = row.get(2)?;
    }
    Ok(entry)
}

/// Re-derive the day's completion from its action log and store it,
/// touching `completed_at` only on the transition edge. Returns the new
/// completion state.
fn rederive_completion(
    conn: &Connection,
    plan_id: PlanId,
    day_number: u32,
    at: Timestamp,
) -> Fallible<bool> {
    let entry = load_entry(conn, plan_id, day_number)?;
    let completed = entry.derive_completed();
    if completed != entry.completed {
        if completed {
            conn.execute(
                "update day_progress set completed = 1, completed_at = ? where plan_id = ? and day_number = ?;",
                (at, plan_id, day_number),
            )?;
        } else {
            conn.execute(
                "update day_progress set completed = 0, completed_at = null where plan_id = ? and day_number = ?;",
                (plan_id, day_number),
            )?;
        }
    }
    Ok(completed)
}
