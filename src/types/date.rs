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

use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;

/// A calendar date, without a timezone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn parse(string: &str) -> Fallible<Self> {
        let date = NaiveDate::parse_from_str(string, "%Y-%m-%d")?;
        Ok(Self(date))
    }

    /// The weekday index, with Sunday = 0.
    pub fn weekday_index(self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// The next calendar day.
    pub fn succ(self) -> Self {
        Self(self.0 + chrono::Duration::days(1))
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl ToSql for Date {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Date {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        let date = NaiveDate::parse_from_str(&string, "%Y-%m-%d")
            .map_err(|e| FromSqlError::Other(Box::new(e)))?;
        Ok(Date(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() -> Fallible<()> {
        let date = Date::parse("2026-01-05")?;
        assert_eq!(date.to_string(), "2026-01-05");
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Date::parse("derp").is_err());
    }

    #[test]
    fn test_weekday_index() -> Fallible<()> {
        // 2026-01-04 is a Sunday.
        assert_eq!(Date::parse("2026-01-04")?.weekday_index(), 0);
        assert_eq!(Date::parse("2026-01-05")?.weekday_index(), 1);
        assert_eq!(Date::parse("2026-01-10")?.weekday_index(), 6);
        Ok(())
    }

    #[test]
    fn test_succ() -> Fallible<()> {
        let date = Date::parse("2026-01-31")?;
        assert_eq!(date.succ(), Date::parse("2026-02-01")?);
        Ok(())
    }

    #[test]
    fn test_ordering() -> Fallible<()> {
        assert!(Date::parse("2026-01-05")? < Date::parse("2026-01-06")?);
        Ok(())
    }
}
