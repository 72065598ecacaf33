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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A check or uncheck of a chapter. The action log is append-only: a
/// chapter's state is the latest action in its log.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterAction {
    Checked,
    Unchecked,
}

impl ChapterAction {
    fn as_str(&self) -> &str {
        match self {
            ChapterAction::Checked => "checked",
            ChapterAction::Unchecked => "unchecked",
        }
    }
}

impl TryFrom<String> for ChapterAction {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "checked" => Ok(ChapterAction::Checked),
            "unchecked" => Ok(ChapterAction::Unchecked),
            _ => fail(format!("Invalid chapter action: {}", value)),
        }
    }
}

impl ToSql for ChapterAction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ChapterAction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        ChapterAction::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        assert_eq!(
            ChapterAction::try_from("checked".to_string()).unwrap(),
            ChapterAction::Checked
        );
        assert_eq!(
            ChapterAction::try_from("unchecked".to_string()).unwrap(),
            ChapterAction::Unchecked
        );
        assert!(ChapterAction::try_from("derp".to_string()).is_err());
    }
}
