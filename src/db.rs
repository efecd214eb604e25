use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::resource::ResourceKind;

/// A single row of a resource table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
}

impl Record {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Anything that can go wrong talking to SQLite
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection lock poisoned")]
    Poisoned,

    /// Update body names something that is not a plain column identifier
    #[error("invalid column name: {0:?}")]
    InvalidColumn(String),

    #[error("update has no columns to set")]
    EmptyUpdate,

    #[error("could not encode value for column {column}: {source}")]
    Encode {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn setup_database(conn: &Connection) -> StoreResult<()> {
    // WAL for crash recovery (in-memory databases silently stay in "memory" mode)
    conn.pragma_update(None, "journal_mode", "WAL")?;

    for kind in ResourceKind::ALL {
        // AUTOINCREMENT so a deleted id is never handed out again
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL
                )",
                kind.table()
            ),
            [],
        )?;
    }

    Ok(())
}

/// Insert a record holding only `name`; returns the stored row
///
/// Uses `INSERT ... RETURNING`, so the row handed back is the one just written
/// even if another request deletes it immediately afterwards.
pub fn insert_record(conn: &Connection, kind: ResourceKind, name: &str) -> StoreResult<Record> {
    let record = conn.query_row(
        &format!(
            "INSERT INTO {} (name) VALUES (?1) RETURNING id, name",
            kind.table()
        ),
        params![name],
        Record::from_row,
    )?;

    Ok(record)
}

pub fn get_all_records(conn: &Connection, kind: ResourceKind) -> StoreResult<Vec<Record>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name FROM {} ORDER BY id",
        kind.table()
    ))?;

    let records = stmt
        .query_map([], Record::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn get_record(conn: &Connection, kind: ResourceKind, id: i64) -> StoreResult<Option<Record>> {
    let record = conn
        .query_row(
            &format!("SELECT id, name FROM {} WHERE id = ?1", kind.table()),
            params![id],
            Record::from_row,
        )
        .optional()?;

    Ok(record)
}

/// Apply every key of `changes` as a column assignment on row `id`
///
/// Keys naming the row id in any spelling SQLite accepts are skipped: ids
/// never change once assigned. Returns the number of rows touched (0 when no
/// such record exists).
pub fn update_record(
    conn: &Connection,
    kind: ResourceKind,
    id: i64,
    changes: &Map<String, Value>,
) -> StoreResult<usize> {
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    for (column, value) in changes.iter().filter(|(column, _)| !names_row_id(column)) {
        if !is_plain_identifier(column) {
            return Err(StoreError::InvalidColumn(column.clone()));
        }
        values.push(to_sql_value(column, value)?);
        assignments.push(format!("\"{}\" = ?{}", column, values.len()));
    }

    if assignments.is_empty() {
        return Err(StoreError::EmptyUpdate);
    }

    values.push(SqlValue::Integer(id));
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        kind.table(),
        assignments.join(", "),
        values.len()
    );

    let count = conn.execute(&sql, params_from_iter(values))?;
    Ok(count)
}

/// Returns the number of rows removed (0 when no such record exists)
pub fn delete_record(conn: &Connection, kind: ResourceKind, id: i64) -> StoreResult<usize> {
    let count = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        params![id],
    )?;

    Ok(count)
}

pub fn count_records(conn: &Connection, kind: ResourceKind) -> StoreResult<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", kind.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// SQLite matches column names case-insensitively, and `rowid`, `oid` and
/// `_rowid_` all alias an `INTEGER PRIMARY KEY`
fn names_row_id(column: &str) -> bool {
    ["id", "rowid", "oid", "_rowid_"]
        .iter()
        .any(|alias| column.eq_ignore_ascii_case(alias))
}

fn is_plain_identifier(column: &str) -> bool {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn to_sql_value(column: &str, value: &Value) -> StoreResult<SqlValue> {
    let converted = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            let text = serde_json::to_string(value).map_err(|source| StoreError::Encode {
                column: column.to_string(),
                source,
            })?;
            SqlValue::Text(text)
        }
    };
    Ok(converted)
}
