//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking. Each record table is
//! created lazily from the shape of the first row inserted into it: meta
//! columns first, then one column per payload field.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use tracing::debug;

use crate::condition::{validate_identifier, Condition, OrderBy};
use crate::error::{Result, StoreError};
use crate::row::{RecordRow, Scalar};
use crate::traits::Store;

/// Meta columns present in every record table, in schema order.
const META_COLUMNS: &[&str] = &[
    "id",
    "prefix",
    "sequence_number",
    "previous",
    "nonce",
    "created_at",
    "signing_identity",
    "signature",
    "body",
    "inserted_at",
];

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StoreError::Background("connection mutex poisoned".into()))
}

fn validate_table(table: &str) -> Result<()> {
    validate_identifier(table).map_err(|_| StoreError::InvalidTable(table.to_string()))
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Create the table for a record shape if it does not exist yet.
fn ensure_table(conn: &Connection, table: &str, row: &RecordRow) -> Result<()> {
    let mut columns = vec![
        "id TEXT PRIMARY KEY".to_string(),
        "prefix TEXT NOT NULL".to_string(),
        "sequence_number INTEGER NOT NULL".to_string(),
        "previous TEXT".to_string(),
        "nonce TEXT".to_string(),
        "created_at TEXT".to_string(),
        "signing_identity TEXT".to_string(),
        "signature TEXT".to_string(),
        "body TEXT NOT NULL".to_string(),
        "inserted_at INTEGER NOT NULL".to_string(),
    ];

    for (name, scalar) in &row.payload {
        validate_identifier(name)?;
        if META_COLUMNS.contains(&name.as_str()) {
            return Err(StoreError::InvalidColumn(name.clone()));
        }
        let sql_type = match scalar {
            Scalar::Integer(_) => "INTEGER",
            Scalar::Real(_) => "REAL",
            Scalar::Text(_) | Scalar::Null => "TEXT",
        };
        columns.push(format!("{name} {sql_type}"));
    }
    columns.push("UNIQUE (prefix, sequence_number)".to_string());

    let sql = format!("CREATE TABLE IF NOT EXISTS {table} ({})", columns.join(", "));
    conn.execute(&sql, [])?;
    Ok(())
}

impl ToSql for Scalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Scalar::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Scalar::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Scalar::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Scalar::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

fn scalar_from_ref(value: ValueRef<'_>) -> Scalar {
    match value {
        ValueRef::Null => Scalar::Null,
        ValueRef::Integer(i) => Scalar::Integer(i),
        ValueRef::Real(f) => Scalar::Real(f),
        ValueRef::Text(t) => Scalar::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Scalar::Null,
    }
}

/// Rebuild a RecordRow from a SELECT * result. Column order follows the
/// table schema, so payload columns come back in declared order.
fn row_from_sql(names: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    let mut out = RecordRow {
        id: String::new(),
        prefix: String::new(),
        sequence_number: 0,
        previous: None,
        nonce: None,
        created_at: None,
        signing_identity: None,
        signature: None,
        payload: Vec::new(),
        body: String::new(),
    };

    for (idx, name) in names.iter().enumerate() {
        match name.as_str() {
            "id" => out.id = row.get(idx)?,
            "prefix" => out.prefix = row.get(idx)?,
            "sequence_number" => out.sequence_number = row.get::<_, i64>(idx)? as u64,
            "previous" => out.previous = row.get(idx)?,
            "nonce" => out.nonce = row.get(idx)?,
            "created_at" => out.created_at = row.get(idx)?,
            "signing_identity" => out.signing_identity = row.get(idx)?,
            "signature" => out.signature = row.get(idx)?,
            "body" => out.body = row.get(idx)?,
            "inserted_at" => {}
            _ => out
                .payload
                .push((name.clone(), scalar_from_ref(row.get_ref(idx)?))),
        }
    }

    Ok(out)
}

fn query_rows(conn: &Connection, sql: &str, bound: &[Scalar]) -> Result<Vec<RecordRow>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let rows = stmt
        .query_map(rusqlite::params_from_iter(bound.iter()), |row| {
            row_from_sql(&names, row)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, table: &str, row: &RecordRow) -> Result<()> {
        validate_table(table)?;
        let table = table.to_string();
        let row = row.clone();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            ensure_table(&conn, &table, &row)?;

            let existing_id: Option<String> = conn
                .query_row(
                    &format!("SELECT id FROM {table} WHERE id = ?1"),
                    params![row.id],
                    |r| r.get(0),
                )
                .optional()?;
            if existing_id.is_some() {
                return Err(StoreError::Duplicate {
                    table,
                    id: row.id.clone(),
                });
            }

            let existing_at_pos: Option<String> = conn
                .query_row(
                    &format!(
                        "SELECT id FROM {table} WHERE prefix = ?1 AND sequence_number = ?2"
                    ),
                    params![row.prefix, row.sequence_number as i64],
                    |r| r.get(0),
                )
                .optional()?;
            if existing_at_pos.is_some() {
                return Err(StoreError::Conflict {
                    table,
                    prefix: row.prefix.clone(),
                    sequence_number: row.sequence_number,
                });
            }

            let mut columns: Vec<&str> = META_COLUMNS.to_vec();
            let mut bound: Vec<Scalar> = vec![
                Scalar::Text(row.id.clone()),
                Scalar::Text(row.prefix.clone()),
                Scalar::Integer(row.sequence_number as i64),
                row.previous.clone().map_or(Scalar::Null, Scalar::Text),
                row.nonce.clone().map_or(Scalar::Null, Scalar::Text),
                row.created_at.clone().map_or(Scalar::Null, Scalar::Text),
                row.signing_identity
                    .clone()
                    .map_or(Scalar::Null, Scalar::Text),
                row.signature.clone().map_or(Scalar::Null, Scalar::Text),
                Scalar::Text(row.body.clone()),
                Scalar::Integer(now_millis()),
            ];
            for (name, scalar) in &row.payload {
                columns.push(name);
                bound.push(scalar.clone());
            }

            let placeholders: Vec<String> =
                (1..=bound.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            );
            conn.execute(&sql, rusqlite::params_from_iter(bound.iter()))?;

            debug!(table = %table, id = %row.id, seq = row.sequence_number, "inserted version");
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }

    async fn get_by_id(&self, table: &str, id: &str) -> Result<Option<RecordRow>> {
        validate_table(table)?;
        let table = table.to_string();
        let id = id.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            if !table_exists(&conn, &table)? {
                return Ok(None);
            }
            let rows = query_rows(
                &conn,
                &format!("SELECT * FROM {table} WHERE id = ?1"),
                &[Scalar::Text(id)],
            )?;
            Ok(rows.into_iter().next())
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }

    async fn get_latest_by_prefix(&self, table: &str, prefix: &str) -> Result<Option<RecordRow>> {
        validate_table(table)?;
        let table = table.to_string();
        let prefix = prefix.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            if !table_exists(&conn, &table)? {
                return Ok(None);
            }
            let rows = query_rows(
                &conn,
                &format!(
                    "SELECT * FROM {table} WHERE prefix = ?1
                     ORDER BY sequence_number DESC LIMIT 1"
                ),
                &[Scalar::Text(prefix)],
            )?;
            Ok(rows.into_iter().next())
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }

    async fn list_by_prefix(&self, table: &str, prefix: &str) -> Result<Vec<RecordRow>> {
        validate_table(table)?;
        let table = table.to_string();
        let prefix = prefix.to_string();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            if !table_exists(&conn, &table)? {
                return Ok(Vec::new());
            }
            query_rows(
                &conn,
                &format!(
                    "SELECT * FROM {table} WHERE prefix = ?1 ORDER BY sequence_number"
                ),
                &[Scalar::Text(prefix)],
            )
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }

    async fn search(
        &self,
        table: &str,
        condition: Option<&Condition>,
        orderings: &[OrderBy],
    ) -> Result<Vec<RecordRow>> {
        validate_table(table)?;
        let table = table.to_string();
        let condition = condition.cloned();
        let orderings = orderings.to_vec();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            if !table_exists(&conn, &table)? {
                return Ok(Vec::new());
            }

            let mut bound = Vec::new();
            let mut sql = format!("SELECT * FROM {table}");
            if let Some(condition) = &condition {
                sql.push_str(" WHERE ");
                sql.push_str(&condition.to_sql(&mut bound)?);
            }
            if !orderings.is_empty() {
                let terms = orderings
                    .iter()
                    .map(|o| o.to_sql())
                    .collect::<Result<Vec<_>>>()?;
                sql.push_str(" ORDER BY ");
                sql.push_str(&terms.join(", "));
            }

            query_rows(&conn, &sql, &bound)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }
}
