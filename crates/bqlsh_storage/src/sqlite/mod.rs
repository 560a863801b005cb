//! SQLite-backed [`Database`].
//!
//! Runs the SQL-compatible subset of BQL directly against SQLite and keeps the
//! metadata catalog that `.describe` reads. Statements that need the
//! modelling engine are rejected as unsupported.
//!
//! The backend owns one connection and a private current-thread runtime. Every
//! async `sqlx` call is driven to completion with `block_on`, so callers stay
//! synchronous and savepoints always land on the same connection.

mod convert;
mod schema;

pub use schema::{CATALOG, MODELLING_VERBS, modelling_verb};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bqlsh_foundation::{Cursor, EntityKind, Error, ErrorKind, Result, Value};
use bqlsh_language::leading_words;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Column, ConnectOptions, Connection, Executor, Statement};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::database::{Database, TraceHook, TraceKind, quote_identifier, with_savepoint};
use crate::error::{StorageError, StorageResult};
use crate::loader;

/// A database stored in a SQLite file or in memory.
pub struct SqliteDatabase {
    runtime: Runtime,
    conn: SqliteConnection,
    location: String,
    savepoints: usize,
    bql_tracers: Vec<TraceHook>,
    sql_tracers: Vec<TraceHook>,
}

impl SqliteDatabase {
    /// Opens (creating if needed) the database at `path`, or an in-memory
    /// database when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start, the file cannot be
    /// opened, or the catalog cannot be created.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StorageError::from)?;
        let options = connect_options(path)?;
        let conn = runtime
            .block_on(SqliteConnection::connect_with(&options))
            .map_err(StorageError::from)?;
        let location = path.map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());

        let mut db = Self {
            runtime,
            conn,
            location,
            savepoints: 0,
            bql_tracers: Vec::new(),
            sql_tracers: Vec::new(),
        };
        db.ensure_catalog()?;
        info!(location = %db.location, "database opened");
        Ok(db)
    }

    /// Opens a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// See [`SqliteDatabase::open`].
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    /// Where the database lives: a file path or `:memory:`.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of savepoints currently open.
    #[must_use]
    pub fn savepoint_depth(&self) -> usize {
        self.savepoints
    }

    fn ensure_catalog(&mut self) -> Result<()> {
        for statement in CATALOG {
            self.run_untraced(statement)?;
        }
        Ok(())
    }

    /// Runs a statement without notifying tracers or reading rows.
    fn run_untraced(&mut self, sql: &str) -> Result<()> {
        let Self { runtime, conn, .. } = self;
        runtime
            .block_on(sqlx::query(sql).execute(&mut *conn))
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn exists(&mut self, sql: &str, params: &[Value]) -> Result<bool> {
        let cursor = self.sql_execute(sql, params)?;
        Ok(cursor.scalar().and_then(Value::as_integer).unwrap_or(0) > 0)
    }

    fn tracers(&self, kind: TraceKind) -> &[TraceHook] {
        match kind {
            TraceKind::Bql => &self.bql_tracers,
            TraceKind::Sql => &self.sql_tracers,
        }
    }

    fn tracers_mut(&mut self, kind: TraceKind) -> &mut Vec<TraceHook> {
        match kind {
            TraceKind::Bql => &mut self.bql_tracers,
            TraceKind::Sql => &mut self.sql_tracers,
        }
    }

    fn notify(&self, kind: TraceKind, text: &str, params: &[Value]) {
        for hook in self.tracers(kind) {
            hook(text, params);
        }
    }

    fn savepoint_name(depth: usize) -> String {
        format!("bqlsh_savepoint_{depth}")
    }
}

impl fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("location", &self.location)
            .field("savepoints", &self.savepoints)
            .field("bql_tracers", &self.bql_tracers.len())
            .field("sql_tracers", &self.sql_tracers.len())
            .finish_non_exhaustive()
    }
}

fn connect_options(path: Option<&Path>) -> StorageResult<SqliteConnectOptions> {
    let options = match path {
        Some(path) => SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true),
        None => SqliteConnectOptions::from_str("sqlite::memory:")?,
    };
    Ok(options.foreign_keys(true).disable_statement_logging())
}

async fn fetch(conn: &mut SqliteConnection, sql: &str, params: &[Value]) -> StorageResult<Cursor> {
    let statement = (&mut *conn).prepare(sql).await?;
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let mut query = statement.query();
    for param in params {
        query = convert::bind(query, param);
    }
    let rows = query.fetch_all(&mut *conn).await?;

    let mut cursor = Cursor::new(columns);
    for row in &rows {
        cursor.push_row(convert::decode_row(row)?);
    }
    Ok(cursor)
}

impl Database for SqliteDatabase {
    fn execute(&mut self, bql: &str, params: &[Value]) -> Result<Cursor> {
        self.notify(TraceKind::Bql, bql, params);
        if let Some(verb) = modelling_verb(&leading_words(bql, 3)) {
            return Err(Error::unsupported(format!(
                "{verb} needs a modelling backend; this database only runs SQL"
            )));
        }
        self.sql_execute(bql, params)
    }

    fn sql_execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        self.notify(TraceKind::Sql, sql, params);
        debug!(sql, params = params.len(), "executing");
        let Self { runtime, conn, .. } = self;
        let cursor = runtime
            .block_on(fetch(conn, sql, params))
            .map_err(|e| Error::from(e).with_frame(format!("executing {}", sql.trim())))?;
        Ok(cursor)
    }

    fn savepoint_begin(&mut self) -> Result<()> {
        let name = Self::savepoint_name(self.savepoints);
        self.run_untraced(&format!("SAVEPOINT {name}"))?;
        self.savepoints += 1;
        Ok(())
    }

    fn savepoint_release(&mut self) -> Result<()> {
        if self.savepoints == 0 {
            return Err(Error::new(ErrorKind::Internal("no savepoint to release".into())));
        }
        self.savepoints -= 1;
        let name = Self::savepoint_name(self.savepoints);
        self.run_untraced(&format!("RELEASE SAVEPOINT {name}"))
    }

    fn savepoint_rollback(&mut self) -> Result<()> {
        if self.savepoints == 0 {
            return Err(Error::new(ErrorKind::Internal("no savepoint to roll back".into())));
        }
        self.savepoints -= 1;
        let name = Self::savepoint_name(self.savepoints);
        self.run_untraced(&format!("ROLLBACK TO SAVEPOINT {name}"))?;
        self.run_untraced(&format!("RELEASE SAVEPOINT {name}"))
    }

    fn trace(&mut self, kind: TraceKind, hook: TraceHook) {
        self.tracers_mut(kind).push(hook);
    }

    fn untrace(&mut self, kind: TraceKind, hook: &TraceHook) {
        self.tracers_mut(kind).retain(|h| !std::rc::Rc::ptr_eq(h, hook));
    }

    fn has_table(&mut self, name: &str) -> Result<bool> {
        self.exists(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
            &[name.into()],
        )
    }

    fn table_guarantee_columns(&mut self, table: &str) -> Result<()> {
        if self.exists(
            "SELECT COUNT(*) FROM bayesdb_column WHERE tabname = ?",
            &[table.into()],
        )? {
            return Ok(());
        }
        let info = self.sql_execute(&format!("PRAGMA table_info({})", quote_identifier(table)), &[])?;
        if info.is_empty() {
            return Err(Error::not_found(EntityKind::Table, vec![table.to_string()]));
        }
        let (Some(cid), Some(name)) = (info.column_index("cid"), info.column_index("name")) else {
            return Err(Error::new(ErrorKind::Internal("unexpected table_info shape".into())));
        };
        for row in info.rows() {
            self.sql_execute(
                "INSERT INTO bayesdb_column (tabname, colno, name) VALUES (?, ?, ?)",
                &[table.into(), row[cid].clone(), row[name].clone()],
            )?;
        }
        Ok(())
    }

    fn has_generator(&mut self, name: &str) -> Result<bool> {
        Ok(self.generator_id(name)?.is_some())
    }

    fn generator_id(&mut self, name: &str) -> Result<Option<i64>> {
        let cursor = self.sql_execute("SELECT id FROM bayesdb_generator WHERE name = ?", &[name.into()])?;
        Ok(cursor.scalar().and_then(Value::as_integer))
    }

    fn generator_has_model(&mut self, generator_id: i64, modelno: i64) -> Result<bool> {
        self.exists(
            "SELECT COUNT(*) FROM bayesdb_generator_model WHERE generator_id = ? AND modelno = ?",
            &[generator_id.into(), modelno.into()],
        )
    }

    fn read_csv(&mut self, table: &str, path: &Path) -> Result<()> {
        let data = loader::read_csv_file(path)
            .map_err(|e| Error::from(e).with_frame(format!("reading {}", path.display())))?;
        if self.has_table(table)? {
            return Err(Error::load(format!("table already exists: {table}")));
        }

        let qt = quote_identifier(table);
        let quoted: Vec<String> = data.columns.iter().map(|c| quote_identifier(c)).collect();
        let definitions: Vec<String> = quoted.iter().map(|c| format!("{c} NUMERIC")).collect();
        let create = format!("CREATE TABLE {qt} ({})", definitions.join(", "));
        let placeholders = vec!["?"; quoted.len()].join(", ");
        let insert = format!("INSERT INTO {qt} ({}) VALUES ({placeholders})", quoted.join(", "));

        with_savepoint(self, |db| {
            db.sql_execute(&create, &[])?;
            for row in &data.rows {
                let params: Vec<Value> = row.iter().cloned().map(Value::from).collect();
                db.sql_execute(&insert, &params)?;
            }
            db.table_guarantee_columns(table)
        })?;
        info!(table, rows = data.rows.len(), "csv loaded");
        Ok(())
    }

    fn load_codebook(&mut self, table: &str, path: &Path) -> Result<()> {
        let entries = loader::read_codebook_file(path)
            .map_err(|e| Error::from(e).with_frame(format!("reading {}", path.display())))?;
        if !self.has_table(table)? {
            return Err(Error::not_found(EntityKind::Table, vec![table.to_string()]));
        }

        with_savepoint(self, |db| {
            db.table_guarantee_columns(table)?;
            for entry in &entries {
                let cursor = db.sql_execute(
                    "SELECT colno FROM bayesdb_column WHERE tabname = ? AND name = ?",
                    &[table.into(), entry.column.as_str().into()],
                )?;
                let Some(colno) = cursor.scalar().and_then(Value::as_integer) else {
                    return Err(Error::load(format!(
                        "no such column in table {table}: {}",
                        entry.column
                    )));
                };
                db.sql_execute(
                    "UPDATE bayesdb_column SET shortname = ?, description = ? \
                     WHERE tabname = ? AND colno = ?",
                    &[
                        entry.shortname.clone().into(),
                        entry.description.clone().into(),
                        table.into(),
                        colno.into(),
                    ],
                )?;
                db.sql_execute(
                    "DELETE FROM bayesdb_column_map WHERE tabname = ? AND colno = ?",
                    &[table.into(), colno.into()],
                )?;
                for (key, value) in &entry.value_map {
                    db.sql_execute(
                        "INSERT INTO bayesdb_column_map (tabname, colno, key, value) \
                         VALUES (?, ?, ?, ?)",
                        &[table.into(), colno.into(), key.as_str().into(), value.as_str().into()],
                    )?;
                }
            }
            Ok(())
        })?;
        info!(table, columns = entries.len(), "codebook loaded");
        Ok(())
    }

    fn load_legacy_models(&mut self, generator: &str, table: &str, path: &Path) -> Result<()> {
        Err(Error::unsupported(format!(
            "cannot load {} as generator {generator} on table {table}: \
             legacy model archives need the crosscat backend",
            path.display()
        )))
    }
}
