//! Mock database for testing.
//!
//! Records every call in a shared [`CallLog`] and answers from canned
//! catalog contents and responses, so shell behaviour can be asserted
//! without a real engine.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bqlsh_foundation::{Cursor, EntityKind, Error, ErrorKind, Result, Value};

use crate::database::{Database, TraceHook, TraceKind};

/// One recorded collaborator call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    /// `execute` (BQL).
    Execute {
        /// Statement text.
        text: String,
        /// Bound parameters.
        params: Vec<Value>,
    },
    /// `sql_execute`.
    SqlExecute {
        /// Statement text.
        text: String,
        /// Bound parameters.
        params: Vec<Value>,
    },
    /// `savepoint_begin`.
    SavepointBegin,
    /// `savepoint_release`.
    SavepointRelease,
    /// `savepoint_rollback`.
    SavepointRollback,
    /// A hook was subscribed.
    Trace(TraceKind),
    /// A hook was unsubscribed.
    Untrace(TraceKind),
    /// `has_table`.
    HasTable(String),
    /// `table_guarantee_columns`.
    GuaranteeColumns(String),
    /// `has_generator` or `generator_id`.
    LookupGenerator(String),
    /// `generator_has_model`.
    HasModel(i64, i64),
    /// `read_csv`.
    ReadCsv(String, PathBuf),
    /// `load_codebook`.
    LoadCodebook(String, PathBuf),
    /// `load_legacy_models`.
    LoadLegacyModels(String, String, PathBuf),
}

impl Call {
    /// Returns true for calls that run a statement.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Execute { .. } | Self::SqlExecute { .. })
    }
}

/// Shared handle onto a mock's recorded calls.
///
/// Cloning the handle keeps it readable after the mock itself has been moved
/// into a shell.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    /// Returns a snapshot of every call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Returns the text of every executed statement, BQL and SQL alike.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Execute { text, .. } | Call::SqlExecute { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Counts calls equal to `call`.
    #[must_use]
    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

#[derive(Clone, Debug)]
struct MockGenerator {
    id: i64,
    models: BTreeSet<i64>,
}

/// A scripted [`Database`].
pub struct MockDatabase {
    log: CallLog,
    tables: BTreeSet<String>,
    generators: BTreeMap<String, MockGenerator>,
    responses: Vec<(String, Cursor)>,
    failures: Vec<String>,
    bql_tracers: Vec<TraceHook>,
    sql_tracers: Vec<TraceHook>,
    savepoints: usize,
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDatabase {
    /// Creates a mock with an empty catalog that answers every statement with
    /// a cursor that has no description.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            tables: BTreeSet::new(),
            generators: BTreeMap::new(),
            responses: Vec::new(),
            failures: Vec::new(),
            bql_tracers: Vec::new(),
            sql_tracers: Vec::new(),
            savepoints: 0,
        }
    }

    /// Adds a table to the catalog.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.tables.insert(name.into());
        self
    }

    /// Adds a generator with the given id and model numbers.
    #[must_use]
    pub fn with_generator(
        mut self,
        name: impl Into<String>,
        id: i64,
        models: impl IntoIterator<Item = i64>,
    ) -> Self {
        self.generators.insert(
            name.into(),
            MockGenerator {
                id,
                models: models.into_iter().collect(),
            },
        );
        self
    }

    /// Answers statements containing `pattern` with `cursor`.
    ///
    /// The first matching pattern wins.
    #[must_use]
    pub fn respond(mut self, pattern: impl Into<String>, cursor: Cursor) -> Self {
        self.responses.push((pattern.into(), cursor));
        self
    }

    /// Fails statements containing `pattern` with a query error.
    #[must_use]
    pub fn failing_on(mut self, pattern: impl Into<String>) -> Self {
        self.failures.push(pattern.into());
        self
    }

    /// Returns a handle onto the call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Number of hooks currently subscribed for `kind`.
    #[must_use]
    pub fn subscribers(&self, kind: TraceKind) -> usize {
        match kind {
            TraceKind::Bql => self.bql_tracers.len(),
            TraceKind::Sql => self.sql_tracers.len(),
        }
    }

    fn run(&mut self, kind: TraceKind, text: &str, params: &[Value]) -> Result<Cursor> {
        let tracers = match kind {
            TraceKind::Bql => &self.bql_tracers,
            TraceKind::Sql => &self.sql_tracers,
        };
        for hook in tracers {
            hook(text, params);
        }

        if let Some(pattern) = self.failures.iter().find(|p| text.contains(p.as_str())) {
            return Err(Error::query(format!("mock failure on {pattern:?}")));
        }
        Ok(self
            .responses
            .iter()
            .find(|(pattern, _)| text.contains(pattern.as_str()))
            .map_or_else(Cursor::empty, |(_, cursor)| cursor.clone()))
    }
}

impl fmt::Debug for MockDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDatabase")
            .field("tables", &self.tables)
            .field("generators", &self.generators)
            .field("savepoints", &self.savepoints)
            .finish_non_exhaustive()
    }
}

impl Database for MockDatabase {
    fn execute(&mut self, bql: &str, params: &[Value]) -> Result<Cursor> {
        self.log.push(Call::Execute {
            text: bql.to_string(),
            params: params.to_vec(),
        });
        self.run(TraceKind::Bql, bql, params)
    }

    fn sql_execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        self.log.push(Call::SqlExecute {
            text: sql.to_string(),
            params: params.to_vec(),
        });
        self.run(TraceKind::Sql, sql, params)
    }

    fn savepoint_begin(&mut self) -> Result<()> {
        self.log.push(Call::SavepointBegin);
        self.savepoints += 1;
        Ok(())
    }

    fn savepoint_release(&mut self) -> Result<()> {
        self.log.push(Call::SavepointRelease);
        self.close_savepoint()
    }

    fn savepoint_rollback(&mut self) -> Result<()> {
        self.log.push(Call::SavepointRollback);
        self.close_savepoint()
    }

    fn trace(&mut self, kind: TraceKind, hook: TraceHook) {
        self.log.push(Call::Trace(kind));
        match kind {
            TraceKind::Bql => self.bql_tracers.push(hook),
            TraceKind::Sql => self.sql_tracers.push(hook),
        }
    }

    fn untrace(&mut self, kind: TraceKind, hook: &TraceHook) {
        self.log.push(Call::Untrace(kind));
        let tracers = match kind {
            TraceKind::Bql => &mut self.bql_tracers,
            TraceKind::Sql => &mut self.sql_tracers,
        };
        tracers.retain(|h| !Rc::ptr_eq(h, hook));
    }

    fn has_table(&mut self, name: &str) -> Result<bool> {
        self.log.push(Call::HasTable(name.to_string()));
        Ok(self.tables.contains(name))
    }

    fn table_guarantee_columns(&mut self, table: &str) -> Result<()> {
        self.log.push(Call::GuaranteeColumns(table.to_string()));
        if self.tables.contains(table) {
            Ok(())
        } else {
            Err(Error::not_found(EntityKind::Table, vec![table.to_string()]))
        }
    }

    fn has_generator(&mut self, name: &str) -> Result<bool> {
        Ok(self.generator_id(name)?.is_some())
    }

    fn generator_id(&mut self, name: &str) -> Result<Option<i64>> {
        self.log.push(Call::LookupGenerator(name.to_string()));
        Ok(self.generators.get(name).map(|g| g.id))
    }

    fn generator_has_model(&mut self, generator_id: i64, modelno: i64) -> Result<bool> {
        self.log.push(Call::HasModel(generator_id, modelno));
        Ok(self
            .generators
            .values()
            .any(|g| g.id == generator_id && g.models.contains(&modelno)))
    }

    fn read_csv(&mut self, table: &str, path: &Path) -> Result<()> {
        self.log.push(Call::ReadCsv(table.to_string(), path.to_path_buf()));
        self.tables.insert(table.to_string());
        Ok(())
    }

    fn load_codebook(&mut self, table: &str, path: &Path) -> Result<()> {
        self.log
            .push(Call::LoadCodebook(table.to_string(), path.to_path_buf()));
        Ok(())
    }

    fn load_legacy_models(&mut self, generator: &str, table: &str, path: &Path) -> Result<()> {
        self.log.push(Call::LoadLegacyModels(
            generator.to_string(),
            table.to_string(),
            path.to_path_buf(),
        ));
        Ok(())
    }
}

impl MockDatabase {
    fn close_savepoint(&mut self) -> Result<()> {
        if self.savepoints == 0 {
            return Err(Error::new(ErrorKind::Internal("no savepoint open".into())));
        }
        self.savepoints -= 1;
        Ok(())
    }
}
