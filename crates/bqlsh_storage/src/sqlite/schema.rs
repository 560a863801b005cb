//! Metadata catalog tables.
//!
//! The shell's `.describe` queries read these tables directly, so their names
//! and columns are part of the external interface.

/// Statements that create the catalog. Each is idempotent.
pub const CATALOG: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS bayesdb_column (
        tabname TEXT NOT NULL,
        colno INTEGER NOT NULL CHECK (0 <= colno),
        name TEXT COLLATE NOCASE NOT NULL,
        shortname TEXT,
        description TEXT,
        PRIMARY KEY (tabname, colno),
        UNIQUE (tabname, name)
    )",
    "CREATE TABLE IF NOT EXISTS bayesdb_column_map (
        tabname TEXT NOT NULL,
        colno INTEGER NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (tabname, colno, key),
        FOREIGN KEY (tabname, colno) REFERENCES bayesdb_column (tabname, colno)
    )",
    "CREATE TABLE IF NOT EXISTS bayesdb_generator (
        id INTEGER PRIMARY KEY,
        name TEXT COLLATE NOCASE NOT NULL UNIQUE,
        tabname TEXT COLLATE NOCASE NOT NULL,
        metamodel TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS bayesdb_generator_column (
        generator_id INTEGER NOT NULL REFERENCES bayesdb_generator (id),
        colno INTEGER NOT NULL,
        stattype TEXT NOT NULL,
        PRIMARY KEY (generator_id, colno)
    )",
    "CREATE TABLE IF NOT EXISTS bayesdb_generator_model (
        generator_id INTEGER NOT NULL REFERENCES bayesdb_generator (id),
        modelno INTEGER NOT NULL CHECK (0 <= modelno),
        iterations INTEGER NOT NULL DEFAULT 0 CHECK (0 <= iterations),
        PRIMARY KEY (generator_id, modelno)
    )",
];

/// Leading keywords of statements that need the modelling engine.
pub const MODELLING_VERBS: &[&[&str]] = &[
    &["ESTIMATE"],
    &["SIMULATE"],
    &["INFER"],
    &["INITIALIZE"],
    &["ANALYZE"],
    &["CREATE", "GENERATOR"],
    &["CREATE", "DEFAULT", "GENERATOR"],
    &["CREATE", "TEMP", "GENERATOR"],
    &["CREATE", "TEMPORARY", "GENERATOR"],
    &["DROP", "GENERATOR"],
    &["DROP", "MODELS"],
    &["DROP", "MODEL"],
    &["ALTER", "GENERATOR"],
];

/// Returns the modelling verb `words` starts with, if any.
#[must_use]
pub fn modelling_verb(words: &[String]) -> Option<String> {
    MODELLING_VERBS
        .iter()
        .find(|verb| verb.len() <= words.len() && verb.iter().zip(words).all(|(v, w)| *v == w))
        .map(|verb| verb.join(" "))
}
