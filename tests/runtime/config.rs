//! Configuration loading

use std::fs;
use std::path::PathBuf;

use bqlsh_runtime::ShellConfig;

#[test]
fn file_values_and_builders_compose() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "banner = false\nhistory_file = \"/tmp/h\"\ntrace_bql = true\n").unwrap();

    let config = ShellConfig::load_from_file(&path)
        .unwrap()
        .with_history_override(None)
        .with_trace_sql(true)
        .with_log_level("info");

    assert!(!config.banner);
    assert_eq!(config.history_file, Some(PathBuf::from("/tmp/h")));
    assert!(config.trace_bql);
    assert!(config.trace_sql);
    assert_eq!(config.log_level.as_deref(), Some("info"));
}

#[test]
fn malformed_file_names_itself() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "banner = maybe\n").unwrap();
    let err = ShellConfig::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn empty_history_override_disables_history() {
    let config = ShellConfig::default()
        .with_history_size(10)
        .with_history_override(Some(""));
    assert_eq!(config.history_file, None);
    assert_eq!(config.history_size, 10);
}
