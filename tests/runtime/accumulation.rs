//! Properties of statement accumulation through a whole session

use bqlsh_storage::MockDatabase;
use proptest::prelude::*;

use crate::run_script;

fn word() -> impl Strategy<Value = String> {
    "x[a-z0-9]{0,6}"
}

proptest! {
    #[test]
    fn lines_without_terminator_run_once(words in prop::collection::vec(word(), 1..12)) {
        let db = MockDatabase::new();
        let log = db.log();
        let mut script = words.join("\n");
        script.push_str("\n;\n");

        run_script(Box::new(db), &script);

        let expected = words.join("\n");
        prop_assert_eq!(log.queries(), vec![expected]);
    }

    #[test]
    fn each_terminated_line_runs_alone(words in prop::collection::vec(word(), 1..12)) {
        let db = MockDatabase::new();
        let log = db.log();
        let script: String = words.iter().map(|w| format!("{w};\n")).collect();

        run_script(Box::new(db), &script);

        prop_assert_eq!(log.queries(), words);
    }

    #[test]
    fn blank_lines_between_statements_are_ignored(blanks in 0usize..5) {
        let db = MockDatabase::new();
        let log = db.log();
        let script = format!("{}SELECT 1;\n{}", "\n".repeat(blanks), "  \n".repeat(blanks));

        run_script(Box::new(db), &script);

        prop_assert_eq!(log.queries(), vec!["SELECT 1".to_string()]);
    }
}
