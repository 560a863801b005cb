//! bqlsh CLI entry point.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use bqlsh_runtime::{
    LineEditor, Output, Repl, RustylineEditor, Session, ShellConfig, StdinEditor, history, logging,
};
use bqlsh_storage::{SqliteDatabase, TraceKind};
use tracing::debug;

/// Options parsed from the command line.
#[derive(Default)]
struct CliConfig {
    database: Option<PathBuf>,
    config_file: Option<PathBuf>,
    batch_mode: bool,
    quiet: bool,
    show_help: bool,
    show_version: bool,
    trace_bql: bool,
    trace_sql: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-q" | "--quiet" => config.quiet = true,
            "--trace-bql" => config.trace_bql = true,
            "--trace-sql" => config.trace_sql = true,
            "-c" | "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                config.config_file = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            path => {
                if config.database.is_some() {
                    return Err(format!("unexpected argument: {path}").into());
                }
                config.database = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("bqlsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_path = cli.config_file.clone().unwrap_or_else(ShellConfig::default_path);
    let mut config = ShellConfig::load_from_file(&config_path)?
        .with_history_override(history::history_override().as_deref());
    if cli.quiet || cli.batch_mode {
        config = config.with_banner(false);
    }
    if cli.trace_bql {
        config = config.with_trace_bql(true);
    }
    if cli.trace_sql {
        config = config.with_trace_sql(true);
    }

    logging::init_stderr_logging(config.log_level.as_deref());
    debug!(?config, path = %config_path.display(), "configuration loaded");

    let db = SqliteDatabase::open(cli.database.as_deref())?;
    let mut session = Session::new(Box::new(db), Output::stdout())?;
    if config.trace_bql {
        session.adapter_mut().set_trace(TraceKind::Bql, true);
    }
    if config.trace_sql {
        session.adapter_mut().set_trace(TraceKind::Sql, true);
    }

    if cli.batch_mode {
        let editor = StdinEditor::new(io::stdin().lock());
        return run_repl(editor, session, &config);
    }
    let editor = RustylineEditor::with_history(config.history_file.clone(), config.history_size)?;
    run_repl(editor, session, &config)
}

fn run_repl<E: LineEditor>(
    editor: E,
    session: Session,
    config: &ShellConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::with_editor(editor, session).with_banner(config.banner);
    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mbqlsh\x1b[0m - Interactive shell for BQL and SQL

\x1b[1mUSAGE:\x1b[0m
    bqlsh [OPTIONS] [DATABASE]

\x1b[1mARGUMENTS:\x1b[0m
    [DATABASE]    SQLite database file (default: in-memory)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -b, --batch           Read statements from stdin without banner or prompts
    -c, --config <FILE>   Read configuration from FILE
    -q, --quiet           Do not print the welcome banner
    --trace-bql           Start with BQL tracing on
    --trace-sql           Start with SQL tracing on

\x1b[1mENVIRONMENT:\x1b[0m
    BQLSH_HISTORY         History file (empty disables history)
    RUST_LOG              Log filter for diagnostics on stderr

\x1b[1mEXAMPLES:\x1b[0m
    bqlsh                          Start with an in-memory database
    bqlsh survey.db                Open survey.db
    bqlsh -b survey.db < load.bql  Run a script and exit
    bqlsh --trace-sql survey.db    Show every SQL statement executed

Type `.help' inside the shell for the list of commands."
    );
}
