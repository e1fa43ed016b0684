use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::ArgMatches;
use log::LevelFilter;

use kaleidoscope_compiler::parser::{parse_binop_spec, PrecedenceErr};
use kaleidoscope_compiler::PrecedenceTable;
use kaleidoscope_driver::{Driver, DriverResult};

mod cli;
mod repl;

#[cfg(test)]
mod tests;

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();

    init_logger(matches.get_flag("debug"));

    let precedence_table = match build_precedence_table(&matches) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let dump_tokens = matches.get_flag("tokens");
    let dump_ast = matches.get_flag("ast");
    let code = matches.get_one::<String>("code");
    let file_name = matches.get_one::<String>("FILE_NAME");

    if let Some(code) = code {
        let mut driver = Driver::new(precedence_table, dump_tokens, dump_ast, false);
        handle_result(driver.execute_text(code))
    } else if let Some(file_name) = file_name {
        let mut driver = Driver::new(precedence_table, dump_tokens, dump_ast, false);
        let result = if file_name == "-" {
            driver.execute_stdin()
        } else {
            driver.execute_file(Path::new(file_name))
        };
        handle_result(result)
    } else {
        let history_path = if matches.get_flag("no_history") {
            None
        } else {
            matches.get_one::<String>("history_path").and_then(|path| create_history_path(path))
        };
        let driver = Driver::new(precedence_table, dump_tokens, dump_ast, true);
        let result = repl::Repl::new(history_path, driver).and_then(|mut repl| repl.run());
        match result {
            Ok(summary) => {
                log::debug!("REPL session: {summary:?}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::from(2)
            }
        }
    }
}

/// Log at warn by default. RUST_LOG overrides that, and --debug turns
/// on everything.
fn init_logger(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(LevelFilter::Trace);
    }
    builder.format_timestamp(None).init();
}

/// Start from the default operators and apply each --binop in order,
/// so later specs override earlier ones.
fn build_precedence_table(matches: &ArgMatches) -> Result<PrecedenceTable, PrecedenceErr> {
    let mut table = PrecedenceTable::default();
    if let Some(specs) = matches.get_many::<String>("binop") {
        for spec in specs {
            let (op, precedence) = parse_binop_spec(spec)?;
            if let Some(previous) = table.insert(op, precedence)? {
                log::debug!("Precedence of {op} changed from {previous} to {precedence}");
            }
        }
    }
    Ok(table)
}

/// Expand a leading ~ to the user's home directory and make sure the
/// history file's directory exists. Returns `None` when history can't
/// be saved.
fn create_history_path(path: &str) -> Option<PathBuf> {
    let path = match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()?.join(rest),
        None => PathBuf::from(path),
    };
    if let Some(dir) = path.parent() {
        if let Err(err) = fs::create_dir_all(dir) {
            eprintln!("Could not create REPL history directory: {err}");
            return None;
        }
    }
    Some(path)
}

/// Map the driver result to the process exit code. Errors the driver
/// couldn't report itself get printed here.
fn handle_result(result: DriverResult) -> ExitCode {
    match result {
        Ok(summary) => ExitCode::from(summary.exit_code()),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
