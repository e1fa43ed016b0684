//! # Kaleidoscope REPL
//!
//! Each line is parsed as soon as it's entered. When a line ends in the
//! middle of an item, more lines are read until the item is complete or
//! a blank line is entered.
use std::path::PathBuf;

use rustyline::config::Configurer;
use rustyline::error::ReadlineError;

use kaleidoscope_driver::{Driver, DriverErr, DriverErrKind, DriverResult, Summary};

pub struct Repl {
    reader: rustyline::Editor<()>,
    history_path: Option<PathBuf>,
    driver: Driver,
    summary: Summary,
}

impl Repl {
    pub fn new(history_path: Option<PathBuf>, mut driver: Driver) -> Result<Self, DriverErr> {
        let reader = rustyline::Editor::<()>::new().map_err(|err| {
            let msg = format!("Could not initialize readline: {err}");
            DriverErr::new(DriverErrKind::ReplErr(msg))
        })?;
        driver.set_incremental(true);
        Ok(Repl { reader, history_path, driver, summary: Summary::default() })
    }

    /// Read and parse input until the user exits. The returned summary
    /// covers the whole session.
    pub fn run(&mut self) -> DriverResult {
        println!("Welcome to the Kaleidoscope REPL (read/parse/print loop)");
        println!("Type a definition, extern, or expression, then hit Enter");
        self.load_history();
        println!("Type .help for help or .exit to exit");

        loop {
            match self.read_line("ready> ", true) {
                Ok(None) => {
                    // Blank or all-whitespace line.
                }
                Ok(Some(input)) => {
                    self.add_history_entry(input.as_str());
                    if let Some(result) = self.eval(input.as_str()) {
                        break result;
                    }
                }
                // User hit Ctrl-C
                Err(ReadlineError::Interrupted) => {
                    println!("Use Ctrl-D or .exit to exit");
                }
                // User hit Ctrl-D
                Err(ReadlineError::Eof) => {
                    break Ok(self.summary);
                }
                Err(err) => {
                    let msg = format!("Could not read line: {err}");
                    break Err(DriverErr::new(DriverErrKind::ReplErr(msg)));
                }
            }
        }
    }

    /// Get a line of input from the user. If the line comprises only
    /// whitespace *and* `trim_blank` is set, `None` is returned.
    fn read_line(
        &mut self,
        prompt: &str,
        trim_blank: bool,
    ) -> Result<Option<String>, ReadlineError> {
        match self.reader.readline(prompt) {
            Ok(input) if trim_blank && input.trim().is_empty() => Ok(None),
            Ok(input) => Ok(Some(input)),
            Err(err) => Err(err),
        }
    }

    /// Evaluate a line of input. Returns `None` to indicate to the main
    /// loop to keep going. Returns a result when the REPL should exit.
    fn eval(&mut self, text: &str) -> Option<DriverResult> {
        if let Some(exit) = self.handle_command(text) {
            return if exit { Some(Ok(self.summary)) } else { None };
        }

        let mut input = text.to_owned();
        loop {
            match self.driver.execute_repl(input.as_str()) {
                Ok(summary) => {
                    self.add_summary(summary);
                    return None;
                }
                Err(err) if err.is_incomplete() => {
                    log::debug!("{err}");
                }
                Err(err) => {
                    eprintln!("{err}");
                    return None;
                }
            }

            match self.read_line("+ ", false) {
                Ok(Some(more)) if !more.trim().is_empty() => {
                    self.add_history_entry(more.as_str());
                    input.push('\n');
                    input.push_str(more.as_str());
                }
                Ok(_) => {
                    // A blank line gives up on completing the input and
                    // reports whatever is wrong with it.
                    self.driver.set_incremental(false);
                    let result = self.driver.execute_repl(input.as_str());
                    self.driver.set_incremental(true);
                    if let Ok(summary) = result {
                        self.add_summary(summary);
                    }
                    return None;
                }
                Err(ReadlineError::Interrupted) => return None,
                Err(err) => {
                    let msg = format!("Could not read line: {err}");
                    return Some(Err(DriverErr::new(DriverErrKind::ReplErr(msg))));
                }
            }
        }
    }

    fn add_summary(&mut self, summary: Summary) {
        self.summary.items += summary.items;
        self.summary.tokens += summary.tokens;
        self.summary.errors += summary.errors;
    }

    /// Handle a dot command. Returns `None` if the text isn't a
    /// command, otherwise whether the REPL should exit.
    fn handle_command(&mut self, text: &str) -> Option<bool> {
        match text.trim() {
            ".exit" | ".quit" => return Some(true),
            "?" | ".help" => {
                eprintln!("{:=>72}", "");
                eprintln!("Kaleidoscope Help");
                eprintln!("{:->72}", "");
                eprintln!(".help   -> show this help");
                eprintln!(".exit   -> exit");
                eprintln!(".ops    -> show binary operators and their precedence");
                eprintln!(".tokens -> toggle showing tokens instead of parsing");
                eprintln!(".ast    -> toggle showing the AST of parsed items");
                eprintln!(".emacs  -> switch to emacs-style input (default)");
                eprintln!(".vi     -> switch to vi-style input");
                eprintln!("{:=>72}", "");
            }
            ".ops" => {
                for (op, precedence) in self.driver.precedence_table().iter() {
                    println!("{op} {precedence}");
                }
            }
            ".tokens" => {
                let dump_tokens = !self.driver.dump_tokens();
                self.driver.set_dump_tokens(dump_tokens);
                println!("Show tokens: {dump_tokens}");
            }
            ".ast" => {
                let dump_ast = !self.driver.dump_ast();
                self.driver.set_dump_ast(dump_ast);
                println!("Show AST: {dump_ast}");
            }
            ".emacs" => {
                self.reader.set_edit_mode(rustyline::config::EditMode::Emacs);
            }
            ".vi" | ".vim" => {
                self.reader.set_edit_mode(rustyline::config::EditMode::Vi);
            }
            _ => return None,
        }
        Some(false)
    }

    fn load_history(&mut self) {
        if let Some(path) = &self.history_path {
            println!("REPL history will be saved to {}", path.to_string_lossy());
            if let Err(err) = self.reader.load_history(path.as_path()) {
                eprintln!("Could not load REPL history: {err}");
            }
        }
    }

    fn add_history_entry(&mut self, input: &str) {
        if let Some(path) = &self.history_path {
            self.reader.add_history_entry(input);
            if let Err(err) = self.reader.save_history(path.as_path()) {
                eprintln!("WARNING: Could not save REPL history: {err}");
            }
        }
    }
}
