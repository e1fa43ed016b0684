//! Front end for running code from a source through the scanner and
//! parser.
use std::fs::canonicalize;
use std::io::BufRead;
use std::path::Path;

use kaleidoscope_compiler::{
    ast, ParseErr, Parser, PrecedenceTable, ScanErr, Scanner, Token,
};
use kaleidoscope_util::source::{
    source_from_file, source_from_stdin, source_from_text, Location, Source,
};

use super::result::{DriverErr, DriverErrKind, DriverResult, Summary};

enum Report {
    Out(String),
    Err(String),
}

pub struct Driver {
    precedence_table: PrecedenceTable,
    dump_tokens: bool,
    dump_ast: bool,
    incremental: bool,
    current_file_name: String,
    /// Reports are held here until a source has been fully processed
    /// when running incrementally, so nothing is shown for input that
    /// turns out to be incomplete.
    pending: Vec<Report>,
}

impl Driver {
    pub fn new(
        precedence_table: PrecedenceTable,
        dump_tokens: bool,
        dump_ast: bool,
        incremental: bool,
    ) -> Self {
        Self {
            precedence_table,
            dump_tokens,
            dump_ast,
            incremental,
            current_file_name: "<none>".to_owned(),
            pending: vec![],
        }
    }

    pub fn precedence_table(&self) -> &PrecedenceTable {
        &self.precedence_table
    }

    pub fn dump_tokens(&self) -> bool {
        self.dump_tokens
    }

    pub fn set_dump_tokens(&mut self, dump_tokens: bool) {
        self.dump_tokens = dump_tokens;
    }

    pub fn dump_ast(&self) -> bool {
        self.dump_ast
    }

    pub fn set_dump_ast(&mut self, dump_ast: bool) {
        self.dump_ast = dump_ast;
    }

    pub fn set_incremental(&mut self, incremental: bool) {
        self.incremental = incremental;
    }

    /// Set current file name from `path` if possible.
    fn set_current_file_name(&mut self, path: &Path) {
        self.current_file_name = if let Ok(abs_path) = canonicalize(path) {
            abs_path.to_str().unwrap_or("<unknown>").to_owned()
        } else {
            path.to_str().unwrap_or("<unknown>").to_owned()
        };
    }

    // Execute ---------------------------------------------------------

    /// Execute a script file.
    pub fn execute_file(&mut self, file_path: &Path) -> DriverResult {
        self.set_current_file_name(file_path);
        match source_from_file(file_path) {
            Ok(mut source) => self.execute_source(&mut source),
            Err(err) => {
                let message = format!("{}: {err}", file_path.display());
                Err(DriverErr::new(DriverErrKind::CouldNotReadSourceFile(message)))
            }
        }
    }

    /// Execute stdin.
    pub fn execute_stdin(&mut self) -> DriverResult {
        self.current_file_name = "<stdin>".to_owned();
        let mut source = source_from_stdin();
        self.execute_source(&mut source)
    }

    /// Execute text.
    pub fn execute_text(&mut self, text: &str) -> DriverResult {
        self.current_file_name = "<text>".to_owned();
        let mut source = source_from_text(text);
        self.execute_source(&mut source)
    }

    /// Execute text entered in REPL.
    pub fn execute_repl(&mut self, text: &str) -> DriverResult {
        self.current_file_name = "<repl>".to_owned();
        let mut source = source_from_text(text);
        self.execute_source(&mut source)
    }

    fn execute_source<T: BufRead>(&mut self, source: &mut Source<T>) -> DriverResult {
        log::debug!("BEGIN: {}", self.current_file_name);
        self.pending.clear();
        let result = if self.dump_tokens {
            Ok(self.scan_source(source))
        } else {
            self.parse_source(source)
        };
        match &result {
            Ok(summary) => {
                self.flush();
                log::debug!("END: {} {summary:?}", self.current_file_name);
            }
            Err(err) => {
                self.pending.clear();
                log::debug!("END: {} {err}", self.current_file_name);
            }
        }
        result
    }

    /// Show every token in the source. Scan errors are reported and
    /// scanning carries on after them.
    fn scan_source<T: BufRead>(&mut self, source: &mut Source<T>) -> Summary {
        let mut summary = Summary::default();
        let mut scanner = Scanner::new(source);
        loop {
            match scanner.next_token() {
                Ok(token) => {
                    summary.tokens += 1;
                    let done = token.token == Token::EndOfInput;
                    self.emit(Report::Out(token.to_string()));
                    if done {
                        break;
                    }
                }
                Err(err) => {
                    summary.errors += 1;
                    self.handle_scan_err(&err, scanner.source());
                }
            }
        }
        summary
    }

    /// Parse items from the source until it's exhausted. After an
    /// error, the offending token is skipped and parsing starts over
    /// with the next token.
    fn parse_source<T: BufRead>(&mut self, source: &mut Source<T>) -> DriverResult {
        let mut summary = Summary::default();

        let mut parser = loop {
            let table = self.precedence_table.clone();
            match Parser::new(Scanner::new(source), table) {
                Ok(parser) => break parser,
                Err(err) => {
                    summary.errors += 1;
                    self.handle_parse_err(&err, source)?;
                }
            }
        };

        loop {
            match parser.next_item() {
                Ok(Some(item)) => {
                    summary.items += 1;
                    self.report_item(&item);
                }
                Ok(None) => break,
                Err(err) => {
                    summary.errors += 1;
                    self.handle_parse_err(&err, parser.source())?;
                    // Skip token for error recovery.
                    while let Err(err) = parser.skip_token() {
                        summary.errors += 1;
                        self.handle_parse_err(&err, parser.source())?;
                    }
                }
            }
        }

        Ok(summary)
    }

    fn report_item(&mut self, item: &ast::Item) {
        log::trace!("ITEM: {item:?}");
        self.emit(Report::Out(format!("Parsed {}.", item.describe())));
        if self.dump_ast {
            self.emit(Report::Out(format!("{:#?}", item.kind)));
        }
    }

    // Reporting -------------------------------------------------------

    fn emit(&mut self, report: Report) {
        if self.incremental {
            self.pending.push(report);
        } else {
            print_report(&report);
        }
    }

    fn flush(&mut self) {
        for report in self.pending.drain(..) {
            print_report(&report);
        }
    }

    fn format_err_line<T: BufRead>(&self, source: &Source<T>, loc: Location) -> String {
        let file_name = self.current_file_name.as_str();
        match source.get_line(loc.line) {
            Some(line) => {
                let line = line.trim_end();
                let line_no = loc.line;
                format!("\n  Error in {file_name} on line {line_no}:\n\n    |\n    |{line}")
            }
            None => format!("\n  Error in {file_name} at {loc}:\n\n    |"),
        }
    }

    fn format_err_message(&self, message: String, start: Location, end: Location) -> String {
        let start_pos = start.col.saturating_sub(1);
        let marker = if start.line != end.line || end.col <= start.col {
            format!("{:>start_pos$}^", "")
        } else {
            let end_pos = end.col - start.col;
            format!("{:>start_pos$}^{:^>end_pos$}", "", "")
        };
        format!("    |{marker}\n\n  {message}\n")
    }

    fn handle_scan_err<T: BufRead>(&mut self, err: &ScanErr, source: &Source<T>) {
        let loc = err.location;
        let line = self.format_err_line(source, loc);
        let message = self.format_err_message(format!("SCAN ERROR: {err}"), loc, loc);
        self.emit(Report::Err(line));
        self.emit(Report::Err(message));
    }

    /// Report a parse error. In incremental mode, an error caused by
    /// running out of input isn't reported; it's returned instead so
    /// the caller can supply more input.
    fn handle_parse_err<T: BufRead>(
        &mut self,
        err: &ParseErr,
        source: &Source<T>,
    ) -> Result<(), DriverErr> {
        if self.incremental && err.is_at_end_of_input() {
            return Err(DriverErr::new(DriverErrKind::IncompleteInput(err.kind.clone())));
        }
        let (start, end) = err.span();
        let line = self.format_err_line(source, start);
        let message = self.format_err_message(format!("PARSE ERROR: {err}"), start, end);
        self.emit(Report::Err(line));
        self.emit(Report::Err(message));
        Ok(())
    }
}

fn print_report(report: &Report) {
    match report {
        Report::Out(msg) => println!("{msg}"),
        Report::Err(msg) => eprintln!("{msg}"),
    }
}
