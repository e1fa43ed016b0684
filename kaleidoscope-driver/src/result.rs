use core::fmt;
use std::fmt::Formatter;

use kaleidoscope_compiler::ParseErrKind;

/// Result type used by top level program driver.
pub type DriverResult = Result<Summary, DriverErr>;

/// What happened while running a source through the driver. Scan and
/// parse errors are reported as they occur and counted here rather
/// than ending the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub tokens: usize,
    pub errors: usize,
}

impl Summary {
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Exit code for the process: 0 if there were no errors, 1 if there
    /// were.
    pub fn exit_code(&self) -> u8 {
        if self.is_ok() {
            0
        } else {
            1
        }
    }
}

#[derive(Debug)]
pub struct DriverErr {
    pub kind: DriverErrKind,
}

impl DriverErr {
    pub fn new(kind: DriverErrKind) -> Self {
        Self { kind }
    }

    /// True if more input could turn this into a successful parse.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.kind, DriverErrKind::IncompleteInput(_))
    }
}

#[derive(Debug)]
pub enum DriverErrKind {
    // These errors are NOT handled by the driver. They should be
    // handled by the user of the driver (e.g., in main, REPL).
    CouldNotReadSourceFile(String),
    ReplErr(String),
    /// Input ended in the middle of an item. Only returned in
    /// incremental mode, before anything from the input is reported.
    IncompleteInput(ParseErrKind),
}

impl fmt::Display for DriverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for DriverErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use DriverErrKind::*;
        let msg = match self {
            CouldNotReadSourceFile(msg) => {
                format!("Could not read source file: {msg}")
            }
            ReplErr(msg) => format!("REPL error: {msg}"),
            IncompleteInput(kind) => format!("Incomplete input: {kind}"),
        };
        write!(f, "{msg}")
    }
}
