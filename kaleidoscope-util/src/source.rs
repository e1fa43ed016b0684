use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::{fmt, io};

/// This is used to set the initial capacity for the source's char
/// queue up front to avoid allocations. It assumes reasonable line
/// lengths are in use plus some additional space for end-of-line
/// comments, etc. 2^8 - 1 is used because using 2^8 will cause the
/// queue's initial capacity to be doubled.
const INITIAL_CAPACITY: usize = 255; // 2^8 - 1

/// Create source from the specified file.
pub fn source_from_file<P: AsRef<Path>>(
    file_path: P,
) -> Result<Source<BufReader<File>>, io::Error> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);
    Ok(Source::new(reader))
}

/// Create source from the specified text.
pub fn source_from_text(text: &str) -> Source<Cursor<&str>> {
    Source::new(Cursor::new(text))
}

/// Create source from stdin.
pub fn source_from_stdin() -> Source<BufReader<io::Stdin>> {
    Source::new(BufReader::new(io::stdin()))
}

/// A wrapper around some source, typically either some text or a file.
/// The source is read line by line and the characters from each line
/// are yielded in turn. Other features:
///
/// - Normalizes \r\n line endings to \n. A lone \r is passed through.
/// - Tracks the line and column of the most recently consumed char.
/// - Keeps the text of the current and previous lines around for
///   error reporting.
/// - Exposes one char of lookahead via [`Source::peek`].
///
/// A read error ends the stream. The error is kept and can be
/// retrieved with [`Source::take_error`].
pub struct Source<T: BufRead> {
    stream: T,
    /// String buffer the source reader reads into.
    buffer: String,
    /// The queue of characters for the current line.
    queue: VecDeque<char>,
    pub line_no: usize,
    pub col: usize,
    pub current_char: Option<char>,
    current_line: Option<String>,
    previous_line: Option<String>,
    error: Option<io::Error>,
}

impl<T: BufRead> Source<T> {
    pub fn new(stream: T) -> Self {
        Source {
            stream,
            buffer: String::with_capacity(INITIAL_CAPACITY),
            queue: VecDeque::with_capacity(INITIAL_CAPACITY),
            line_no: 0,
            col: 0,
            current_char: None,
            current_line: None,
            previous_line: None,
            error: None,
        }
    }

    /// Get the text of the specified line if it's still available.
    /// Only the current and previous lines are retained.
    pub fn get_line(&self, line_no: usize) -> Option<&str> {
        if line_no == 0 || line_no > self.line_no {
            None
        } else if line_no == self.line_no {
            self.current_line.as_deref()
        } else if line_no + 1 == self.line_no {
            self.previous_line.as_deref()
        } else {
            None
        }
    }

    pub fn get_current_line(&self) -> Option<&str> {
        self.current_line.as_deref()
    }

    /// Take the read error that ended the stream, if there was one.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn check_queue(&mut self) -> bool {
        if !self.queue.is_empty() {
            return true;
        }
        if self.error.is_some() {
            return false;
        }
        // See if character queue can be refilled from the next line.
        self.buffer.clear();
        match self.stream.read_line(&mut self.buffer) {
            Ok(0) => false,
            Ok(_) => {
                self.line_no += 1;
                self.col = 0;
                self.previous_line = self.current_line.take();
                self.current_line = Some(self.buffer.clone());
                self.queue.extend(self.buffer.chars());
                true
            }
            Err(err) => {
                log::debug!("source read failed on line {}: {err}", self.line_no + 1);
                self.error = Some(err);
                false
            }
        }
    }

    fn next_from_queue(&mut self) -> Option<char> {
        if !self.check_queue() {
            self.current_char = None;
            return None;
        }
        let mut c = self.queue.pop_front()?;
        if c == '\r' && self.queue.front() == Some(&'\n') {
            self.queue.pop_front();
            c = '\n';
        }
        self.col += 1;
        self.current_char = Some(c);
        self.current_char
    }

    /// Peek at the next char.
    pub fn peek(&mut self) -> Option<&char> {
        if self.check_queue() {
            return self.queue.front();
        }
        None
    }

    /// Get the next char if it matches the specified condition.
    pub fn next_if(&mut self, func: impl FnOnce(&char) -> bool) -> Option<char> {
        if let Some(c) = self.peek() {
            if func(c) {
                return self.next();
            }
        }
        None
    }

    /// Location of the most recently consumed char.
    pub fn location(&self) -> Location {
        Location::new(self.line_no, self.col)
    }

    /// Location just past the most recently consumed char.
    pub fn next_location(&self) -> Location {
        Location::new(self.line_no.max(1), self.col + 1)
    }
}

impl<T: BufRead> Iterator for Source<T> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_from_queue()
    }
}

/// Represents a line and column in the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
