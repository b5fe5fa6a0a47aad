//! Line-oriented console I/O.
//!
//! The menus only need to print lines and read one answer per prompt, so
//! they talk to a [`Console`] rather than to stdin/stdout directly. Tests
//! drive the same menus through a [`TextConsole`] over byte buffers.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// A source of user answers and a sink for menu output.
pub trait Console {
    /// Writes one line of output.
    fn print(&mut self, line: &str) -> io::Result<()>;

    /// Shows `label` and reads one line of input without its line ending.
    ///
    /// Returns an [`io::ErrorKind::UnexpectedEof`] error once input is
    /// exhausted.
    fn prompt(&mut self, label: &str) -> io::Result<String>;

    /// Asks a yes/no question. Answers starting with `y` count as yes.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{question} (yes/no): "))?;
        Ok(answer.trim_start().to_lowercase().starts_with('y'))
    }
}

/// A [`Console`] over any buffered reader and writer.
pub struct TextConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TextConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl TextConsole<StdinLock<'static>, Stdout> {
    /// Console over the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for TextConsole<R, W> {
    fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}
