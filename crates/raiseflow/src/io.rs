use std::{
    borrow::Cow,
    cell::RefCell,
    io::{self, Write as _},
};

use crate::exception_private::RunResult;

/// Trait for handling output printed by class methods and lessons.
///
/// Implement this trait to capture or redirect output. The default implementation
/// `StdPrint` writes to stdout.
pub trait PrintWriter {
    /// Writes a piece of output text, without any terminator.
    fn stdout_write(&mut self, output: Cow<'_, str>) -> RunResult<()>;

    /// Add a single character to stdout.
    ///
    /// Generally called to add newlines after a line of output.
    fn stdout_push(&mut self, end: char) -> RunResult<()>;
}

/// Default `PrintWriter` that writes to stdout.
#[derive(Debug)]
pub struct StdPrint;

thread_local! {
    /// Thread-local stdout buffer for `StdPrint`.
    ///
    /// Output is flushed when the writer is dropped or on [`StdPrint::flush`], so a
    /// traceback written to stderr afterwards appears after the lines printed before it.
    static STDOUT_BUFFER: RefCell<String> = const { RefCell::new(String::new()) };
}

impl StdPrint {
    /// Writes any buffered output to stdout.
    pub fn flush() {
        STDOUT_BUFFER.with(|buffer| {
            let mut buffer = buffer.borrow_mut();
            if buffer.is_empty() {
                return;
            }
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(buffer.as_bytes());
            let _ = stdout.flush();
            buffer.clear();
        });
    }
}

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> RunResult<()> {
        STDOUT_BUFFER.with(|buffer| buffer.borrow_mut().push_str(&output));
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> RunResult<()> {
        STDOUT_BUFFER.with(|buffer| buffer.borrow_mut().push(end));
        Ok(())
    }
}

impl Drop for StdPrint {
    fn drop(&mut self) {
        Self::flush();
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing or capturing output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// Returns the collected output as a string slice.
    #[must_use]
    pub fn output(&self) -> &str {
        self.0.as_str()
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: Cow<'_, str>) -> RunResult<()> {
        self.0.push_str(&output);
        Ok(())
    }

    fn stdout_push(&mut self, end: char) -> RunResult<()> {
        self.0.push(end);
        Ok(())
    }
}

/// `PrintWriter` that ignores all output.
///
/// Useful for suppressing output during benchmarking.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: Cow<'_, str>) -> RunResult<()> {
        Ok(())
    }

    fn stdout_push(&mut self, _end: char) -> RunResult<()> {
        Ok(())
    }
}
