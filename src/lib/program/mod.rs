use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Line terminator used by every emitted directive.
pub const CRLF: &str = "\r\n";

/// Append-only buffer of toolpath directives.
#[derive(Debug, Default, Clone)]
pub struct Program {
    text: String,
    lines: usize,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one directive, terminating it with CRLF unless it already carries one.
    pub fn line(&mut self, s: &str) {
        self.text.push_str(s.strip_suffix(CRLF).unwrap_or(s));
        self.text.push_str(CRLF);
        self.lines += 1;
    }

    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Iterate over directives, without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_terminator(CRLF)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Receives a finished program together with the path it should end up at.
pub trait ProgramSink {
    fn write_program(&mut self, path: &Path, program: &Program) -> Result<()>;
}

/// Writes programs to the filesystem, replacing any existing file.
#[derive(Debug, Default)]
pub struct FileSink;

impl ProgramSink for FileSink {
    fn write_program(&mut self, path: &Path, program: &Program) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(Error::NoOutputPath);
        }
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(io_err)?;
        file.write_all(program.as_bytes()).map_err(io_err)?;
        file.flush().map_err(io_err)?;
        info!(
            path = %path.display(),
            lines = program.len(),
            bytes = program.as_bytes().len(),
            "Program written"
        );
        Ok(())
    }
}

/// Keeps programs in memory, keyed by destination. Handy when the caller wants the text, not a file.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub written: Vec<(PathBuf, String)>,
}

impl ProgramSink for MemorySink {
    fn write_program(&mut self, path: &Path, program: &Program) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(Error::NoOutputPath);
        }
        self.written
            .push((path.to_path_buf(), program.as_str().to_owned()));
        Ok(())
    }
}
