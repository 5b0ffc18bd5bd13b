use std::fmt::Formatter;
use std::io::BufRead;
use std::path::PathBuf;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SourceFile {
    pub file: PathBuf,
}

impl SourceFile {
    pub fn read_to_string(&self) -> Result<String> {
        if !self.is_file() {
            return Err(Error::InvalidSource(self.clone()));
        }

        std::fs::read_to_string(self.as_path())
            .map_err(|e| Error::IOError(format!("failed to read script file: {}", self.display()), e))
    }
}

impl From<PathBuf> for SourceFile {
    fn from(p: PathBuf) -> Self { Self { file: p } }
}

impl std::ops::Deref for SourceFile {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target { &self.file }
}
impl std::fmt::Display for SourceFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct FileSpan {
    pub file: SourceFile,
    pub span: Span,
}

impl FileSpan {
    pub fn read_line(&self) -> std::io::Result<String> {
        let file = std::fs::File::open(self.file.as_path())?;
        let file = std::io::BufReader::new(file);

        match file.lines().nth(self.span.start.line.saturating_sub(1)) {
            Some(line) => line,
            None => Ok(String::new()),
        }
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Span {
    pub start: FilePos,
    pub len: usize,
}

impl Span {
    pub fn new(start: FilePos, len: usize) -> Self {
        Self { start, len, }
    }

    /// Span from the start of `self` to the end of `other`, on the same line.
    pub fn to(&self, other: &Span) -> Span {
        let end = other.start.col + other.len;
        Span::new(self.start.clone(), end.saturating_sub(self.start.col).max(1))
    }

    pub fn with_file(&self, file: &SourceFile) -> FileSpan {
        FileSpan { file: file.clone(), span: self.clone() }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FilePos {
    pub line: usize,
    pub col: usize,
}

impl FilePos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col, }
    }
}

impl std::fmt::Display for FilePos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
