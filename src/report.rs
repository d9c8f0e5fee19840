use std::fmt;
use std::path::PathBuf;

/// Outcome of processing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Already formatted; nothing written.
    Unchanged,
    /// Reformatted (or would be, in check/diff mode).
    Changed,
    /// Could not be processed.
    Error,
}

/// Per-file processing result.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileResult {
    pub fn new(path: PathBuf, status: FileStatus) -> Self {
        Self {
            path,
            status,
            error: None,
        }
    }

    pub fn error(path: PathBuf, message: String) -> Self {
        Self {
            path,
            status: FileStatus::Error,
            error: Some(message),
        }
    }
}

/// Aggregated results for a run.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn changed(&self) -> usize {
        self.count(FileStatus::Changed)
    }

    pub fn unchanged(&self) -> usize {
        self.count(FileStatus::Unchanged)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn has_changes(&self) -> bool {
        self.changed() > 0
    }

    /// Print error details to stderr.
    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} file(s) processed", self.total())?;
        if self.changed() > 0 {
            write!(f, ", {} reformatted", self.changed())?;
        }
        if self.unchanged() > 0 {
            write!(f, ", {} unchanged", self.unchanged())?;
        }
        if self.errors() > 0 {
            write!(f, ", {} error(s)", self.errors())?;
        }
        Ok(())
    }
}
