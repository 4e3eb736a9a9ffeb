//! Outcome of a generator run, one entry per discovered source file.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Whether a run writes companion files or only compares them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateMode {
    #[default]
    Write,
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Companion file written.
    Generated {
        output: PathBuf,
        setters: usize,
        changed: bool,
    },
    /// Check mode: companion file matches what would be generated.
    UpToDate { output: PathBuf },
    /// Check mode: companion file is missing or differs.
    Stale { output: PathBuf, missing: bool },
    NothingToGenerate,
    Failed { kind: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub mode: GenerateMode,
    pub files: Vec<FileOutcome>,
}

impl GenerationReport {
    pub fn new(mode: GenerateMode) -> Self {
        Self {
            mode,
            files: Vec::new(),
        }
    }

    pub fn generated(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Generated { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Failed { .. }))
    }

    pub fn stale(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Stale { .. }))
    }

    pub fn up_to_date(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::UpToDate { .. }))
    }

    /// Total setters across every written file.
    pub fn setters(&self) -> usize {
        self.files
            .iter()
            .map(|file| match file.status {
                FileStatus::Generated { setters, .. } => setters,
                _ => 0,
            })
            .sum()
    }

    pub fn outcome(&self, source: &Path) -> Option<&FileStatus> {
        self.files.iter().find(|file| file.source == source).map(|file| &file.status)
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|file| pred(&file.status)).count()
    }
}
