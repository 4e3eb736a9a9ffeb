//! Setter generator: discovery and the per-file pipeline.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use log::{debug, info, warn};

use crate::emitter;
use crate::errors::GenerateError;
use crate::report::{FileOutcome, FileStatus, GenerateMode, GenerationReport};
use crate::scanner::{discover_files, scan_file};
use crate::synthesizer::{TargetFields, synthesize};

/// Builder for configuring and running the setter generator.
pub struct SetterGenerator {
    scan_paths: Vec<PathBuf>,
    extension: String,
    targets: TargetFields,
    skip_hidden: bool,
    mode: GenerateMode,
}

impl SetterGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            extension: "go".to_string(),
            targets: TargetFields::DEFAULT,
            skip_hidden: true,
            mode: GenerateMode::Write,
        }
    }

    /// Add a directory (or single file) to scan.
    ///
    /// Can be called multiple times to scan multiple directories.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Set the source file extension, without the dot.
    ///
    /// Default: `go`
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Default: `CreatedAt`, `UpdatedAt`
    pub fn target_fields(mut self, targets: TargetFields) -> Self {
        self.targets = targets;
        self
    }

    /// Skip directories whose name starts with a dot.
    ///
    /// Default: `true`
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    pub fn mode(mut self, mode: GenerateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the generator.
    ///
    /// Per-file failures are recorded in the report and never abort the
    /// run; only a missing scan path does.
    pub fn run(self) -> Result<GenerationReport> {
        let scan_paths = if self.scan_paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.scan_paths.clone()
        };

        let mut files = Vec::new();
        for path in &scan_paths {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                files.extend(discover_files(path, &self.extension, self.skip_hidden));
            } else {
                bail!("scan path {} does not exist", path.display());
            }
        }

        // The same file may be reached through overlapping scan paths.
        let mut seen = HashSet::new();
        files.retain(|file| seen.insert(file.clone()));
        debug!("discovered {} .{} files", files.len(), self.extension);

        let mut report = GenerationReport::new(self.mode);
        for source in files {
            let status = match self.process_file(&source) {
                Ok(status) => status,
                Err(err) => {
                    warn!("skipping {}: {err}", source.display());
                    FileStatus::Failed {
                        kind: err.kind(),
                        message: err.to_string(),
                    }
                }
            };
            report.files.push(FileOutcome { source, status });
        }

        Ok(report)
    }

    fn process_file(&self, path: &Path) -> Result<FileStatus, GenerateError> {
        let unit = scan_file(path)?;
        let synthesis = synthesize(&unit, &self.targets)?;
        if synthesis.is_empty() {
            debug!("{}: nothing to generate", path.display());
            return Ok(FileStatus::NothingToGenerate);
        }

        let rendered = emitter::prepare(&unit, &synthesis)?;
        match self.mode {
            GenerateMode::Write => {
                let changed = emitter::write(&rendered)?;
                info!(
                    "generated {} with {} setters{}",
                    rendered.path.display(),
                    synthesis.descriptors.len(),
                    if changed { "" } else { " (unchanged)" }
                );
                Ok(FileStatus::Generated {
                    output: rendered.path,
                    setters: synthesis.descriptors.len(),
                    changed,
                })
            }
            GenerateMode::Check => match fs::read_to_string(&rendered.path) {
                Ok(existing) if existing == rendered.contents => Ok(FileStatus::UpToDate { output: rendered.path }),
                Ok(_) => Ok(FileStatus::Stale {
                    output: rendered.path,
                    missing: false,
                }),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(FileStatus::Stale {
                    output: rendered.path,
                    missing: true,
                }),
                Err(source) => Err(GenerateError::Read {
                    path: rendered.path,
                    source,
                }),
            },
        }
    }
}

impl Default for SetterGenerator {
    fn default() -> Self {
        Self::new()
    }
}
