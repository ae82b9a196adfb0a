//! Batch conversion
//!
//! This module drives the full pipeline for every file in the input
//! directory: read → extract trial starts → render → write. Files are
//! processed one at a time and a failure on one file never stops the batch;
//! each file's outcome is recorded in a [`FileReport`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::ConverterConfig;
use crate::error::{ConvertError, RowError};
use crate::reader::{self, ParsedFile};
use crate::trials::trial_starts;
use crate::writer::{output_path, render_table, write_output};
use crate::{CONVERTER_VERSION, PRODUCER_NAME};

/// Convert every file in `config.input_dir` with a one-off [`Converter`].
///
/// # Arguments
/// * `config` - Directories, frame rate and trial marker for the run
///
/// # Returns
/// A [`BatchSummary`] with one [`FileReport`] per input file. Per-file
/// failures are recorded in the summary; only an invalid configuration or a
/// missing input directory fails the whole call.
///
/// # Example
/// ```no_run
/// use datavyu_supercoder::{convert_directory, ConverterConfig};
///
/// let summary = convert_directory(ConverterConfig::with_dirs("Input", "Output"))?;
/// for file in &summary.files {
///     println!("{}: {:?}", file.file_name, file.status);
/// }
/// # Ok::<(), datavyu_supercoder::ConvertError>(())
/// ```
pub fn convert_directory(config: ConverterConfig) -> Result<BatchSummary, ConvertError> {
    Converter::new(config)?.run()
}

/// Outcome of converting one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Every row converted
    Converted,
    /// Output written, but some malformed rows were left out
    PartiallyConverted,
    /// Input could not be read; an empty dataset was written in its place
    ReadFailed,
    /// Output could not be written
    WriteFailed,
}

impl FileStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, FileStatus::ReadFailed | FileStatus::WriteFailed)
    }
}

/// Per-file entry in a [`BatchSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_name: String,
    pub input_path: PathBuf,
    /// Set whenever an output file was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    pub status: FileStatus,
    pub records: usize,
    pub trials: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_errors: Vec<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub producer: String,
    pub version: String,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub frame_rate: f64,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    /// Files that produced an output table
    pub fn converted(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Converted | FileStatus::PartiallyConverted))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.status.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Total number of quarantined rows across all files
    pub fn row_error_count(&self) -> usize {
        self.files.iter().map(|f| f.row_errors.len()).sum()
    }

    pub fn file(&self, file_name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file_name == file_name)
    }
}

/// Parse-only report produced by [`Converter::validate_inputs`]
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub total_files: usize,
    pub clean_files: usize,
    pub files: Vec<FileValidation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.clean_files == self.total_files
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileValidation {
    pub file_name: String,
    pub records: usize,
    pub trials: usize,
    pub row_errors: Vec<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileValidation {
    fn is_clean(&self) -> bool {
        self.row_errors.is_empty() && self.error.is_none()
    }
}

/// Sequential batch converter bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter, rejecting an invalid configuration
    pub fn new(config: ConverterConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Files directly inside the input directory.
    ///
    /// Directory-listing order is kept unless `sorted` is set. Subdirectories
    /// are skipped.
    pub fn list_inputs(&self) -> Result<Vec<PathBuf>, ConvertError> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            return Err(ConvertError::MissingInputDir(dir.clone()));
        }

        let mut inputs = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| ConvertError::io(dir, e))? {
            let path = entry.map_err(|e| ConvertError::io(dir, e))?.path();
            if path.is_file() {
                inputs.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-file entry");
            }
        }

        if self.config.sorted {
            inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }

        Ok(inputs)
    }

    /// Convert a single input file and write its output table
    pub fn convert_file(&self, path: &Path) -> FileReport {
        let file_name = file_name_of(path);
        let _span = info_span!("convert", file = %file_name).entered();

        let (parsed, read_error) = match reader::read_file(path) {
            Ok(parsed) => (parsed, None),
            Err(e) => {
                error!(error = %e, "failed to read input, writing empty dataset");
                (ParsedFile::default(), Some(e.to_string()))
            }
        };

        let rate = self.config.frame_rate;
        let trials = trial_starts(&parsed.records, &self.config.trial_marker, rate);
        let contents = render_table(&parsed.records, &trials, rate);
        let output = output_path(&self.config, path.file_name().unwrap_or_default());

        let mut report = FileReport {
            file_name,
            input_path: path.to_path_buf(),
            output_path: None,
            status: FileStatus::Converted,
            records: parsed.records.len(),
            trials: trials.len(),
            row_errors: parsed.row_errors,
            error: read_error,
        };

        match write_output(&output, &contents) {
            Ok(()) => {
                report.status = if report.error.is_some() {
                    warn!(output = %output.display(), "wrote empty dataset for unreadable input");
                    FileStatus::ReadFailed
                } else if !report.row_errors.is_empty() {
                    warn!(
                        records = report.records,
                        skipped = report.row_errors.len(),
                        output = %output.display(),
                        "converted with malformed rows left out"
                    );
                    FileStatus::PartiallyConverted
                } else {
                    info!(
                        records = report.records,
                        trials = report.trials,
                        output = %output.display(),
                        "file converted"
                    );
                    FileStatus::Converted
                };
                report.output_path = Some(output);
            }
            Err(e) => {
                error!(error = %e, "failed to write output");
                report.status = FileStatus::WriteFailed;
                report.error = Some(match report.error.take() {
                    Some(read_error) => format!("read failed: {}; write failed: {}", read_error, e),
                    None => e.to_string(),
                });
            }
        }

        report
    }

    /// Convert every input file, one at a time
    pub fn run(&self) -> Result<BatchSummary, ConvertError> {
        let started_at = Utc::now();
        let output_dir = &self.config.output_dir;

        if self.config.create_output_dir {
            fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;
        } else if !output_dir.is_dir() {
            warn!(
                output_dir = %output_dir.display(),
                "output directory does not exist, every write will fail"
            );
        }

        let inputs = self.list_inputs()?;
        info!(
            files = inputs.len(),
            input_dir = %self.config.input_dir.display(),
            frame_rate = self.config.frame_rate.fps(),
            "starting batch"
        );

        let files: Vec<FileReport> = inputs.iter().map(|path| self.convert_file(path)).collect();

        let summary = BatchSummary {
            producer: PRODUCER_NAME.to_string(),
            version: CONVERTER_VERSION.to_string(),
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            frame_rate: self.config.frame_rate.fps(),
            input_dir: self.config.input_dir.clone(),
            output_dir: output_dir.clone(),
            files,
        };

        info!(
            converted = summary.converted(),
            failed = summary.failed(),
            skipped_rows = summary.row_error_count(),
            "batch finished"
        );

        Ok(summary)
    }

    /// Parse every input file without writing anything
    pub fn validate_inputs(&self) -> Result<ValidationReport, ConvertError> {
        let mut files = Vec::new();

        for path in self.list_inputs()? {
            let file_name = file_name_of(&path);
            let validation = match reader::read_file(&path) {
                Ok(parsed) => FileValidation {
                    file_name,
                    records: parsed.records.len(),
                    trials: trial_starts(
                        &parsed.records,
                        &self.config.trial_marker,
                        self.config.frame_rate,
                    )
                    .len(),
                    row_errors: parsed.row_errors,
                    error: None,
                },
                Err(e) => FileValidation {
                    file_name,
                    records: 0,
                    trials: 0,
                    row_errors: Vec::new(),
                    error: Some(e.to_string()),
                },
            };
            files.push(validation);
        }

        Ok(ValidationReport {
            total_files: files.len(),
            clean_files: files.iter().filter(|f| f.is_clean()).count(),
            files,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
