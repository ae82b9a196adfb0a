//! Supercoder CSV writer
//!
//! The output holds two tables side by side, separated by two blank columns:
//! every event converted to frames on the left, and one row per trial start
//! on the right. Trial rows are paired with event rows by position, so once
//! the trials run out the right-hand cells are left blank.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::types::{FrameRate, Record, TrialStart};
use crate::units::{millis_to_frames, offset_cell};

/// First header line: table titles
pub const TITLE_ROW: &str = "Reformatted Data (in frames),,,,,Trial Start Times";

/// Second header line: column names
pub const COLUMN_ROW: &str = "Code,Onset,Offset,,,Trial Number,\
Start Time (in frames - Supercoder),\
Start Time (in milliseconds - Datavyu CSVs),\
Start Time (in elapsed time - Datavyu coding)";

// Ends the event cells and leaves the two spacer columns empty
const SPACER: &str = ",,,";
const BLANK_TRIAL: &str = ",,,";

/// Render the full output file for one input.
///
/// # Arguments
/// * `records` - Every well-formed event of the input, in file order
/// * `trials` - Trial starts from [`crate::trials::trial_starts`]
/// * `rate` - Frame rate used to quantize onsets and offsets
///
/// # Returns
/// The two header lines followed by one row per record, each line ending in `\n`
///
/// # Example
/// ```
/// use datavyu_supercoder::trials::trial_starts;
/// use datavyu_supercoder::writer::render_table;
/// use datavyu_supercoder::{FrameRate, Record};
///
/// let records = vec![Record::new(1, 1000, 2000, "X"), Record::new(2, 3000, 0, "B")];
/// let trials = trial_starts(&records, "B", FrameRate::NTSC);
/// let table = render_table(&records, &trials, FrameRate::NTSC);
///
/// let rows: Vec<&str> = table.lines().skip(2).collect();
/// assert_eq!(rows, ["X,30,60,,,1,90,3003,00:03.003", "B,90,,,,,,,"]);
/// ```
pub fn render_table(records: &[Record], trials: &[TrialStart], rate: FrameRate) -> String {
    let mut out = String::with_capacity(COLUMN_ROW.len() * 2 + records.len() * 32);
    out.push_str(TITLE_ROW);
    out.push('\n');
    out.push_str(COLUMN_ROW);
    out.push('\n');

    for (idx, record) in records.iter().enumerate() {
        out.push_str(&event_cells(record, rate));
        out.push_str(SPACER);
        match trials.get(idx) {
            Some(trial) => out.push_str(&trial_cells(trial)),
            None => out.push_str(BLANK_TRIAL),
        }
        out.push('\n');
    }

    out
}

/// Where the converted form of `file_name` is written.
///
/// The name is joined as an `OsStr` so non-UTF-8 file names keep their exact
/// bytes and never collide after lossy conversion.
pub fn output_path(config: &ConverterConfig, file_name: &OsStr) -> PathBuf {
    let mut name = OsString::from(&config.output_prefix);
    name.push(file_name);
    config.output_dir.join(name)
}

/// Write rendered output, replacing any existing file
pub fn write_output(path: &Path, contents: &str) -> Result<(), ConvertError> {
    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ConvertError::io(path, e))
}

fn event_cells(record: &Record, rate: FrameRate) -> String {
    format!(
        "{},{},{}",
        record.code,
        millis_to_frames(record.onset_ms, rate),
        offset_cell(record.offset_ms, rate)
    )
}

fn trial_cells(trial: &TrialStart) -> String {
    format!(
        "{},{},{},{}",
        trial.trial, trial.frames, trial.millis, trial.elapsed
    )
}
