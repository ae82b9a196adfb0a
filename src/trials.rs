//! Trial start extraction
//!
//! A trial begins at every event whose code equals the trial marker.

use crate::types::{FrameRate, Record, TrialStart};
use crate::units::{format_elapsed, frames_to_millis, millis_to_frames};

/// Records whose code equals `marker`, in their original order
pub fn extract_trial_starts<'a>(records: &'a [Record], marker: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.code == marker).collect()
}

/// Right-table entries for every trial start.
///
/// The millisecond column is recomputed from the quantized frame onset, so it
/// matches what a Datavyu user sees after seeking to that frame.
pub fn trial_starts(records: &[Record], marker: &str, rate: FrameRate) -> Vec<TrialStart> {
    extract_trial_starts(records, marker)
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let frames = millis_to_frames(record.onset_ms, rate);
            let millis = frames_to_millis(frames, rate);
            TrialStart {
                trial: idx + 1,
                frames,
                millis,
                elapsed: format_elapsed(millis),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(1, 1000, 2000, "X"),
            Record::new(2, 3000, 0, "B"),
            Record::new(3, 4000, 5000, "Y"),
            Record::new(4, 61_000, 0, "B"),
        ]
    }

    #[test]
    fn test_extract_preserves_order() {
        let records = sample_records();
        let starts = extract_trial_starts(&records, "B");

        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].ordinal, 2);
        assert_eq!(starts[1].ordinal, 4);
    }

    #[test]
    fn test_marker_match_is_exact() {
        let records = vec![
            Record::new(1, 0, 0, "b"),
            Record::new(2, 0, 0, "BB"),
            Record::new(3, 0, 0, " B"),
        ];
        assert!(extract_trial_starts(&records, "B").is_empty());
    }

    #[test]
    fn test_no_trials() {
        let records = vec![Record::new(1, 1000, 2000, "X")];
        assert!(extract_trial_starts(&records, "B").is_empty());
        assert!(trial_starts(&records, "B", FrameRate::NTSC).is_empty());
        assert!(trial_starts(&[], "B", FrameRate::NTSC).is_empty());
    }

    #[test]
    fn test_trial_start_values() {
        let starts = trial_starts(&sample_records(), "B", FrameRate::NTSC);

        assert_eq!(
            starts[0],
            TrialStart {
                trial: 1,
                frames: 90,
                millis: 3003,
                elapsed: "00:03.003".to_string(),
            }
        );
        // 61 s → 1828 frames → 60994 ms
        assert_eq!(starts[1].trial, 2);
        assert_eq!(starts[1].frames, 1828);
        assert_eq!(starts[1].millis, 60_994);
        assert_eq!(starts[1].elapsed, "01:00.994");
    }

    #[test]
    fn test_custom_marker() {
        let starts = trial_starts(&sample_records(), "Y", FrameRate(25.0));
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].frames, 100);
        assert_eq!(starts[0].millis, 4000);
        assert_eq!(starts[0].elapsed, "00:04.000");
    }
}
