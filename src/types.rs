//! Core data types
//!
//! These types flow through the conversion pipeline:
//! Record (parsed from a Datavyu CSV) → TrialStart (derived) → output table row.

use serde::{Deserialize, Serialize};

/// One annotation event from a Datavyu export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Sequence number of the event within its source file
    pub ordinal: u64,
    /// Event start in milliseconds
    pub onset_ms: u64,
    /// Event end in milliseconds; `0` means no offset was recorded
    pub offset_ms: u64,
    /// Event label, with quotes already stripped
    pub code: String,
}

impl Record {
    pub fn new(ordinal: u64, onset_ms: u64, offset_ms: u64, code: impl Into<String>) -> Self {
        Self {
            ordinal,
            onset_ms,
            offset_ms,
            code: code.into(),
        }
    }

    /// Offset in milliseconds, or `None` for the "not recorded" sentinel
    pub fn offset(&self) -> Option<u64> {
        (self.offset_ms != 0).then_some(self.offset_ms)
    }
}

/// Video frame rate used to quantize millisecond timestamps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameRate(pub f64);

impl FrameRate {
    /// NTSC approximation used by Supercoder
    pub const NTSC: FrameRate = FrameRate(29.97);

    pub fn fps(self) -> f64 {
        self.0
    }

    /// Usable rates are finite and strictly positive
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::NTSC
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

/// Right-table entry describing where one trial begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialStart {
    /// 1-based trial number
    pub trial: usize,
    /// Onset quantized to frames
    pub frames: u64,
    /// Frame onset converted back to milliseconds (not the recorded value)
    pub millis: u64,
    /// `MM:SS.mmm` rendering of `millis`
    pub elapsed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_offset_is_absent() {
        let record = Record::new(2, 3000, 0, "B");
        assert_eq!(record.offset(), None);

        let record = Record::new(1, 1000, 2000, "X");
        assert_eq!(record.offset(), Some(2000));
    }

    #[test]
    fn test_frame_rate_validity() {
        assert!(FrameRate::NTSC.is_valid());
        assert!(FrameRate(25.0).is_valid());
        assert!(!FrameRate(0.0).is_valid());
        assert!(!FrameRate(-30.0).is_valid());
        assert!(!FrameRate(f64::NAN).is_valid());
        assert!(!FrameRate(f64::INFINITY).is_valid());
    }

    #[test]
    fn test_frame_rate_default_is_ntsc() {
        assert_eq!(FrameRate::default().fps(), 29.97);
        assert_eq!(FrameRate::default().to_string(), "29.97 fps");
    }
}
