//! Unit conversion between milliseconds, frames and elapsed-time strings
//!
//! The operation order matters for rounding: milliseconds are divided by 1000
//! before multiplying by the rate, and frames are divided by the rate before
//! multiplying by 1000. Supercoder exports rely on exactly these values.

use crate::types::FrameRate;

/// Quantize a millisecond timestamp to a frame count (round half up)
pub fn millis_to_frames(ms: u64, rate: FrameRate) -> u64 {
    round_half_up(ms as f64 / 1000.0 * rate.fps())
}

/// Convert a frame count back to milliseconds (round half up)
pub fn frames_to_millis(frames: u64, rate: FrameRate) -> u64 {
    round_half_up(frames as f64 / rate.fps() * 1000.0)
}

/// Render milliseconds as `MM:SS.mmm`.
///
/// The minute field is zero-padded to two digits but widens past 99 rather
/// than rolling over.
pub fn format_elapsed(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// Output cell for an offset: blank when no offset was recorded
pub fn offset_cell(offset_ms: u64, rate: FrameRate) -> String {
    if offset_ms == 0 {
        String::new()
    } else {
        millis_to_frames(offset_ms, rate).to_string()
    }
}

fn round_half_up(value: f64) -> u64 {
    // Inputs are non-negative, so floor(x + 0.5) is half-up rounding.
    (value + 0.5).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const NTSC: FrameRate = FrameRate::NTSC;

    #[test]
    fn test_millis_to_frames() {
        assert_eq!(millis_to_frames(0, NTSC), 0);
        assert_eq!(millis_to_frames(1000, NTSC), 30);
        assert_eq!(millis_to_frames(2000, NTSC), 60);
        assert_eq!(millis_to_frames(3000, NTSC), 90);
    }

    #[test]
    fn test_frames_to_millis() {
        assert_eq!(frames_to_millis(0, NTSC), 0);
        assert_eq!(frames_to_millis(30, NTSC), 1001);
        assert_eq!(frames_to_millis(90, NTSC), 3003);
    }

    #[test]
    fn test_round_trip_within_quantization() {
        // One frame at 29.97 fps is ~33.4 ms, so a round trip can move a
        // timestamp by at most half a frame.
        for ms in (0..120_000).step_by(37) {
            let back = frames_to_millis(millis_to_frames(ms, NTSC), NTSC);
            let drift = back.abs_diff(ms);
            assert!(drift <= 17, "{} ms drifted to {} ms", ms, back);
        }
    }

    #[test]
    fn test_frame_round_trip_is_exact() {
        for frames in 0..5000 {
            let ms = frames_to_millis(frames, NTSC);
            assert_eq!(millis_to_frames(ms, NTSC), frames);
        }
    }

    #[test]
    fn test_round_half_up() {
        // 500 ms at 1 fps is exactly half a frame
        assert_eq!(millis_to_frames(500, FrameRate(1.0)), 1);
        assert_eq!(millis_to_frames(499, FrameRate(1.0)), 0);
        assert_eq!(millis_to_frames(1500, FrameRate(1.0)), 2);
    }

    #[test]
    fn test_other_frame_rates() {
        assert_eq!(millis_to_frames(1000, FrameRate(25.0)), 25);
        assert_eq!(frames_to_millis(25, FrameRate(25.0)), 1000);
        assert_eq!(millis_to_frames(1000, FrameRate(60.0)), 60);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00.000");
        assert_eq!(format_elapsed(3003), "00:03.003");
        assert_eq!(format_elapsed(61_234), "01:01.234");
        assert_eq!(format_elapsed(90_000), "01:30.000");
    }

    #[test]
    fn test_format_elapsed_past_99_minutes() {
        assert_eq!(format_elapsed(100 * 60_000 + 5_042), "100:05.042");
    }

    #[test]
    fn test_offset_cell() {
        assert_eq!(offset_cell(0, NTSC), "");
        assert_eq!(offset_cell(2000, NTSC), "60");
    }
}
