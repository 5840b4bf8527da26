//! Per-block translation of tempo and normalized parameters into
//! sample-domain delay settings.
//!
//! Runs once per render block, never per sample: the processor only ever
//! sees a target position and a feedback gain.

use crate::dsp::tables::{DELAY_TIME_BEATS, FEEDBACK_GAINS};

/// Slowest tempo the mapper honors.
pub const MIN_BPM: f64 = 10.0;
/// Fastest tempo the mapper honors.
pub const MAX_BPM: f64 = 480.0;

/// Clamp a reported tempo into the supported range.
pub fn clamp_bpm(bpm: f64) -> f64 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Map a normalized control in [0, 1] onto a table index. The product is
/// truncated, then clamped so 1.0 still selects the last entry.
pub fn table_index(normalized: f32, len: usize) -> usize {
    let idx = (normalized * len as f32) as i32;
    idx.clamp(0, len as i32 - 1) as usize
}

/// Delay length in samples for a musical duration at a given tempo.
pub fn delay_samples(sample_rate: f64, beats: f64, bpm: f64) -> f64 {
    sample_rate * beats * 60.0 / bpm
}

/// Sign convention for the fed-back wet signal.
///
/// The stock voicing writes the wet signal back inverted; either polarity
/// produces the same echo envelope, only the sample signs differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackPolarity {
    /// Feed the delayed signal back sign-flipped (stock voicing).
    #[default]
    Inverted,
    /// Feed the delayed signal back as-is.
    Direct,
}

/// Sample-domain delay settings for one render block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockParams {
    /// Delay length in samples the position smoother should glide toward.
    pub target_position: f64,
    /// Signed gain applied to the fed-back wet signal.
    pub feedback_gain: f32,
}

/// Compute block settings from the tempo and the normalized TIME and DEPTH
/// parameters.
pub fn map_block(
    sample_rate: f64,
    bpm: f64,
    time: f32,
    depth: f32,
    polarity: FeedbackPolarity,
) -> BlockParams {
    let bpm = clamp_bpm(bpm);
    let beats = DELAY_TIME_BEATS[table_index(time, DELAY_TIME_BEATS.len())];
    let gain = FEEDBACK_GAINS[table_index(depth, FEEDBACK_GAINS.len())];
    BlockParams {
        target_position: delay_samples(sample_rate, beats as f64, bpm),
        feedback_gain: match polarity {
            FeedbackPolarity::Inverted => -gain,
            FeedbackPolarity::Direct => gain,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::buffer::DELAY_BUFFER_LEN;

    #[test]
    fn quarter_note_lengths_at_the_tempo_extremes() {
        assert_eq!(delay_samples(48_000.0, 1.0, 10.0), 288_000.0);
        assert_eq!(delay_samples(48_000.0, 1.0, 480.0), 6_000.0);
        assert_eq!(delay_samples(48_000.0, 0.5, 120.0), 12_000.0);
    }

    #[test]
    fn tempo_clamps_to_the_supported_range() {
        assert_eq!(clamp_bpm(5.0), 10.0);
        assert_eq!(clamp_bpm(1200.0), 480.0);
        assert_eq!(clamp_bpm(174.0), 174.0);
    }

    #[test]
    fn table_index_clamps_full_scale_onto_the_last_entry() {
        assert_eq!(table_index(0.0, 10), 0);
        assert_eq!(table_index(0.95, 10), 9);
        assert_eq!(table_index(1.0, 10), 9);
        assert_eq!(table_index(1.0, 64), 63);
        assert_eq!(table_index(0.5, 64), 32);
    }

    #[test]
    fn map_block_applies_the_polarity_choice() {
        let inverted = map_block(48_000.0, 120.0, 0.5, 0.5, FeedbackPolarity::Inverted);
        let direct = map_block(48_000.0, 120.0, 0.5, 0.5, FeedbackPolarity::Direct);
        assert!(inverted.feedback_gain < 0.0);
        assert!(direct.feedback_gain > 0.0);
        assert_eq!(inverted.feedback_gain, -direct.feedback_gain);
        assert_eq!(inverted.target_position, direct.target_position);
    }

    #[test]
    fn map_block_clamps_wild_tempos() {
        let slow = map_block(48_000.0, 0.0, 1.0, 0.0, FeedbackPolarity::Inverted);
        assert_eq!(slow.target_position, delay_samples(48_000.0, 1.5, 10.0));

        let fast = map_block(48_000.0, 10_000.0, 1.0, 0.0, FeedbackPolarity::Inverted);
        assert_eq!(fast.target_position, delay_samples(48_000.0, 1.5, 480.0));
    }

    #[test]
    fn longest_sync_delay_fits_the_buffer() {
        let longest = DELAY_TIME_BEATS[DELAY_TIME_BEATS.len() - 1] as f64;
        let samples = delay_samples(48_000.0, longest, MIN_BPM);
        // One extra sample of headroom for the interpolation neighbor.
        assert!(samples + 1.0 < DELAY_BUFFER_LEN as f64);
    }
}
