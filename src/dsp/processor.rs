//! Feedback delay core: position smoothing plus the per-sample loop.
//!
//! Audio samples are f32; the delay position is tracked in f64 so the
//! exponential glide still resolves sub-sample steps at positions of
//! several hundred thousand samples, where the f32 grid is coarser than
//! the snap band.

use crate::dsp::buffer::DelayBuffer;

/// Smoothing factor for delay-position moves. Closer to 1.0 glides slower.
const POSITION_SMOOTHING: f64 = 0.99979;

/// Band around the target inside which the position snaps exactly.
const POSITION_SNAP: f64 = 0.001;

/// One smoothing step of the delay position toward `target`.
///
/// Inside the snap band the target is returned exactly, so a settled
/// position stops drifting and integer delay lengths stay integer. Outside
/// it the error shrinks geometrically, which is what keeps delay-time
/// changes click-free.
pub fn converge_position(target: f64, current: f64) -> f64 {
    if (target - current).abs() < POSITION_SNAP {
        target
    } else {
        target - (target - current) * POSITION_SMOOTHING
    }
}

/// Mono feedback delay line with a smoothed, fractional read position.
pub struct DelayProcessor {
    line: DelayBuffer,
    current_position: f64,
    target_position: f64,
    feedback_gain: f32,
}

impl DelayProcessor {
    /// Wrap a buffer into a processor with the position at zero and no
    /// feedback.
    pub fn new(line: DelayBuffer) -> Self {
        Self {
            line,
            current_position: 0.0,
            target_position: 0.0,
            feedback_gain: 0.0,
        }
    }

    /// Set the delay length in samples the position should glide toward.
    pub fn set_target_position(&mut self, samples: f64) {
        self.target_position = samples;
    }

    /// Set the gain applied to the delayed signal when it is written back.
    pub fn set_feedback_gain(&mut self, gain: f32) {
        self.feedback_gain = gain;
    }

    /// Delay length currently in effect, in samples.
    pub fn current_position(&self) -> f64 {
        self.current_position
    }

    /// Samples the underlying buffer can hold.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Process one input sample and return the delayed (wet) sample.
    pub fn process(&mut self, input: f32) -> f32 {
        self.current_position = converge_position(self.target_position, self.current_position);
        let pointer = self.line.advance();
        let wet = self.line.read_lerp(pointer, self.current_position);
        self.line.write_at(pointer, input + self.feedback_gain * wet);
        wet
    }

    /// Silence the delay line. The smoothed position is left alone so a
    /// restart does not glide in from zero again.
    pub fn reset(&mut self) {
        self.line.clear();
    }
}
