//! Test helpers for the delay engine
//!
//! Deterministic signal generators and measurements shared by the dsp
//! and unit tests, so no test depends on a real audio host.

/// Sample rate every unit is validated against (48kHz)
pub const TEST_SAMPLE_RATE: f32 = 48_000.0;

/// Generate a test signal (sine wave at given frequency)
pub fn generate_sine(samples: usize, frequency: f32, sample_rate: f32) -> Vec<f32> {
    (0..samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate an impulse signal (1.0 at sample 0, 0.0 elsewhere)
pub fn generate_impulse(samples: usize) -> Vec<f32> {
    let mut signal = vec![0.0; samples];
    if !signal.is_empty() {
        signal[0] = 1.0;
    }
    signal
}

/// Generate white noise (random samples between -1.0 and 1.0)
pub fn generate_noise(samples: usize, seed: u64) -> Vec<f32> {
    // Simple PRNG for reproducible tests (xorshift)
    let mut state = seed;
    (0..samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state as f32 / u64::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Duplicate a mono signal into interleaved stereo frames
pub fn interleave_stereo(mono: &[f32]) -> Vec<f32> {
    let mut frames = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        frames.push(sample);
        frames.push(sample);
    }
    frames
}

/// Extract the left channel from interleaved stereo frames
pub fn left_channel(frames: &[f32]) -> Vec<f32> {
    frames.iter().step_by(2).copied().collect()
}

/// Calculate RMS (root mean square) of a signal
pub fn calculate_rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_of_squares / signal.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal
pub fn calculate_peak(signal: &[f32]) -> f32 {
    signal.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
}
