//! Fixed lookup tables behind the TIME and DEPTH parameters.
//!
//! Both controls quantize onto small immutable tables rather than sweeping
//! a continuous range: TIME picks a musical duration, DEPTH picks a
//! feedback coefficient.

/// Delay durations in beats (quarter note = 1 beat), selected by TIME.
pub const DELAY_TIME_BEATS: [f32; 10] = [
    0.125,     // 1/32
    0.1875,    // dotted 1/32
    0.25,      // 1/16
    1.0 / 3.0, // 1/8 triplet
    0.375,     // dotted 1/16
    0.5,       // 1/8
    2.0 / 3.0, // 1/4 triplet
    0.75,      // dotted 1/8
    1.0,       // 1/4
    1.5,       // dotted 1/4
];

/// Feedback coefficients selected by DEPTH. Steps of 1/64 so every entry
/// is exactly representable.
pub const FEEDBACK_GAINS: [f32; 64] = [
    0.0, 0.015625, 0.03125, 0.046875, //
    0.0625, 0.078125, 0.09375, 0.109375, //
    0.125, 0.140625, 0.15625, 0.171875, //
    0.1875, 0.203125, 0.21875, 0.234375, //
    0.25, 0.265625, 0.28125, 0.296875, //
    0.3125, 0.328125, 0.34375, 0.359375, //
    0.375, 0.390625, 0.40625, 0.421875, //
    0.4375, 0.453125, 0.46875, 0.484375, //
    0.5, 0.515625, 0.53125, 0.546875, //
    0.5625, 0.578125, 0.59375, 0.609375, //
    0.625, 0.640625, 0.65625, 0.671875, //
    0.6875, 0.703125, 0.71875, 0.734375, //
    0.75, 0.765625, 0.78125, 0.796875, //
    0.8125, 0.828125, 0.84375, 0.859375, //
    0.875, 0.890625, 0.90625, 0.921875, //
    0.9375, 0.953125, 0.96875, 0.984375, //
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_times_are_strictly_increasing() {
        for pair in DELAY_TIME_BEATS.windows(2) {
            assert!(
                pair[0] < pair[1],
                "delay time table not monotonic at {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn delay_times_include_a_quarter_note() {
        assert!(DELAY_TIME_BEATS.contains(&1.0));
    }

    #[test]
    fn feedback_gains_are_strictly_increasing_below_unity() {
        for pair in FEEDBACK_GAINS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(FEEDBACK_GAINS[0], 0.0);
        assert!(FEEDBACK_GAINS[63] < 1.0, "unity feedback would never decay");
    }

    #[test]
    fn feedback_gains_follow_the_quantization_grid() {
        for (i, &gain) in FEEDBACK_GAINS.iter().enumerate() {
            assert_eq!(gain, i as f32 / 64.0);
        }
    }
}
