//! Circular sample storage for the delay line.
//!
//! The buffer has a fixed power-of-two capacity so any integer offset from
//! the write pointer can wrap with a single mask. The pointer walks
//! backwards through memory; positive offsets therefore reach into the
//! past, which is the direction a delay line reads.

/// Capacity of the delay unit's sample buffer, sized for the longest
/// tempo-synced delay (1.5 beats at 10 BPM) plus interpolation headroom.
pub const DELAY_BUFFER_LEN: usize = 1 << 19;

/// Fixed-capacity circular sample store with a decrementing write pointer.
pub struct DelayBuffer {
    samples: Box<[f32]>,
    mask: usize,
    pointer: usize,
}

impl DelayBuffer {
    /// Create a zero-filled buffer. `len` must be a power of two.
    pub fn new(len: usize) -> Self {
        Self::from_storage(vec![0.0; len].into_boxed_slice())
    }

    /// Wrap caller-allocated storage. The length must be a power of two,
    /// otherwise mask addressing would fold onto the wrong slots.
    pub fn from_storage(storage: Box<[f32]>) -> Self {
        assert!(
            storage.len().is_power_of_two(),
            "delay buffer length must be a power of two, got {}",
            storage.len()
        );
        let mask = storage.len() - 1;
        Self {
            samples: storage,
            mask,
            pointer: 0,
        }
    }

    /// Number of samples the buffer holds.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Current write position.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Step the write pointer back one slot and return it.
    pub fn advance(&mut self) -> usize {
        self.pointer = self.pointer.wrapping_sub(1) & self.mask;
        self.pointer
    }

    /// Sample `offset` slots from `origin`. Any i32 offset is valid:
    /// negative, past the capacity, whatever - the mask wraps it.
    pub fn read_at(&self, origin: usize, offset: i32) -> f32 {
        self.samples[origin.wrapping_add(offset as isize as usize) & self.mask]
    }

    /// Store a sample at `index` (masked).
    pub fn write_at(&mut self, index: usize, sample: f32) {
        let slot = index & self.mask;
        self.samples[slot] = sample;
    }

    /// Linearly interpolated read at a fractional offset from `origin`.
    ///
    /// The offset is split by truncation toward zero, so an exact integer
    /// offset returns the stored sample untouched. The offset arrives as
    /// f64 because delay positions are tracked at control precision; the
    /// sample mix itself stays in f32.
    pub fn read_lerp(&self, origin: usize, offset: f64) -> f32 {
        let whole = offset as i32;
        let frac = (offset - whole as f64) as f32;
        let a = self.read_at(origin, whole);
        let b = self.read_at(origin, whole + 1);
        a + (b - a) * frac
    }

    /// Zero the contents and rewind the pointer.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.pointer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_below_zero() {
        let mut buf = DelayBuffer::new(8);
        assert_eq!(buf.pointer(), 0);
        assert_eq!(buf.advance(), 7);
        assert_eq!(buf.advance(), 6);
    }

    #[test]
    fn offsets_wrap_in_both_directions() {
        let mut buf = DelayBuffer::new(8);
        buf.write_at(3, 0.5);
        assert_eq!(buf.read_at(3, 0), 0.5);
        assert_eq!(buf.read_at(3, 8), 0.5);
        assert_eq!(buf.read_at(3, -8), 0.5);
        assert_eq!(buf.read_at(0, 3), 0.5);
        assert_eq!(buf.read_at(0, 3 - 8 * 100), 0.5);
        assert_eq!(buf.read_at(0, 3 + 8 * 100), 0.5);
    }

    #[test]
    fn backward_pointer_puts_older_samples_at_larger_offsets() {
        let mut buf = DelayBuffer::new(16);
        for k in 0..12 {
            let p = buf.advance();
            buf.write_at(p, k as f32);
        }
        // The most recent write sits at offset 0, each step back in time
        // one slot further along.
        for age in 0..12 {
            assert_eq!(buf.read_at(buf.pointer(), age), (11 - age) as f32);
        }
    }

    #[test]
    fn integer_offset_lookup_is_exact() {
        let mut buf = DelayBuffer::new(16);
        buf.write_at(5, 0.123456);
        buf.write_at(6, -0.7654321);
        assert_eq!(buf.read_lerp(0, 5.0), 0.123456);
        assert_eq!(buf.read_lerp(0, 6.0), -0.7654321);
    }

    #[test]
    fn halfway_offset_returns_the_mean() {
        let mut buf = DelayBuffer::new(16);
        buf.write_at(5, 0.25);
        buf.write_at(6, 0.75);
        assert_eq!(buf.read_lerp(0, 5.5), 0.5);
    }

    #[test]
    fn interpolation_wraps_across_the_seam() {
        let mut buf = DelayBuffer::new(8);
        buf.write_at(7, 1.0);
        buf.write_at(0, 3.0);
        // Reading between the last and first slot must wrap, not clamp.
        assert_eq!(buf.read_lerp(0, 7.5), 2.0);
    }

    #[test]
    fn negative_offsets_split_toward_zero() {
        let mut buf = DelayBuffer::new(8);
        buf.write_at(5, 9.0);
        buf.write_at(6, 0.5);
        buf.write_at(7, 1.0);
        // -2.5 splits as whole -2, frac -0.5: slots 6 and 7, extrapolated
        // backwards. A floor split would land on slots 5 and 6 instead.
        assert_eq!(buf.read_lerp(0, -2.5), 0.25);
    }

    #[test]
    fn clear_silences_every_slot() {
        let mut buf = DelayBuffer::new(8);
        for i in 0..8 {
            buf.write_at(i, 1.0);
        }
        buf.clear();
        for i in 0..8 {
            assert_eq!(buf.read_at(0, i), 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two_storage() {
        DelayBuffer::new(1000);
    }
}
