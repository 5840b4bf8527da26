//! Host-facing unit boundary.
//!
//! A unit is initialized against a [`RuntimeDesc`], then driven with
//! interleaved render calls and integer-domain parameter traffic. All
//! runtime input is clamped or quantized; after init nothing fails.

pub mod delay;
pub mod descriptor;
pub mod osc;
pub mod params;

pub use delay::DelayUnit;
pub use descriptor::{
    api_is_compatible, HeapArena, InitError, RuntimeDesc, SampleArena, UnitModule,
    REQUIRED_SAMPLE_RATE, UNIT_API_VERSION,
};
pub use osc::TemplateOsc;

/// Raw value reported for a parameter id the unit does not know.
pub const UNKNOWN_PARAM_VALUE: i32 = i32::MIN;

/// Trait for host-driven audio units.
///
/// Units must be Send so hosts can park them on an audio thread.
pub trait Unit: Send {
    /// Render one block: interleaved input frames to interleaved output
    /// frames. Slice lengths are multiples of the channel counts the unit
    /// was initialized with, covering the same number of frames.
    fn render(&mut self, input: &[f32], output: &mut [f32]);

    /// Set a parameter from its raw integer domain. Out-of-range values
    /// are clamped, unknown ids ignored.
    fn set_param(&mut self, id: u8, value: i32);

    /// Report a parameter in its raw integer domain, re-quantized from
    /// the unit's internal state. Unknown ids report
    /// [`UNKNOWN_PARAM_VALUE`].
    fn get_param(&self, id: u8) -> i32;

    /// Tempo notification in 16.16 fixed point (beats per minute).
    /// Converted once here; the render path sees plain BPM.
    fn set_tempo(&mut self, tempo: u32);

    /// Clear signal state (delay lines, phase). Parameter values and the
    /// smoothed delay position survive a reset.
    fn reset(&mut self);

    /// Module slot this unit implements.
    fn module(&self) -> UnitModule;
}
