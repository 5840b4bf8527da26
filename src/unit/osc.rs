//! Naive square-wave oscillator template unit.
//!
//! The smallest complete unit: same init contract and parameter plumbing
//! as the delay, driving a bare phase accumulator. Useful as a starting
//! point for new oscillators and as a signal source in offline renders.

use log::debug;

use crate::unit::descriptor::{
    api_is_compatible, InitError, RuntimeDesc, UnitModule, REQUIRED_SAMPLE_RATE, UNIT_API_VERSION,
};
use crate::unit::params::{ratio_from_10bit, ratio_to_10bit, OscParamId};
use crate::unit::{Unit, UNKNOWN_PARAM_VALUE};

/// Frequency of a fractional MIDI note number, 440 Hz at note 69.
fn note_to_hz(note: f32) -> f32 {
    440.0 * ((note - 69.0) / 12.0).exp2()
}

/// Square-wave oscillator behind the standard unit boundary.
pub struct TemplateOsc {
    /// Sample rate in Hz (validated at init).
    sample_rate: f32,
    /// Phase in [0, 1).
    phase: f32,
    /// Per-sample phase increment for the current pitch.
    increment: f32,
    /// Normalized SHAPE in [0, 1] (reserved by the template).
    shape: f32,
    /// Normalized ALT in [0, 1] (reserved by the template).
    shift_shape: f32,
    /// Stored aux MODE value.
    mode: i32,
}

impl TemplateOsc {
    /// Validate the runtime descriptor. The oscillator slot provides no
    /// sample arena and the template needs none.
    pub fn init(desc: Option<&RuntimeDesc>) -> Result<Self, InitError> {
        let desc = desc.ok_or(InitError::InvalidDescriptor)?;
        if desc.target != UnitModule::Oscillator {
            return Err(InitError::IncompatibleTarget(desc.target));
        }
        if !api_is_compatible(desc.api) {
            return Err(InitError::IncompatibleApi {
                host: desc.api,
                unit: UNIT_API_VERSION,
            });
        }
        if desc.sample_rate != REQUIRED_SAMPLE_RATE {
            return Err(InitError::UnsupportedSampleRate(desc.sample_rate));
        }
        if desc.input_channels != 2 || desc.output_channels != 1 {
            return Err(InitError::UnsupportedGeometry {
                input: desc.input_channels,
                output: desc.output_channels,
            });
        }
        Ok(Self {
            sample_rate: desc.sample_rate as f32,
            phase: 0.0,
            increment: 0.0,
            shape: 0.0,
            shift_shape: 0.0,
            mode: 0,
        })
    }

    /// Pitch from the runtime context as an 8.8 fixed-point note number.
    pub fn set_pitch(&mut self, pitch: u16) {
        let note = (pitch >> 8) as f32 + (pitch & 0xFF) as f32 / 256.0;
        self.increment = note_to_hz(note) / self.sample_rate;
    }
}

impl Unit for TemplateOsc {
    fn render(&mut self, input: &[f32], output: &mut [f32]) {
        // Mono output; the stereo side input is part of the slot's shape
        // but the template has no use for it.
        debug_assert_eq!(input.len(), 2 * output.len());
        for out in output.iter_mut() {
            let sig = if 0.5 < self.phase { 1.0 } else { -1.0 };
            *out = sig;
            self.phase += self.increment;
            self.phase -= (self.phase as u32) as f32;
        }
    }

    fn set_param(&mut self, id: u8, value: i32) {
        let param = match OscParamId::from_raw(id) {
            Some(param) => param,
            None => {
                debug!("ignoring unknown osc param id {}", id);
                return;
            }
        };
        let value = param.def().clamp(value);
        match param {
            OscParamId::Shape => self.shape = ratio_from_10bit(value),
            OscParamId::ShiftShape => self.shift_shape = ratio_from_10bit(value),
            OscParamId::Mode => self.mode = value,
        }
    }

    fn get_param(&self, id: u8) -> i32 {
        match OscParamId::from_raw(id) {
            Some(OscParamId::Shape) => ratio_to_10bit(self.shape),
            Some(OscParamId::ShiftShape) => ratio_to_10bit(self.shift_shape),
            Some(OscParamId::Mode) => self.mode,
            None => UNKNOWN_PARAM_VALUE,
        }
    }

    fn set_tempo(&mut self, _tempo: u32) {
        // Nothing tempo-synced in the template.
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }

    fn module(&self) -> UnitModule {
        UnitModule::Oscillator
    }
}
