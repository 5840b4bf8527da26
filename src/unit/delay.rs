//! Tempo-synced feedback delay unit.
//!
//! Wires the delay engine to the host boundary: descriptor validation at
//! init, per-block parameter mapping, and the mono-processed, replicated
//! stereo render path.

use log::debug;

use crate::dsp::buffer::{DelayBuffer, DELAY_BUFFER_LEN};
use crate::dsp::mapper::{map_block, FeedbackPolarity};
use crate::dsp::processor::DelayProcessor;
use crate::unit::descriptor::{
    api_is_compatible, InitError, RuntimeDesc, UnitModule, REQUIRED_SAMPLE_RATE, UNIT_API_VERSION,
};
use crate::unit::params::{
    ratio_from_10bit, ratio_from_mix, ratio_to_10bit, ratio_to_mix, DelayParamId,
};
use crate::unit::{Unit, UNKNOWN_PARAM_VALUE};

/// Tempo assumed until the host sends its first notification.
const DEFAULT_BPM: f64 = 30.0;

/// Tempo-synced feedback delay behind the standard unit boundary.
pub struct DelayUnit {
    /// Sample rate in Hz (validated, kept for the mapper).
    sample_rate: f64,
    /// The mono delay engine.
    processor: DelayProcessor,
    /// Normalized TIME in [0, 1].
    time: f32,
    /// Normalized DEPTH in [0, 1].
    depth: f32,
    /// Normalized MIX in [-1, 1].
    mix: f32,
    /// Stored aux MODE value (reserved, no effect on the signal).
    mode: i32,
    /// Tempo in BPM, converted once per host notification.
    bpm: f64,
    /// Feedback sign convention.
    polarity: FeedbackPolarity,
}

impl DelayUnit {
    /// Validate the runtime descriptor and allocate the delay line.
    pub fn init(desc: Option<&RuntimeDesc>) -> Result<Self, InitError> {
        let desc = desc.ok_or(InitError::InvalidDescriptor)?;
        if desc.target != UnitModule::DelayFx {
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
        if desc.input_channels != 2 || desc.output_channels != 2 {
            return Err(InitError::UnsupportedGeometry {
                input: desc.input_channels,
                output: desc.output_channels,
            });
        }
        let storage = desc
            .arena
            .and_then(|arena| arena.alloc_samples(DELAY_BUFFER_LEN))
            .ok_or(InitError::AllocationFailed(DELAY_BUFFER_LEN))?;

        debug!("delay unit ready ({} sample line)", DELAY_BUFFER_LEN);
        Ok(Self {
            sample_rate: desc.sample_rate as f64,
            processor: DelayProcessor::new(DelayBuffer::from_storage(storage)),
            time: 0.0,
            depth: 0.0,
            mix: 0.0,
            mode: 0,
            bpm: DEFAULT_BPM,
            polarity: FeedbackPolarity::default(),
        })
    }

    /// Override the feedback sign convention.
    pub fn set_feedback_polarity(&mut self, polarity: FeedbackPolarity) {
        self.polarity = polarity;
    }

    /// Feedback sign convention currently in use.
    pub fn feedback_polarity(&self) -> FeedbackPolarity {
        self.polarity
    }
}

impl Unit for DelayUnit {
    fn render(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());

        // Tempo and parameters are sampled once per block.
        let block = map_block(self.sample_rate, self.bpm, self.time, self.depth, self.polarity);
        self.processor.set_target_position(block.target_position);
        self.processor.set_feedback_gain(block.feedback_gain);

        let wet_level = (self.mix + 1.0) / 2.0;
        let dry_level = 1.0 - wet_level;

        for (frame_in, frame_out) in input.chunks_exact(2).zip(output.chunks_exact_mut(2)) {
            let dry = frame_in[0];
            let wet = self.processor.process(dry);
            let out = dry_level * dry + wet_level * wet;
            frame_out[0] = out;
            frame_out[1] = out;
        }
    }

    fn set_param(&mut self, id: u8, value: i32) {
        let param = match DelayParamId::from_raw(id) {
            Some(param) => param,
            None => {
                debug!("ignoring unknown delay param id {}", id);
                return;
            }
        };
        let value = param.def().clamp(value);
        match param {
            DelayParamId::Time => self.time = ratio_from_10bit(value),
            DelayParamId::Depth => self.depth = ratio_from_10bit(value),
            DelayParamId::Mix => self.mix = ratio_from_mix(value),
            DelayParamId::Mode => self.mode = value,
        }
    }

    fn get_param(&self, id: u8) -> i32 {
        match DelayParamId::from_raw(id) {
            Some(DelayParamId::Time) => ratio_to_10bit(self.time),
            Some(DelayParamId::Depth) => ratio_to_10bit(self.depth),
            Some(DelayParamId::Mix) => ratio_to_mix(self.mix),
            Some(DelayParamId::Mode) => self.mode,
            None => UNKNOWN_PARAM_VALUE,
        }
    }

    fn set_tempo(&mut self, tempo: u32) {
        // 16.16 fixed point, converted exactly once per notification.
        self.bpm = tempo as f64 / 65_536.0;
    }

    fn reset(&mut self) {
        self.processor.reset();
    }

    fn module(&self) -> UnitModule {
        UnitModule::DelayFx
    }
}
