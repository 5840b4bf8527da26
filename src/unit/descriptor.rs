//! Runtime descriptor and initialization contract.
//!
//! The host hands a unit a description of the slot it is being loaded
//! into; the unit either accepts it or refuses with a status precise
//! enough for the host to report. After a successful init there are no
//! failure paths left in the unit.

use thiserror::Error;

/// Sample rate every unit in this crate is built for.
pub const REQUIRED_SAMPLE_RATE: u32 = 48_000;

/// API word the units are written against: major.minor.patch, one byte
/// each.
pub const UNIT_API_VERSION: u32 = 0x01_01_00;

/// A host API word is usable when the majors match and the host's minor
/// is at least ours.
pub fn api_is_compatible(api: u32) -> bool {
    api >> 16 == UNIT_API_VERSION >> 16
        && ((api >> 8) & 0xFF) >= ((UNIT_API_VERSION >> 8) & 0xFF)
}

/// Module slot a unit plugs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitModule {
    DelayFx,
    Oscillator,
}

/// Source of sample memory for delay lines.
///
/// The host decides where large sample buffers live; units ask exactly
/// once, at init, and never allocate afterwards.
pub trait SampleArena {
    /// Allocate a zero-filled buffer of `len` samples, or `None` when the
    /// arena cannot satisfy the request.
    fn alloc_samples(&self, len: usize) -> Option<Box<[f32]>>;
}

/// Arena backed by the process heap.
#[derive(Debug, Default)]
pub struct HeapArena;

impl SampleArena for HeapArena {
    fn alloc_samples(&self, len: usize) -> Option<Box<[f32]>> {
        Some(vec![0.0_f32; len].into_boxed_slice())
    }
}

/// Everything a unit needs to know about its runtime environment.
#[derive(Clone, Copy)]
pub struct RuntimeDesc<'a> {
    /// Module slot the host is loading the unit into.
    pub target: UnitModule,
    /// Host API word.
    pub api: u32,
    /// Host sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved input channels per frame.
    pub input_channels: u32,
    /// Interleaved output channels per frame.
    pub output_channels: u32,
    /// Sample memory for delay lines, when the slot provides any.
    pub arena: Option<&'a dyn SampleArena>,
}

impl<'a> RuntimeDesc<'a> {
    /// Descriptor for the standard delay-effect slot.
    pub fn delay_fx(arena: &'a dyn SampleArena) -> Self {
        Self {
            target: UnitModule::DelayFx,
            api: UNIT_API_VERSION,
            sample_rate: REQUIRED_SAMPLE_RATE,
            input_channels: 2,
            output_channels: 2,
            arena: Some(arena),
        }
    }

    /// Descriptor for the standard oscillator slot.
    pub fn oscillator() -> Self {
        Self {
            target: UnitModule::Oscillator,
            api: UNIT_API_VERSION,
            sample_rate: REQUIRED_SAMPLE_RATE,
            input_channels: 2,
            output_channels: 1,
            arena: None,
        }
    }
}

/// Why initialization was refused. One status per failure mode so hosts
/// can report something actionable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("missing or malformed runtime descriptor")]
    InvalidDescriptor,

    #[error("descriptor targets {0:?}, which this unit does not implement")]
    IncompatibleTarget(UnitModule),

    #[error("host API {host:#08x} is not compatible with unit API {unit:#08x}")]
    IncompatibleApi { host: u32, unit: u32 },

    #[error("unsupported sample rate {0} Hz (requires 48000 Hz)")]
    UnsupportedSampleRate(u32),

    #[error("unsupported channel geometry {input}-in/{output}-out")]
    UnsupportedGeometry { input: u32, output: u32 },

    #[error("sample arena could not provide {0} samples")]
    AllocationFailed(usize),
}
