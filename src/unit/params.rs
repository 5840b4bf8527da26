//! Parameter definitions and integer-domain marshalling - single source
//! of truth.
//!
//! Hosts address parameters by small integer ids and exchange raw integer
//! values; units keep normalized floats internally. The descriptor tables
//! here define the raw domains, and the conversion helpers move values
//! across the boundary.

/// Top of the unsigned 10-bit parameter domain.
pub const PARAM_10BIT_MAX: i32 = 1023;

/// Half-span of the signed per-mille mix domain.
pub const PARAM_MIX_MAX: i32 = 1000;

/// Delay unit parameters, by wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayParamId {
    Time = 0,
    Depth = 1,
    Mix = 2,
    Mode = 3,
}

impl DelayParamId {
    pub const ALL: &'static [Self] = &[Self::Time, Self::Depth, Self::Mix, Self::Mode];

    /// Decode a wire id.
    pub fn from_raw(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Time),
            1 => Some(Self::Depth),
            2 => Some(Self::Mix),
            3 => Some(Self::Mode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "TIME",
            Self::Depth => "DEPTH",
            Self::Mix => "MIX",
            Self::Mode => "MODE",
        }
    }

    /// Definition for this parameter. The table is ordered by wire id.
    pub fn def(&self) -> &'static ParamDef<Self> {
        &DELAY_PARAMS[*self as usize]
    }
}

/// Oscillator unit parameters, by wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscParamId {
    Shape = 0,
    ShiftShape = 1,
    Mode = 2,
}

impl OscParamId {
    pub const ALL: &'static [Self] = &[Self::Shape, Self::ShiftShape, Self::Mode];

    /// Decode a wire id.
    pub fn from_raw(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Shape),
            1 => Some(Self::ShiftShape),
            2 => Some(Self::Mode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shape => "SHAPE",
            Self::ShiftShape => "ALT",
            Self::Mode => "MODE",
        }
    }

    /// Definition for this parameter. The table is ordered by wire id.
    pub fn def(&self) -> &'static ParamDef<Self> {
        &OSC_PARAMS[*self as usize]
    }
}

/// Integer-domain parameter descriptor.
#[derive(Debug, Clone)]
pub struct ParamDef<Id: 'static> {
    pub id: Id,
    pub min: i32,
    pub max: i32,
    pub center: i32,
    pub default: i32,
}

impl<Id> ParamDef<Id> {
    /// Clamp a raw host value into this parameter's domain.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Descriptor table for the delay unit, ordered by wire id.
pub static DELAY_PARAMS: &[ParamDef<DelayParamId>] = &[
    ParamDef {
        id: DelayParamId::Time,
        min: 0,
        max: PARAM_10BIT_MAX,
        center: 0,
        default: 256,
    },
    ParamDef {
        id: DelayParamId::Depth,
        min: 0,
        max: PARAM_10BIT_MAX,
        center: 0,
        default: 256,
    },
    ParamDef {
        id: DelayParamId::Mix,
        min: -PARAM_MIX_MAX,
        max: PARAM_MIX_MAX,
        center: 0,
        default: 0,
    },
    ParamDef {
        id: DelayParamId::Mode,
        min: 0,
        max: 3,
        center: 0,
        default: 1,
    },
];

/// Descriptor table for the oscillator unit, ordered by wire id.
pub static OSC_PARAMS: &[ParamDef<OscParamId>] = &[
    ParamDef {
        id: OscParamId::Shape,
        min: 0,
        max: PARAM_10BIT_MAX,
        center: 0,
        default: 0,
    },
    ParamDef {
        id: OscParamId::ShiftShape,
        min: 0,
        max: PARAM_10BIT_MAX,
        center: 0,
        default: 0,
    },
    ParamDef {
        id: OscParamId::Mode,
        min: 0,
        max: 3,
        center: 0,
        default: 0,
    },
];

/// Convert a raw 10-bit value into a ratio in [0, 1].
pub fn ratio_from_10bit(value: i32) -> f32 {
    value as f32 / PARAM_10BIT_MAX as f32
}

/// Quantize a ratio back into the 10-bit domain (truncating).
pub fn ratio_to_10bit(ratio: f32) -> i32 {
    (ratio * PARAM_10BIT_MAX as f32) as i32
}

/// Convert a raw signed per-mille value into a ratio in [-1, 1].
pub fn ratio_from_mix(value: i32) -> f32 {
    value as f32 / PARAM_MIX_MAX as f32
}

/// Quantize a mix ratio back into the signed per-mille domain
/// (truncating).
pub fn ratio_to_mix(ratio: f32) -> i32 {
    (ratio * PARAM_MIX_MAX as f32) as i32
}
