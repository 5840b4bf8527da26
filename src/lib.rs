//! beatdelay - a tempo-synced feedback delay unit
//!
//! The `dsp` module holds the delay line, smoothing, and parameter
//! mapping; `unit` wraps them behind the host init/render/param
//! boundary; `offline` renders WAV files through that same boundary.

pub mod dsp;
pub mod offline;
pub mod test_helpers;
pub mod unit;
