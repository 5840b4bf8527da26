//! Offline rendering for WAV files
//!
//! Drives a unit through the same fixed-size block boundary a real-time
//! host would use, so files rendered here sound identical to the unit
//! running live.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

use crate::unit::Unit;

/// Frames per render call, matching the host's audio block size
pub const BLOCK_FRAMES: usize = 64;

/// Errors from reading or writing WAV files
#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("wav i/o failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("unsupported channel count {0} (expected mono or stereo)")]
    UnsupportedChannels(u16),
}

/// Read a WAV file into interleaved stereo f32 frames
///
/// Mono files are duplicated onto both channels. Returns the frames and
/// the file's sample rate; callers decide whether that rate is usable.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), OfflineError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.channels > 2 {
        return Err(OfflineError::UnsupportedChannels(spec.channels));
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let frames = if spec.channels == 1 {
        let mut stereo = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            stereo.push(sample);
            stereo.push(sample);
        }
        stereo
    } else {
        samples
    };

    Ok((frames, spec.sample_rate))
}

/// Write interleaved stereo frames to a 16-bit WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), OfflineError> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let file = File::create(path).map_err(hound::Error::IoError)?;
    let writer = BufWriter::new(file);
    let mut wav_writer = WavWriter::new(writer, spec)?;

    for &sample in samples {
        // Convert f32 (-1.0 to 1.0) to i16
        let sample_i16 = (sample * i16::MAX as f32) as i16;
        wav_writer.write_sample(sample_i16)?;
    }

    wav_writer.finalize()?;
    Ok(())
}

/// Run a unit over an interleaved signal in host-sized blocks
///
/// Returns the unit's interleaved output. The final block may be
/// shorter than `block_frames`, exactly as a host flushing its tail.
pub fn render_blocks(
    unit: &mut dyn Unit,
    input: &[f32],
    input_channels: usize,
    output_channels: usize,
    block_frames: usize,
) -> Vec<f32> {
    // Whole frames only; a trailing partial frame is dropped.
    let frames = input.len() / input_channels;
    let input = &input[..frames * input_channels];
    let mut output = vec![0.0; frames * output_channels];

    for (in_block, out_block) in input
        .chunks(block_frames * input_channels)
        .zip(output.chunks_mut(block_frames * output_channels))
    {
        unit.render(in_block, out_block);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{calculate_peak, generate_noise, generate_sine, interleave_stereo};
    use crate::unit::{DelayUnit, HeapArena, RuntimeDesc};

    #[test]
    fn test_wav_round_trip_is_16_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");

        let frames = interleave_stereo(&generate_sine(1_000, 440.0, 48_000.0));
        write_wav(&path, &frames, 48_000).unwrap();

        let (read, rate) = read_wav(&path).unwrap();
        assert_eq!(rate, 48_000);
        assert_eq!(read.len(), frames.len());
        for (n, (&a, &b)) in frames.iter().zip(read.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1.0e-4,
                "sample {} drifted: wrote {}, read {}",
                n,
                a,
                b
            );
        }
        assert!(calculate_peak(&read) <= 1.0);
    }

    #[test]
    fn test_float_wavs_read_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        let frames = interleave_stereo(&generate_noise(256, 5));
        for &sample in &frames {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let (read, _) = read_wav(&path).unwrap();
        assert_eq!(read, frames);
    }

    #[test]
    fn test_mono_files_fan_out_to_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        let mono = generate_sine(500, 220.0, 48_000.0);
        for &sample in &mono {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let (frames, _) = read_wav(&path).unwrap();
        assert_eq!(frames.len(), mono.len() * 2);
        for (n, &sample) in mono.iter().enumerate() {
            assert_eq!(frames[2 * n], sample);
            assert_eq!(frames[2 * n + 1], sample);
        }
    }

    #[test]
    fn test_rejects_more_than_two_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.wav");

        let spec = WavSpec {
            channels: 4,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..64 {
            writer.write_sample(0_i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(matches!(
            read_wav(&path),
            Err(OfflineError::UnsupportedChannels(4))
        ));
    }

    #[test]
    fn test_block_renderer_covers_a_partial_tail() {
        let arena = HeapArena;
        let mut unit = DelayUnit::init(Some(&RuntimeDesc::delay_fx(&arena))).unwrap();
        // Full dry: output must equal the left input on both channels,
        // including the 36-frame tail past the last full block.
        unit.set_param(2, -1000);

        let input = interleave_stereo(&generate_noise(100, 17));
        let output = render_blocks(&mut unit, &input, 2, 2, BLOCK_FRAMES);
        assert_eq!(output, input);
    }
}
