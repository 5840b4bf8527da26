//! beatdelay - tempo-synced feedback delay renderer
//!
//! Command-line front end that hosts the delay unit offline: run an
//! existing WAV through it, or render a click-track demo.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use beatdelay::dsp::clamp_bpm;
use beatdelay::offline::{read_wav, render_blocks, write_wav, BLOCK_FRAMES};
use beatdelay::unit::params::DelayParamId;
use beatdelay::unit::{DelayUnit, HeapArena, RuntimeDesc, Unit, REQUIRED_SAMPLE_RATE};

/// beatdelay - tempo-synced feedback delay
#[derive(Parser, Debug)]
#[command(name = "beatdelay")]
#[command(about = "Render audio through a tempo-synced feedback delay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a WAV file through the delay
    Render {
        /// Input WAV file (48kHz, mono or stereo)
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Tempo the delay syncs to
        #[arg(long, default_value_t = 120.0)]
        bpm: f64,
        /// TIME parameter, selects the beat division (0-1023)
        #[arg(long, default_value_t = 256)]
        time: i32,
        /// DEPTH parameter, feedback amount (0-1023)
        #[arg(long, default_value_t = 256)]
        depth: i32,
        /// MIX parameter, dry/wet balance (-1000 to 1000)
        #[arg(long, default_value_t = 0)]
        mix: i32,
    },
    /// Render a click-track demo through the delay
    Demo {
        /// Output WAV file
        output: PathBuf,
        /// Tempo of the clicks and the delay
        #[arg(long, default_value_t = 120.0)]
        bpm: f64,
        /// Length of the demo in seconds
        #[arg(long, default_value_t = 4.0)]
        seconds: f64,
        /// TIME parameter, selects the beat division (0-1023)
        #[arg(long, default_value_t = 256)]
        time: i32,
        /// DEPTH parameter, feedback amount (0-1023)
        #[arg(long, default_value_t = 384)]
        depth: i32,
        /// MIX parameter, dry/wet balance (-1000 to 1000)
        #[arg(long, default_value_t = 700)]
        mix: i32,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            input,
            output,
            bpm,
            time,
            depth,
            mix,
        } => render_file(&input, &output, bpm, time, depth, mix),
        Commands::Demo {
            output,
            bpm,
            seconds,
            time,
            depth,
            mix,
        } => render_demo(&output, bpm, seconds, time, depth, mix),
    }
}

/// Tempo in the host's 16.16 fixed-point wire format
fn bpm_to_fixed(bpm: f64) -> u32 {
    (bpm * 65_536.0) as u32
}

/// Build a delay unit the way a host would: init against the standard
/// effect slot, then push tempo and parameters over the wire formats.
fn make_delay(bpm: f64, time: i32, depth: i32, mix: i32) -> Result<DelayUnit> {
    let arena = HeapArena;
    let desc = RuntimeDesc::delay_fx(&arena);
    let mut unit = DelayUnit::init(Some(&desc)).context("delay unit init failed")?;
    unit.set_tempo(bpm_to_fixed(bpm));
    unit.set_param(DelayParamId::Time as u8, time);
    unit.set_param(DelayParamId::Depth as u8, depth);
    unit.set_param(DelayParamId::Mix as u8, mix);
    Ok(unit)
}

fn render_file(
    input: &Path,
    output: &Path,
    bpm: f64,
    time: i32,
    depth: i32,
    mix: i32,
) -> Result<()> {
    let (frames, rate) =
        read_wav(input).with_context(|| format!("could not read {}", input.display()))?;
    if rate != REQUIRED_SAMPLE_RATE {
        bail!(
            "input is {} Hz, the delay unit requires {} Hz",
            rate,
            REQUIRED_SAMPLE_RATE
        );
    }

    let mut unit = make_delay(bpm, time, depth, mix)?;
    let rendered = render_blocks(&mut unit, &frames, 2, 2, BLOCK_FRAMES);
    write_wav(output, &rendered, rate)
        .with_context(|| format!("could not write {}", output.display()))?;

    info!(
        "rendered {} frames at {} BPM to {}",
        rendered.len() / 2,
        bpm,
        output.display()
    );
    Ok(())
}

fn render_demo(
    output: &Path,
    bpm: f64,
    seconds: f64,
    time: i32,
    depth: i32,
    mix: i32,
) -> Result<()> {
    let bpm = clamp_bpm(bpm);
    let frames = (seconds.max(0.0) * REQUIRED_SAMPLE_RATE as f64) as usize;
    let mono = click_track(frames, bpm);

    let mut input = Vec::with_capacity(mono.len() * 2);
    for &sample in &mono {
        input.push(sample);
        input.push(sample);
    }

    let mut unit = make_delay(bpm, time, depth, mix)?;
    let rendered = render_blocks(&mut unit, &input, 2, 2, BLOCK_FRAMES);
    write_wav(output, &rendered, REQUIRED_SAMPLE_RATE)
        .with_context(|| format!("could not write {}", output.display()))?;

    info!(
        "wrote a {:.1}s click demo at {} BPM to {}",
        seconds,
        bpm,
        output.display()
    );
    Ok(())
}

/// A short decaying click on every beat
fn click_track(frames: usize, bpm: f64) -> Vec<f32> {
    let samples_per_beat = ((60.0 / bpm) * REQUIRED_SAMPLE_RATE as f64) as usize;
    let mut mono = vec![0.0; frames];
    for start in (0..frames).step_by(samples_per_beat.max(1)) {
        let end = frames.min(start + 64);
        for (n, sample) in mono[start..end].iter_mut().enumerate() {
            *sample = 0.8 * (1.0 - n as f32 / 64.0);
        }
    }
    mono
}
