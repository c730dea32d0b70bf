//! Tempo, pitch and time-map stretching on top of a [`Stretcher`].

use tracing::debug;

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::rubberband::{RubberbandArgs, Stretcher};
use crate::timemap::{validate_time_map, ControlFile, TimeMap};

/// What a stretch call does. Exactly one mode applies per call.
#[derive(Debug, Clone, PartialEq)]
pub enum StretchMode {
    /// Playback rate; 2.0 plays twice as fast.
    Tempo(f64),
    /// Pitch shift in semitones.
    Pitch(f64),
    /// Non-linear stretch following a source → target frame map.
    TimeMap(TimeMap),
}

/// A buffer, a mode, and any extra tool options.
#[derive(Debug, Clone)]
pub struct StretchRequest<'a> {
    pub buffer: &'a AudioBuffer,
    pub mode: StretchMode,
    pub args: RubberbandArgs,
}

impl<'a> StretchRequest<'a> {
    pub fn new(buffer: &'a AudioBuffer, mode: StretchMode) -> Self {
        Self {
            buffer,
            mode,
            args: RubberbandArgs::new(),
        }
    }

    pub fn with_args(mut self, args: RubberbandArgs) -> Self {
        self.args = args;
        self
    }
}

/// Run a request in whichever mode it names.
pub fn stretch<S: Stretcher + ?Sized>(stretcher: &S, request: StretchRequest<'_>) -> Result<AudioBuffer> {
    let StretchRequest { buffer, mode, args } = request;
    match mode {
        StretchMode::Tempo(rate) => time_stretch(stretcher, buffer, rate, args),
        StretchMode::Pitch(semitones) => pitch_shift(stretcher, buffer, semitones, args),
        StretchMode::TimeMap(map) => timemap_stretch(stretcher, buffer, map, args),
    }
}

/// Change playback speed by `rate` without changing pitch.
///
/// Higher rates play faster, so the output is `1 / rate` times as long.
/// A rate of exactly 1 returns the input without calling the tool.
pub fn time_stretch<S: Stretcher + ?Sized>(
    stretcher: &S,
    buffer: &AudioBuffer,
    rate: f64,
    mut args: RubberbandArgs,
) -> Result<AudioBuffer> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "rate must be strictly positive, got {rate}"
        )));
    }
    if rate == 1.0 {
        return Ok(buffer.clone());
    }
    args.set_default("--tempo", rate.to_string());
    stretcher.stretch(buffer, &args)
}

/// Shift pitch by `semitones` without changing duration.
///
/// A shift of zero returns the input without calling the tool.
pub fn pitch_shift<S: Stretcher + ?Sized>(
    stretcher: &S,
    buffer: &AudioBuffer,
    semitones: f64,
    mut args: RubberbandArgs,
) -> Result<AudioBuffer> {
    if !semitones.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "pitch shift must be finite, got {semitones}"
        )));
    }
    if semitones == 0.0 {
        return Ok(buffer.clone());
    }
    args.set_default("--pitch", semitones.to_string());
    stretcher.stretch(buffer, &args)
}

/// Stretch following `map`, which pins source frames to target frames.
///
/// Where a segment's target span is shorter than its source span the audio
/// is sped up there. The map is validated against the buffer's frame count
/// before anything is written or run; the control file exists only for the
/// duration of the tool call.
pub fn timemap_stretch<S: Stretcher + ?Sized>(
    stretcher: &S,
    buffer: &AudioBuffer,
    map: TimeMap,
    mut args: RubberbandArgs,
) -> Result<AudioBuffer> {
    let valid = validate_time_map(map, buffer.num_frames() as i64)?;

    args.set_default("--time", valid.time_ratio().to_string());
    let control = match stretcher.scratch_dir() {
        Some(dir) => ControlFile::create_in(dir, &valid)?,
        None => ControlFile::create(&valid)?,
    };
    args.set_default("--timemap", control.path());
    debug!(entries = valid.len(), ratio = valid.time_ratio(), "time map stretch");

    stretcher.stretch(buffer, &args)
}
