//! Audio buffer type and WAV file I/O.

use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Interleaved f32 audio at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create from interleaved samples.
    ///
    /// Fails if `channels` or `sample_rate` is zero, or if the sample count is
    /// not a whole number of frames.
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidParameter("channel count must be at least 1".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidParameter("sample rate must be positive".into()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(Error::InvalidParameter(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Create a single-channel buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, 1, sample_rate)
    }

    /// The interleaved sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Decode a WAV stream, keeping every channel.
    ///
    /// Integer formats are scaled to [-1, 1); 32-bit float is taken as is.
    pub fn from_wav<R: Read>(reader: R) -> Result<Self> {
        let wav = hound::WavReader::new(reader)?;
        let spec = wav.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<std::result::Result<Vec<f32>, _>>()?
            }
            hound::SampleFormat::Float => wav
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()?,
        };

        Self::new(samples, spec.channels, spec.sample_rate)
    }

    /// Encode as 32-bit float WAV.
    pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut wav = hound::WavWriter::new(writer, spec)?;
        for &s in &self.samples {
            wav.write_sample(s)?;
        }
        wav.finalize()?;
        Ok(())
    }

    /// Read a WAV file from disk.
    pub fn read_wav_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_wav(std::io::BufReader::new(file))
    }

    /// Write a 32-bit float WAV file to disk.
    pub fn write_wav_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_wav(std::io::BufWriter::new(file))
    }
}
