//! Warp-marker import from binary project files.
//!
//! A warp file records how beats of the musical grid line up with seconds of
//! the audio it annotates. Each supported file revision is a [`WarpFormat`];
//! the time-map builder only sees the decoded [`WarpFileMetadata`].

pub mod asd;
pub mod reader;

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub use asd::AsdFormat;

/// A beat position pinned to a time position in the audio.
///
/// Both values are relative to the 1.1.1 origin of the clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpPoint {
    /// Position in quarter notes.
    pub beats: f64,
    /// Position in seconds of source audio.
    pub seconds: f64,
}

impl WarpPoint {
    pub fn new(beats: f64, seconds: f64) -> Self {
        Self { beats, seconds }
    }
}

/// Loop, marker and warp data decoded from a warp file.
///
/// Loop and marker values are in quarter notes relative to 1.1.1.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpFileMetadata {
    pub loop_start: f64,
    pub loop_end: f64,
    pub sample_offset: f64,
    pub hidden_loop_start: f64,
    pub hidden_loop_end: f64,
    pub end_marker: f64,
    pub loop_on: bool,
    /// Warp points in file order.
    pub warp_points: Vec<WarpPoint>,
}

impl WarpFileMetadata {
    /// Start marker, derived from the loop start and sample offset.
    pub fn start_marker(&self) -> f64 {
        self.loop_start + self.sample_offset
    }
}

/// One revision of a binary warp file layout.
pub trait WarpFormat {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Decode a complete file held in memory.
    fn parse(&self, bytes: &[u8]) -> Result<WarpFileMetadata>;
}

/// Read `path` fully into memory and decode it with `format`.
pub fn read_warp_file(path: &Path, format: &dyn WarpFormat) -> Result<WarpFileMetadata> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    debug!(
        path = %path.display(),
        format = format.name(),
        len = bytes.len(),
        "decoding warp file"
    );
    format.parse(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_marker_is_derived() {
        let meta = WarpFileMetadata {
            loop_start: 4.0,
            loop_end: 20.0,
            sample_offset: -1.5,
            hidden_loop_start: 0.0,
            hidden_loop_end: 32.0,
            end_marker: 32.0,
            loop_on: false,
            warp_points: vec![],
        };
        assert_eq!(meta.start_marker(), 2.5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_warp_file(Path::new("/nonexistent/clip.wav.asd"), &AsdFormat).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("clip.wav.asd"));
    }
}
