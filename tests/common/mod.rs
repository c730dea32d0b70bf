//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use warpstretch::AudioBuffer;

/// Lay out an `.asd`-style file: a decoy and a real overview marker, the six
/// loop/marker doubles 90 bytes after the real one, the `WarpMarkers` list
/// tag, then one record per `(beats, seconds)` point and the loop flag.
pub fn encode_asd(header: [f64; 6], points: &[(f64, f64)], loop_on: bool) -> Vec<u8> {
    let mut out = b"\x00\x01ABLETON-ANALYSIS\x00".to_vec();
    out.extend_from_slice(b"SampleOverViewLevel");
    out.extend_from_slice(&[0x11u8; 40]);
    let overview = out.len();
    out.extend_from_slice(b"SampleOverViewLevel");
    out.resize(overview + 90, 0x22);
    for v in header {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(b"WarpMarkers");
    out.extend_from_slice(&[0u8; 6]);
    for &(beats, seconds) in points {
        out.extend_from_slice(b"WarpMarker");
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&seconds.to_le_bytes());
        out.extend_from_slice(&beats.to_le_bytes());
        out.extend_from_slice(&[0u8; 7]);
        out.push(loop_on as u8);
        out.extend_from_slice(&[0u8; 12]);
    }
    out
}

pub fn write_asd(path: &Path, points: &[(f64, f64)]) {
    std::fs::write(path, encode_asd([0.0, 16.0, 0.0, 0.0, 16.0, 16.0], points, true)).unwrap();
}

/// A cosine at `freq` Hz, the same on every channel.
pub fn cosine(frames: usize, channels: u16, sample_rate: u32, freq: f32) -> AudioBuffer {
    let samples = (0..frames)
        .flat_map(|i| {
            let s = (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).cos();
            std::iter::repeat(s).take(channels as usize)
        })
        .collect();
    AudioBuffer::new(samples, channels, sample_rate).unwrap()
}

/// Whether the real rubberband CLI is available.
pub fn rubberband_installed() -> bool {
    std::process::Command::new("rubberband")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}
