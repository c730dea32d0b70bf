//! Time maps derived from warp points.

use std::path::Path;

use tracing::debug;

use super::{TimeMap, TimePoint};
use crate::error::{Error, FormatError, Result};
use crate::warp::{read_warp_file, AsdFormat, WarpFormat, WarpPoint};

/// Convert warp points into a sample-domain time map at a target tempo.
///
/// Each point maps `seconds` of source audio to where `beats` falls at `bpm`.
/// Audio past the last warp point keeps the tempo of the last warped
/// segment, so a final entry at `total_source_samples` is extrapolated from
/// the last two points. The result is not validated.
pub fn build_time_map(
    warp_points: &[WarpPoint],
    total_source_samples: i64,
    source_rate: u32,
    bpm: f64,
) -> Result<TimeMap> {
    if !(bpm.is_finite() && bpm > 0.0) {
        return Err(Error::InvalidParameter(format!("bpm must be positive, got {bpm}")));
    }
    if source_rate == 0 {
        return Err(Error::InvalidParameter("sample rate must be positive".into()));
    }
    let (prev, last) = match warp_points {
        [.., prev, last] => (prev, last),
        _ => {
            return Err(FormatError::TooFewWarpPoints {
                found: warp_points.len(),
            }
            .into())
        }
    };

    let rate = source_rate as f64;
    let mut map = TimeMap::new(Vec::with_capacity(warp_points.len() + 1));
    for point in warp_points {
        let source = point.seconds * rate;
        let target = point.beats * 60.0 / bpm * rate;
        if !(in_frame_range(source) && in_frame_range(target)) {
            return Err(Error::DegenerateInput(format!(
                "warp point {point:?} is not a representable frame position"
            )));
        }
        map.push(TimePoint::new(source.round() as i64, target.round()));
    }

    let seconds_delta = last.seconds - prev.seconds;
    if seconds_delta == 0.0 {
        return Err(Error::DegenerateInput(format!(
            "last two warp points share the time position {}s, tail tempo is undefined",
            last.seconds
        )));
    }
    let last_bpm = (last.beats - prev.beats) / seconds_delta * 60.0;

    // Non-empty: one entry per warp point.
    let tail_from = map.points()[map.len() - 1];
    let remaining = total_source_samples as f64 - tail_from.source as f64;
    let tail = tail_from.target + remaining * last_bpm / bpm;
    if !in_frame_range(tail) {
        return Err(Error::DegenerateInput(format!(
            "extrapolated tail position is not finite (segment tempo {last_bpm} bpm)"
        )));
    }
    map.push(TimePoint::new(total_source_samples, tail.round()));

    debug!(
        points = map.len(),
        last_bpm,
        target_bpm = bpm,
        "built time map from warp points"
    );
    Ok(map)
}

/// Finite and small enough to round into an `i64` frame index.
fn in_frame_range(frames: f64) -> bool {
    frames.is_finite() && frames.abs() < i64::MAX as f64
}

/// Decode a warp file with the given format and build its time map.
pub fn build_time_map_with_format(
    path: &Path,
    format: &dyn WarpFormat,
    total_source_samples: i64,
    source_rate: u32,
    bpm: f64,
) -> Result<TimeMap> {
    let meta = read_warp_file(path, format)?;
    build_time_map(&meta.warp_points, total_source_samples, source_rate, bpm)
}

/// Decode an `.asd` warp file and build its time map.
pub fn build_time_map_from_warp_file(
    path: &Path,
    total_source_samples: i64,
    source_rate: u32,
    bpm: f64,
) -> Result<TimeMap> {
    build_time_map_with_format(path, &AsdFormat, total_source_samples, source_rate, bpm)
}
