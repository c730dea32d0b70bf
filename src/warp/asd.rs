//! Ableton `.asd` clip analysis files.
//!
//! The layout is undocumented. Fields are found at fixed byte distances from
//! marker tokens, which matches the revision these offsets were measured on.
//! A file written by a different revision decodes to wrong values rather than
//! failing; only the presence of the markers is checked.

use tracing::debug;

use super::reader::{find_from, read_bool, read_f64, F64_WIDTH};
use super::{WarpFileMetadata, WarpFormat, WarpPoint};
use crate::error::{FormatError, Result};

/// Token preceding the loop/marker block. The first occurrence is a header
/// instance; the block follows the second.
const OVERVIEW_MARKER: &str = "SampleOverViewLevel";

/// Distance from the second overview marker to the first loop/marker double.
const OVERVIEW_FIELDS_OFFSET: usize = 90;

/// Token preceding each warp record. The first occurrence is the list tag.
const WARP_MARKER: &str = "WarpMarker";

/// Distance from a warp marker token to its seconds value.
const WARP_RECORD_OFFSET: usize = 14;

/// Distance from the last warp record's beats value to the loop flag.
const LOOP_FLAG_OFFSET: usize = 15;

/// Decoder for the `.asd` layout written alongside warped audio clips.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsdFormat;

impl WarpFormat for AsdFormat {
    fn name(&self) -> &'static str {
        "asd"
    }

    fn parse(&self, bytes: &[u8]) -> Result<WarpFileMetadata> {
        let overview = nth_occurrence(bytes, OVERVIEW_MARKER, 2)?;

        let mut offset = overview + OVERVIEW_FIELDS_OFFSET;
        let mut next_f64 = || -> std::result::Result<f64, FormatError> {
            let value = read_f64(bytes, offset)?;
            offset += F64_WIDTH;
            Ok(value)
        };
        let loop_start = next_f64()?;
        let loop_end = next_f64()?;
        let sample_offset = next_f64()?;
        let hidden_loop_start = next_f64()?;
        let hidden_loop_end = next_f64()?;
        let end_marker = next_f64()?;

        let mut warp_points = Vec::new();
        let mut last_beats_at = None;
        let mut cursor = find_from(bytes, WARP_MARKER.as_bytes(), 0).map_or(0, |tag| tag + 1);
        while let Some(marker) = find_from(bytes, WARP_MARKER.as_bytes(), cursor) {
            let seconds_at = marker + WARP_RECORD_OFFSET;
            let beats_at = seconds_at + F64_WIDTH;
            let seconds = read_f64(bytes, seconds_at)?;
            let beats = read_f64(bytes, beats_at)?;
            warp_points.push(WarpPoint::new(beats, seconds));
            last_beats_at = Some(beats_at);
            cursor = beats_at + 1;
        }

        let loop_flag_at = match last_beats_at {
            Some(at) if warp_points.len() >= 2 => at + LOOP_FLAG_OFFSET,
            _ => {
                return Err(FormatError::TooFewWarpPoints {
                    found: warp_points.len(),
                }
                .into())
            }
        };
        let loop_on = read_bool(bytes, loop_flag_at)?;

        debug!(
            overview_at = overview,
            warp_points = warp_points.len(),
            loop_on,
            "decoded asd file"
        );

        Ok(WarpFileMetadata {
            loop_start,
            loop_end,
            sample_offset,
            hidden_loop_start,
            hidden_loop_end,
            end_marker,
            loop_on,
            warp_points,
        })
    }
}

/// Offset of the `n`th (1-based) occurrence of `marker`.
fn nth_occurrence(bytes: &[u8], marker: &'static str, n: usize) -> std::result::Result<usize, FormatError> {
    let mut found = 0;
    let mut start = 0;
    while let Some(pos) = find_from(bytes, marker.as_bytes(), start) {
        found += 1;
        if found == n {
            return Ok(pos);
        }
        start = pos + 1;
    }
    Err(FormatError::MissingMarker {
        marker,
        found,
        expected: n,
    })
}
