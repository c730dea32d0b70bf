//! Warpstretch — warp-marker and time-map driven stretching via the rubberband CLI.
//!
//! The DSP itself is done by the external `rubberband` tool. This crate
//! validates sample-accurate time maps, writes them in the tool's
//! `--timemap` format, imports warp markers from `.asd` clip files, and
//! manages the temporary files and process call around each stretch.

pub mod audio;
pub mod config;
pub mod error;
pub mod rubberband;
pub mod stretch;
pub mod timemap;
pub mod warp;

pub use audio::AudioBuffer;
pub use config::StretchConfig;
pub use error::{Error, ErrorCategory, FormatError, Result, ToolError, ValidationError};
pub use rubberband::{Rubberband, RubberbandArgs, Stretcher};
pub use stretch::{pitch_shift, stretch, time_stretch, timemap_stretch, StretchMode, StretchRequest};
pub use timemap::{
    build_time_map, build_time_map_from_warp_file, validate_time_map, ControlFile, TimeMap,
    TimePoint, ValidTimeMap,
};
pub use warp::{AsdFormat, WarpFileMetadata, WarpFormat, WarpPoint};
