//! The stretch tool's `--timemap` breakpoint file.
//!
//! One `"<source> <target>\n"` line per entry, no header.

use std::fmt;
use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{TimeMap, TimePoint, ValidTimeMap};
use crate::error::{Error, Result};

/// Render a validated map in control-file format.
///
/// Targets are written as integers when integral, otherwise as decimals.
pub fn render(map: &ValidTimeMap) -> String {
    map.to_string()
}

impl fmt::Display for ValidTimeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.points() {
            // + 0.0 turns -0.0 into 0.0
            let target = p.target + 0.0;
            if target.fract() == 0.0 {
                writeln!(f, "{} {:.0}", p.source, target)?;
            } else {
                writeln!(f, "{} {}", p.source, target)?;
            }
        }
        Ok(())
    }
}

/// Parse control-file text back into an (unvalidated) time map.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn parse(text: &str) -> Result<TimeMap> {
    let mut map = TimeMap::default();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut fields = line.split_whitespace();
        let (source, target) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(s), Some(t), None) => (s, t),
            _ => {
                return Err(Error::InvalidTimeMapFile {
                    line: line_no,
                    reason: format!("expected two fields, got {line:?}"),
                })
            }
        };
        let source: i64 = source.parse().map_err(|e| Error::InvalidTimeMapFile {
            line: line_no,
            reason: format!("source frame {source:?}: {e}"),
        })?;
        let target: f64 = target.parse().map_err(|e| Error::InvalidTimeMapFile {
            line: line_no,
            reason: format!("target frame {target:?}: {e}"),
        })?;
        map.push(TimePoint::new(source, target));
    }
    Ok(map)
}

/// Read a time map from a text file in control-file format.
pub fn read_time_map_file(path: &Path) -> Result<TimeMap> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&text)
}

/// A control file on disk, removed when dropped.
#[derive(Debug)]
pub struct ControlFile {
    file: NamedTempFile,
}

impl ControlFile {
    /// Write `map` to a fresh temporary file.
    pub fn create(map: &ValidTimeMap) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("warpstretch-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        Self::write_into(file, map)
    }

    /// Write `map` to a fresh temporary file inside `dir`.
    pub fn create_in(dir: &Path, map: &ValidTimeMap) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("warpstretch-")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(|e| Error::io(dir, e))?;
        Self::write_into(file, map)
    }

    fn write_into(mut file: NamedTempFile, map: &ValidTimeMap) -> Result<Self> {
        let written = file
            .write_all(render(map).as_bytes())
            .and_then(|()| file.flush());
        written.map_err(|e| Error::io(file.path(), e))?;
        debug!(path = %file.path().display(), entries = map.len(), "wrote control file");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timemap::validate_time_map;

    fn valid(pairs: &[(i64, i64)], len: i64) -> ValidTimeMap {
        validate_time_map(pairs.iter().copied().collect(), len).unwrap()
    }

    #[test]
    fn renders_one_line_per_entry() {
        let map = valid(&[(0, 0), (4000, 4000), (12000, 8000), (16000, 12000)], 16000);
        assert_eq!(render(&map), "0 0\n4000 4000\n12000 8000\n16000 12000\n");
    }

    #[test]
    fn fractional_target_is_kept() {
        let map = validate_time_map(
            TimeMap::new(vec![TimePoint::new(0, 0.0), TimePoint::new(10, 12.5)]),
            10,
        )
        .unwrap();
        assert_eq!(render(&map), "0 0\n10 12.5\n");
    }

    #[test]
    fn negative_zero_target_renders_as_zero() {
        let map = validate_time_map(
            TimeMap::new(vec![TimePoint::new(0, -0.0), TimePoint::new(10, 20.0)]),
            10,
        )
        .unwrap();
        assert_eq!(format!("{map}"), "0 0\n10 20\n");
    }

    #[test]
    fn parse_reads_rendered_text() {
        let map = valid(&[(0, 0), (100, 250), (300, 250), (1000, 2000)], 1000);
        let back = parse(&render(&map)).unwrap();
        assert_eq!(back, *map);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let map = parse("0 0\n\n  \n10 20\n").unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn parse_reports_line_numbers() {
        match parse("0 0\n10\n").unwrap_err() {
            Error::InvalidTimeMapFile { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other}"),
        }
        match parse("0 0\n1 2\nx 3\n").unwrap_err() {
            Error::InvalidTimeMapFile { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("source frame"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(parse("0 0 0\n").is_err());
    }

    #[test]
    fn control_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let map = valid(&[(0, 0), (16000, 8000)], 16000);
        let control = ControlFile::create_in(dir.path(), &map).unwrap();
        let path = control.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0 0\n16000 8000\n");
        assert_eq!(path.extension().unwrap(), "txt");
        drop(control);
        assert!(!path.exists());
    }

    #[test]
    fn read_time_map_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.txt");
        std::fs::write(&path, "0 0\n500 1000\n").unwrap();
        let map = read_time_map_file(&path).unwrap();
        assert_eq!(map.points()[1], TimePoint::new(500, 1000.0));
    }
}
