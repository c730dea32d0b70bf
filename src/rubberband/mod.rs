//! Invocation of the external rubberband command-line tool.
//!
//! Each call writes the input to a temporary WAV file, runs
//! `<executable> -q [options] <in.wav> <out.wav>`, and decodes the result.
//! Temporary files live only for the duration of the call and are removed on
//! every exit path. The call blocks until the tool exits.

pub mod args;

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::audio::AudioBuffer;
use crate::config::StretchConfig;
use crate::error::{Error, Result, ToolError};

pub use args::RubberbandArgs;

/// Something that transforms an audio buffer according to rubberband options.
pub trait Stretcher {
    /// Process `buffer` with `args`, returning audio with the same channel count.
    fn stretch(&self, buffer: &AudioBuffer, args: &RubberbandArgs) -> Result<AudioBuffer>;

    /// Directory for call-scoped scratch files, if not the system default.
    fn scratch_dir(&self) -> Option<&Path> {
        None
    }
}

/// The rubberband CLI.
#[derive(Debug, Clone)]
pub struct Rubberband {
    executable: String,
    quiet: bool,
    defaults: RubberbandArgs,
    scratch_dir: Option<PathBuf>,
}

impl Rubberband {
    /// Use `executable` (a name on `PATH` or a path) with `-q` and no extra options.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            quiet: true,
            defaults: RubberbandArgs::new(),
            scratch_dir: None,
        }
    }

    pub fn from_config(config: &StretchConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            quiet: config.quiet,
            defaults: config.extra_args.iter().collect(),
            scratch_dir: None,
        }
    }

    /// Put temporary files in `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// The argument list passed after the executable name.
    ///
    /// Call options win over configured defaults.
    pub fn command_args(&self, args: &RubberbandArgs, input: &Path, output: &Path) -> Vec<OsString> {
        let mut merged = args.clone();
        for (flag, value) in self.defaults.iter() {
            merged.set_default(flag, value);
        }
        let mut out = Vec::with_capacity(merged.len() * 2 + 3);
        if self.quiet {
            out.push(OsString::from("-q"));
        }
        out.extend(merged.to_command_args());
        out.push(input.as_os_str().to_os_string());
        out.push(output.as_os_str().to_os_string());
        out
    }

    fn temp_wav(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("warpstretch-").suffix(".wav");
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir).map_err(|e| Error::io(dir, e)),
            None => builder
                .tempfile()
                .map_err(|e| Error::io(std::env::temp_dir(), e)),
        }
    }

    fn run(&self, command_args: &[OsString]) -> Result<()> {
        debug!(program = %self.executable, args = ?command_args, "running stretch tool");
        let output = Command::new(&self.executable)
            .args(command_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ToolError::NotFound {
                    program: self.executable.clone(),
                },
                _ => ToolError::Spawn {
                    program: self.executable.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(status = ?output.status, %stderr, "stretch tool failed");
            return Err(ToolError::Failed {
                program: self.executable.clone(),
                status: output.status.code(),
                stderr,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for Rubberband {
    fn default() -> Self {
        Self::from_config(&StretchConfig::default())
    }
}

impl Stretcher for Rubberband {
    fn stretch(&self, buffer: &AudioBuffer, args: &RubberbandArgs) -> Result<AudioBuffer> {
        if buffer.is_empty() {
            return Err(Error::InvalidParameter("cannot stretch an empty buffer".into()));
        }

        let input = self.temp_wav()?;
        let output = self.temp_wav()?;
        buffer.write_wav_file(input.path())?;

        self.run(&self.command_args(args, input.path(), output.path()))?;

        let result = AudioBuffer::read_wav_file(output.path())?;
        if result.channels() != buffer.channels() {
            return Err(ToolError::ChannelMismatch {
                expected: buffer.channels(),
                found: result.channels(),
            }
            .into());
        }
        info!(
            frames_in = buffer.num_frames(),
            frames_out = result.num_frames(),
            channels = result.channels(),
            "stretched"
        );
        Ok(result)
    }

    fn scratch_dir(&self) -> Option<&Path> {
        self.scratch_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn command_line_layout() {
        let rb = Rubberband::new("rubberband");
        let args = RubberbandArgs::new().with("--tempo", "1.5");
        let cmd = rb.command_args(&args, Path::new("/tmp/in.wav"), Path::new("/tmp/out.wav"));
        assert_eq!(cmd, vec!["-q", "--tempo", "1.5", "/tmp/in.wav", "/tmp/out.wav"]);
    }

    #[test]
    fn config_defaults_do_not_override_call_options() {
        let config = StretchConfig {
            executable: "rb".into(),
            quiet: false,
            extra_args: BTreeMap::from([
                ("--crisp".to_string(), "6".to_string()),
                ("--tempo".to_string(), "9".to_string()),
            ]),
        };
        let rb = Rubberband::from_config(&config);
        assert_eq!(rb.executable(), "rb");
        let args = RubberbandArgs::new().with("--tempo", "2");
        let cmd = rb.command_args(&args, Path::new("i.wav"), Path::new("o.wav"));
        assert_eq!(cmd, vec!["--tempo", "2", "--crisp", "6", "i.wav", "o.wav"]);
    }

    #[test]
    fn missing_executable_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let rb = Rubberband::new("warpstretch-no-such-rubberband").with_scratch_dir(dir.path());
        let buffer = AudioBuffer::from_mono(vec![0.0; 256], 22050).unwrap();
        let err = rb.stretch(&buffer, &RubberbandArgs::new()).unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::NotFound { .. })));
        // Both temporary WAV files are gone.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_buffer_is_rejected_before_spawning() {
        let rb = Rubberband::new("warpstretch-no-such-rubberband");
        let buffer = AudioBuffer::from_mono(vec![], 22050).unwrap();
        let err = rb.stretch(&buffer, &RubberbandArgs::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failure() {
        // `false` ignores its arguments and exits 1.
        let dir = tempfile::tempdir().unwrap();
        let rb = Rubberband::new("false").with_scratch_dir(dir.path());
        let buffer = AudioBuffer::from_mono(vec![0.0; 16], 8000).unwrap();
        let err = rb.stretch(&buffer, &RubberbandArgs::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::Tool(ToolError::Failed { status: Some(1), .. })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
