//! warpstretch — tempo, pitch, time-map and warp-marker stretching of WAV files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

use warpstretch::error::ErrorCategory;
use warpstretch::timemap::control::read_time_map_file;
use warpstretch::warp::read_warp_file;
use warpstretch::{
    build_time_map_from_warp_file, pitch_shift, time_stretch, timemap_stretch, AsdFormat,
    AudioBuffer, Result, Rubberband, RubberbandArgs, StretchConfig,
};

#[derive(Parser, Debug)]
#[command(name = "warpstretch", version, about = "Stretch WAV files with the rubberband CLI")]
struct Cli {
    /// rubberband executable to run (overrides the config file)
    #[arg(long, global = true)]
    executable: Option<String>,

    /// Config file (default: ~/.warpstretch/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra rubberband option, as FLAG or FLAG=VALUE (repeatable)
    #[arg(
        long = "rb",
        value_name = "FLAG[=VALUE]",
        global = true,
        allow_hyphen_values = true,
        value_parser = parse_option
    )]
    options: Vec<(String, String)>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Change tempo without changing pitch
    Tempo {
        input: PathBuf,
        output: PathBuf,
        /// Playback rate; 2.0 is twice as fast
        #[arg(long)]
        rate: f64,
    },
    /// Shift pitch without changing tempo
    Pitch {
        input: PathBuf,
        output: PathBuf,
        /// Shift in semitones
        #[arg(long, allow_negative_numbers = true)]
        semitones: f64,
    },
    /// Stretch following a "<source> <target>" frame map file
    Timemap {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        map: PathBuf,
    },
    /// Conform audio to a tempo using the warp markers of an .asd file
    Warp {
        input: PathBuf,
        output: PathBuf,
        /// The .asd file that belongs to INPUT
        #[arg(long)]
        asd: PathBuf,
        /// Target tempo
        #[arg(long)]
        bpm: f64,
        /// Print the derived time map to stdout
        #[arg(long)]
        print_map: bool,
    },
    /// Print the loop, marker and warp data of an .asd file
    Inspect { asd: PathBuf },
}

fn parse_option(s: &str) -> std::result::Result<(String, String), String> {
    let (flag, value) = s.split_once('=').unwrap_or((s, ""));
    if !flag.starts_with('-') {
        return Err(format!("{flag:?} is not a flag"));
    }
    Ok((flag.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            if e.category() == ErrorCategory::Environment {
                eprintln!("hint: install rubberband-cli or set `executable` in the config file");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => StretchConfig::load_from(path)?,
        None => StretchConfig::load().unwrap_or_default(),
    };
    if let Some(executable) = cli.executable {
        config.executable = executable;
    }
    let rubberband = Rubberband::from_config(&config);
    let args: RubberbandArgs = cli.options.into_iter().collect();

    match cli.command {
        Command::Tempo {
            input,
            output,
            rate,
        } => {
            let buffer = read_input(&input)?;
            let result = time_stretch(&rubberband, &buffer, rate, args)?;
            write_output(&output, &result)
        }
        Command::Pitch {
            input,
            output,
            semitones,
        } => {
            let buffer = read_input(&input)?;
            let result = pitch_shift(&rubberband, &buffer, semitones, args)?;
            write_output(&output, &result)
        }
        Command::Timemap { input, output, map } => {
            let buffer = read_input(&input)?;
            let map = read_time_map_file(&map)?;
            let result = timemap_stretch(&rubberband, &buffer, map, args)?;
            write_output(&output, &result)
        }
        Command::Warp {
            input,
            output,
            asd,
            bpm,
            print_map,
        } => {
            let buffer = read_input(&input)?;
            let map = build_time_map_from_warp_file(
                &asd,
                buffer.num_frames() as i64,
                buffer.sample_rate(),
                bpm,
            )?;
            if print_map {
                for p in map.points() {
                    println!("{} {}", p.source, p.target);
                }
            }
            let result = timemap_stretch(&rubberband, &buffer, map, args)?;
            write_output(&output, &result)
        }
        Command::Inspect { asd } => {
            let meta = read_warp_file(&asd, &AsdFormat)?;
            let loop_state = if meta.loop_on { "on" } else { "off" };
            println!(
                "loop:         {} .. {} ({loop_state})",
                meta.loop_start, meta.loop_end
            );
            println!(
                "hidden loop:  {} .. {}",
                meta.hidden_loop_start, meta.hidden_loop_end
            );
            println!("start marker: {}", meta.start_marker());
            println!("end marker:   {}", meta.end_marker);
            println!("warp markers: {}", meta.warp_points.len());
            for p in &meta.warp_points {
                println!("  beat {:>10.4}  at {:>10.4}s", p.beats, p.seconds);
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path) -> Result<AudioBuffer> {
    let buffer = AudioBuffer::read_wav_file(path)?;
    eprintln!(
        "Input: {} frames, {} Hz, {} ch, {:.2}s",
        buffer.num_frames(),
        buffer.sample_rate(),
        buffer.channels(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

fn write_output(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    buffer.write_wav_file(path)?;
    eprintln!(
        "Output: {} frames, {:.2}s -> {}",
        buffer.num_frames(),
        buffer.duration_secs(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_warp_subcommand() {
        let cli = Cli::try_parse_from([
            "warpstretch",
            "warp",
            "in.wav",
            "out.wav",
            "--asd",
            "in.wav.asd",
            "--bpm",
            "128",
            "--rb=--crisp=6",
            "--rb=--formant",
        ])
        .unwrap();
        assert_eq!(
            cli.options,
            vec![
                ("--crisp".to_string(), "6".to_string()),
                ("--formant".to_string(), String::new())
            ]
        );
        match cli.command {
            Command::Warp { bpm, print_map, .. } => {
                assert_eq!(bpm, 128.0);
                assert!(!print_map);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_semitones() {
        let cli = Cli::try_parse_from([
            "warpstretch",
            "pitch",
            "a.wav",
            "b.wav",
            "--semitones",
            "-1.5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Pitch { semitones, .. } if semitones == -1.5));
    }

    #[test]
    fn option_must_be_a_flag() {
        assert!(parse_option("crisp=6").is_err());
        assert_eq!(parse_option("-c=6").unwrap(), ("-c".to_string(), "6".to_string()));
    }
}
