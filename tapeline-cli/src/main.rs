mod cli;
mod report;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tapeline_core::audio::AudioHost;
use tapeline_core::config::Config;
use tapeline_core::import::WavDecoder;
use tapeline_core::render::WavInfo;
use tapeline_core::studio::Studio;
use tapeline_types::time::format_time;
use tapeline_types::{ClipPatch, ProjectAction};

use cli::{Arrangement, Command};
use report::{InfoReport, MixReport};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tapeline")
        .join("tapeline.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/tapeline.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("tapeline: logging disabled, cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("tapeline: failed to initialize logger: {}", e);
        return;
    }

    log::info!("tapeline starting (log level: {:?})", log_level);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match cli::parse(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("tapeline: {}\n\n{}", e, cli::USAGE);
            return ExitCode::from(2);
        }
    };
    init_logging(invocation.verbose);

    let config = Config::load();
    let result = match invocation.command {
        Command::Mix {
            arrangement,
            output,
            json,
        } => run_mix(&config, &arrangement, &output, json),
        Command::Play { arrangement, from } => run_play(&config, &arrangement, from),
        Command::Info { file, json } => run_info(&file, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("tapeline: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Import every file onto its own track and apply the arrangement flags.
fn arrange<H: AudioHost>(studio: &mut Studio<H>, arrangement: &Arrangement) -> CliResult {
    if let Some(input) = &arrangement.duration {
        if !studio.set_duration_from_input(input) {
            return Err(format!("bad duration {:?}", input).into());
        }
    }

    let mut tracks = Vec::with_capacity(arrangement.files.len());
    for path in &arrangement.files {
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let id = studio
            .import(&name, &bytes, &WavDecoder)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        tracks.push(id);
    }

    let track_at = |n: usize| {
        tracks
            .get(n)
            .copied()
            .ok_or_else(|| format!("track {} does not exist", n + 1))
    };

    for &(n, start) in &arrangement.starts {
        let track_id = track_at(n)?;
        let Some(id) = studio
            .state()
            .track(track_id)
            .and_then(|t| t.clips.first())
            .map(|c| c.id)
        else {
            continue;
        };
        if !studio.dispatch(ProjectAction::UpdateClip {
            id,
            patch: ClipPatch::start_time(start),
        }) {
            log::warn!("track {}: start {:.3}s rejected", n + 1, start);
        }
    }
    for &n in &arrangement.muted {
        studio.dispatch(ProjectAction::SetTrackMuted {
            id: track_at(n)?,
            muted: true,
        });
    }
    Ok(())
}

fn run_mix(config: &Config, arrangement: &Arrangement, output: &Path, json: bool) -> CliResult {
    let mut studio = Studio::new(tapeline_core::audio::NullHost::new(), config);
    arrange(&mut studio, arrangement)?;
    let written = studio.export_to_path(output)?;
    let info = WavInfo::parse(&std::fs::read(output)?)?;
    MixReport::new(output.display().to_string(), studio.state(), &info, written).print(json)?;
    Ok(())
}

fn run_play(config: &Config, arrangement: &Arrangement, from: f64) -> CliResult {
    #[cfg(feature = "cpal")]
    {
        match tapeline_core::audio::CpalHost::new() {
            Ok(host) => return play_on(host, config, arrangement, from),
            Err(e) => log::warn!("no output device ({}), playing silently", e),
        }
    }
    #[cfg(not(feature = "cpal"))]
    {
        eprintln!("tapeline: built without audio output, playing silently");
    }

    play_on(tapeline_core::audio::NullHost::new(), config, arrangement, from)
}

fn play_on<H: AudioHost>(host: H, config: &Config, arrangement: &Arrangement, from: f64) -> CliResult {
    use std::io::Write;
    use tapeline_core::audio::TickOutcome;

    let mut studio = Studio::new(host, config);
    arrange(&mut studio, arrangement)?;
    studio.unlock_audio()?;
    studio.seek(from);
    studio.play()?;

    let total = format_time(studio.state().duration);
    let mut stdout = std::io::stdout();
    loop {
        std::thread::sleep(config.tick_interval());
        match studio.tick() {
            TickOutcome::Advanced(_) => {
                print!("\r{} / {}", format_time(studio.state().current_time), total);
                stdout.flush()?;
            }
            TickOutcome::Finished(_) | TickOutcome::Idle => break,
        }
    }
    println!("\r{} / {}", format_time(studio.state().current_time), total);
    Ok(())
}

fn run_info(file: &Path, json: bool) -> CliResult {
    let bytes = std::fs::read(file).map_err(|e| format!("{}: {}", file.display(), e))?;
    let info = WavInfo::parse(&bytes)?;
    InfoReport::new(file.display().to_string(), &info).print(json)?;
    Ok(())
}
