//! Command-line parsing.

use std::path::PathBuf;

pub const USAGE: &str = "\
usage: tapeline [-v] <command> [options] <files...>

commands:
  mix   <files...>   render every file on its own track and write a WAV
  play  <files...>   play the arrangement on the default output device
  info  <file>       print the format of a WAV file

options:
  -o, --output PATH      output file for mix (default: mix.wav)
  -d, --duration SECS    project length (default from config)
  -m, --mute N[,N...]    mute tracks by 1-based position
  -a, --at N=SECS        start track N's clip at SECS (repeatable)
  -f, --from SECS        play: start position
      --json             print a JSON report
  -v, --verbose          debug logging";

#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub files: Vec<PathBuf>,
    pub duration: Option<String>,
    /// 0-based track positions to mute
    pub muted: Vec<usize>,
    /// (0-based track position, start seconds)
    pub starts: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mix {
        arrangement: Arrangement,
        output: PathBuf,
        json: bool,
    },
    Play {
        arrangement: Arrangement,
        from: f64,
    },
    Info {
        file: PathBuf,
        json: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

/// Parse `args` (without the program name).
pub fn parse(args: &[String]) -> Result<Invocation, String> {
    let mut verbose = false;
    let mut json = false;
    let mut output = None;
    let mut duration = None;
    let mut muted = Vec::new();
    let mut starts = Vec::new();
    let mut from = 0.0;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--json" => json = true,
            "-o" | "--output" => output = Some(PathBuf::from(value(arg)?)),
            "-d" | "--duration" => duration = Some(value(arg)?),
            "-m" | "--mute" => {
                for n in value(arg)?.split(',') {
                    muted.push(track_position(n)?);
                }
            }
            "-a" | "--at" => starts.push(parse_start(&value(arg)?)?),
            "-f" | "--from" => from = parse_seconds(&value(arg)?)?,
            s if s.starts_with('-') && s.len() > 1 => return Err(format!("unknown option {}", s)),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or("missing command")?;
    let files: Vec<PathBuf> = positional.map(PathBuf::from).collect();

    let command = match name.as_str() {
        "info" => {
            let file = match &files[..] {
                [file] => file.clone(),
                _ => return Err("info takes exactly one file".into()),
            };
            Command::Info { file, json }
        }
        "mix" | "play" => {
            if files.is_empty() {
                return Err(format!("{} needs at least one file", name));
            }
            if let Some(n) = muted.iter().chain(starts.iter().map(|(n, _)| n)).find(|n| **n >= files.len()) {
                return Err(format!("track {} does not exist", n + 1));
            }
            let arrangement = Arrangement {
                files,
                duration,
                muted,
                starts,
            };
            if name == "mix" {
                Command::Mix {
                    arrangement,
                    output: output.unwrap_or_else(|| PathBuf::from("mix.wav")),
                    json,
                }
            } else {
                Command::Play { arrangement, from }
            }
        }
        other => return Err(format!("unknown command {}", other)),
    };

    Ok(Invocation { verbose, command })
}

fn track_position(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("bad track number {:?}", s)),
    }
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(format!("bad time {:?}", s)),
    }
}

fn parse_start(s: &str) -> Result<(usize, f64), String> {
    let (n, t) = s.split_once('=').ok_or_else(|| format!("expected N=SECS, got {:?}", s))?;
    Ok((track_position(n)?, parse_seconds(t)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_mix() {
        let inv = parse(&args("-v mix a.wav b.wav -o out.wav -m 2 --at 1=1.5 -d 30")).unwrap();
        assert!(inv.verbose);
        match inv.command {
            Command::Mix { arrangement, output, json } => {
                assert_eq!(arrangement.files.len(), 2);
                assert_eq!(arrangement.muted, vec![1]);
                assert_eq!(arrangement.starts, vec![(0, 1.5)]);
                assert_eq!(arrangement.duration.as_deref(), Some("30"));
                assert_eq!(output, PathBuf::from("out.wav"));
                assert!(!json);
            }
            other => panic!("Expected Mix, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_play_defaults() {
        let inv = parse(&args("play a.wav --from 2")).unwrap();
        match inv.command {
            Command::Play { arrangement, from } => {
                assert_eq!(from, 2.0);
                assert!(arrangement.muted.is_empty());
                assert!(arrangement.duration.is_none());
            }
            other => panic!("Expected Play, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&args("")).is_err());
        assert!(parse(&args("mix")).is_err());
        assert!(parse(&args("mix a.wav -m 0")).is_err());
        assert!(parse(&args("mix a.wav -m 3")).is_err());
        assert!(parse(&args("mix a.wav --at 1")).is_err());
        assert!(parse(&args("mix a.wav -o")).is_err());
        assert!(parse(&args("info a.wav b.wav")).is_err());
        assert!(parse(&args("dance a.wav")).is_err());
        assert!(parse(&args("mix a.wav --loud")).is_err());
    }
}
