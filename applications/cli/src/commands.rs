//! Line commands read from stdin

use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CliCommand {
    /// Play the N-th playlist entry (1-based)
    Play(usize),
    /// Make the N-th entry the selection without playing it
    Select(usize),
    Toggle,
    Next,
    Prev,
    Random,
    Stop,
    Abort,
    Loop,
    Shuffle,
    /// Absolute volume
    Volume(u8),
    /// Relative volume change
    VolumeBy(i32),
    Mute,
    /// Seek to a percentage of the track
    Seek(f64),
    Status,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  play N     play entry N        select N   select entry N
  toggle     play/pause          stop       pause, keep track
  next       next entry          prev       previous entry
  random     random entry        abort      unload and clear selection
  loop       cycle loop mode     shuffle    toggle shuffle
  vol N      set volume 0-100    vol +N/-N  change volume
  mute       toggle mute         seek P     jump to P percent
  status     show state          list       show playlist
  quit       exit";

impl CliCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = words.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" | "p" => Self::Play(index(arg, "play")?),
            "select" | "sel" => Self::Select(index(arg, "select")?),
            "toggle" | "t" => Self::Toggle,
            "next" | "n" => Self::Next,
            "prev" | "previous" => Self::Prev,
            "random" | "r" => Self::Random,
            "stop" => Self::Stop,
            "abort" => Self::Abort,
            "loop" | "l" => Self::Loop,
            "shuffle" | "s" => Self::Shuffle,
            "vol" | "volume" | "v" => volume(arg)?,
            "mute" | "m" => Self::Mute,
            "seek" => Self::Seek(percent(arg)?),
            "status" | "st" => Self::Status,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn index(arg: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    arg.and_then(|arg| arg.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or(CommandError::BadArgument {
            command,
            expected: "a playlist position starting at 1",
        })
}

fn volume(arg: Option<&str>) -> Result<CliCommand, CommandError> {
    let bad = CommandError::BadArgument {
        command: "vol",
        expected: "N, +N or -N",
    };
    let arg = arg.ok_or_else(|| bad.clone())?;

    if arg.starts_with('+') || arg.starts_with('-') {
        let delta = arg.parse::<i32>().map_err(|_| bad)?;
        Ok(CliCommand::VolumeBy(delta))
    } else {
        let level = arg
            .parse::<u8>()
            .ok()
            .filter(|level| *level <= 100)
            .ok_or(CommandError::BadArgument {
                command: "vol",
                expected: "a level between 0 and 100",
            })?;
        Ok(CliCommand::Volume(level))
    }
}

fn percent(arg: Option<&str>) -> Result<f64, CommandError> {
    arg.and_then(|arg| arg.trim_end_matches('%').parse::<f64>().ok())
        .filter(|p| (0.0..=100.0).contains(p))
        .ok_or(CommandError::BadArgument {
            command: "seek",
            expected: "a percentage between 0 and 100",
        })
}
