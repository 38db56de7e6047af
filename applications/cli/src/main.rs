/// Cadenza - headless player driven from the terminal
use anyhow::Context;
use cadenza_core::{NowPlaying, Track};
use cadenza_playback::{
    format_time, resolve_source_path, Collaborators, InMemoryNowPlaying, InMemoryPlaylist,
    PlaybackHandle, PlaybackService, PlayerConfig, PlayerEvent,
};
use cadenza_storage::SqliteSettingsStore;
use clap::Parser;
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod device;

use commands::{CliCommand, HELP};
use device::SimulatedDevice;

#[derive(Parser)]
#[command(name = "cadenza")]
#[command(about = "Headless Cadenza player with a simulated output device", long_about = None)]
struct Cli {
    /// Player configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Playlist as a JSON array of tracks
    #[arg(short, long)]
    playlist: PathBuf,

    /// Settings database URL
    #[arg(short, long, default_value = "sqlite://cadenza.db")]
    database: String,

    /// Simulated load latency in milliseconds
    #[arg(long, default_value_t = 300)]
    load_delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadenza=info,cadenza_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref())?;
    let tracks = load_playlist(&cli.playlist)?;
    tracing::info!(tracks = tracks.len(), "playlist loaded");

    let pool = cadenza_storage::create_pool(&cli.database).await?;
    cadenza_storage::run_migrations(&pool).await?;
    tracing::info!(database = %cli.database, "settings database ready");

    let device = SimulatedDevice::new(
        track_durations(&tracks, &config.media_extension),
        Duration::from_millis(cli.load_delay_ms),
    );
    let now_playing = Arc::new(InMemoryNowPlaying::new());
    let collaborators = Collaborators {
        device: Arc::new(device),
        playlist: Arc::new(InMemoryPlaylist::new(tracks.clone())),
        now_playing: now_playing.clone(),
        settings: Arc::new(SqliteSettingsStore::new(pool)),
    };

    let (player, task) = PlaybackService::spawn(config, collaborators);
    let printer = tokio::spawn(print_events(player.clone()));

    println!("{HELP}");
    run_console(&player, &tracks, now_playing.as_ref()).await?;

    player.shutdown().await?;
    task.await?;
    printer.abort();
    Ok(())
}

fn load_playlist(path: &std::path::Path) -> anyhow::Result<Vec<Track>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read playlist {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid playlist {}", path.display()))?;
    Ok(tracks)
}

/// Resolved URL to seconds, for tracks with a readable duration
fn track_durations(tracks: &[Track], extension: &str) -> HashMap<String, f64> {
    tracks
        .iter()
        .filter_map(|track| {
            let secs = track.duration_secs().ok()?;
            Some((resolve_source_path(&track.music_url, extension), secs))
        })
        .collect()
}

async fn run_console(
    player: &PlaybackHandle,
    tracks: &[Track],
    now_playing: &InMemoryNowPlaying,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            return Ok(());
        };

        let command = match CliCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            CliCommand::Play(n) => match tracks.get(n - 1) {
                Some(track) => player.play(track.clone()).await?,
                None => println!("no entry {n}"),
            },
            CliCommand::Select(n) => match tracks.get(n - 1) {
                Some(track) => {
                    now_playing.set_playing_file(track.clone());
                    println!("selected {}", describe(track));
                }
                None => println!("no entry {n}"),
            },
            CliCommand::Toggle => player.toggle_play().await?,
            CliCommand::Next => player.next().await?,
            CliCommand::Prev => player.previous().await?,
            CliCommand::Random => player.random().await?,
            CliCommand::Stop => player.stop().await?,
            CliCommand::Abort => player.abort().await?,
            CliCommand::Loop => {
                player.switch_loop_mode().await?;
            }
            CliCommand::Shuffle => player.toggle_random().await?,
            CliCommand::Volume(level) => player.set_volume(level).await?,
            CliCommand::VolumeBy(delta) => player.add_volume(delta).await?,
            CliCommand::Mute => player.toggle_mute().await?,
            CliCommand::Seek(percent) => {
                player.input_time().await?;
                player.select_time(percent).await?;
            }
            CliCommand::Status => print_status(player, now_playing).await?,
            CliCommand::List => print_list(tracks, now_playing),
            CliCommand::Help => println!("{HELP}"),
            CliCommand::Quit => return Ok(()),
        }
    }
}

async fn print_status(
    player: &PlaybackHandle,
    now_playing: &InMemoryNowPlaying,
) -> anyhow::Result<()> {
    let snapshot = player.snapshot().await?;
    let selected = now_playing.playing_file();

    println!(
        "{:?} | {} | {} / {} | vol {}{} | loop {:?} | shuffle {}",
        snapshot.phase,
        if selected.is_empty() {
            "-".to_string()
        } else {
            describe(&selected)
        },
        snapshot.current_time_str,
        snapshot.duration_str,
        snapshot.volume,
        if snapshot.is_mute { " (muted)" } else { "" },
        snapshot.loop_mode,
        if snapshot.is_random { "on" } else { "off" },
    );
    Ok(())
}

fn print_list(tracks: &[Track], now_playing: &InMemoryNowPlaying) {
    let selected = now_playing.playing_file().id;
    for (i, track) in tracks.iter().enumerate() {
        let marker = if track.id == selected { '>' } else { ' ' };
        println!("{marker} {:>3}. {} [{}]", i + 1, describe(track), track.time);
    }
}

fn describe(track: &Track) -> String {
    match (track.title.is_empty(), track.artist.is_empty()) {
        (true, _) => track.music_url.clone(),
        (false, true) => track.title.clone(),
        (false, false) => format!("{} - {}", track.artist, track.title),
    }
}

/// Print player events; resumes progress after a scrub
async fn print_events(player: PlaybackHandle) {
    let mut events = player.subscribe();

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match event {
            PlayerEvent::StateChanged { phase } => println!("[state] {phase:?}"),
            PlayerEvent::TrackChanged { track } => println!("[track] {}", describe(&track)),
            PlayerEvent::LoadingStarted { track_id } => println!("[loading] #{track_id}"),
            PlayerEvent::LoadingFinished { track_id, duration } => {
                println!("[ready] #{track_id} ({})", format_time(duration));
            }
            PlayerEvent::LoadFailed { track_id, reason } => {
                println!("[error] #{track_id} could not be played: {reason}");
            }
            PlayerEvent::VolumeChanged { level, is_muted } => {
                println!("[volume] {level}{}", if is_muted { " (muted)" } else { "" });
            }
            PlayerEvent::LoopModeChanged { mode } => println!("[loop] {mode:?}"),
            PlayerEvent::ShuffleChanged { enabled } => {
                println!("[shuffle] {}", if enabled { "on" } else { "off" });
            }
            PlayerEvent::TimeUpdateBegan { position } => {
                println!("[seek] {}", format_time(position));
                if player.begin_time_update().await.is_err() {
                    break;
                }
            }
        }
    }
}
