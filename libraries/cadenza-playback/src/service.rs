//! Playback service
//!
//! Runs a `PlaybackManager` on its own tokio task. Commands, device events,
//! and progress ticks are all funnelled into one loop, so each of them is
//! applied to completion before the next one is looked at. Events queued by
//! the manager are broadcast to subscribers after every step.

use crate::{
    config::PlayerConfig,
    error::{PlaybackError, Result},
    events::PlayerEvent,
    manager::{Collaborators, PlaybackManager},
    types::{LoopMode, PlaybackSnapshot},
};
use cadenza_core::Track;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 256;

/// Requests accepted by the playback service
#[derive(Debug)]
pub enum PlaybackCommand {
    Play(Track),
    TogglePlay,
    Next,
    Previous,
    Random,
    Stop,
    Abort,
    SetVolume(u8),
    AddVolume(i32),
    ToggleMute,
    SwitchLoopMode,
    ToggleRandom,
    /// Seek to a percentage of the duration
    SelectTime(f64),
    /// Seek control grabbed
    InputTime,
    /// Resume progress reporting after a scrub
    BeginTimeUpdate,
    Snapshot(oneshot::Sender<PlaybackSnapshot>),
    Shutdown,
}

/// Entry point for running the playback loop
pub struct PlaybackService;

impl PlaybackService {
    /// Spawn the playback loop
    ///
    /// The manager is initialised inside the task before the first command is
    /// read. Must be called from within a tokio runtime.
    pub fn spawn(
        config: PlayerConfig,
        collaborators: Collaborators,
    ) -> (PlaybackHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let events = event_tx.clone();
        let task = tokio::spawn(async move {
            run(config, collaborators, command_rx, events).await;
        });

        let handle = PlaybackHandle {
            commands: command_tx,
            events: event_tx,
        };
        (handle, task)
    }
}

async fn run(
    config: PlayerConfig,
    collaborators: Collaborators,
    mut commands: mpsc::Receiver<PlaybackCommand>,
    events: broadcast::Sender<PlayerEvent>,
) {
    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    let (device_tx, mut device_events) = mpsc::unbounded_channel();

    let mut manager = PlaybackManager::new(config, collaborators, tick_tx);
    manager.init(device_tx).await;
    publish(&mut manager, &events);

    loop {
        tokio::select! {
            biased;

            Some(event) = device_events.recv() => {
                debug!(?event, "device event");
                manager.handle_device_event(event);
            }

            Some(tick) = ticks.recv() => {
                manager.handle_tick(tick);
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all playback handles dropped");
                    break;
                };
                if !apply(&mut manager, command).await {
                    break;
                }
            }
        }

        publish(&mut manager, &events);
    }

    manager.stop();
    publish(&mut manager, &events);
    info!("playback service stopped");
}

/// Apply one command; `false` ends the loop
async fn apply(manager: &mut PlaybackManager, command: PlaybackCommand) -> bool {
    match command {
        PlaybackCommand::Play(track) => manager.play(track),
        PlaybackCommand::TogglePlay => manager.toggle_play(),
        PlaybackCommand::Next => manager.to_next(),
        PlaybackCommand::Previous => manager.to_prev(),
        PlaybackCommand::Random => manager.random_play(),
        PlaybackCommand::Stop => manager.stop(),
        PlaybackCommand::Abort => manager.abort(),
        PlaybackCommand::SetVolume(level) => manager.set_volume(level).await,
        PlaybackCommand::AddVolume(delta) => manager.add_volume(delta).await,
        PlaybackCommand::ToggleMute => manager.toggle_mute(),
        PlaybackCommand::SwitchLoopMode => {
            manager.switch_loop_mode();
        }
        PlaybackCommand::ToggleRandom => {
            manager.toggle_random();
        }
        PlaybackCommand::SelectTime(percent) => manager.handle_select_time(percent),
        PlaybackCommand::InputTime => manager.handle_input_time(),
        PlaybackCommand::BeginTimeUpdate => manager.begin_time_update(),
        PlaybackCommand::Snapshot(reply) => {
            // Requester may have given up
            let _ = reply.send(manager.snapshot());
        }
        PlaybackCommand::Shutdown => return false,
    }
    true
}

fn publish(manager: &mut PlaybackManager, events: &broadcast::Sender<PlayerEvent>) {
    for event in manager.drain_events() {
        // No subscribers is fine
        let _ = events.send(event);
    }
}

/// Cloneable handle to a running playback service
#[derive(Clone)]
pub struct PlaybackHandle {
    commands: mpsc::Sender<PlaybackCommand>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlaybackHandle {
    /// Send a raw command
    pub async fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub async fn play(&self, track: Track) -> Result<()> {
        self.send(PlaybackCommand::Play(track)).await
    }

    pub async fn toggle_play(&self) -> Result<()> {
        self.send(PlaybackCommand::TogglePlay).await
    }

    pub async fn next(&self) -> Result<()> {
        self.send(PlaybackCommand::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.send(PlaybackCommand::Previous).await
    }

    pub async fn random(&self) -> Result<()> {
        self.send(PlaybackCommand::Random).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(PlaybackCommand::Stop).await
    }

    pub async fn abort(&self) -> Result<()> {
        self.send(PlaybackCommand::Abort).await
    }

    pub async fn set_volume(&self, level: u8) -> Result<()> {
        self.send(PlaybackCommand::SetVolume(level)).await
    }

    pub async fn add_volume(&self, delta: i32) -> Result<()> {
        self.send(PlaybackCommand::AddVolume(delta)).await
    }

    pub async fn toggle_mute(&self) -> Result<()> {
        self.send(PlaybackCommand::ToggleMute).await
    }

    /// Advance the loop mode and return the new one
    pub async fn switch_loop_mode(&self) -> Result<LoopMode> {
        self.send(PlaybackCommand::SwitchLoopMode).await?;
        Ok(self.snapshot().await?.loop_mode)
    }

    pub async fn toggle_random(&self) -> Result<()> {
        self.send(PlaybackCommand::ToggleRandom).await
    }

    pub async fn select_time(&self, percent: f64) -> Result<()> {
        self.send(PlaybackCommand::SelectTime(percent)).await
    }

    pub async fn input_time(&self) -> Result<()> {
        self.send(PlaybackCommand::InputTime).await
    }

    pub async fn begin_time_update(&self) -> Result<()> {
        self.send(PlaybackCommand::BeginTimeUpdate).await
    }

    /// Current state with derived views
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(PlaybackCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| PlaybackError::ServiceStopped)
    }

    /// Ask the loop to exit; playback is stopped first
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PlaybackCommand::Shutdown).await
    }
}
