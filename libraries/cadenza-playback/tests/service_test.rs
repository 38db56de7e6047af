//! End-to-end tests through the playback service task

mod common;

use cadenza_core::Track;
use cadenza_playback::{
    Collaborators, InMemoryNowPlaying, InMemoryPlaylist, LoopMode, MemorySettingsStore,
    PlaybackError, PlaybackHandle, PlaybackPhase, PlaybackService, PlayerConfig, PlayerEvent,
};
use common::{create_test_track, create_tracks, RecordingDevice};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

struct Running {
    player: PlaybackHandle,
    task: JoinHandle<()>,
    device: Arc<RecordingDevice>,
    settings: Arc<MemorySettingsStore>,
}

async fn start(tracks: Vec<Track>) -> Running {
    let device = Arc::new(RecordingDevice::new());
    let settings = Arc::new(MemorySettingsStore::new());
    let collaborators = Collaborators {
        device: device.clone(),
        playlist: Arc::new(InMemoryPlaylist::new(tracks)),
        now_playing: Arc::new(InMemoryNowPlaying::new()),
        settings: settings.clone(),
    };

    let (player, task) = PlaybackService::spawn(PlayerConfig::default(), collaborators);

    // Round-trip so the device is attached before the test drives it
    player.snapshot().await.unwrap();

    Running {
        player,
        task,
        device,
        settings,
    }
}

#[tokio::test(start_paused = true)]
async fn plays_and_reports_progress() {
    let running = start(create_tracks(2)).await;

    running.player.play(create_test_track(1)).await.unwrap();
    let snapshot = running.player.snapshot().await.unwrap();
    assert!(snapshot.is_loading);
    assert_eq!(snapshot.phase, PlaybackPhase::Loading);

    running.device.complete_load(None);
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let snapshot = running.player.snapshot().await.unwrap();
    assert!(snapshot.playing);
    assert!(!snapshot.is_loading);
    assert!((snapshot.current_time - 1.0).abs() < 1e-9);
    assert_eq!(snapshot.current_time_str, "0:01");
    assert_eq!(snapshot.duration_str, "3:00");
}

#[tokio::test]
async fn broadcasts_events() {
    let running = start(create_tracks(2)).await;
    let mut events = running.player.subscribe();

    running.player.toggle_random().await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        PlayerEvent::ShuffleChanged { enabled: true }
    );

    let mode = running.player.switch_loop_mode().await.unwrap();
    assert_eq!(mode, LoopMode::LoopAll);
    assert_eq!(
        events.recv().await.unwrap(),
        PlayerEvent::LoopModeChanged {
            mode: LoopMode::LoopAll
        }
    );
}

#[tokio::test]
async fn load_failure_is_reported() {
    let running = start(create_tracks(2)).await;
    let mut events = running.player.subscribe();

    running.player.play(create_test_track(2)).await.unwrap();
    running.device.fail_load("decode error");

    loop {
        match events.recv().await.unwrap() {
            PlayerEvent::LoadFailed { track_id, reason } => {
                assert_eq!(track_id, 2);
                assert_eq!(reason, "decode error");
                break;
            }
            _ => continue,
        }
    }

    let snapshot = running.player.snapshot().await.unwrap();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.phase, PlaybackPhase::Idle);
}

#[tokio::test]
async fn volume_is_persisted() {
    let running = start(vec![]).await;

    running.player.set_volume(80).await.unwrap();
    running.player.add_volume(-5).await.unwrap();

    let snapshot = running.player.snapshot().await.unwrap();
    assert_eq!(snapshot.volume, 75);
    assert!(!snapshot.is_mute);
    assert_eq!(running.settings.saved_volume(), Some(75));
}

#[tokio::test]
async fn seek_round_trip() {
    let running = start(create_tracks(1)).await;
    let mut events = running.player.subscribe();

    running.player.play(create_test_track(1)).await.unwrap();
    running.device.complete_load(None);
    running.player.input_time().await.unwrap();
    running.player.select_time(50.0).await.unwrap();

    loop {
        if let PlayerEvent::TimeUpdateBegan { position } = events.recv().await.unwrap() {
            assert_eq!(position, 90.0);
            break;
        }
    }
    running.player.begin_time_update().await.unwrap();

    let snapshot = running.player.snapshot().await.unwrap();
    assert_eq!(snapshot.progress_percent, Some(50.0));
    assert_eq!(snapshot.current_time_str, "1:30");
}

#[tokio::test]
async fn shutdown_stops_the_task() {
    let running = start(create_tracks(1)).await;

    running.player.shutdown().await.unwrap();
    running.task.await.unwrap();

    let err = running.player.toggle_play().await.unwrap_err();
    assert!(matches!(err, PlaybackError::ServiceStopped));
    assert!(running.player.snapshot().await.is_err());
}

#[tokio::test]
async fn dropping_handles_stops_the_task() {
    let running = start(create_tracks(1)).await;
    let Running { player, task, .. } = running;

    let clone = player.clone();
    drop(player);
    drop(clone);

    task.await.unwrap();
}
