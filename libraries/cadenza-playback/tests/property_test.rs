//! Property-based tests for formatting, volume, and navigation
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use cadenza_core::parse_time_str;
use cadenza_playback::{format_time, PlaybackState, Volume};
use common::{create_tracks, Harness};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// Property: formatted time is `M:SS` and reads back as the floored seconds
    #[test]
    fn format_time_is_floored_minutes_and_seconds(time in 0.0f64..100_000.0) {
        let formatted = format_time(time);
        let (minutes, seconds) = formatted.split_once(':').unwrap();

        prop_assert_eq!(seconds.len(), 2);
        prop_assert!(seconds.parse::<u64>().unwrap() < 60);
        prop_assert!(!minutes.is_empty());
        prop_assert_eq!(parse_time_str(&formatted).unwrap(), time.floor());
    }

    /// Property: negative times format as zero
    #[test]
    fn negative_time_formats_as_zero(time in -100_000.0f64..0.0) {
        prop_assert_eq!(format_time(time), "0:00");
    }

    /// Property: displayed elapsed time never exceeds the duration
    #[test]
    fn elapsed_display_capped_by_duration(
        duration in 0.0f64..10_000.0,
        current in 0.0f64..20_000.0,
    ) {
        let mut state = PlaybackState::default();
        state.duration = duration;
        state.current_time = current;

        let elapsed = parse_time_str(&state.current_time_str()).unwrap();
        let total = parse_time_str(&state.duration_str()).unwrap();
        prop_assert!(elapsed <= total);
    }

    /// Property: volume offsets always land in 0-100
    #[test]
    fn volume_offset_is_clamped(level in 0u8..=100, delta in any::<i32>()) {
        let volume = Volume::new(level);
        let result = volume.offset(delta);

        prop_assert!(result <= 100);
        prop_assert_eq!(i64::from(result), (i64::from(level) + i64::from(delta)).clamp(0, 100));
    }

    /// Property: device level is the linear fraction of the level
    #[test]
    fn device_level_in_unit_range(level in any::<u8>()) {
        let volume = Volume::new(level);
        let device = volume.device_level();

        prop_assert!((0.0..=1.0).contains(&device));
        prop_assert_eq!(volume.level(), level.min(100));
    }

    /// Property: `n` nexts from the first entry land on entry `n % len`
    #[test]
    fn next_wraps_around(len in 1u64..12, steps in 0usize..40) {
        let url = block_on(async move {
            let mut h = Harness::new(create_tracks(len)).await;
            h.play_loaded(common::create_test_track(1));
            for _ in 0..steps {
                h.manager.to_next();
                h.device.complete_load(None);
                h.pump_device();
            }
            h.device.last_load().1
        });

        let expected = (steps as u64 % len) + 1;
        prop_assert_eq!(url, format!("/music/track{}.mp3", expected));
    }

    /// Property: `n` prevs from the first entry land on entry `-n mod len`
    #[test]
    fn prev_wraps_around(len in 1u64..12, steps in 0usize..40) {
        let url = block_on(async move {
            let mut h = Harness::new(create_tracks(len)).await;
            h.play_loaded(common::create_test_track(1));
            for _ in 0..steps {
                h.manager.to_prev();
                h.device.complete_load(None);
                h.pump_device();
            }
            h.device.last_load().1
        });

        let back = steps as u64 % len;
        let expected = (len - back) % len + 1;
        prop_assert_eq!(url, format!("/music/track{}.mp3", expected));
    }
}
