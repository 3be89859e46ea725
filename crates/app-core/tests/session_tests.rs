// Host-side tests for the audio transport state machine.

use app_core::session::{format_time, slider_sync, MediaCommand};
use app_core::{AudioSession, PlaybackError};

fn unlocked() -> AudioSession {
    let mut s = AudioSession::new();
    let cmds = s.gesture();
    assert_eq!(cmds.as_slice(), &[MediaCommand::Play]);
    assert!(s.play_started(), "first successful start must unlock");
    s
}

fn unlocked_with_duration(duration: f64) -> AudioSession {
    let mut s = unlocked();
    s.metadata_loaded(duration);
    s
}

#[test]
fn locked_session_ignores_transport() {
    let mut s = AudioSession::new();
    s.metadata_loaded(200.0);
    assert!(s.toggle_play_pause().is_empty());
    assert!(s.seek_by(10.0).is_empty());
    assert!(s.begin_scrub().is_empty());
    assert!(s.ended().is_empty());
    assert!(!s.is_unlocked());
    assert!(!s.is_playing());
}

#[test]
fn unlock_happens_exactly_once() {
    let mut s = AudioSession::new();
    assert_eq!(s.gesture().as_slice(), &[MediaCommand::Play]);
    // Re-entrant gestures while the start request is in flight coalesce.
    assert!(s.gesture().is_empty());
    assert!(s.gesture().is_empty());
    assert!(s.play_started());
    assert!(s.is_unlocked());
    // Later play events never report another unlock.
    assert!(!s.play_started());
    assert!(s.gesture().is_empty());
}

#[test]
fn rejected_unlock_stays_locked() {
    let mut s = AudioSession::new();
    assert_eq!(s.gesture().as_slice(), &[MediaCommand::Play]);
    s.play_rejected(PlaybackError("autoplay blocked".into()));
    assert!(!s.is_unlocked());
    assert!(!s.is_playing());
    assert!(s.last_error().is_some());
    // A fresh gesture may try again.
    assert_eq!(s.gesture().as_slice(), &[MediaCommand::Play]);
    assert!(s.play_started());
    assert!(s.last_error().is_none(), "success clears the error");
}

#[test]
fn seek_clamps_to_track_bounds() {
    let mut s = unlocked_with_duration(200.0);
    s.time_update(5.0);
    assert_eq!(s.seek_by(-1000.0).as_slice(), &[MediaCommand::SeekTo(0.0)]);
    assert_eq!(s.current_time(), 0.0);
    s.time_update(5.0);
    assert_eq!(
        s.seek_by(1000.0).as_slice(),
        &[MediaCommand::SeekTo(200.0)]
    );
    assert_eq!(s.current_time(), 200.0);
}

#[test]
fn seek_requires_known_duration() {
    let mut s = unlocked();
    s.time_update(5.0);
    assert!(s.seek_by(10.0).is_empty());
    assert!(s.scrub_to(30.0).is_empty());
    s.metadata_loaded(100.0);
    assert_eq!(s.seek_by(10.0).as_slice(), &[MediaCommand::SeekTo(15.0)]);
}

#[test]
fn arrow_steps_seek_ten_seconds() {
    let mut s = unlocked_with_duration(300.0);
    s.time_update(60.0);
    assert_eq!(s.seek_back().as_slice(), &[MediaCommand::SeekTo(50.0)]);
    assert_eq!(s.seek_forward().as_slice(), &[MediaCommand::SeekTo(60.0)]);
}

#[test]
fn toggle_cycles_between_playing_and_paused() {
    let mut s = unlocked();
    assert!(s.is_playing());
    assert_eq!(s.toggle_play_pause().as_slice(), &[MediaCommand::Pause]);
    assert!(!s.is_playing());
    s.media_paused();
    assert_eq!(s.toggle_play_pause().as_slice(), &[MediaCommand::Play]);
    // Start is pending until the platform reports back.
    assert!(!s.is_playing());
    assert!(s.toggle_play_pause().is_empty(), "pending start coalesces");
    assert!(!s.play_started());
    assert!(s.is_playing());
}

#[test]
fn rejected_resume_returns_to_paused() {
    let mut s = unlocked();
    s.toggle_play_pause();
    s.media_paused();
    assert_eq!(s.toggle_play_pause().as_slice(), &[MediaCommand::Play]);
    s.play_rejected(PlaybackError("device busy".into()));
    assert!(!s.is_playing());
    assert!(s.is_unlocked(), "rejection never re-locks the session");
    assert!(s.last_error().is_some());
}

#[test]
fn ended_restarts_within_the_same_cycle() {
    let mut s = unlocked_with_duration(125.0);
    s.time_update(125.0);
    let cmds = s.ended();
    assert_eq!(
        cmds.as_slice(),
        &[MediaCommand::SeekTo(0.0), MediaCommand::Play]
    );
    assert_eq!(s.current_time(), 0.0);
    assert!(!s.play_started(), "loop restart is not a new unlock");
    assert!(s.is_playing());
}

#[test]
fn scrub_pauses_and_resumes_without_a_new_gesture() {
    let mut s = unlocked_with_duration(200.0);
    assert!(s.is_playing());
    assert_eq!(s.begin_scrub().as_slice(), &[MediaCommand::Pause]);
    assert!(!s.is_playing());
    assert_eq!(s.scrub_to(42.0).as_slice(), &[MediaCommand::SeekTo(42.0)]);
    assert_eq!(s.current_time(), 42.0);
    assert_eq!(s.end_scrub().as_slice(), &[MediaCommand::Play]);
    assert!(!s.play_started());
    assert!(s.is_playing());
}

#[test]
fn scrub_while_paused_does_not_resume() {
    let mut s = unlocked_with_duration(200.0);
    s.toggle_play_pause();
    s.media_paused();
    assert!(s.begin_scrub().is_empty());
    assert!(s.end_scrub().is_empty());
    assert!(!s.is_playing());
}

#[test]
fn scrub_positions_clamp() {
    let mut s = unlocked_with_duration(90.0);
    assert_eq!(s.scrub_to(-5.0).as_slice(), &[MediaCommand::SeekTo(0.0)]);
    assert_eq!(s.scrub_to(500.0).as_slice(), &[MediaCommand::SeekTo(90.0)]);
}

#[test]
fn external_play_and_pause_controls() {
    let mut s = AudioSession::new();
    // External play acts as the unlock gesture while locked.
    assert_eq!(s.play().as_slice(), &[MediaCommand::Play]);
    assert!(s.play_started());
    assert!(s.play().is_empty(), "already playing");
    assert_eq!(s.pause().as_slice(), &[MediaCommand::Pause]);
    assert!(s.pause().is_empty(), "already paused");
    assert_eq!(s.play().as_slice(), &[MediaCommand::Play]);
}

#[test]
fn volume_clamps_to_unit_range() {
    let mut s = AudioSession::new();
    assert_eq!(s.set_volume(1.5).as_slice(), &[MediaCommand::SetVolume(1.0)]);
    assert_eq!(s.volume(), 1.0);
    assert_eq!(
        s.set_volume(-0.25).as_slice(),
        &[MediaCommand::SetVolume(0.0)]
    );
    assert_eq!(s.volume(), 0.0);
    assert_eq!(
        s.set_volume(0.4).as_slice(),
        &[MediaCommand::SetVolume(0.4)]
    );
}

#[test]
fn destroy_is_terminal() {
    let mut s = unlocked_with_duration(100.0);
    assert_eq!(s.destroy().as_slice(), &[MediaCommand::Pause]);
    assert!(s.is_destroyed());
    assert!(s.destroy().is_empty());
    assert!(s.gesture().is_empty());
    assert!(s.toggle_play_pause().is_empty());
    assert!(s.seek_by(10.0).is_empty());
    assert!(s.ended().is_empty());
    assert!(s.set_volume(0.5).is_empty());
    assert!(!s.play_started());
}

#[test]
fn slider_label_formats_minutes_and_seconds() {
    let sync = slider_sync(65.0, Some(125.0));
    assert_eq!(sync.label, "1:05 / 2:05");
    assert_eq!(sync.max, 125);
    assert_eq!(sync.value, 65);
}

#[test]
fn slider_placeholder_before_metadata() {
    let sync = slider_sync(12.0, None);
    assert_eq!(sync.label, "0:00 / 0:00");
    assert_eq!(sync.max, 0);
    assert_eq!(sync.value, 0);

    let nan = slider_sync(12.0, Some(f64::NAN));
    assert_eq!(nan.label, "0:00 / 0:00");
}

#[test]
fn format_time_edges() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(59.9), "0:59");
    assert_eq!(format_time(60.0), "1:00");
    assert_eq!(format_time(600.0), "10:00");
    assert_eq!(format_time(-3.0), "0:00");
}
