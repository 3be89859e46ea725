//! Playback transport state machine.
//!
//! The session never touches the media element itself. Each input event
//! returns a short list of [`MediaCommand`]s for the frontend to apply, and
//! the platform's asynchronous outcomes come back in as further events
//! (`play_started` / `play_rejected` / `media_paused`). A start request puts
//! the session into an explicit pending state so that re-entrant requests
//! issued before the outcome resolves are coalesced instead of racing.

use crate::constants::SEEK_STEP_SECONDS;
use crate::error::PlaybackError;
use smallvec::SmallVec;

/// Command for the media layer. Play is asynchronous on the platform; its
/// outcome is reported back via `play_started`/`play_rejected`.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    SeekTo(f64),
    SetVolume(f64),
}

/// At most a seek plus a play (end-of-track restart) per event.
pub type Commands = SmallVec<[MediaCommand; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Nothing requested yet (only reachable while locked).
    Inert,
    /// A start request is in flight; further start requests are ignored.
    Pending,
    Playing,
    Paused,
}

pub struct AudioSession {
    unlocked: bool,
    playback: Playback,
    /// State restored if the in-flight start request is rejected.
    resume_on_reject: Playback,
    current_time: f64,
    duration: Option<f64>,
    volume: f64,
    scrubbing: bool,
    resume_after_scrub: bool,
    last_error: Option<PlaybackError>,
    destroyed: bool,
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSession {
    pub fn new() -> Self {
        Self {
            unlocked: false,
            playback: Playback::Inert,
            resume_on_reject: Playback::Inert,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            scrubbing: false,
            resume_after_scrub: false,
            last_error: None,
            destroyed: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// A qualifying first-playback gesture (click outside the pause control,
    /// Space or Enter) arrived. Only the first one while locked starts the
    /// unlock attempt; the transition itself completes in `play_started`.
    pub fn gesture(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || self.unlocked || self.playback == Playback::Pending {
            return out;
        }
        self.resume_on_reject = Playback::Inert;
        self.playback = Playback::Pending;
        out.push(MediaCommand::Play);
        out
    }

    /// Playback actually started (play promise resolved, or a `play` media
    /// event). Returns `true` exactly once: on the unlock transition.
    pub fn play_started(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.last_error = None;
        self.playback = Playback::Playing;
        if !self.unlocked {
            self.unlocked = true;
            return true;
        }
        false
    }

    /// The platform rejected a start request. The session stays locked if it
    /// was locked, otherwise returns to the state before the request.
    pub fn play_rejected(&mut self, error: PlaybackError) {
        if self.destroyed {
            return;
        }
        log::warn!("playback start rejected: {error}");
        self.playback = self.resume_on_reject;
        self.last_error = Some(error);
    }

    /// `pause` media event (fires after our own Pause commands as well).
    pub fn media_paused(&mut self) {
        if self.destroyed {
            return;
        }
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    /// Duration became known from media metadata.
    pub fn metadata_loaded(&mut self, duration: f64) {
        if self.destroyed {
            return;
        }
        if duration.is_finite() && duration >= 0.0 {
            self.duration = Some(duration);
        }
    }

    /// Periodic playback-position notification.
    pub fn time_update(&mut self, current_time: f64) {
        if self.destroyed {
            return;
        }
        self.current_time = current_time;
    }

    /// Flip between playing and paused. No-op until unlocked or while a
    /// start request is pending.
    pub fn toggle_play_pause(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.unlocked {
            return out;
        }
        match self.playback {
            Playback::Playing => {
                self.playback = Playback::Paused;
                out.push(MediaCommand::Pause);
            }
            Playback::Paused | Playback::Inert => {
                self.resume_on_reject = Playback::Paused;
                self.playback = Playback::Pending;
                out.push(MediaCommand::Play);
            }
            Playback::Pending => {}
        }
        out
    }

    /// Seek relative to the current position, clamped to `[0, duration]`.
    /// No-op until unlocked and the duration is known.
    pub fn seek_by(&mut self, delta_seconds: f64) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.unlocked {
            return out;
        }
        let Some(duration) = self.duration else {
            return out;
        };
        let target = (self.current_time + delta_seconds).clamp(0.0, duration);
        self.current_time = target;
        out.push(MediaCommand::SeekTo(target));
        out
    }

    /// Arrow-key seek step.
    pub fn seek_back(&mut self) -> Commands {
        self.seek_by(-SEEK_STEP_SECONDS)
    }

    pub fn seek_forward(&mut self) -> Commands {
        self.seek_by(SEEK_STEP_SECONDS)
    }

    /// The user grabbed the progress slider. Pauses playback for the
    /// duration of the drag so position updates do not fight the thumb.
    pub fn begin_scrub(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.unlocked || self.scrubbing {
            return out;
        }
        self.scrubbing = true;
        if self.playback == Playback::Playing {
            self.resume_after_scrub = true;
            self.playback = Playback::Paused;
            out.push(MediaCommand::Pause);
        }
        out
    }

    /// Slider moved to an absolute position while dragging.
    pub fn scrub_to(&mut self, seconds: f64) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.unlocked {
            return out;
        }
        let Some(duration) = self.duration else {
            return out;
        };
        let target = seconds.clamp(0.0, duration);
        self.current_time = target;
        out.push(MediaCommand::SeekTo(target));
        out
    }

    /// The user released the slider; playback resumes only if it was
    /// playing when the drag began, without requiring a new gesture.
    pub fn end_scrub(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.scrubbing {
            return out;
        }
        self.scrubbing = false;
        if self.resume_after_scrub {
            self.resume_after_scrub = false;
            self.resume_on_reject = Playback::Paused;
            self.playback = Playback::Pending;
            out.push(MediaCommand::Play);
        }
        out
    }

    /// Natural end of track: rewind and restart within the same cycle.
    pub fn ended(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed || !self.unlocked {
            return out;
        }
        self.current_time = 0.0;
        self.resume_on_reject = Playback::Paused;
        self.playback = Playback::Pending;
        out.push(MediaCommand::SeekTo(0.0));
        out.push(MediaCommand::Play);
        out
    }

    /// External control: ensure playback. Acts as the unlock gesture while
    /// locked.
    pub fn play(&mut self) -> Commands {
        if self.destroyed {
            return Commands::new();
        }
        if !self.unlocked {
            return self.gesture();
        }
        match self.playback {
            Playback::Paused | Playback::Inert => self.toggle_play_pause(),
            _ => Commands::new(),
        }
    }

    /// External control: ensure paused.
    pub fn pause(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed {
            return out;
        }
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
            out.push(MediaCommand::Pause);
        }
        out
    }

    /// Volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) -> Commands {
        let mut out = Commands::new();
        if self.destroyed {
            return out;
        }
        self.volume = volume.clamp(0.0, 1.0);
        out.push(MediaCommand::SetVolume(self.volume));
        out
    }

    /// Terminal transition: stop playback; every later event is a no-op.
    /// The frontend unregisters its listeners alongside this call.
    pub fn destroy(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.destroyed {
            return out;
        }
        self.destroyed = true;
        self.playback = Playback::Inert;
        out.push(MediaCommand::Pause);
        out
    }
}

/// One refresh of the progress UI derived from the playback position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliderSync {
    pub max: u64,
    pub value: u64,
    pub label: String,
}

/// Slider range/value and `m:ss / m:ss` label for the current position.
/// While the duration is unknown the label reads a fixed placeholder.
pub fn slider_sync(current_time: f64, duration: Option<f64>) -> SliderSync {
    match duration {
        Some(d) if d.is_finite() => SliderSync {
            max: d.max(0.0).floor() as u64,
            value: current_time.max(0.0).floor() as u64,
            label: format!("{} / {}", format_time(current_time), format_time(d)),
        },
        _ => SliderSync {
            max: 0,
            value: 0,
            label: "0:00 / 0:00".to_owned(),
        },
    }
}

/// Whole seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let sec = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", sec / 60, sec % 60)
}
