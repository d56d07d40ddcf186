//! Summary narration player — the pure state machine.
//!
//! All audio I/O lives in `mpv.rs`; this module only decides transitions and
//! emits `PlayerEffect`s for the App to execute. That keeps the lifecycle
//! (including the toggle-to-stop rule) unit-testable without a process.

/// Lifecycle of the single narration resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
}

/// Side effects the App must perform against the mpv backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEffect {
    /// Start streaming `url` from the beginning.
    StartLoad { url: String },
    /// Pause (true) or resume (false) the current resource.
    SetPause(bool),
    /// Jump to an absolute position in seconds.
    Seek(f64),
    /// Tear down the current resource.
    Release,
}

/// Signals coming back from the audio backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The resource buffered enough to start; playback has begun.
    Loaded { duration: f64 },
    TimeUpdate { position: f64 },
    Ended,
    Failed(String),
}

#[derive(Debug)]
pub struct SummaryPlayer {
    state: PlayerState,
    position: f64,
    duration: f64,
}

impl SummaryPlayer {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Idle,
            position: 0.0,
            duration: 0.0,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != PlayerState::Idle
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Elapsed fraction in [0, 1]; 0 until the duration is known.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.duration - self.position).max(0.0)
    }

    /// The play control. From Idle this starts loading `url`; from any active
    /// state it acts as stop, so pressing play twice never yields a second
    /// concurrent resource.
    pub fn play(&mut self, url: &str) -> Vec<PlayerEffect> {
        match self.state {
            PlayerState::Idle => {
                self.state = PlayerState::Loading;
                vec![PlayerEffect::StartLoad {
                    url: url.to_string(),
                }]
            }
            PlayerState::Loading | PlayerState::Playing | PlayerState::Paused => self.stop(),
        }
    }

    /// Flip Playing ⇄ Paused. No-op from Idle or Loading.
    pub fn toggle_pause(&mut self) -> Vec<PlayerEffect> {
        match self.state {
            PlayerState::Playing => {
                self.state = PlayerState::Paused;
                vec![PlayerEffect::SetPause(true)]
            }
            PlayerState::Paused => {
                self.state = PlayerState::Playing;
                vec![PlayerEffect::SetPause(false)]
            }
            PlayerState::Idle | PlayerState::Loading => Vec::new(),
        }
    }

    /// Release the resource and reset every readout to zero.
    pub fn stop(&mut self) -> Vec<PlayerEffect> {
        let was_active = self.is_active();
        self.state = PlayerState::Idle;
        self.position = 0.0;
        self.duration = 0.0;
        if was_active {
            vec![PlayerEffect::Release]
        } else {
            Vec::new()
        }
    }

    /// Map a pointer position on the progress track to an absolute seek.
    /// Meaningless until the duration is known, so Loading/Idle ignore it.
    pub fn seek_fraction(&mut self, fraction: f64) -> Vec<PlayerEffect> {
        match self.state {
            PlayerState::Playing | PlayerState::Paused if self.duration > 0.0 => {
                let target = fraction.clamp(0.0, 1.0) * self.duration;
                self.position = target;
                vec![PlayerEffect::Seek(target)]
            }
            _ => Vec::new(),
        }
    }

    /// Apply a backend signal.
    pub fn on_event(&mut self, event: PlayerEvent) -> Vec<PlayerEffect> {
        match event {
            PlayerEvent::Loaded { duration } => {
                if self.state == PlayerState::Loading {
                    self.state = PlayerState::Playing;
                    self.duration = duration.max(0.0);
                    self.position = 0.0;
                }
                Vec::new()
            }
            PlayerEvent::TimeUpdate { position } => {
                if matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
                    self.position = position.max(0.0);
                }
                Vec::new()
            }
            PlayerEvent::Ended => self.stop(),
            PlayerEvent::Failed(_) => {
                // No automatic retry; the user re-triggers play.
                self.state = PlayerState::Idle;
                self.position = 0.0;
                self.duration = 0.0;
                Vec::new()
            }
        }
    }
}

impl Default for SummaryPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/api/summary/today/audio?id=7";

    fn loaded_player() -> SummaryPlayer {
        let mut p = SummaryPlayer::new();
        let _ = p.play(URL);
        let _ = p.on_event(PlayerEvent::Loaded { duration: 120.0 });
        p
    }

    #[test]
    fn full_lifecycle_ends_idle_and_reset() {
        let mut p = SummaryPlayer::new();

        let fx = p.play(URL);
        assert_eq!(p.state(), PlayerState::Loading);
        assert_eq!(fx, vec![PlayerEffect::StartLoad { url: URL.into() }]);

        let _ = p.on_event(PlayerEvent::Loaded { duration: 120.0 });
        assert_eq!(p.state(), PlayerState::Playing);
        assert_eq!(p.duration(), 120.0);

        assert_eq!(p.toggle_pause(), vec![PlayerEffect::SetPause(true)]);
        assert_eq!(p.state(), PlayerState::Paused);
        assert_eq!(p.toggle_pause(), vec![PlayerEffect::SetPause(false)]);
        assert_eq!(p.state(), PlayerState::Playing);

        let fx = p.stop();
        assert_eq!(fx, vec![PlayerEffect::Release]);
        assert_eq!(p.state(), PlayerState::Idle);
        assert_eq!(p.progress(), 0.0);
        assert_eq!(p.duration(), 0.0);
    }

    #[test]
    fn play_while_active_is_stop() {
        let mut p = loaded_player();
        let fx = p.play(URL);
        assert_eq!(fx, vec![PlayerEffect::Release]);
        assert_eq!(p.state(), PlayerState::Idle);

        // same from Loading
        let _ = p.play(URL);
        assert_eq!(p.state(), PlayerState::Loading);
        let fx = p.play(URL);
        assert_eq!(fx, vec![PlayerEffect::Release]);
        assert_eq!(p.state(), PlayerState::Idle);
    }

    #[test]
    fn pause_is_a_noop_until_playing() {
        let mut p = SummaryPlayer::new();
        assert!(p.toggle_pause().is_empty());
        let _ = p.play(URL);
        assert!(p.toggle_pause().is_empty());
        assert_eq!(p.state(), PlayerState::Loading);
    }

    #[test]
    fn progress_tracks_time_updates() {
        let mut p = loaded_player();
        let _ = p.on_event(PlayerEvent::TimeUpdate { position: 30.0 });
        assert_eq!(p.progress(), 0.25);
        assert_eq!(p.remaining_secs(), 90.0);
        // past-the-end position clamps the fraction
        let _ = p.on_event(PlayerEvent::TimeUpdate { position: 150.0 });
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn seek_maps_fraction_to_seconds_and_clamps() {
        let mut p = loaded_player();
        assert_eq!(p.seek_fraction(0.5), vec![PlayerEffect::Seek(60.0)]);
        assert_eq!(p.seek_fraction(1.7), vec![PlayerEffect::Seek(120.0)]);
        assert_eq!(p.seek_fraction(-0.3), vec![PlayerEffect::Seek(0.0)]);

        // not meaningful while the duration is unknown
        let mut q = SummaryPlayer::new();
        let _ = q.play(URL);
        assert!(q.seek_fraction(0.5).is_empty());
    }

    #[test]
    fn natural_end_behaves_like_stop() {
        let mut p = loaded_player();
        let _ = p.on_event(PlayerEvent::TimeUpdate { position: 119.0 });
        let fx = p.on_event(PlayerEvent::Ended);
        assert_eq!(fx, vec![PlayerEffect::Release]);
        assert_eq!(p.state(), PlayerState::Idle);
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn load_error_returns_to_idle_without_retry() {
        let mut p = SummaryPlayer::new();
        let _ = p.play(URL);
        let fx = p.on_event(PlayerEvent::Failed("403".into()));
        assert!(fx.is_empty());
        assert_eq!(p.state(), PlayerState::Idle);
    }

    #[test]
    fn stale_loaded_signal_after_stop_is_ignored() {
        let mut p = SummaryPlayer::new();
        let _ = p.play(URL);
        let _ = p.stop();
        let _ = p.on_event(PlayerEvent::Loaded { duration: 120.0 });
        assert_eq!(p.state(), PlayerState::Idle);
        assert_eq!(p.duration(), 0.0);
    }
}
