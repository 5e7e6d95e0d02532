use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use tokio::time::Instant;
use vitrinectl::catalog::{MediaRef, MediaUrl};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Playback blocked by autoplay policy")]
    AutoplayBlocked,
    #[error("Unsupported media source: {0}")]
    Unsupported(MediaUrl),
    #[error("No media source loaded")]
    NoSource,
    #[error("Fullscreen request denied")]
    FullscreenDenied,
}

/// The native media element a controller is bound to.
///
/// Element state is ground truth; controllers mirror it and never assume a
/// request succeeded.
pub trait MediaElement {
    fn load(&mut self, source: Option<&MediaRef>);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    /// Seconds, `NaN` or `0.0` until metadata is known.
    fn duration(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn request_fullscreen(&mut self) -> Result<(), PlaybackError>;
    fn exit_fullscreen(&mut self);

    /// Records a user gesture, which unlocks audible playback.
    fn note_user_activation(&mut self) {}
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    #[default]
    Allow,
    /// Unmuted playback needs a prior user gesture, like browsers enforce.
    BlockAudible,
    BlockAll,
}

/// Clock-driven stand-in for a browser video element. Loops at the end.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    source: Option<MediaUrl>,
    duration: f64,
    position: f64,
    playing_since: Option<Instant>,
    muted: bool,
    volume: f64,
    fullscreen: bool,
    policy: AutoplayPolicy,
    activated: bool,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new(AutoplayPolicy::default())
    }
}

impl SimulatedMedia {
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self {
            source: None,
            duration: f64::NAN,
            position: 0.0,
            playing_since: None,
            muted: false,
            volume: 1.0,
            fullscreen: false,
            policy,
            activated: false,
        }
    }

    pub fn source(&self) -> Option<&MediaUrl> {
        self.source.as_ref()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn elapsed(&self) -> f64 {
        self.playing_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn wrap(&self, secs: f64) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            secs.rem_euclid(self.duration)
        } else {
            secs
        }
    }

    fn allowed(&self) -> bool {
        match self.policy {
            AutoplayPolicy::Allow => true,
            AutoplayPolicy::BlockAudible => self.muted || self.activated,
            AutoplayPolicy::BlockAll => self.activated,
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn load(&mut self, source: Option<&MediaRef>) {
        self.playing_since = None;
        self.position = 0.0;
        self.fullscreen = false;
        match source {
            Some(MediaRef::Video { url, duration_secs }) => {
                self.source = Some(url.clone());
                self.duration = duration_secs.unwrap_or(f64::NAN);
            }
            Some(MediaRef::Image(url)) => {
                self.source = Some(url.clone());
                self.duration = f64::NAN;
            }
            None => {
                self.source = None;
                self.duration = f64::NAN;
            }
        }
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let url = self.source.clone().ok_or(PlaybackError::NoSource)?;
        if !self.duration.is_finite() {
            return Err(PlaybackError::Unsupported(url));
        }
        if !self.allowed() {
            return Err(PlaybackError::AutoplayBlocked);
        }
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing_since.is_some() {
            self.position = self.current_time();
            self.playing_since = None;
        }
    }

    fn is_paused(&self) -> bool {
        self.playing_since.is_none()
    }

    fn current_time(&self) -> f64 {
        self.wrap(self.position + self.elapsed())
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_current_time(&mut self, secs: f64) {
        self.position = self.wrap(secs.max(0.0));
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn request_fullscreen(&mut self) -> Result<(), PlaybackError> {
        if !self.activated {
            return Err(PlaybackError::FullscreenDenied);
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    fn note_user_activation(&mut self) {
        self.activated = true;
    }
}
