use super::element::MediaElement;
use crate::events::PlayerInput;
use super::{DEFAULT_VOLUME, VISIBILITY_THRESHOLD};
use strum::Display as StrumDisplay;
use vitrinectl::catalog::{Item, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Presentation {
    #[default]
    Inline,
    Fullscreen,
}

/// Native element notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Playing,
    Paused,
    TimeUpdate,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub phase: Phase,
    pub muted: bool,
    pub volume: f64,
    pub progress_pct: f64,
    pub visible: bool,
    pub presentation: Presentation,
}

impl PlaybackState {
    fn fresh(volume: f64, muted: bool, visible: bool) -> Self {
        Self {
            phase: Phase::Idle,
            muted,
            volume,
            progress_pct: 0.0,
            visible,
            presentation: Presentation::Inline,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    pub default_volume: f64,
    pub visibility_threshold: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            visibility_threshold: VISIBILITY_THRESHOLD,
        }
    }
}

/// Per-item playback controller.
///
/// Reconciles three inputs: explicit user actions, the viewport visibility
/// policy and native element events. A manual pause while on screen latches
/// until the item leaves the viewport, so the visibility policy cannot undo
/// it. Dropping the controller pauses the element.
#[derive(Debug)]
pub struct MediaController<E: MediaElement> {
    element: E,
    item: Option<ItemId>,
    state: PlaybackState,
    options: PlayerOptions,
    user_paused: bool,
    controls_visible: bool,
}

impl<E: MediaElement> MediaController<E> {
    pub fn new(mut element: E, options: PlayerOptions) -> Self {
        let volume = options.default_volume.clamp(0.0, 1.0);
        element.set_volume(volume);
        let muted = element.muted();
        Self {
            element,
            item: None,
            state: PlaybackState::fresh(volume, muted, false),
            options,
            user_paused: false,
            controls_visible: true,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Binds `item`. A different identity resets all per-item state first.
    pub fn bind(&mut self, item: &Item) {
        if self.item == Some(item.id) {
            return;
        }
        self.reset();
        self.element.load(item.video_source());
        self.item = Some(item.id);
        log::debug!("player bound to item {}", item.id);

        if self.state.visible {
            self.try_play();
        }
    }

    pub fn unbind(&mut self) {
        if self.item.is_none() {
            return;
        }
        self.reset();
        self.element.load(None);
        self.item = None;
    }

    /// Records a user gesture on the element, unlocking audible playback.
    pub fn note_user_activation(&mut self) {
        self.element.note_user_activation();
    }

    /// Routes one control-surface input to the matching action.
    pub fn apply(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Play => self.play(),
            PlayerInput::Pause => self.pause(),
            PlayerInput::Toggle => self.toggle_play(),
            PlayerInput::Mute => self.toggle_mute(),
            PlayerInput::Volume(volume) => self.set_volume(volume),
            PlayerInput::Seek(percent) => self.seek_to_percent(percent),
            PlayerInput::Fullscreen => self.toggle_fullscreen(),
            PlayerInput::Intersect(ratio) => self.set_intersection(ratio),
            PlayerInput::PointerEnter => self.pointer_enter(),
            PlayerInput::PointerLeave => self.pointer_leave(),
            PlayerInput::Media(event) => self.on_media_event(event),
        }
    }

    pub fn play(&mut self) {
        self.element.note_user_activation();
        self.user_paused = false;
        self.try_play();
    }

    pub fn pause(&mut self) {
        if self.state.visible {
            self.user_paused = true;
        }
        self.halt();
    }

    pub fn toggle_play(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Applies the visibility policy for a new intersection ratio.
    pub fn set_intersection(&mut self, ratio: f64) {
        let visible = ratio >= self.options.visibility_threshold;
        if visible == self.state.visible {
            return;
        }
        self.state.visible = visible;
        // leaving or entering the viewport clears a manual pause
        self.user_paused = false;

        if visible {
            self.try_play();
        } else {
            self.halt();
        }
    }

    pub fn is_user_paused(&self) -> bool {
        self.user_paused
    }

    /// Seeks to `percent` of the duration, clamped to `[0, 100]`. No-op until
    /// the duration is known.
    pub fn seek_to_percent(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        let duration = self.element.duration();
        if !(duration.is_finite() && duration > 0.0) {
            return;
        }
        self.element.set_current_time(percent / 100.0 * duration);
        self.state.progress_pct = percent;
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.state.muted;
        self.element.set_muted(muted);
        self.state.muted = self.element.muted();
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.element.set_volume(volume.clamp(0.0, 1.0));
        self.state.volume = self.element.volume();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.element.note_user_activation();
        match self.state.presentation {
            Presentation::Inline => match self.element.request_fullscreen() {
                Ok(()) => self.state.presentation = Presentation::Fullscreen,
                Err(e) => log::debug!("fullscreen refused: {}", e),
            },
            Presentation::Fullscreen => {
                self.element.exit_fullscreen();
                self.state.presentation = Presentation::Inline;
            }
        }
    }

    pub fn pointer_enter(&mut self) {
        self.controls_visible = true;
    }

    pub fn pointer_leave(&mut self) {
        self.controls_visible = !self.state.is_playing();
    }

    /// Resyncs from the element after a native event.
    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Playing => {
                if !self.element.is_paused() {
                    self.state.phase = Phase::Playing;
                }
            }
            MediaEvent::Paused => {
                if self.element.is_paused() && self.state.is_playing() {
                    self.state.phase = Phase::Paused;
                }
            }
            MediaEvent::TimeUpdate => self.refresh_progress(),
            MediaEvent::Ended => {
                self.state.phase = Phase::Idle;
                self.state.progress_pct = 100.0;
            }
        }
    }

    fn refresh_progress(&mut self) {
        let duration = self.element.duration();
        self.state.progress_pct = if duration.is_finite() && duration > 0.0 {
            (self.element.current_time() / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    fn try_play(&mut self) {
        let Some(item) = self.item else {
            return;
        };
        if self.user_paused {
            return;
        }
        match self.element.play() {
            Ok(()) => self.state.phase = Phase::Playing,
            Err(e) => {
                log::debug!("play rejected for item {}: {}", item, e);
                if !self.element.is_paused() {
                    self.element.pause();
                }
                self.state.phase = Phase::Idle;
            }
        }
    }

    fn halt(&mut self) {
        if !self.element.is_paused() {
            self.element.pause();
        }
        if self.state.is_playing() {
            self.state.phase = Phase::Paused;
        }
    }

    fn reset(&mut self) {
        if !self.element.is_paused() {
            self.element.pause();
        }
        if self.state.presentation == Presentation::Fullscreen {
            self.element.exit_fullscreen();
        }
        self.element.set_current_time(0.0);
        let volume = self.options.default_volume.clamp(0.0, 1.0);
        self.element.set_volume(volume);
        self.state = PlaybackState::fresh(volume, self.element.muted(), self.state.visible);
        self.user_paused = false;
    }
}

impl<E: MediaElement> Drop for MediaController<E> {
    fn drop(&mut self) {
        if !self.element.is_paused() {
            self.element.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::media::PlaybackError;
    use vitrinectl::catalog::{self, MediaRef, VideoRecord};

    /// Scriptable element recording what the controller asked of it.
    #[derive(Debug, Default)]
    struct FakeElement {
        loaded: Option<String>,
        paused: bool,
        time: f64,
        duration: f64,
        muted: bool,
        volume: f64,
        reject_play: bool,
        play_calls: usize,
    }

    impl FakeElement {
        fn new(duration: f64) -> Self {
            Self {
                paused: true,
                duration,
                volume: 1.0,
                ..Default::default()
            }
        }
    }

    impl MediaElement for FakeElement {
        fn load(&mut self, source: Option<&MediaRef>) {
            self.loaded = source.map(|s| s.url().to_string());
            self.paused = true;
            self.time = 0.0;
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.play_calls += 1;
            if self.reject_play {
                return Err(PlaybackError::AutoplayBlocked);
            }
            self.paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn set_current_time(&mut self, secs: f64) {
            self.time = secs;
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
            self.volume = volume;
        }
        fn request_fullscreen(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn exit_fullscreen(&mut self) {}
    }

    fn videos() -> Vec<Item> {
        catalog::collect((1..=2).map(|i| VideoRecord {
            id: ItemId::new(i),
            title: format!("Clip {i}").into(),
            video_url: format!("/media/{i}.mp4").into(),
            format: Default::default(),
            category: None,
            client: None,
            duration_secs: Some(20.0),
        }))
        .to_vec()
    }

    fn controller(duration: f64) -> MediaController<FakeElement> {
        MediaController::new(FakeElement::new(duration), PlayerOptions::default())
    }

    #[test]
    fn test_user_play_and_pause() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        assert_eq!(player.state().phase, Phase::Idle);

        player.toggle_play();
        assert_eq!(player.state().phase, Phase::Playing);
        player.toggle_play();
        assert_eq!(player.state().phase, Phase::Paused);
        assert!(player.element().is_paused());
    }

    #[test]
    fn test_rejected_play_falls_back_to_idle() {
        let items = videos();
        let mut element = FakeElement::new(20.0);
        element.reject_play = true;
        let mut player = MediaController::new(element, PlayerOptions::default());
        player.bind(&items[0]);

        player.set_intersection(1.0);
        assert_eq!(player.state().phase, Phase::Idle);
        assert_eq!(player.element().play_calls, 1);

        // the play affordance still works once the element allows it
        player.element.reject_play = false;
        player.play();
        assert_eq!(player.state().phase, Phase::Playing);
    }

    #[test]
    fn test_visibility_policy_plays_and_pauses() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);

        player.set_intersection(0.49);
        assert_eq!(player.state().phase, Phase::Idle);
        player.set_intersection(0.5);
        assert_eq!(player.state().phase, Phase::Playing);
        player.set_intersection(0.1);
        assert_eq!(player.state().phase, Phase::Paused);
        assert!(!player.state().visible);
    }

    #[test]
    fn test_manual_pause_survives_visibility_updates() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.set_intersection(0.9);
        player.pause();
        assert!(player.is_user_paused());

        // still intersecting: the policy must not restart playback
        player.set_intersection(0.8);
        player.set_intersection(1.0);
        assert_eq!(player.state().phase, Phase::Paused);

        // leave and come back: intent is cleared and autoplay resumes
        player.set_intersection(0.0);
        player.set_intersection(1.0);
        assert_eq!(player.state().phase, Phase::Playing);
    }

    #[test]
    fn test_rebinding_resets_progress_and_volume() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.play();
        player.set_volume(0.9);
        player.seek_to_percent(75.0);
        assert_eq!(player.state().progress_pct, 75.0);

        player.bind(&items[1]);
        let state = player.state();
        assert_eq!(state.progress_pct, 0.0);
        assert_eq!(state.volume, DEFAULT_VOLUME);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(player.element().current_time(), 0.0);
        assert_eq!(player.element().loaded.as_deref(), Some("/media/2.mp4"));
    }

    #[test]
    fn test_rebinding_same_item_keeps_state() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.seek_to_percent(40.0);
        player.bind(&items[0]);
        assert_eq!(player.state().progress_pct, 40.0);
    }

    #[test]
    fn test_seek_clamps_percent() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);

        player.seek_to_percent(150.0);
        assert_eq!(player.state().progress_pct, 100.0);
        assert_eq!(player.element().current_time(), 20.0);

        player.seek_to_percent(-10.0);
        assert_eq!(player.state().progress_pct, 0.0);
        assert_eq!(player.element().current_time(), 0.0);
    }

    #[test]
    fn test_seek_without_duration_is_noop() {
        let items = videos();
        for duration in [0.0, f64::NAN] {
            let mut player = controller(duration);
            player.bind(&items[0]);
            player.element.time = 3.0;
            player.seek_to_percent(50.0);
            assert_eq!(player.state().progress_pct, 0.0);
            assert_eq!(player.element().current_time(), 3.0);
        }
    }

    #[test]
    fn test_mute_keeps_volume() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.set_volume(0.8);
        player.play();

        player.toggle_mute();
        assert!(player.state().muted);
        assert_eq!(player.state().volume, 0.8);
        assert_eq!(player.state().phase, Phase::Playing);

        player.toggle_mute();
        assert!(!player.state().muted);
        assert_eq!(player.element().volume(), 0.8);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut player = controller(20.0);
        player.set_volume(3.0);
        assert_eq!(player.state().volume, 1.0);
        player.set_volume(-1.0);
        assert_eq!(player.state().volume, 0.0);
    }

    #[test]
    fn test_time_update_tracks_native_position() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.element.time = 5.0;
        player.on_media_event(MediaEvent::TimeUpdate);
        assert_eq!(player.state().progress_pct, 25.0);
    }

    #[test]
    fn test_native_pause_is_ground_truth() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.play();
        player.element.paused = true;
        player.on_media_event(MediaEvent::Paused);
        assert_eq!(player.state().phase, Phase::Paused);
    }

    #[test]
    fn test_controls_hide_only_while_playing() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.pointer_leave();
        assert!(player.controls_visible());

        player.play();
        player.pointer_leave();
        assert!(!player.controls_visible());
        player.pointer_enter();
        assert!(player.controls_visible());
    }

    #[test]
    fn test_fullscreen_toggle_and_reset() {
        let items = videos();
        let mut player = controller(20.0);
        player.bind(&items[0]);
        player.toggle_fullscreen();
        assert_eq!(player.state().presentation, Presentation::Fullscreen);

        player.bind(&items[1]);
        assert_eq!(player.state().presentation, Presentation::Inline);
    }

    #[test]
    fn test_bind_while_visible_autoplays_new_item() {
        let items = videos();
        let mut player = controller(20.0);
        player.set_intersection(1.0);
        player.bind(&items[0]);
        assert_eq!(player.state().phase, Phase::Playing);
    }
}
