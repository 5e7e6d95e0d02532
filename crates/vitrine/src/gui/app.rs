use crate::config::{self, Config};
use crate::events::{AppEvent, CarouselInput, Key, LightboxInput, PlayerInput, Surface, UiEvent};
use crate::gui::carousel::{self, Carousel, Navigation};
use crate::gui::lightbox::Lightbox;
use crate::gui::media::{
    AutoplayPolicy, MediaController, MediaEvent, PlaybackState, PlayerOptions, SimulatedMedia,
    TIME_UPDATE_INTERVAL,
};
use crate::gui::viewport::ResizeDebounce;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::time::Instant;
use vitrinectl::catalog::ItemId;
use vitrinectl::cursor;

type Player = MediaController<SimulatedMedia>;

/// Modal layer on top of the page. While one is open the carousels ignore
/// the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Quote(ItemId),
    Lightbox(ItemId),
}

impl Overlay {
    pub fn is_modal(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Default)]
struct PlaybackSnapshot {
    slots: Vec<Option<(ItemId, PlaybackState)>>,
    lightbox: Option<(ItemId, PlaybackState)>,
}

impl PlaybackSnapshot {
    fn changes_since(&self, before: &Self) -> Vec<UiEvent> {
        let slot_changes = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, entry)| before.slots.get(*i) != Some(*entry))
            .filter_map(|(_, entry)| *entry);
        let lightbox_change = self.lightbox.filter(|entry| before.lightbox != Some(*entry));

        slot_changes
            .chain(lightbox_change)
            .map(|(item, state)| UiEvent::Playback { item, state })
            .collect()
    }
}

/// Every surface on the page, driven by one event loop.
#[derive(Debug)]
pub struct AppModel {
    viewport_width: u32,
    services: Carousel,
    testimonials: Carousel,
    videos: Carousel,
    players: Vec<Player>,
    lightbox: Lightbox<SimulatedMedia>,
    overlay: Overlay,
    resize: ResizeDebounce,
    time_update: Option<Instant>,
    player_options: PlayerOptions,
    autoplay: AutoplayPolicy,
}

impl AppModel {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self::build(config, config.viewport.width, now)
    }

    fn build(config: &Config, viewport_width: u32, now: Instant) -> Self {
        let player_options = config.player.options();
        let autoplay = config.player.autoplay;
        let videos = config.videos.collection();

        let mut model = Self {
            viewport_width,
            services: Carousel::new(
                config.services.collection(),
                config.services.options(),
                viewport_width,
                now,
            ),
            testimonials: Carousel::new(
                config.testimonials.collection(),
                config.testimonials.options(),
                viewport_width,
                now,
            ),
            videos: Carousel::new(
                Arc::clone(&videos),
                config.videos.options(),
                viewport_width,
                now,
            ),
            players: Vec::new(),
            lightbox: Lightbox::new(videos, SimulatedMedia::new(autoplay), player_options),
            overlay: Overlay::None,
            resize: ResizeDebounce::new(config.viewport.resize_debounce()),
            time_update: None,
            player_options,
            autoplay,
        };
        model.sync_players();
        model
    }

    /// Swaps in a new configuration. Old controllers are dropped, which
    /// releases their timers and pauses their players.
    pub fn reload(&mut self, config: &Config, now: Instant) -> Vec<UiEvent> {
        *self = Self::build(config, self.viewport_width, now);
        self.mount_events()
    }

    pub fn carousel(&self, surface: Surface) -> &Carousel {
        match surface {
            Surface::Services => &self.services,
            Surface::Testimonials => &self.testimonials,
            Surface::Videos => &self.videos,
        }
    }

    fn carousel_mut(&mut self, surface: Surface) -> &mut Carousel {
        match surface {
            Surface::Services => &mut self.services,
            Surface::Testimonials => &mut self.testimonials,
            Surface::Videos => &mut self.videos,
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn lightbox(&self) -> &Lightbox<SimulatedMedia> {
        &self.lightbox
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Initial state for the presentation layer: active index or empty flag
    /// per surface.
    pub fn mount_events(&self) -> Vec<UiEvent> {
        Surface::iter()
            .map(|surface| match self.carousel(surface).cursor() {
                Some(index) => UiEvent::Navigate { surface, index },
                None => UiEvent::Empty { surface },
            })
            .collect()
    }

    /// Earliest owned deadline: auto-advance, resize debounce or media clock.
    pub fn next_deadline(&self) -> Option<Instant> {
        Surface::iter()
            .filter_map(|surface| self.carousel(surface).deadline())
            .chain(self.resize.deadline())
            .chain(self.time_update)
            .min()
    }

    pub fn update(&mut self, event: AppEvent, now: Instant) -> Vec<UiEvent> {
        let before = self.playback_snapshot();
        let mut out = Vec::new();

        match event {
            AppEvent::Carousel(surface, input) => self.on_carousel(surface, input, now, &mut out),
            AppEvent::Resize(width) => self.resize.push(width, now),
            AppEvent::Key(key) => self.on_key(key, now, &mut out),
            AppEvent::Quote(index) => self.open_quote(index, &mut out),
            AppEvent::CloseOverlay => self.close_overlay(&mut out),
            AppEvent::Lightbox(input) => self.on_lightbox(input, &mut out),
            AppEvent::Player { slot, input } => self.on_player(slot, input),
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    out.extend(self.reload(&new_config, now));
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }

        self.finish(before, now, &mut out);
        out
    }

    /// Runs whatever deadlines have elapsed by `now`.
    pub fn on_deadline(&mut self, now: Instant) -> Vec<UiEvent> {
        let before = self.playback_snapshot();
        let mut out = Vec::new();

        for surface in Surface::iter() {
            let nav = self.carousel_mut(surface).tick(now);
            self.record(surface, nav, &mut out);
        }

        if let Some(width) = self.resize.take_due(now) {
            self.apply_resize(width);
        }

        if self.time_update.is_some_and(|at| now >= at) {
            self.time_update = None;
            for player in self.players.iter_mut().filter(|p| p.state().is_playing()) {
                player.on_media_event(MediaEvent::TimeUpdate);
            }
            if self.lightbox.player().state().is_playing() {
                self.lightbox.on_media_event(MediaEvent::TimeUpdate);
            }
        }

        self.finish(before, now, &mut out);
        out
    }

    fn on_carousel(
        &mut self,
        surface: Surface,
        input: CarouselInput,
        now: Instant,
        out: &mut Vec<UiEvent>,
    ) {
        let carousel = self.carousel_mut(surface);
        let nav = match input {
            CarouselInput::Next => carousel.next(now),
            CarouselInput::Previous => carousel.previous(now),
            CarouselInput::GoTo(index) => carousel.go_to(index, now),
            CarouselInput::PointerEnter => {
                carousel.pointer_enter(now);
                None
            }
            CarouselInput::PointerLeave => {
                carousel.pointer_leave(now);
                None
            }
            CarouselInput::FocusIn => {
                carousel.focus_in(now);
                None
            }
            CarouselInput::FocusOut => {
                carousel.focus_out(now);
                None
            }
            CarouselInput::Reveal => {
                carousel.reveal(now);
                None
            }
        };
        self.record(surface, nav, out);
    }

    fn on_key(&mut self, key: Key, now: Instant, out: &mut Vec<UiEvent>) {
        if key == Key::Escape {
            if self.overlay.is_modal() {
                self.close_overlay(out);
            }
            return;
        }

        let modal = self.overlay.is_modal();
        if modal {
            log::debug!("key {} suppressed by open overlay", key);
        }
        for surface in Surface::iter() {
            let nav = self.carousel_mut(surface).on_key(key, modal, now);
            self.record(surface, nav, out);
        }
    }

    fn open_quote(&mut self, index: i64, out: &mut Vec<UiEvent>) {
        let Some(item) = cursor::jump_to(index, self.services.len())
            .and_then(|i| self.services.items().get(i))
            .map(|item| item.id)
        else {
            return;
        };
        self.set_overlay(Overlay::Quote(item), out);
    }

    fn on_lightbox(&mut self, input: LightboxInput, out: &mut Vec<UiEvent>) {
        let shown = match input {
            LightboxInput::Open(index) => self.lightbox.open(index),
            LightboxInput::Next => self.lightbox.next(),
            LightboxInput::Previous => self.lightbox.previous(),
            LightboxInput::Close => {
                if matches!(self.overlay, Overlay::Lightbox(_)) {
                    self.close_overlay(out);
                }
                return;
            }
            LightboxInput::Player(control) => {
                if !self.lightbox.control(control) {
                    log::debug!("lightbox closed, ignoring {:?}", control);
                }
                return;
            }
        };
        if let Some(id) = shown.map(|item| item.id) {
            self.set_overlay(Overlay::Lightbox(id), out);
        }
    }

    fn set_overlay(&mut self, overlay: Overlay, out: &mut Vec<UiEvent>) {
        if self.overlay == overlay {
            return;
        }
        if matches!(self.overlay, Overlay::Lightbox(_)) && !matches!(overlay, Overlay::Lightbox(_))
        {
            self.lightbox.close();
        }
        log::debug!("overlay {:?} -> {:?}", self.overlay, overlay);
        self.overlay = overlay.clone();
        out.push(UiEvent::Overlay(overlay));
    }

    fn close_overlay(&mut self, out: &mut Vec<UiEvent>) {
        self.set_overlay(Overlay::None, out);
    }

    fn on_player(&mut self, slot: usize, input: PlayerInput) {
        let Some(player) = self.players.get_mut(slot) else {
            log::warn!("No video player in slot {}", slot);
            return;
        };
        player.apply(input);
    }

    fn record(&mut self, surface: Surface, nav: Option<Navigation>, out: &mut Vec<UiEvent>) {
        let Some(nav) = nav else {
            return;
        };
        log::debug!(
            "{} {} -> {} ({}) {}",
            surface,
            nav.from,
            nav.to,
            nav.cause,
            carousel::render(self.carousel(surface))
        );
        out.push(UiEvent::Navigate {
            surface,
            index: nav.to,
        });
        if surface == Surface::Videos {
            self.sync_players();
        }
    }

    fn apply_resize(&mut self, width: u32) {
        self.viewport_width = width;
        self.services.resize(width);
        self.testimonials.resize(width);
        if self.videos.resize(width) {
            self.sync_players();
        }
        log::debug!("viewport resized to {}px", width);
    }

    /// Gives each visible video card its own player. Slots that scrolled off
    /// are dropped, and a slot showing a different item is rebound (which
    /// resets it).
    fn sync_players(&mut self) {
        let window = self.videos.visible();

        self.players.truncate(window.count);
        while self.players.len() < window.count {
            self.players.push(MediaController::new(
                SimulatedMedia::new(self.autoplay),
                self.player_options,
            ));
        }

        for (player, item) in self.players.iter_mut().zip(window.items) {
            player.bind(item);
        }
    }

    fn playback_snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            slots: self
                .players
                .iter()
                .map(|p| p.item().map(|id| (id, p.state())))
                .collect(),
            lightbox: self
                .lightbox
                .player()
                .item()
                .zip(self.lightbox.playback()),
        }
    }

    fn any_playing(&self) -> bool {
        self.players.iter().any(|p| p.state().is_playing())
            || self.lightbox.player().state().is_playing()
    }

    fn finish(&mut self, before: PlaybackSnapshot, now: Instant, out: &mut Vec<UiEvent>) {
        if self.any_playing() {
            self.time_update.get_or_insert(now + TIME_UPDATE_INTERVAL);
        } else {
            self.time_update = None;
        }
        out.extend(self.playback_snapshot().changes_since(&before));
    }
}
