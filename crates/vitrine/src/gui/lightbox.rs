use crate::events::PlayerInput;
use crate::gui::media::{MediaController, MediaElement, MediaEvent, PlaybackState, PlayerOptions};
use std::sync::Arc;
use vitrinectl::catalog::{Collection, Item};
use vitrinectl::cursor;

/// Full-screen video viewer opened from the showcase grid.
///
/// Owns one player that is rebound on every navigation; closing it unbinds
/// the player so nothing keeps playing behind the page. Opening counts as a
/// user gesture, so the viewer may start with sound.
#[derive(Debug)]
pub struct Lightbox<E: MediaElement> {
    items: Collection,
    cursor: Option<usize>,
    player: MediaController<E>,
}

impl<E: MediaElement> Lightbox<E> {
    pub fn new(items: Collection, element: E, options: PlayerOptions) -> Self {
        Self {
            items,
            cursor: None,
            player: MediaController::new(element, options),
        }
    }

    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Item> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    pub fn player(&self) -> &MediaController<E> {
        &self.player
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        self.player.on_media_event(event);
    }

    pub fn playback(&self) -> Option<PlaybackState> {
        self.player.item().map(|_| self.player.state())
    }

    /// Forwards a player control while open. Returns whether it was applied.
    pub fn control(&mut self, input: PlayerInput) -> bool {
        if !self.is_open() {
            return false;
        }
        self.player.apply(input);
        true
    }

    /// Opens at `index` (wrapped into range). Returns the shown item.
    pub fn open(&mut self, index: i64) -> Option<&Item> {
        let target = cursor::jump_to(index, self.items.len())?;
        self.player.note_user_activation();
        self.show(target);
        self.current()
    }

    pub fn next(&mut self) -> Option<&Item> {
        self.step(1)
    }

    pub fn previous(&mut self) -> Option<&Item> {
        self.step(-1)
    }

    pub fn close(&mut self) {
        if self.cursor.take().is_some() {
            self.player.unbind();
            self.player.set_intersection(0.0);
        }
    }

    fn step(&mut self, delta: i64) -> Option<&Item> {
        let current = self.cursor?;
        let target = cursor::advance(current, delta, self.items.len())?;
        self.show(target);
        self.current()
    }

    fn show(&mut self, index: usize) {
        self.cursor = Some(index);
        let items = Arc::clone(&self.items);
        // the viewer fills the screen, so it autoplays
        self.player.set_intersection(1.0);
        self.player.bind(&items[index]);
    }
}
