use super::timer::AutoAdvance;
use crate::events::Key;
use strum::Display as StrumDisplay;
use tokio::time::{Duration, Instant};
use vitrinectl::catalog::{Collection, Item};
use vitrinectl::cursor;
use vitrinectl::viewport::Breakpoints;

#[derive(Debug, Clone, Default)]
pub struct CarouselOptions {
    pub breakpoints: Breakpoints,
    pub auto_advance: Option<Duration>,
    pub wait_for_reveal: bool,
    pub keyboard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum NavCause {
    Button,
    Keyboard,
    Indicator,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub from: usize,
    pub to: usize,
    pub cause: NavCause,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PauseSources {
    hover: bool,
    focus: bool,
}

impl PauseSources {
    fn any(&self) -> bool {
        self.hover || self.focus
    }
}

#[derive(Debug, Clone, Copy)]
enum PauseSource {
    Hover,
    Focus,
}

/// The slice of the collection currently on screen.
#[derive(Debug, Clone)]
pub struct VisibleWindow<'a> {
    pub count: usize,
    pub items: Vec<&'a Item>,
}

/// Circular carousel over a shared collection.
///
/// The cursor only moves through [`vitrinectl::cursor`], and every manual move
/// re-arms the auto-advance deadline so a pending tick never lands right
/// after user input.
#[derive(Debug)]
pub struct Carousel {
    items: Collection,
    cursor: Option<usize>,
    breakpoints: Breakpoints,
    visible_count: usize,
    keyboard: bool,
    auto: Option<AutoAdvance>,
    pause: PauseSources,
    revealed: bool,
}

impl Carousel {
    pub fn new(
        items: Collection,
        options: CarouselOptions,
        viewport_width: u32,
        now: Instant,
    ) -> Self {
        let cursor = cursor::jump_to(0, items.len());
        let visible_count = options.breakpoints.visible_count(viewport_width);
        let auto = options
            .auto_advance
            .filter(|interval| !interval.is_zero())
            .map(AutoAdvance::new);

        let mut carousel = Self {
            items,
            cursor,
            breakpoints: options.breakpoints,
            visible_count,
            keyboard: options.keyboard,
            auto,
            pause: PauseSources::default(),
            revealed: !options.wait_for_reveal,
        };
        carousel.reschedule(now);
        carousel
    }

    pub fn items(&self) -> &Collection {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Item> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn is_paused(&self) -> bool {
        self.pause.any()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn has_keyboard(&self) -> bool {
        self.keyboard
    }

    /// Whether auto-advance should currently be counting down.
    pub fn is_running(&self) -> bool {
        self.auto.is_some() && self.revealed && !self.pause.any() && !self.is_empty()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.auto.as_ref().and_then(AutoAdvance::deadline)
    }

    pub fn visible(&self) -> VisibleWindow<'_> {
        let items = match self.cursor {
            Some(start) => (0..self.visible_count)
                .filter_map(|offset| cursor::advance(start, offset as i64, self.items.len()))
                .map(|i| &self.items[i])
                .collect(),
            None => Vec::new(),
        };
        VisibleWindow {
            count: items.len(),
            items,
        }
    }

    /// Fill of the position bar, `(cursor + 1) / len` as a percentage.
    pub fn progress_percent(&self) -> f64 {
        match self.cursor {
            Some(i) => (i + 1) as f64 / self.items.len() as f64 * 100.0,
            None => 0.0,
        }
    }

    pub fn next(&mut self, now: Instant) -> Option<Navigation> {
        self.step(1, NavCause::Button, now)
    }

    pub fn previous(&mut self, now: Instant) -> Option<Navigation> {
        self.step(-1, NavCause::Button, now)
    }

    pub fn go_to(&mut self, index: i64, now: Instant) -> Option<Navigation> {
        let target = cursor::jump_to(index, self.items.len());
        self.navigate(target, NavCause::Indicator, now)
    }

    /// Arrow keys navigate unless a modal overlay owns the keyboard.
    pub fn on_key(&mut self, key: Key, modal_active: bool, now: Instant) -> Option<Navigation> {
        if modal_active || !self.keyboard {
            return None;
        }
        match key {
            Key::Left => self.step(-1, NavCause::Keyboard, now),
            Key::Right => self.step(1, NavCause::Keyboard, now),
            Key::Escape => None,
        }
    }

    /// Advances if the auto-advance deadline has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<Navigation> {
        if !self.is_running() {
            return None;
        }
        let due = self.auto.as_mut().is_some_and(|auto| auto.fire(now));
        if !due {
            return None;
        }
        let from = self.cursor?;
        let to = cursor::next(from, self.items.len())?;
        self.cursor = Some(to);
        Some(Navigation {
            from,
            to,
            cause: NavCause::Auto,
        })
    }

    pub fn pointer_enter(&mut self, now: Instant) {
        self.set_paused(PauseSource::Hover, true, now);
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        self.set_paused(PauseSource::Hover, false, now);
    }

    pub fn focus_in(&mut self, now: Instant) {
        self.set_paused(PauseSource::Focus, true, now);
    }

    pub fn focus_out(&mut self, now: Instant) {
        self.set_paused(PauseSource::Focus, false, now);
    }

    /// One-shot: the section scrolled into view for the first time.
    pub fn reveal(&mut self, now: Instant) {
        if !self.revealed {
            self.revealed = true;
            self.reschedule(now);
        }
    }

    /// Recomputes the visible count. Returns `true` if it changed.
    pub fn resize(&mut self, viewport_width: u32) -> bool {
        let count = self.breakpoints.visible_count(viewport_width);
        let changed = count != self.visible_count;
        self.visible_count = count;
        changed
    }

    fn step(&mut self, delta: i64, cause: NavCause, now: Instant) -> Option<Navigation> {
        let target = self
            .cursor
            .and_then(|c| cursor::advance(c, delta, self.items.len()));
        self.navigate(target, cause, now)
    }

    fn navigate(
        &mut self,
        target: Option<usize>,
        cause: NavCause,
        now: Instant,
    ) -> Option<Navigation> {
        let from = self.cursor?;
        let to = target?;
        self.cursor = Some(to);
        self.reschedule(now);
        Some(Navigation { from, to, cause })
    }

    fn set_paused(&mut self, source: PauseSource, paused: bool, now: Instant) {
        let was_paused = self.pause.any();
        let flag = match source {
            PauseSource::Hover => &mut self.pause.hover,
            PauseSource::Focus => &mut self.pause.focus,
        };
        if *flag == paused {
            return;
        }
        *flag = paused;
        if was_paused != self.pause.any() {
            self.reschedule(now);
        }
    }

    fn reschedule(&mut self, now: Instant) {
        let running = self.is_running();
        if let Some(auto) = self.auto.as_mut() {
            if running {
                auto.arm(now);
            } else {
                auto.cancel();
            }
        }
    }
}
