use crate::gui::app::Overlay;
use crate::gui::media::{MediaEvent, PlaybackState};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use vitrinectl::catalog::ItemId;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[strum(to_string = "services", serialize = "service")]
    Services,
    #[strum(to_string = "testimonials", serialize = "testimonial")]
    Testimonials,
    #[strum(to_string = "videos", serialize = "video-carousel", serialize = "showcase")]
    Videos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(to_string = "left", serialize = "arrowleft")]
    Left,
    #[strum(to_string = "right", serialize = "arrowright")]
    Right,
    #[strum(to_string = "escape", serialize = "esc")]
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    Next,
    Previous,
    GoTo(i64),
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    Play,
    Pause,
    Toggle,
    Mute,
    Volume(f64),
    Seek(f64),
    Fullscreen,
    Intersect(f64),
    PointerEnter,
    PointerLeave,
    Media(MediaEvent),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightboxInput {
    Open(i64),
    Next,
    Previous,
    Close,
    Player(PlayerInput),
}

/// Inbound events, produced by the socket server and the config watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Carousel(Surface, CarouselInput),
    Resize(u32),
    Key(Key),
    Quote(i64),
    CloseOverlay,
    Lightbox(LightboxInput),
    Player { slot: usize, input: PlayerInput },
    ConfigReload,
}

/// Outbound events for the presentation layer (active dot, progress fill).
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Navigate { surface: Surface, index: usize },
    Empty { surface: Surface },
    Playback { item: ItemId, state: PlaybackState },
    Overlay(Overlay),
}
