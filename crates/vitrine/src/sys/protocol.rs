use crate::events::{AppEvent, CarouselInput, Key, LightboxInput, PlayerInput, Surface};
use crate::gui::media::MediaEvent;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProtocolError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),
    #[error("Invalid argument {value:?} for {command}")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
    #[error("Unexpected trailing input: {0}")]
    Trailing(String),
}

/// Parses one line of the control socket protocol.
///
/// ```text
/// <surface> next|prev|goto N|hover|leave|focus|blur|reveal
/// resize W | key left|right|escape | quote N | close
/// lightbox open N|next|prev|close|<player verb>
/// video SLOT play|pause|toggle|mute|volume V|seek P|fullscreen|visible R|enter|leave
/// video SLOT event playing|paused|timeupdate|ended
/// ```
pub fn parse_line(line: &str) -> Result<AppEvent, ProtocolError> {
    let mut words = line.split_whitespace();
    let head = words.next().ok_or(ProtocolError::Empty)?;

    let event = match head.to_ascii_lowercase().as_str() {
        "resize" => AppEvent::Resize(arg(&mut words, "resize")?),
        "key" => AppEvent::Key(arg::<Key>(&mut words, "key")?),
        "quote" => AppEvent::Quote(arg(&mut words, "quote")?),
        "close" => AppEvent::CloseOverlay,
        "lightbox" => AppEvent::Lightbox(lightbox(&mut words)?),
        "video" => {
            let slot = arg(&mut words, "video")?;
            AppEvent::Player {
                slot,
                input: player(&mut words)?,
            }
        }
        other => match Surface::from_str(other) {
            Ok(surface) => AppEvent::Carousel(surface, carousel(&mut words)?),
            Err(_) => return Err(ProtocolError::UnknownCommand(head.to_string())),
        },
    };

    let rest: Vec<&str> = words.collect();
    if !rest.is_empty() {
        return Err(ProtocolError::Trailing(rest.join(" ")));
    }
    Ok(event)
}

fn arg<'a, T: FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<T, ProtocolError> {
    let value = words.next().ok_or(ProtocolError::MissingArgument(command))?;
    value.parse().map_err(|_| ProtocolError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

fn verb<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<String, ProtocolError> {
    words
        .next()
        .map(str::to_ascii_lowercase)
        .ok_or(ProtocolError::MissingArgument(command))
}

fn invalid(command: &'static str, value: String) -> ProtocolError {
    ProtocolError::InvalidArgument { command, value }
}

fn carousel<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<CarouselInput, ProtocolError> {
    let verb = verb(words, "carousel")?;
    Ok(match verb.as_str() {
        "next" => CarouselInput::Next,
        "prev" | "previous" => CarouselInput::Previous,
        "goto" => CarouselInput::GoTo(arg(words, "goto")?),
        "hover" | "enter" => CarouselInput::PointerEnter,
        "leave" => CarouselInput::PointerLeave,
        "focus" => CarouselInput::FocusIn,
        "blur" => CarouselInput::FocusOut,
        "reveal" => CarouselInput::Reveal,
        other => return Err(invalid("carousel", other.to_string())),
    })
}

fn lightbox<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<LightboxInput, ProtocolError> {
    let verb = verb(words, "lightbox")?;
    Ok(match verb.as_str() {
        "open" => LightboxInput::Open(arg(words, "open")?),
        "next" => LightboxInput::Next,
        "prev" | "previous" => LightboxInput::Previous,
        "close" => LightboxInput::Close,
        other => LightboxInput::Player(player_verb(other, words, "lightbox")?),
    })
}

fn player<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<PlayerInput, ProtocolError> {
    let verb = verb(words, "video")?;
    player_verb(&verb, words, "video")
}

fn player_verb<'a>(
    verb: &str,
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<PlayerInput, ProtocolError> {
    Ok(match verb {
        "play" => PlayerInput::Play,
        "pause" => PlayerInput::Pause,
        "toggle" => PlayerInput::Toggle,
        "mute" => PlayerInput::Mute,
        "volume" => PlayerInput::Volume(arg(words, "volume")?),
        "seek" => PlayerInput::Seek(arg(words, "seek")?),
        "fullscreen" => PlayerInput::Fullscreen,
        "visible" => PlayerInput::Intersect(arg(words, "visible")?),
        "enter" => PlayerInput::PointerEnter,
        "leave" => PlayerInput::PointerLeave,
        "event" => PlayerInput::Media(media_event(words)?),
        _ => return Err(invalid(command, verb.to_string())),
    })
}

fn media_event<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<MediaEvent, ProtocolError> {
    let name = verb(words, "event")?;
    Ok(match name.as_str() {
        "playing" => MediaEvent::Playing,
        "paused" | "pause" => MediaEvent::Paused,
        "timeupdate" => MediaEvent::TimeUpdate,
        "ended" => MediaEvent::Ended,
        other => return Err(invalid("event", other.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_commands() {
        assert_eq!(
            parse_line("services next"),
            Ok(AppEvent::Carousel(Surface::Services, CarouselInput::Next))
        );
        assert_eq!(
            parse_line("  Testimonials   goto -3 "),
            Ok(AppEvent::Carousel(
                Surface::Testimonials,
                CarouselInput::GoTo(-3)
            ))
        );
        assert_eq!(
            parse_line("showcase blur"),
            Ok(AppEvent::Carousel(Surface::Videos, CarouselInput::FocusOut))
        );
    }

    #[test]
    fn test_page_commands() {
        assert_eq!(parse_line("resize 500"), Ok(AppEvent::Resize(500)));
        assert_eq!(parse_line("key ArrowLeft"), Ok(AppEvent::Key(Key::Left)));
        assert_eq!(parse_line("key esc"), Ok(AppEvent::Key(Key::Escape)));
        assert_eq!(parse_line("quote 2"), Ok(AppEvent::Quote(2)));
        assert_eq!(parse_line("close"), Ok(AppEvent::CloseOverlay));
        assert_eq!(
            parse_line("lightbox open -1"),
            Ok(AppEvent::Lightbox(LightboxInput::Open(-1)))
        );
    }

    #[test]
    fn test_video_commands() {
        assert_eq!(
            parse_line("video 1 seek 42.5"),
            Ok(AppEvent::Player {
                slot: 1,
                input: PlayerInput::Seek(42.5)
            })
        );
        assert_eq!(
            parse_line("video 0 event timeupdate"),
            Ok(AppEvent::Player {
                slot: 0,
                input: PlayerInput::Media(MediaEvent::TimeUpdate)
            })
        );
    }

    #[test]
    fn test_lightbox_player_verbs() {
        assert_eq!(
            parse_line("lightbox toggle"),
            Ok(AppEvent::Lightbox(LightboxInput::Player(PlayerInput::Toggle)))
        );
        assert_eq!(
            parse_line("lightbox volume 0.8"),
            Ok(AppEvent::Lightbox(LightboxInput::Player(
                PlayerInput::Volume(0.8)
            )))
        );
        assert_eq!(
            parse_line("lightbox spin"),
            Err(ProtocolError::InvalidArgument {
                command: "lightbox",
                value: "spin".into()
            })
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_line("   "), Err(ProtocolError::Empty));
        assert_eq!(
            parse_line("launch"),
            Err(ProtocolError::UnknownCommand("launch".into()))
        );
        assert_eq!(
            parse_line("resize"),
            Err(ProtocolError::MissingArgument("resize"))
        );
        assert_eq!(
            parse_line("resize -5"),
            Err(ProtocolError::InvalidArgument {
                command: "resize",
                value: "-5".into()
            })
        );
        assert_eq!(
            parse_line("video 0 rewind"),
            Err(ProtocolError::InvalidArgument {
                command: "video",
                value: "rewind".into()
            })
        );
        assert_eq!(
            parse_line("close now"),
            Err(ProtocolError::Trailing("now".into()))
        );
    }
}
