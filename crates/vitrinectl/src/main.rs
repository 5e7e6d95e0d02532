use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;
use vitrinectl::SOCKET_PATH;

#[derive(Parser, Debug)]
#[command(name = "vitrinectl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket the vitrine daemon listens on
    #[arg(short = 's', long, default_value = SOCKET_PATH)]
    socket: String,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Advance a carousel by one item
    Next { surface: String },
    /// Step a carousel back by one item
    Prev { surface: String },
    /// Jump a carousel to an index (wrapped into range)
    Goto {
        surface: String,
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },
    /// Pointer entered a carousel region
    Hover { surface: String },
    /// Pointer left a carousel region
    Leave { surface: String },
    /// Keyboard focus entered a carousel
    Focus { surface: String },
    /// Keyboard focus left a carousel
    Blur { surface: String },
    /// A carousel section scrolled into view
    Reveal { surface: String },
    /// Viewport width changed
    Resize { width: u32 },
    /// Global key press (left, right, escape)
    Key { key: String },
    /// Open the quote popup for a service
    Quote { index: i64 },
    /// Close the active overlay
    Close,
    /// Drive the video lightbox (open <n>, next, prev, close, or a player verb)
    Lightbox {
        #[arg(num_args = 1.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Drive the player in a visible video slot (play, pause, seek <pct>, ...)
    Video {
        slot: usize,
        #[arg(num_args = 1.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Send a raw protocol line
    Send {
        #[arg(num_args = 1.., allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

impl Commands {
    fn to_line(&self) -> String {
        match self {
            Self::Next { surface } => format!("{surface} next"),
            Self::Prev { surface } => format!("{surface} prev"),
            Self::Goto { surface, index } => format!("{surface} goto {index}"),
            Self::Hover { surface } => format!("{surface} hover"),
            Self::Leave { surface } => format!("{surface} leave"),
            Self::Focus { surface } => format!("{surface} focus"),
            Self::Blur { surface } => format!("{surface} blur"),
            Self::Reveal { surface } => format!("{surface} reveal"),
            Self::Resize { width } => format!("resize {width}"),
            Self::Key { key } => format!("key {key}"),
            Self::Quote { index } => format!("quote {index}"),
            Self::Close => "close".to_string(),
            Self::Lightbox { args } => format!("lightbox {}", args.join(" ")),
            Self::Video { slot, args } => format!("video {slot} {}", args.join(" ")),
            Self::Send { line } => line.join(" "),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = cli.command.to_line();
    log::debug!("sending '{}' to {}", line, cli.socket);
    send_line(&cli.socket, &line)
}

fn send_line(socket: &str, line: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to vitrine daemon at {}: {}. Is vitrine running?",
            socket,
            e
        )
    })?;

    writeln!(stream, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_for(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(std::iter::once("vitrinectl").chain(args.iter().copied()))
            .unwrap();
        cli.command.to_line()
    }

    #[test]
    fn test_subcommands_render_protocol_lines() {
        assert_eq!(line_for(&["next", "services"]), "services next");
        assert_eq!(line_for(&["goto", "testimonials", "-2"]), "testimonials goto -2");
        assert_eq!(line_for(&["resize", "500"]), "resize 500");
        assert_eq!(line_for(&["video", "1", "seek", "40"]), "video 1 seek 40");
        assert_eq!(line_for(&["lightbox", "open", "3"]), "lightbox open 3");
        assert_eq!(line_for(&["close"]), "close");
        assert_eq!(line_for(&["focus", "testimonials"]), "testimonials focus");
        assert_eq!(line_for(&["blur", "testimonials"]), "testimonials blur");
        assert_eq!(line_for(&["lightbox", "toggle"]), "lightbox toggle");
    }
}
