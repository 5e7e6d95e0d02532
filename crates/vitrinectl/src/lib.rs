pub mod catalog;
pub mod cursor;
pub mod macros;
pub mod viewport;

/// Unix socket the daemon listens on for protocol lines.
pub const SOCKET_PATH: &str = "/tmp/vitrine.sock";
