use crate::events::AppEvent;
use crate::sys::protocol;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(socket_path: &str, tx: Sender<AppEvent>) {
    // Stale socket from a previous run
    if std::fs::metadata(socket_path).is_ok() {
        let _ = std::fs::remove_file(socket_path);
    }

    let listener = match UnixListener::bind(socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path, e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    forward_lines(stream, &tx).await;
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Parses each line from `reader` and forwards it. Bad lines are logged and
/// skipped; the connection stays open.
async fn forward_lines<R: AsyncRead + Unpin>(reader: R, tx: &Sender<AppEvent>) {
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match protocol::parse_line(&line) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    log::warn!("Event loop is gone, dropping connection");
                    return;
                }
            }
            Err(e) => log::warn!("Ignoring '{}': {}", line.trim(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CarouselInput, Surface};

    #[tokio::test]
    async fn test_forward_skips_bad_lines() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"services next\nfly away\n\nresize 640\n";

        forward_lines(input, &tx).await;

        assert_eq!(
            rx.recv().await,
            Ok(AppEvent::Carousel(Surface::Services, CarouselInput::Next))
        );
        assert_eq!(rx.recv().await, Ok(AppEvent::Resize(640)));
        assert!(rx.is_empty());
    }
}
