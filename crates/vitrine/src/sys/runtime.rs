use crate::events::{AppEvent, UiEvent};
use crate::gui::app::AppModel;
use async_channel::{Receiver, Sender};
use std::thread;
use tokio::runtime::Runtime;
use tokio::time::{Instant, sleep_until};

/// Spawns the socket server and config watcher on their own runtime thread.
pub fn start_background_services(socket_path: String, tx: Sender<AppEvent>) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    thread::Builder::new()
        .name("vitrine-services".into())
        .spawn(move || {
            rt.block_on(async {
                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::sys::server::run_server(&socket_path, tx).await;
                    });
                }

                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::config::run_async_watcher(tx).await;
                    });
                }

                std::future::pending::<()>().await;
            });
        })?;

    Ok(())
}

/// Drives `app` until every event sender is dropped.
///
/// Inbound events and elapsed deadlines are handled strictly one at a time,
/// so no timer ever observes a half-applied update.
pub async fn run_foreground(mut app: AppModel, rx: Receiver<AppEvent>, ui_tx: Sender<UiEvent>) {
    publish(&ui_tx, app.mount_events()).await;

    loop {
        let out = match app.next_deadline() {
            Some(deadline) => tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => app.update(event, Instant::now()),
                    Err(_) => break,
                },
                _ = sleep_until(deadline) => app.on_deadline(Instant::now()),
            },
            None => match rx.recv().await {
                Ok(event) => app.update(event, Instant::now()),
                Err(_) => break,
            },
        };
        publish(&ui_tx, out).await;
    }

    log::info!("Event channel closed, stopping");
}

async fn publish(ui_tx: &Sender<UiEvent>, events: Vec<UiEvent>) {
    for event in events {
        if ui_tx.send(event).await.is_err() {
            log::debug!("No UI listener attached");
            return;
        }
    }
}
