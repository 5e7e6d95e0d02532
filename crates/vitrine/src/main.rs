use tokio::time::Instant;
use vitrine::config;
use vitrine::gui::app::AppModel;
use vitrine::sys::runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_setup();
    let socket =
        std::env::var("VITRINE_SOCKET").unwrap_or_else(|_| vitrinectl::SOCKET_PATH.to_string());

    let (tx, rx) = async_channel::bounded(32);
    let (ui_tx, ui_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(socket, tx.clone())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        tokio::spawn(async move {
            while let Ok(event) = ui_rx.recv().await {
                log::info!("{:?}", event);
            }
        });

        let app = AppModel::new(&config, Instant::now());
        runtime::run_foreground(app, rx, ui_tx).await;
    });

    Ok(())
}
