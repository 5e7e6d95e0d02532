use crate::events::AppEvent;
use crate::gui::carousel::CarouselOptions;
use crate::gui::media::{AutoplayPolicy, DEFAULT_VOLUME, PlayerOptions, VISIBILITY_THRESHOLD};
use async_channel::{Receiver, Sender};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vitrinectl::catalog::{self, Collection, Item, ServiceRecord, TestimonialRecord, VideoRecord};
use vitrinectl::viewport::Breakpoints;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub resize_debounce_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            resize_debounce_ms: 150,
        }
    }
}

impl ViewportConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub default_volume: f64,
    pub visibility_threshold: f64,
    pub autoplay: AutoplayPolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            visibility_threshold: VISIBILITY_THRESHOLD,
            autoplay: AutoplayPolicy::default(),
        }
    }
}

impl PlayerConfig {
    pub fn options(&self) -> PlayerOptions {
        PlayerOptions {
            default_volume: self.default_volume,
            visibility_threshold: self.visibility_threshold,
        }
    }
}

/// One carousel surface: its behavior plus the records it shows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig<R> {
    pub breakpoints: Breakpoints,
    pub interval_ms: Option<u64>,
    pub wait_for_reveal: bool,
    pub keyboard: bool,
    pub items: Vec<R>,
}

impl<R> Default for SurfaceConfig<R> {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            interval_ms: None,
            wait_for_reveal: false,
            keyboard: false,
            items: Vec::new(),
        }
    }
}

impl<R: Clone + Into<Item>> SurfaceConfig<R> {
    pub fn options(&self) -> CarouselOptions {
        CarouselOptions {
            breakpoints: self.breakpoints.clone(),
            auto_advance: self.interval_ms.map(Duration::from_millis),
            wait_for_reveal: self.wait_for_reveal,
            keyboard: self.keyboard,
        }
    }

    pub fn collection(&self) -> Collection {
        catalog::collect(self.items.iter().cloned())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub services: SurfaceConfig<ServiceRecord>,
    #[serde(default)]
    pub testimonials: SurfaceConfig<TestimonialRecord>,
    #[serde(default)]
    pub videos: SurfaceConfig<VideoRecord>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// The site content shipped with the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "vitrine", "vitrine").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("VITRINE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user config, writing the shipped defaults on first run.
pub fn load_or_setup() -> Config {
    let loaded = write_default_config().and_then(|path| load_config_from(&path));

    match loaded {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using built-in defaults: {}", e);
            Config::embedded().unwrap_or_else(|e| {
                log::error!("Built-in config is invalid: {}", e);
                Config::default()
            })
        }
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Editors write a file in several steps; wait this long for the burst to end.
const RELOAD_QUIET: Duration = Duration::from_millis(200);

type WatchResult = notify::Result<notify::Event>;

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Swallows watcher events until none arrive for `quiet`. Returns how many
/// were absorbed.
async fn settle(rx: &Receiver<WatchResult>, quiet: Duration) -> usize {
    let mut absorbed = 0;
    loop {
        match tokio::time::timeout(quiet, rx.recv()).await {
            Ok(Ok(Ok(_))) => absorbed += 1,
            Ok(Ok(Err(e))) => log::error!("Watch error: {}", e),
            Ok(Err(_)) | Err(_) => return absorbed,
        }
    }
}

/// Watches the config directory and sends one `ConfigReload` per burst of
/// changes to the config file.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded::<WatchResult>();

    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| w.watch(&config_dir, RecursiveMode::NonRecursive).map(|_| w));

    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch {}: {}", config_dir.display(), ConfigError::from(e));
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                let absorbed = settle(&bridge_rx, RELOAD_QUIET).await;
                log::debug!("config changed ({} follow-up events coalesced)", absorbed);
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
