use std::{env, env::VarError, fs::File, path::PathBuf, time::Duration};

use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "Streamify";
const CONFIG_FILENAME: &str = "config.json";
const PROXY_ENV_VAR: &str = "HTTPS_PROXY";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Bucket of the `/content` response that feeds the hero rotator.
    pub featured_bucket: String,
    pub hero_interval_secs: u64,
    pub avatar_page_size: usize,
    /// External player, the media URL is appended as the last argument.
    pub player_command: Vec<String>,
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.streamhivex.icu".to_string(),
            featured_bucket: "lancamentos".to_string(),
            hero_interval_secs: 5,
            avatar_page_size: 10,
            player_command: vec!["mpv".to_string(), "--really-quiet".to_string()],
            worker_threads: 4,
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(streamify_core::session::SessionStore::FILENAME))
    }

    /// Load `config.json` from the config dir, `None` if it is absent or
    /// unreadable.
    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        let file = File::open(&path).ok()?;
        log::info!("loading config: {:?}", &path);
        match serde_json::from_reader(file) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("failed to read config, using defaults: {}", err);
                None
            }
        }
    }

    pub fn hero_interval(&self) -> Duration {
        Duration::from_secs(self.hero_interval_secs.max(1))
    }

    pub fn proxy() -> Option<String> {
        env::var(PROXY_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => None,
                VarError::NotUnicode(_) => {
                    log::error!("proxy URL is not a valid unicode");
                    None
                }
            },
            Some,
        )
    }
}
