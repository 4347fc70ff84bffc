use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use directories_next::ProjectDirs;
use iced::Theme;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "config.json";
pub const API_URL_ENV: &str = "SCHOOL_ADMIN_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const PAGE_LIMITS: &[u32] = &[5, 10, 20, 50];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme_name: String,
    pub api_base_url: String,
    pub page_limit: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme_name: theme_to_str(&Theme::Light).to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            page_limit: 10,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn theme(&self) -> Theme {
        theme_from_str(&self.theme_name).unwrap_or(Theme::Light)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// `config.json` in the platform config directory, or the working directory when there is none.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "school-admin-console")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Stored config with the `SCHOOL_ADMIN_API_URL` override applied. Never fails:
/// a missing or broken file yields defaults.
pub fn load_config() -> AppConfig {
    let mut config = match read_config(&config_path()) {
        Ok(config) => config,
        Err(err) => {
            debug!("Using default config: {}", err);
            AppConfig::default()
        }
    };
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_base_url = url.trim().to_string();
        }
    }
    config
}

pub fn read_config(path: &PathBuf) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn save_config(config: &AppConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    write_config(&path, config)?;
    Ok(path)
}

pub fn write_config(path: &PathBuf, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|source| {
        warn!("Could not save config to {:?}", path);
        ConfigError::Io { path: path.clone(), source }
    })
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

pub fn theme_to_str(theme: &Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::Dracula => "Dracula",
        Theme::Nord => "Nord",
        Theme::SolarizedLight => "SolarizedLight",
        Theme::SolarizedDark => "SolarizedDark",
        Theme::GruvboxLight => "GruvboxLight",
        Theme::GruvboxDark => "GruvboxDark",
        Theme::CatppuccinLatte => "CatppuccinLatte",
        Theme::CatppuccinFrappe => "CatppuccinFrappe",
        Theme::CatppuccinMacchiato => "CatppuccinMacchiato",
        Theme::CatppuccinMocha => "CatppuccinMocha",
        Theme::TokyoNight => "TokyoNight",
        Theme::TokyoNightStorm => "TokyoNightStorm",
        Theme::TokyoNightLight => "TokyoNightLight",
        Theme::KanagawaWave => "KanagawaWave",
        Theme::KanagawaDragon => "KanagawaDragon",
        Theme::KanagawaLotus => "KanagawaLotus",
        Theme::Moonfly => "Moonfly",
        Theme::Nightfly => "Nightfly",
        Theme::Oxocarbon => "Oxocarbon",
        Theme::Ferra => "Ferra",
        _ => "Unknown",
    }
}
