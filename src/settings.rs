use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
    time::Duration,
};

use crate::api::StreamMode;
use crate::library::SortKey;
use crate::overlay::OverlayStyle;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

const SETTINGS_PATH_ENV: &str = "GARDEN_EYE_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "garden_eye_viewer.json";

pub const DEFAULT_FALLBACK_FPS: f64 = 30.0;
pub const DEFAULT_POLL_HZ: f64 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerSettings {
    pub server_url: String,
    /// Used when the playing track does not report its own frame rate.
    pub fallback_fps: f64,
    /// Redraw rate when the host cannot deliver decoded-frame callbacks.
    pub poll_hz: f64,
    pub default_mode: StreamMode,
    pub default_sort: SortKey,
    pub show_annotations: bool,
    pub overlay: OverlayStyle,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000/".into(),
            fallback_fps: DEFAULT_FALLBACK_FPS,
            poll_hz: DEFAULT_POLL_HZ,
            default_mode: StreamMode::Normal,
            default_sort: SortKey::Latest,
            show_annotations: true,
            overlay: OverlayStyle::default(),
        }
    }
}

impl ViewerSettings {
    pub fn playback(&self) -> PlaybackConfig {
        let fallback_fps = if self.fallback_fps.is_finite() && self.fallback_fps > 0.0 {
            self.fallback_fps
        } else {
            DEFAULT_FALLBACK_FPS
        };
        let poll_hz = if self.poll_hz.is_finite() && self.poll_hz > 0.0 {
            self.poll_hz
        } else {
            DEFAULT_POLL_HZ
        };

        PlaybackConfig {
            fallback_fps,
            poll_interval: Duration::from_secs_f64(1.0 / poll_hz),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub fallback_fps: f64,
    pub poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        ViewerSettings::default().playback()
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ViewerSettings>,
}

impl SettingsStore {
    /// Loads `path` if it exists. Corrupt files fall back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring unreadable settings in {}: {err}", path.display());
                ViewerSettings::default()
            })
        } else {
            ViewerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn viewer(&self) -> ViewerSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: ViewerSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &ViewerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
