use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ucolor32::UColor32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySetting {
    pub font_name: Box<str>,
    pub font_size: f32,
    pub max_chars: usize,
    pub text_color: UColor32,
    pub background_color: UColor32,
    pub opacity: f32,
}

impl DisplaySetting {
    pub const DEFAULT_FONT_NAME: &str = "Arial";
    pub const DEFAULT_FONT_SIZE: f32 = 32.0;
    pub const DEFAULT_MAX_CHARS: usize = 15;
    pub const DEFAULT_OPACITY: f32 = 0.8;
}

impl Default for DisplaySetting {
    fn default() -> Self {
        Self {
            font_name: Self::DEFAULT_FONT_NAME.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            max_chars: Self::DEFAULT_MAX_CHARS,
            text_color: UColor32::WHITE,
            background_color: UColor32::BLACK,
            opacity: Self::DEFAULT_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSetting {
    pub width: f32,
    pub height: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub bottom_margin: f32,
}

impl WindowSetting {
    pub const DEFAULT_WIDTH: f32 = 400.0;
    pub const DEFAULT_HEIGHT: f32 = 60.0;
    pub const DEFAULT_PADDING_X: f32 = 10.0;
    pub const DEFAULT_PADDING_Y: f32 = 5.0;
    pub const DEFAULT_BOTTOM_MARGIN: f32 = 100.0;
}

impl Default for WindowSetting {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            padding_x: Self::DEFAULT_PADDING_X,
            padding_y: Self::DEFAULT_PADDING_Y,
            bottom_margin: Self::DEFAULT_BOTTOM_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSetting {
    /// milliseconds
    pub update_delay: u64,
    /// milliseconds
    pub topmost_check_interval: u64,
    pub enable_vsync: bool,
}

impl PerformanceSetting {
    pub const DEFAULT_UPDATE_DELAY: u64 = 1;
    pub const DEFAULT_TOPMOST_CHECK_INTERVAL: u64 = 100;
    pub const DEFAULT_ENABLE_VSYNC: bool = true;

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay)
    }

    pub fn topmost_check_interval(&self) -> Duration {
        Duration::from_millis(self.topmost_check_interval)
    }
}

impl Default for PerformanceSetting {
    fn default() -> Self {
        Self {
            update_delay: Self::DEFAULT_UPDATE_DELAY,
            topmost_check_interval: Self::DEFAULT_TOPMOST_CHECK_INTERVAL,
            enable_vsync: Self::DEFAULT_ENABLE_VSYNC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySetting {
    pub enabled: bool,
    pub max_length: usize,
}

impl HistorySetting {
    pub const DEFAULT_MAX_LENGTH: usize = 15;
}

impl Default for HistorySetting {
    fn default() -> Self {
        Self {
            enabled: true,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeSetting {
    pub enabled: bool,
    /// milliseconds between decay ticks
    pub interval: u64,
    /// idle seconds before the fade begins
    pub duration: f32,
    /// opacity decrease per tick
    pub step: f32,
}

impl FadeSetting {
    pub const DEFAULT_INTERVAL: u64 = 100;
    pub const DEFAULT_DURATION: f32 = 3.0;
    pub const DEFAULT_STEP: f32 = 0.05;

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    pub fn idle_duration(&self) -> Duration {
        // the file may hold anything: negatives and NaN clamp to zero,
        // values Duration cannot represent fall back to the default
        Duration::try_from_secs_f32(self.duration.max(0.0))
            .unwrap_or_else(|_| Duration::from_secs_f32(Self::DEFAULT_DURATION))
    }
}

impl Default for FadeSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Self::DEFAULT_INTERVAL,
            duration: Self::DEFAULT_DURATION,
            step: Self::DEFAULT_STEP,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub display: DisplaySetting,
    pub window: WindowSetting,
    pub performance: PerformanceSetting,
    pub history: HistorySetting,
    pub fade_effect: FadeSetting,
}

impl Setting {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, &'static str> {
        let file = std::fs::File::options()
            .read(true)
            .open(path)
            .map_err(|_| "无法读取文件")?;
        let reader = std::io::BufReader::new(&file);
        serde_json::de::from_reader(reader).map_err(|_| "格式错误")
    }

    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), String> {
        let file = std::fs::File::create(path).map_err(|_| "无法写入文件".to_string())?;
        let writer = std::io::BufWriter::new(&file);
        serde_json::ser::to_writer_pretty(writer, &self)
            .map_err(|err| format!("serde_json::ser::to_writer_pretty错误: {err}"))?;
        Ok(())
    }

    /// Loads `config.json`; an absent or broken file silently yields the
    /// defaults, which are written back so the user has something to edit.
    pub fn load_from_local_setting() -> Self {
        let path = crate::key_display_setting_path();
        Self::from_file(&path).unwrap_or_else(|_| {
            let setting = Self::default();
            let _ = setting.to_file(path);
            setting
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip() {
        let setting = Setting::default();
        let json = serde_json::to_string_pretty(&setting).unwrap();
        let parsed: Setting = serde_json::from_str(&json).unwrap();
        assert_eq!(setting, parsed);
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let json = r#"{
            "display": { "font_size": 48.0 },
            "fade_effect": { "duration": 1.5 }
        }"#;
        let setting: Setting = serde_json::from_str(json).unwrap();
        assert_eq!(setting.display.font_size, 48.0);
        assert_eq!(setting.display.max_chars, DisplaySetting::DEFAULT_MAX_CHARS);
        assert_eq!(setting.fade_effect.duration, 1.5);
        assert_eq!(setting.fade_effect.step, FadeSetting::DEFAULT_STEP);
        assert_eq!(setting.history.max_length, HistorySetting::DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn out_of_range_fade_duration_falls_back() {
        // 1e39 overflows f32 into infinity during parsing
        let json = r#"{ "fade_effect": { "duration": 1e39 } }"#;
        let setting: Setting = serde_json::from_str(json).unwrap();
        assert_eq!(
            setting.fade_effect.idle_duration(),
            Duration::from_secs_f32(FadeSetting::DEFAULT_DURATION)
        );
        let negative = FadeSetting {
            duration: -5.0,
            ..FadeSetting::default()
        };
        assert_eq!(negative.idle_duration(), Duration::ZERO);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut setting = Setting::default();
        setting.window.bottom_margin = 42.0;
        setting.to_file(&path).unwrap();
        let loaded = Setting::from_file(&path).unwrap();
        assert_eq!(setting, loaded);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Setting::from_file(dir.path().join("nope.json")).is_err());
    }
}
