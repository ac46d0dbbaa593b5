use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Persisted defaults, all optional. CLI flags override these.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub address: Option<u8>,
}

pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tacwave").join("settings.json"))
}

/// Loads settings leniently: a missing or malformed file means defaults.
pub fn load() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    match fs::read_to_string(&path) {
        Ok(text) => parse(&text),
        Err(_) => Settings::default(),
    }
}

pub fn save(settings: &Settings) -> io::Result<()> {
    let Some(path) = settings_path() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no config directory on this platform",
        ));
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    fs::write(&path, text)
}

fn parse(text: &str) -> Settings {
    serde_json::from_str(text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_settings() {
        let settings = parse(r#"{"port": "/dev/ttyUSB0", "baud": 9600, "address": 42}"#);
        assert_eq!(settings.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(settings.baud, Some(9600));
        assert_eq!(settings.address, Some(42));
    }

    #[test]
    fn missing_fields_stay_unset() {
        let settings = parse(r#"{"port": "COM6"}"#);
        assert_eq!(settings.port.as_deref(), Some("COM6"));
        assert_eq!(settings.baud, None);
        assert_eq!(settings.address, None);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        assert_eq!(parse("not json"), Settings::default());
        assert_eq!(parse(""), Settings::default());
    }
}
