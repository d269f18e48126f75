//! Library settings
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! visible = false
//! timeout = "30 seconds"
//! wait_time = "500 ms"
//! wait_time_after_write = 0
//! img_folder = "screenshots"
//! model = "3279-2-E"
//! output_folder = "results"
//! ```
//!
//! Durations are either a number of seconds or a time string such as
//! `"1 minute 30 seconds"`, `"1.5s"` or `"0:01:30.000"`.

use crate::KeywordError;
use mf3270_emulator::EmulatorConfig;
use mf3270_transport::DEFAULT_MODEL;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Use the windowed emulator (`x3270`/`wc3270`)
    pub visible: bool,
    /// Emulator `Wait` timeout for new connections
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Pause after keywords that send an AID key
    #[serde(deserialize_with = "deserialize_duration")]
    pub wait_time: Duration,
    /// Pause after writing text
    #[serde(deserialize_with = "deserialize_duration")]
    pub wait_time_after_write: Duration,
    /// Screenshot folder, relative to `output_folder`
    pub img_folder: PathBuf,
    /// Default model for new connections
    pub model: String,
    pub output_folder: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            visible: true,
            timeout: Duration::from_secs(30),
            wait_time: Duration::from_millis(500),
            wait_time_after_write: Duration::ZERO,
            img_folder: PathBuf::from("."),
            model: DEFAULT_MODEL.to_string(),
            output_folder: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl LibraryConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, KeywordError> {
        toml::from_str(content).map_err(|e| KeywordError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, KeywordError> {
        let content = fs::read_to_string(path).map_err(|source| KeywordError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Emulator settings for a new connection
    pub fn emulator_config(&self, extra_args: Vec<String>, model: String) -> EmulatorConfig {
        EmulatorConfig::default()
            .with_visible(self.visible)
            .with_timeout(self.timeout)
            .with_extra_args(extra_args)
            .with_model(model)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(f64),
    Text(String),
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(secs) => seconds(secs).map_err(serde::de::Error::custom),
        RawDuration::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

fn seconds(secs: f64) -> Result<Duration, KeywordError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| KeywordError::Config(format!("invalid duration: {secs}")))
}

/// Parse a duration given as seconds, a time string or a timer string.
///
/// Accepted units are days, hours, minutes, seconds and milliseconds in
/// their long and short forms (`2 minutes`, `2 min`, `2m`).
pub fn parse_duration(input: &str) -> Result<Duration, KeywordError> {
    let invalid = || KeywordError::Config(format!("invalid time string '{input}'"));
    let text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = text.parse::<f64>() {
        return seconds(secs).map_err(|_| invalid());
    }
    if text.contains(':') {
        return parse_timer(&text).ok_or_else(invalid);
    }

    let text = text.to_lowercase();
    let mut total = 0.0;
    let mut rest = text.as_str();
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let unit_end = rest[number_end..]
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .map_or(rest.len(), |i| number_end + i);

        let value: f64 = rest[..number_end].parse().map_err(|_| invalid())?;
        let scale = unit_seconds(&rest[number_end..unit_end]).ok_or_else(invalid)?;
        total += value * scale;
        rest = &rest[unit_end..];
    }
    seconds(total).map_err(|_| invalid())
}

fn unit_seconds(unit: &str) -> Option<f64> {
    let scale = match unit {
        "d" | "day" | "days" => 86_400.0,
        "h" | "hour" | "hours" => 3_600.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "ms" | "millis" | "millisecond" | "milliseconds" => 0.001,
        _ => return None,
    };
    Some(scale)
}

/// `hh:mm:ss[.fff]` or `mm:ss[.fff]`
fn parse_timer(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut total = 0.0;
    for part in &parts[..parts.len() - 1] {
        total = total * 60.0 + part.parse::<u64>().ok()? as f64;
    }
    let secs: f64 = parts.last()?.parse().ok()?;
    Duration::try_from_secs_f64(total * 60.0 + secs).ok()
}

/// Render a duration the verbose way, e.g. `1 minute 30 seconds`
pub fn format_duration(duration: Duration) -> String {
    let mut millis = duration.as_millis();
    let mut parts = Vec::new();
    for (unit, size) in [
        ("day", 86_400_000u128),
        ("hour", 3_600_000),
        ("minute", 60_000),
        ("second", 1_000),
        ("millisecond", 1),
    ] {
        let count = millis / size;
        millis %= size;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {unit}{plural}"));
        }
    }
    if parts.is_empty() {
        return "0 seconds".to_string();
    }
    parts.join(" ")
}
