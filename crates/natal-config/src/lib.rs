use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `[ephemeris] data_path`.
pub use natal::ephemeris::EPHEMERIS_PATH_ENV;

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["configs/natal.toml", "../../configs/natal.toml"];

#[derive(Debug, Clone, PartialEq)]
pub struct NatalSettings {
    pub ephemeris_path: PathBuf,
    pub timezone_label: String,
    pub utc_offset_minutes: i32,
    pub gazetteer_path: Option<PathBuf>,
    pub interpreter: Option<InterpreterSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterSettings {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct EphemerisToml {
    data_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct TimezoneToml {
    #[serde(default = "default_timezone_label")]
    label: String,
    #[serde(default = "default_utc_offset_minutes")]
    utc_offset_minutes: i32,
}

impl Default for TimezoneToml {
    fn default() -> Self {
        Self {
            label: default_timezone_label(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

fn default_timezone_label() -> String {
    "Asia/Tokyo".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    540
}

#[derive(Debug, Clone, Deserialize)]
struct GeocoderToml {
    #[serde(default)]
    gazetteer_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct InterpreterToml {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    ephemeris: Option<EphemerisToml>,
    #[serde(default)]
    timezone: TimezoneToml,
    #[serde(default)]
    geocoder: Option<GeocoderToml>,
    #[serde(default)]
    interpreter: Option<InterpreterToml>,
}

/// Read `natal.toml` from `explicit`, or try the common relative paths.
/// Returns the path that was read along with its text.
pub fn read_natal_toml_text(explicit: Option<&Path>) -> anyhow::Result<(PathBuf, String)> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read {}: {e}", path.display()))?;
        return Ok((path.to_path_buf(), text));
    }
    for p in &DEFAULT_CONFIG_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok((PathBuf::from(p), c));
        }
    }
    anyhow::bail!("Could not load natal.toml from {:?}", DEFAULT_CONFIG_PATHS);
}

/// Parse settings. Relative paths are taken relative to `base_dir`, normally
/// the directory holding the config file.
pub fn parse_natal_settings(text: &str, base_dir: &Path) -> anyhow::Result<NatalSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse natal.toml: {e}"))?;
    let ephemeris = root
        .ephemeris
        .ok_or_else(|| anyhow::anyhow!("Missing [ephemeris] config in natal.toml (needs data_path)"))?;

    let TimezoneToml {
        label,
        utc_offset_minutes,
    } = root.timezone;
    if utc_offset_minutes.abs() >= 24 * 60 {
        anyhow::bail!("timezone.utc_offset_minutes must be within +/-1439, got {utc_offset_minutes}");
    }

    let interpreter = match root.interpreter {
        Some(cfg) => {
            if cfg.command.trim().is_empty() {
                anyhow::bail!("interpreter.command must not be empty");
            }
            if cfg.timeout_secs == 0 {
                anyhow::bail!("interpreter.timeout_secs must be positive");
            }
            Some(InterpreterSettings {
                command: cfg.command,
                args: cfg.args,
                timeout_secs: cfg.timeout_secs,
            })
        }
        None => None,
    };

    Ok(NatalSettings {
        ephemeris_path: resolve(base_dir, ephemeris.data_path),
        timezone_label: label,
        utc_offset_minutes,
        gazetteer_path: root
            .geocoder
            .and_then(|g| g.gazetteer_path)
            .map(|p| resolve(base_dir, p)),
        interpreter,
    })
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    }
}

impl NatalSettings {
    /// Replace the ephemeris path when an override is given.
    pub fn with_ephemeris_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.ephemeris_path = path;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.ephemeris_path.exists() {
            anyhow::bail!(
                "ephemeris.data_path does not exist: {}",
                self.ephemeris_path.display()
            );
        }
        if let Some(path) = &self.gazetteer_path {
            if !path.exists() {
                anyhow::bail!("geocoder.gazetteer_path does not exist: {}", path.display());
            }
        }
        Ok(())
    }
}

/// Load, apply `NATAL_EPHEMERIS_PATH`, and validate.
pub fn load_natal_settings(explicit: Option<&Path>) -> anyhow::Result<NatalSettings> {
    let (path, text) = read_natal_toml_text(explicit)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let settings = parse_natal_settings(&text, base_dir)?
        .with_ephemeris_override(env::var_os(EPHEMERIS_PATH_ENV).map(PathBuf::from));
    settings.validate()?;
    Ok(settings)
}
