//! Daemon configuration: socket path, mock mode, panel hardware knobs.
//!
//! Hardware options load from a TOML file (default
//! `/etc/led-coordinator.toml`). A missing file means defaults; unknown
//! keys warn and are ignored; out-of-range values reject startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Default IPC socket location.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/led-manager.sock";

/// Default hardware config file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/led-coordinator.toml";

/// Environment variable overriding the socket path.
pub const ENV_SOCKET_PATH: &str = "LED_SOCKET_PATH";

/// Environment variable enabling mock mode (truthy: `1`, `true`, `yes`, `on`).
pub const ENV_MOCK_MODE: &str = "LED_MOCK_MODE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config option {key} = {value} out of range ({expected})")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Panel hardware knobs, matching the rpi-led-matrix option surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub matrix_rows: u32,
    pub matrix_cols: u32,
    pub hardware_mapping: String,
    pub gpio_slowdown: u32,
    pub pwm_bits: u32,
    pub brightness: u8,
    pub parallel_chains: u32,
    pub chain_length: u32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            matrix_rows: 64,
            matrix_cols: 64,
            hardware_mapping: "regular".to_owned(),
            gpio_slowdown: 4,
            pwm_bits: 11,
            brightness: 100,
            parallel_chains: 1,
            chain_length: 1,
        }
    }
}

/// Keys [`HardwareConfig::load`] recognizes; anything else warns.
const KNOWN_KEYS: [&str; 8] = [
    "matrix_rows",
    "matrix_cols",
    "hardware_mapping",
    "gpio_slowdown",
    "pwm_bits",
    "brightness",
    "parallel_chains",
    "chain_length",
];

impl HardwareConfig {
    /// Load from a TOML file. Missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no hardware config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = text.parse().map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key, "ignoring unknown config option");
            }
        }
        let config: HardwareConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        fn check(
            ok: bool,
            key: &'static str,
            value: impl ToString,
            expected: &'static str,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    key,
                    value: value.to_string(),
                    expected,
                })
            }
        }

        check(
            matches!(self.hardware_mapping.as_str(), "regular" | "adafruit-hat"),
            "hardware_mapping",
            &self.hardware_mapping,
            "regular or adafruit-hat",
        )?;
        check(self.gpio_slowdown <= 4, "gpio_slowdown", self.gpio_slowdown, "0..=4")?;
        check(
            (1..=11).contains(&self.pwm_bits),
            "pwm_bits",
            self.pwm_bits,
            "1..=11",
        )?;
        check(self.brightness <= 100, "brightness", self.brightness, "0..=100")?;
        check(
            self.parallel_chains >= 1,
            "parallel_chains",
            self.parallel_chains,
            ">= 1",
        )?;
        check(self.chain_length >= 1, "chain_length", self.chain_length, ">= 1")?;
        Ok(())
    }
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub socket_path: PathBuf,
    pub mock_mode: bool,
    pub hardware: HardwareConfig,
}

fn truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl DaemonConfig {
    /// Resolve from CLI values and the environment. CLI wins over env,
    /// env wins over defaults.
    pub fn resolve(
        socket_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
        mock_flag: bool,
    ) -> Result<Self, ConfigError> {
        let socket_path = socket_path
            .or_else(|| std::env::var(ENV_SOCKET_PATH).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH));
        let mock_mode = mock_flag
            || std::env::var(ENV_MOCK_MODE)
                .map(|v| truthy(&v))
                .unwrap_or(false);
        let hardware =
            HardwareConfig::load(&config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)))?;
        Ok(Self {
            socket_path,
            mock_mode,
            hardware,
        })
    }
}
