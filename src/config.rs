//! Runtime configuration
//!
//! Loaded once at startup from TOML and passed down explicitly. A config file
//! that exists but cannot be read or parsed is a [`PpiError::ConfigError`];
//! nothing falls back to built-in data silently.
//!
//! ```toml
//! cache_dir = "/var/lib/travel-ppi/cache"
//! window_size = 50
//! min_periods = 5
//!
//! [[destinations]]
//! country = "Japan"
//! currency = "JPY"
//! scale = 100
//!
//! [[destinations]]
//! country = "United Kingdom"
//! currency = "GBP"
//! aliases = ["Britain", "UK"]
//! ```

use crate::currency::CurrencyUnit;
use crate::data::rates::cache::{FetchPolicy, DEFAULT_MAX_ITERATIONS, DEFAULT_PROBE_DELAY_MS};
use crate::data::rates::provider::{
    ProviderConfig, DEFAULT_TIMEOUT_SECS, EXIM_BASE_URL, EXIM_SERVICE_CODE,
};
use crate::error::{PpiError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the rate provider key
pub const API_KEY_ENV: &str = "EXIM_API_KEY";

/// Default moving average window, in business days
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Minimum records before a moving average is reported
pub const DEFAULT_MIN_PERIODS: usize = 5;

/// A destination country and the currency it is priced in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub country: String,
    /// ISO 4217 code
    pub currency: String,
    /// Foreign units per provider quote; defaults per currency when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Other spellings found in price indices
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Destination {
    pub fn new(country: &str, currency: &str) -> Self {
        Self {
            country: country.to_string(),
            currency: currency.to_string(),
            scale: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn unit(&self) -> CurrencyUnit {
        match self.scale {
            Some(scale) => CurrencyUnit::new(self.currency.as_str(), scale),
            None => CurrencyUnit::with_default_scale(self.currency.as_str()),
        }
    }

    /// Whether `name` refers to this destination (case-insensitive)
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.country.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.trim().eq_ignore_ascii_case(name))
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rate provider key; `EXIM_API_KEY` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_service_code")]
    pub service_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_probe_delay_ms")]
    pub probe_delay_ms: u64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_min_periods")]
    pub min_periods: usize,
    /// Merged cost basket file (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_file: Option<PathBuf>,
    /// Directory holding the raw price index CSVs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices_dir: Option<PathBuf>,
    #[serde(default = "default_destinations")]
    pub destinations: Vec<Destination>,
}

fn default_base_url() -> String {
    EXIM_BASE_URL.to_string()
}

fn default_service_code() -> String {
    EXIM_SERVICE_CODE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_probe_delay_ms() -> u64 {
    DEFAULT_PROBE_DELAY_MS
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".travel-ppi")
}

fn default_cache_dir() -> PathBuf {
    default_home_dir().join("cache")
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_min_periods() -> usize {
    DEFAULT_MIN_PERIODS
}

fn default_destinations() -> Vec<Destination> {
    vec![
        Destination::new("Japan", "JPY"),
        Destination::new("United States", "USD"),
        Destination::new("Italy", "EUR"),
        Destination::new("Spain", "EUR"),
        Destination::new("France", "EUR"),
        Destination::new("Indonesia", "IDR"),
        Destination::new("United Kingdom", "GBP").with_aliases(&["Britain", "UK"]),
        Destination::new("Singapore", "SGD"),
        Destination::new("Thailand", "THB"),
        Destination::new("Hong Kong", "HKD").with_aliases(&["Hongkong"]),
        Destination::new("United Arab Emirates", "AED").with_aliases(&["UAE"]),
        Destination::new("Australia", "AUD"),
    ]
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    default_home_dir().join("config.toml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            service_code: default_service_code(),
            timeout_secs: default_timeout_secs(),
            probe_delay_ms: default_probe_delay_ms(),
            max_iterations: default_max_iterations(),
            cache_dir: default_cache_dir(),
            window_size: default_window_size(),
            min_periods: default_min_periods(),
            cost_file: None,
            indices_dir: None,
            destinations: default_destinations(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(config_path) => {
                if !config_path.exists() {
                    return Err(PpiError::ConfigError(format!(
                        "Config file not found: {}",
                        config_path.display()
                    )));
                }
                Self::from_file(config_path)?
            }
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::debug!("No config file at {}, using defaults", default_path.display());
                    Config::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PpiError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| PpiError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PpiError::ConfigError(format!("Failed to render config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(PpiError::ConfigError(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.min_periods == 0 || self.min_periods > self.window_size {
            return Err(PpiError::ConfigError(format!(
                "min_periods must be between 1 and window_size ({}), got {}",
                self.window_size, self.min_periods
            )));
        }
        if self.max_iterations == 0 {
            return Err(PpiError::ConfigError(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.destinations.is_empty() {
            return Err(PpiError::ConfigError(
                "At least one destination is required".to_string(),
            ));
        }
        for dest in &self.destinations {
            if dest.currency.trim().is_empty() {
                return Err(PpiError::ConfigError(format!(
                    "Destination {} has no currency",
                    dest.country
                )));
            }
            if dest.scale == Some(0) {
                return Err(PpiError::ConfigError(format!(
                    "Destination {} has a zero scale",
                    dest.country
                )));
            }
        }
        Ok(())
    }

    /// Provider settings, taking the key from `EXIM_API_KEY` or the config file
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        self.provider_config_with(std::env::var(API_KEY_ENV).ok())
    }

    /// Provider settings with an explicit environment key
    pub fn provider_config_with(&self, env_key: Option<String>) -> Result<ProviderConfig> {
        let api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                PpiError::ConfigError(format!(
                    "API key is not configured. Set {} or api_key in the config file.",
                    API_KEY_ENV
                ))
            })?;

        Ok(ProviderConfig {
            api_key,
            base_url: self.base_url.clone(),
            service_code: self.service_code.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_iterations: self.max_iterations,
            probe_delay: Duration::from_millis(self.probe_delay_ms),
        }
    }

    /// Distinct currency units across destinations, in configuration order
    pub fn currency_units(&self) -> Vec<CurrencyUnit> {
        let mut units: Vec<CurrencyUnit> = Vec::new();
        for dest in &self.destinations {
            let unit = dest.unit();
            if !units.iter().any(|u| u.code == unit.code) {
                units.push(unit);
            }
        }
        units
    }

    /// Unit for an ISO code, falling back to the provider's default scale
    pub fn unit_for(&self, code: &str) -> CurrencyUnit {
        self.destinations
            .iter()
            .map(Destination::unit)
            .find(|u| u.code.eq_ignore_ascii_case(code.trim()))
            .unwrap_or_else(|| CurrencyUnit::with_default_scale(code))
    }

    /// Destination matching a country name or alias
    pub fn destination_for(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.matches(name))
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }
}
