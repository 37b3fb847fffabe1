//! Storefront configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, ValueEnum};
use storefront::branding::{Brand, BrandError};

/// Built-in brand presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BrandPreset {
    /// MA Foods: prepared meals and frozen food.
    MaFoods,

    /// MA Tailor: clothing and stitching.
    MaTailor,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Storefront settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Directory holding the persisted cart, wishlist and orders
    #[arg(
        long,
        env = "STOREFRONT_DATA_DIR",
        default_value = ".storefront",
        global = true
    )]
    pub data_dir: PathBuf,

    /// YAML catalog served by the local catalog provider
    #[arg(
        long,
        env = "STOREFRONT_CATALOG",
        default_value = "fixtures/catalog/ma-foods.yml",
        global = true
    )]
    pub catalog: PathBuf,

    /// Brand YAML file; overrides --brand when set
    #[arg(long, env = "STOREFRONT_BRAND", global = true)]
    pub brand_file: Option<PathBuf>,

    /// Built-in brand preset
    #[arg(long, value_enum, default_value_t = BrandPreset::MaFoods, global = true)]
    pub brand: BrandPreset,

    /// Bound on each catalog or orders request, in milliseconds
    #[arg(
        long,
        env = "STOREFRONT_REQUEST_TIMEOUT_MS",
        default_value_t = 5_000,
        global = true
    )]
    pub request_timeout_ms: u64,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolve the configured brand.
    ///
    /// # Errors
    ///
    /// Returns a [`BrandError`] if the brand file cannot be read or is invalid.
    pub fn brand(&self) -> Result<Brand, BrandError> {
        match &self.brand_file {
            Some(path) => Brand::from_path(path),
            None => Ok(match self.brand {
                BrandPreset::MaFoods => Brand::ma_foods(),
                BrandPreset::MaTailor => Brand::ma_tailor(),
            }),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir.join("orders")
    }
}
