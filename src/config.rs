//! Static configuration: window size, festival calendar, category tables and
//! artifact locations, loaded once from TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ForecastError, Result};
use crate::features::calendar::{DEFAULT_FESTIVAL_DATES, DEFAULT_FESTIVAL_WINDOW_DAYS};
use crate::features::categorical::{DEFAULT_BRANCHES, DEFAULT_MATERIALS};
use crate::features::{CategoryMapping, FeatureAssembler, FestivalCalendar};

/// Time steps per model input when none is configured.
pub const DEFAULT_WINDOW_SIZE: usize = 60;

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_festival_window() -> u32 {
    DEFAULT_FESTIVAL_WINDOW_DAYS
}

fn default_festival_dates() -> Vec<String> {
    DEFAULT_FESTIVAL_DATES.iter().map(|d| d.to_string()).collect()
}

fn enumerate(ids: &[&str]) -> BTreeMap<String, u32> {
    ids.iter()
        .enumerate()
        .map(|(code, id)| (id.to_string(), code as u32))
        .collect()
}

fn default_branches() -> BTreeMap<String, u32> {
    enumerate(&DEFAULT_BRANCHES)
}

fn default_materials() -> BTreeMap<String, u32> {
    enumerate(&DEFAULT_MATERIALS)
}

/// Festival calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FestivalConfig {
    /// Inclusive tolerance in days around each festival date
    #[serde(default = "default_festival_window")]
    pub window_days: u32,

    /// Festival reference dates (`YYYY-MM-DD`)
    #[serde(default = "default_festival_dates")]
    pub dates: Vec<String>,
}

impl Default for FestivalConfig {
    fn default() -> Self {
        Self {
            window_days: default_festival_window(),
            dates: default_festival_dates(),
        }
    }
}

/// Branch and material code tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    #[serde(default = "default_branches")]
    pub branches: BTreeMap<String, u32>,

    #[serde(default = "default_materials")]
    pub materials: BTreeMap<String, u32>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            branches: default_branches(),
            materials: default_materials(),
        }
    }
}

/// Locations of the fitted scaler artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactPaths {
    #[serde(default)]
    pub feature_scaler: Option<PathBuf>,

    #[serde(default)]
    pub target_scaler: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Resolve relative paths against `base`.
    pub fn resolved_against(&self, base: &Path) -> Self {
        let resolve = |p: &Option<PathBuf>| {
            p.as_ref().map(|p| {
                if p.is_relative() {
                    base.join(p)
                } else {
                    p.clone()
                }
            })
        };
        Self {
            feature_scaler: resolve(&self.feature_scaler),
            target_scaler: resolve(&self.target_scaler),
        }
    }
}

/// Process-wide forecasting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Number of historical time steps per model input
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default)]
    pub festival: FestivalConfig,

    #[serde(default)]
    pub categories: CategoryConfig,

    #[serde(default)]
    pub artifacts: ArtifactPaths,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            festival: FestivalConfig::default(),
            categories: CategoryConfig::default(),
            artifacts: ArtifactPaths::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ForecastError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative artifact paths are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ForecastError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.artifacts = config.artifacts.resolved_against(dir);
        }
        info!(
            path = %path.display(),
            window_size = config.window_size,
            branches = config.categories.branches.len(),
            materials = config.categories.materials.len(),
            "loaded forecast configuration"
        );
        Ok(config)
    }

    /// Check every derived structure can be built.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ForecastError::Config(
                "window_size must be at least 1".to_string(),
            ));
        }
        self.festival_calendar()?;
        self.category_mapping()?;
        Ok(())
    }

    /// Festival calendar described by this configuration.
    pub fn festival_calendar(&self) -> Result<FestivalCalendar> {
        FestivalCalendar::from_strings(&self.festival.dates, self.festival.window_days)
            .map_err(|e| ForecastError::Config(format!("festival dates: {e}")))
    }

    /// Category tables described by this configuration.
    pub fn category_mapping(&self) -> Result<CategoryMapping> {
        CategoryMapping::new(
            self.categories.branches.clone(),
            self.categories.materials.clone(),
        )
    }

    /// Feature assembler over this configuration's static tables.
    pub fn assembler(&self) -> Result<FeatureAssembler> {
        Ok(FeatureAssembler::new(
            self.category_mapping()?,
            self.festival_calendar()?,
        ))
    }
}
