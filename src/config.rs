use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::qa::QaConfig;
use crate::schema::SiteProfile;

/// Runtime settings, layered from an optional `geo.toml` and `GEO_*`
/// environment variables over the built-in defaults.
///
/// Nested keys use a double underscore, e.g. `GEO_QA__MAX_QA_PAIRS=6` or
/// `GEO_SITE__BASE_URL=https://example.org`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub qa: QaConfig,
    pub site: SiteProfile,
    /// Minimum overall score for an article to pass `check`.
    pub min_score: i32,
    pub dictionary: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            qa: QaConfig::default(),
            site: SiteProfile::default(),
            min_score: 70,
            dictionary: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from("geo")
    }

    /// Load with `file_stem` as the optional config file (any format the
    /// `config` crate understands).
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("GEO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
