//! Output configuration
//!
//! Every constant that ends up in a generated task file lives here so a
//! project can be retargeted (another subsidiary, another language pair)
//! with a JSON file instead of a rebuild. Missing keys fall back to the
//! defaults below.

use crate::error::{Error, Result};
use crate::warnings::DEFAULT_WARNING_LOG;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder replaced with the series code in the reference URL template
pub const SERIES_CODE_PLACEHOLDER: &str = "{series_code}";

/// Settings for task file generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Project identifier written to the metadata row
    pub anken_id: String,
    /// Duplication management identifier written to the metadata row
    pub duplication_manage_id: String,
    pub department_code: String,
    pub from_subsidiary_code: String,
    pub from_language_code: String,
    pub to_subsidiary_code: String,
    pub to_language_code: String,
    pub translate_status: String,
    /// Value of the `additional_item` column on every data row
    pub additional_item: String,
    /// Reference URL, `{series_code}` is substituted per series
    pub reference_url_template: String,
    /// First task_detail_id of a run
    pub base_task_detail_id: u64,
    /// Output files are named `<file_prefix>_<series_code>.tsv`
    pub file_prefix: String,
    /// Brand code used when a series has no brand entry
    pub default_brand_code: String,
    /// Category code used when a series has no active category entry
    pub default_category_code: String,
    /// Append-only warning log
    pub warning_log: PathBuf,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            anken_id: "ECSI01202509173395".to_string(),
            duplication_manage_id: "DUP1000000215574".to_string(),
            department_code: "el".to_string(),
            from_subsidiary_code: "MJP".to_string(),
            from_language_code: "JPN".to_string(),
            to_subsidiary_code: "COM".to_string(),
            to_language_code: "ENG".to_string(),
            translate_status: "1".to_string(),
            additional_item: "種類".to_string(),
            reference_url_template: format!(
                "https://jp.misumi-ec.com/vona2/detail/{}/",
                SERIES_CODE_PLACEHOLDER
            ),
            base_task_detail_id: 3909817,
            file_prefix: "cistate-test-series-code".to_string(),
            default_brand_code: "MSM1".to_string(),
            default_category_code: "M1803060000".to_string(),
            warning_log: PathBuf::from(DEFAULT_WARNING_LOG),
        }
    }
}

impl FormatConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Load a config file if given, otherwise use the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save the config to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reference URL for a series
    pub fn reference_url(&self, series_code: &str) -> String {
        self.reference_url_template
            .replace(SERIES_CODE_PLACEHOLDER, series_code)
    }

    /// Output file name for a series
    pub fn file_name(&self, series_code: &str) -> String {
        format!("{}_{}.tsv", self.file_prefix, series_code)
    }
}
