//! calstat configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::error::{CalstatError, CalstatResult};
use crate::palette::Palette;
use crate::report::{Grouping, RankBy, ReportOptions};

const DEFAULT_DAYS_IN_PAST: u32 = 365;
const DEFAULT_MIN_OCCURRENCES: usize = 5;

fn default_days_in_past() -> u32 {
    DEFAULT_DAYS_IN_PAST
}

fn default_min_occurrences() -> usize {
    DEFAULT_MIN_OCCURRENCES
}

/// Configuration at ~/.config/calstat/config.toml
///
/// Every key can be overridden with a `CALSTAT_` environment variable,
/// e.g. `CALSTAT_DAYS_IN_PAST=30`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalstatConfig {
    /// Google account whose session is used for fetching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_account: Option<String>,

    #[serde(default = "default_days_in_past")]
    pub days_in_past: u32,

    #[serde(default)]
    pub days_in_future: u32,

    /// Groups need strictly more events than this to be reported
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    #[serde(default)]
    pub rank_by: RankBy,

    #[serde(default)]
    pub grouping: Grouping,

    /// Calendar ids to analyze; empty means all calendars
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calendars: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,

    /// Hex colors for group labels; empty uses the built-in palette
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub palette: Vec<String>,
}

impl Default for CalstatConfig {
    fn default() -> Self {
        CalstatConfig {
            google_account: None,
            days_in_past: DEFAULT_DAYS_IN_PAST,
            days_in_future: 0,
            min_occurrences: DEFAULT_MIN_OCCURRENCES,
            rank_by: RankBy::default(),
            grouping: Grouping::default(),
            calendars: Vec::new(),
            categories: Vec::new(),
            palette: Vec::new(),
        }
    }
}

impl CalstatConfig {
    pub fn config_dir() -> CalstatResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| CalstatError::Config("Could not determine config directory".into()))?
            .join("calstat"))
    }

    pub fn config_path() -> CalstatResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the user's config, creating a commented default file on first run.
    pub fn load() -> CalstatResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalstatResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALSTAT"))
            .build()
            .map_err(|e| CalstatError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalstatError::Config(e.to_string()))
    }

    pub fn save(&self) -> CalstatResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> CalstatResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalstatError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalstatError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Remember `account` unless one is already configured.
    /// Returns true if the account was set.
    pub fn set_account_if_unset(&mut self, account: &str) -> CalstatResult<bool> {
        if self.google_account.is_some() {
            return Ok(false);
        }
        self.google_account = Some(account.to_string());
        self.save()?;
        Ok(true)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            min_occurrences: self.min_occurrences,
            rank_by: self.rank_by,
            grouping: self.grouping,
            limit: None,
        }
    }

    pub fn palette(&self) -> CalstatResult<Palette> {
        Palette::from_hex(&self.palette)
    }

    /// Whether the calendar with this id should be analyzed.
    pub fn includes_calendar(&self, calendar_id: &str) -> bool {
        self.calendars.is_empty() || self.calendars.iter().any(|c| c == calendar_id)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalstatResult<()> {
        let contents = format!(
            "\
# calstat configuration

# Google account used for fetching (set by `calstat auth`):
# google_account = \"me@example.com\"

# Time window to analyze:
# days_in_past = {DEFAULT_DAYS_IN_PAST}
# days_in_future = 0

# Only report groups with more events than this:
# min_occurrences = {DEFAULT_MIN_OCCURRENCES}

# Rank groups by \"duration\" or \"count\":
# rank_by = \"duration\"

# Group by \"tokenized\" titles or exact \"summary\":
# grouping = \"tokenized\"

# Only analyze these calendar ids (default: all):
# calendars = [\"primary\"]

# Colors for group labels:
# palette = [\"#3498db\", \"#e67e22\", \"#2ecc71\"]

# Keyword categories for `calstat categories`:
# [[categories]]
# name = \"Academic\"
# keywords = [\"VL\", \"Klausur\"]
# case_sensitive = true
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalstatError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalstatError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
