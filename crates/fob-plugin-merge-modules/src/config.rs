//! Plugin options.
//!
//! Options are layered the same way the Fob CLI layers its configuration:
//! defaults < config file < `FOB_MERGE_MODULES_*` environment variables. Inside a host
//! settings tree the plugin reads the `merge_modules` section.
//!
//! The raw [`MergeModulesConfig`] is resolved into typed [`MergeOptions`]. Resolution
//! failures never abort a conversion: [`MergeOptions::from_settings`] logs the problem
//! and turns the plugin off.

use std::path::Path;

use figment::{
    providers::{Env, Format as _, Json, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::grouping::GroupBy;

/// Key of the plugin section inside the host settings.
pub const SETTINGS_KEY: &str = "merge_modules";

/// Prefix of the environment variables read by the plugin.
pub const ENV_PREFIX: &str = "FOB_MERGE_MODULES_";

/// Raw, unvalidated plugin options as they appear in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeModulesConfig {
    /// `off`, `project` or `module`.
    pub mode: String,

    /// Rename `default` exports to the name of the exported declaration.
    pub rename_defaults: bool,

    /// `name`, `directory` or `pattern`. Only used in `module` mode.
    pub group_by: String,

    /// Number of leading directory components used as the bundle key.
    pub directory_depth: Option<usize>,

    /// Regular expression matched against module names.
    pub pattern: Option<String>,
}

impl Default for MergeModulesConfig {
    fn default() -> Self {
        Self {
            mode: "project".to_string(),
            rename_defaults: true,
            group_by: "name".to_string(),
            directory_depth: None,
            pattern: None,
        }
    }
}

impl MergeModulesConfig {
    /// Build the layered figment for standalone use.
    ///
    /// `path` may point at a `.json` or `.toml` file; anything else is read as TOML.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            figment = if is_json {
                figment.merge(Json::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load options from an optional config file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(path).extract()?)
    }

    /// Extract the plugin section from host settings, filling gaps with defaults.
    pub fn from_settings(settings: &Figment) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(settings.focus(SETTINGS_KEY))
            .merge(Env::prefixed(ENV_PREFIX));
        Ok(figment.extract()?)
    }

    /// Validate the raw options.
    pub fn resolve(&self) -> Result<MergeOptions> {
        let mode = match self.mode.trim().to_ascii_lowercase().as_str() {
            "off" => MergeMode::Off,
            "project" | "whole-project" => MergeMode::Project,
            "module" | "pattern" => MergeMode::Module(self.group_by()?),
            other => return Err(ConfigError::InvalidMode(other.to_string())),
        };

        Ok(MergeOptions {
            mode,
            rename_defaults: self.rename_defaults,
        })
    }

    fn group_by(&self) -> Result<GroupBy> {
        match self.group_by.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(GroupBy::Name),
            "directory" => Ok(GroupBy::Directory {
                depth: self.directory_depth,
            }),
            "pattern" => {
                let pattern = self.pattern.as_deref().ok_or(ConfigError::MissingPattern)?;
                Ok(GroupBy::Pattern(Regex::new(pattern)?))
            }
            other => Err(ConfigError::InvalidGrouping(other.to_string())),
        }
    }
}

/// How modules are merged.
#[derive(Debug, Clone)]
pub enum MergeMode {
    /// Plugin disabled.
    Off,
    /// Every module of the project is merged into one.
    Project,
    /// Modules are bundled by a grouping key and each bundle is merged separately.
    Module(GroupBy),
}

/// Resolved plugin options.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub mode: MergeMode,
    pub rename_defaults: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            mode: MergeMode::Project,
            rename_defaults: true,
        }
    }
}

impl MergeOptions {
    /// Options that disable the plugin.
    pub fn off() -> Self {
        Self {
            mode: MergeMode::Off,
            rename_defaults: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.mode, MergeMode::Off)
    }

    /// Resolve options from host settings.
    ///
    /// Any configuration problem turns the plugin off instead of failing the run.
    pub fn from_settings(settings: &Figment) -> Self {
        match MergeModulesConfig::from_settings(settings).and_then(|config| config.resolve()) {
            Ok(options) => options,
            Err(error) => {
                tracing::warn!("[merge-modules] {error}; module merging is disabled");
                Self::off()
            }
        }
    }
}
