//! Configuration loaded from a TOML file.

use anyhow::{Context, Result};
use cpr_core::{Metadata, Plugin};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up under `~/.config`
const DEFAULT_CONFIG_FILE: &str = "cubase-project-plugins.toml";

/// Which projects are reported, by architecture
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Projects {
    pub report_32_bit: bool,
    pub report_64_bit: bool,
}

impl Default for Projects {
    fn default() -> Self {
        Self {
            report_32_bit: true,
            report_64_bit: true,
        }
    }
}

/// Plugins left out of the report
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Plugins {
    pub guid_ignores: Vec<String>,
    pub name_ignores: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Glob patterns of project paths to skip
    pub path_ignore_patterns: Vec<String>,
    pub projects: Projects,
    pub plugins: Plugins,
}

impl Config {
    /// `~/.config/cubase-project-plugins.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join(DEFAULT_CONFIG_FILE))
    }

    /// Load the explicit path if given, else the default path if it exists,
    /// else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Unable to open the config file: {}", path.display()))?;
        text.parse::<Self>()
            .with_context(|| format!("Unable to parse the config file: {}", path.display()))
    }

    /// Compile the path ignore patterns
    pub fn path_filter(&self) -> Result<PathFilter> {
        PathFilter::new(&self.path_ignore_patterns)
    }

    /// Ignore entries match the stored bytes exactly
    pub fn is_plugin_ignored(&self, plugin: &Plugin) -> bool {
        self.plugins.guid_ignores.iter().any(|guid| plugin.guid == guid.as_str())
            || self.plugins.name_ignores.iter().any(|name| plugin.name == name.as_str())
    }

    /// Apply the 32-bit and 64-bit reporting toggles
    pub fn should_report(&self, metadata: &Metadata) -> bool {
        if metadata.is_64_bit() {
            self.projects.report_64_bit
        } else {
            self.projects.report_32_bit
        }
    }
}

impl std::str::FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

/// Compiled path ignore patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    set: GlobSet,
}

impl PathFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(&to_slash(pattern))
                .with_context(|| format!("Invalid path ignore pattern: {}", pattern))?;
            builder.add(glob);
        }
        let set = builder.build().context("Unable to compile path ignore patterns")?;
        Ok(Self { set })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.set.is_match(to_slash(&path.to_string_lossy()))
    }
}

/// Normalise separators so patterns behave the same on every platform
fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}
