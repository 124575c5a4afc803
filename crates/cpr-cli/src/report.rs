//! Per-project listings and the plugin usage summary.

use crate::config::Config;
use cpr_core::{Plugin, Project};
use owo_colors::{OwoColorize, Style};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

/// Number of projects each plugin appears in
#[derive(Debug, Default)]
pub struct PluginCounts {
    pub bit_32: HashMap<Plugin, usize>,
    pub bit_64: HashMap<Plugin, usize>,
    pub all: HashMap<Plugin, usize>,
}

impl PluginCounts {
    pub fn record(&mut self, plugin: &Plugin, is_64_bit: bool) {
        let by_architecture = if is_64_bit {
            &mut self.bit_64
        } else {
            &mut self.bit_32
        };
        *by_architecture.entry(plugin.clone()).or_default() += 1;
        *self.all.entry(plugin.clone()).or_default() += 1;
    }
}

/// Writes the report for each project and the summaries at the end
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    counts: PluginCounts,
    projects_reported: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            counts: PluginCounts::default(),
            projects_reported: 0,
        }
    }

    pub fn counts(&self) -> &PluginCounts {
        &self.counts
    }

    pub fn projects_reported(&self) -> usize {
        self.projects_reported
    }

    /// List one project's version and non-ignored plugins.
    ///
    /// Returns false when the project is excluded by its architecture.
    pub fn project(&mut self, path: &Path, project: &Project, config: &Config) -> io::Result<bool> {
        let metadata = &project.metadata;
        if !config.should_report(metadata) {
            return Ok(false);
        }
        self.projects_reported += 1;

        let heading = self.heading(&format!("Path: {}", path.display()));
        let version = self.sub_heading(&format!(
            "{} {} ({})",
            metadata.application, metadata.version, metadata.architecture
        ));
        writeln!(self.out)?;
        writeln!(self.out, "{}", heading)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", version)?;

        let plugins: Vec<&Plugin> = project
            .sorted_plugins()
            .into_iter()
            .filter(|plugin| !config.is_plugin_ignored(plugin))
            .collect();
        if plugins.is_empty() {
            return Ok(true);
        }

        writeln!(self.out)?;
        for plugin in plugins {
            self.counts.record(plugin, metadata.is_64_bit());
            writeln!(self.out, "    > {} : {}", plugin.guid, plugin.name)?;
        }

        Ok(true)
    }

    /// Write the 32-bit, 64-bit and combined summaries, skipping empty ones
    pub fn summary(&mut self) -> io::Result<()> {
        let counts = std::mem::take(&mut self.counts);
        self.summary_section(&counts.bit_32, "32-bit")?;
        self.summary_section(&counts.bit_64, "64-bit")?;
        self.summary_section(&counts.all, "All")?;
        self.counts = counts;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn summary_section(&mut self, counts: &HashMap<Plugin, usize>, description: &str) -> io::Result<()> {
        if counts.is_empty() {
            return Ok(());
        }

        let heading = self.heading(&format!("Summary: Plugins Used In {} Projects", description));
        writeln!(self.out)?;
        writeln!(self.out, "{}", heading)?;
        writeln!(self.out)?;

        let mut plugins: Vec<(&Plugin, &usize)> = counts.iter().collect();
        plugins.sort_by(|(a, _), (b, _)| a.cmp_by_name(b));

        for (plugin, count) in plugins {
            writeln!(self.out, "    > {} : {} ({})", plugin.guid, plugin.name, count)?;
        }

        Ok(())
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_white().on_red())
    }

    fn sub_heading(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_blue())
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_owned()
        }
    }
}
