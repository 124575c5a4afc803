//! Records extracted from a Cubase project.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Architecture reported for projects saved before the field existed
pub const UNSPECIFIED_ARCHITECTURE: &str = "Unspecified";

/// Architecture strings written by 64-bit builds of Cubase
pub const ARCHITECTURES_64_BIT: [&str; 2] = ["WIN64", "MAC64 LE"];

/// Raw token text exactly as stored in the project.
///
/// Equality, hashing and ordering use the bytes, so two byte-distinct names
/// never compare equal. Decoding happens only for display: valid UTF-8 is
/// shown as is, anything else one byte per character (Latin-1).
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Text(Vec<u8>);

impl Text {
    /// Wraps raw token bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The bytes as stored in the project
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the text if the bytes are valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.write_str(text),
            None => self.0.iter().try_for_each(|&b| fmt::Write::write_char(f, char::from(b))),
        }
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => fmt::Debug::fmt(text, f),
            None => write!(f, "b\"{}\"", self.0.escape_ascii()),
        }
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&[u8]> for Text {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// The Cubase build that saved a project
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metadata {
    /// Application name, e.g. `Cubase` or `Cubase SX`
    pub application: Text,
    /// Version with any `Version ` prefix removed, e.g. `13.0.10`
    pub version: Text,
    /// Build date, e.g. `Oct 10 2023`
    pub release_date: Text,
    /// System architecture, or [`UNSPECIFIED_ARCHITECTURE`]
    pub architecture: Text,
}

impl Metadata {
    /// Returns true if the project was saved by a 64-bit build
    pub fn is_64_bit(&self) -> bool {
        ARCHITECTURES_64_BIT
            .iter()
            .any(|architecture| self.architecture == *architecture)
    }

    /// Returns true if the architecture field was absent
    pub fn is_architecture_unspecified(&self) -> bool {
        self.architecture == UNSPECIFIED_ARCHITECTURE
    }
}

/// A plugin referenced by a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Plugin {
    /// 32 hex digit class identifier
    pub guid: Text,
    /// Plugin name
    pub name: Text,
}

impl Plugin {
    /// Creates a new plugin record
    pub fn new(guid: impl Into<Text>, name: impl Into<Text>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
        }
    }

    /// Display order: case-insensitive name, then raw name, then GUID
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name
            .to_string()
            .to_lowercase()
            .cmp(&other.name.to_string().to_lowercase())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.guid.cmp(&other.guid))
    }
}

/// Everything extracted from one project buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Cubase build that saved the project
    pub metadata: Metadata,
    /// Distinct plugins used anywhere in the project
    pub plugins: HashSet<Plugin>,
}

impl Project {
    /// Plugins in [`Plugin::cmp_by_name`] order
    pub fn sorted_plugins(&self) -> Vec<&Plugin> {
        let mut plugins: Vec<&Plugin> = self.plugins.iter().collect();
        plugins.sort_by(|a, b| a.cmp_by_name(b));
        plugins
    }
}
