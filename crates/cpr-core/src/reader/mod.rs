//! Project file reading.
//!
//! A `.cpr` file has no index or schema that can be walked. The reader scans
//! the whole buffer for two literal markers and reads the fields of a record
//! at fixed distances after each marker it finds.
//!
//! ## Algorithm Overview
//!
//! 1. Skip every byte that is not `P`, the first byte of both markers
//! 2. Until metadata has been found, try the `PAppVersion\0` marker
//! 3. Otherwise try the `Plugin UID\0` marker
//! 4. On a match, read the record and resume after its last consumed byte;
//!    on no match, move on by one byte
//!
//! A marker that matches but is followed by malformed fields fails the whole
//! parse. A buffer without a metadata record is not a project.

mod metadata;
mod plugin;
pub mod token;

use crate::error::{Error, ExtractError, Result, TokenError};
use crate::project::Project;
use std::collections::HashSet;
use tracing::{debug, trace};

use metadata::MetadataExtractor;
use plugin::PluginExtractor;

pub use token::{read_token, NulPolicy, Token};

/// First byte of every marker
const MARKER_PREFIX: u8 = b'P';

/// Configuration for the reader
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderConfig {
    /// Treatment of tokens without a NUL terminator
    pub nul_policy: NulPolicy,
}

impl ReaderConfig {
    /// Creates a new reader config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the missing-terminator policy
    pub fn nul_policy(mut self, policy: NulPolicy) -> Self {
        self.nul_policy = policy;
        self
    }
}

/// Position within a project buffer, advanced as fields are read
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    policy: NulPolicy,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8], position: usize, policy: NulPolicy) -> Self {
        Self {
            data,
            position,
            policy,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Skip bytes the reader does not interpret
    pub(crate) fn skip(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Read the token at the cursor without moving
    pub(crate) fn peek_token(&self) -> std::result::Result<Token<'a>, TokenError> {
        read_token(self.data, self.position, self.policy)
    }

    pub(crate) fn advance(&mut self, token: &Token<'_>) {
        self.position += token.consumed;
    }

    pub(crate) fn read_token(&mut self) -> std::result::Result<Token<'a>, TokenError> {
        let token = self.peek_token()?;
        self.advance(&token);
        Ok(token)
    }
}

/// A record introduced by a literal marker
pub(crate) trait Extractor {
    /// Bytes that introduce the record
    const MARKER: &'static [u8];

    /// The record produced
    type Record;

    /// Read the record with the cursor placed just past the marker
    fn extract(cursor: &mut Cursor<'_>) -> std::result::Result<Self::Record, ExtractError>;
}

/// Reads a [`Project`] from the raw bytes of a `.cpr` file
#[derive(Debug, Clone, Default)]
pub struct ProjectReader {
    config: ReaderConfig,
}

impl ProjectReader {
    /// Creates a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Returns the reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Extract the Cubase version and distinct plugins from a project buffer
    pub fn read(&self, data: &[u8]) -> Result<Project> {
        let mut metadata = None;
        let mut plugins = HashSet::new();
        let mut position = 0;

        debug!("Starting read of {} bytes", data.len());

        while position < data.len() {
            if data[position] != MARKER_PREFIX {
                position += 1;
                continue;
            }

            if metadata.is_none() {
                if let Some((found, next)) = self.try_extract::<MetadataExtractor>(data, position)? {
                    trace!("Found metadata at {}: {:?}", position, found);
                    metadata = Some(found);
                    position = next;
                    continue;
                }
            }

            if let Some((found, next)) = self.try_extract::<PluginExtractor>(data, position)? {
                trace!("Found plugin at {}: {} ({})", position, found.name, found.guid);
                plugins.insert(found);
                position = next;
                continue;
            }

            position += 1;
        }

        let metadata = metadata.ok_or(Error::CorruptProject)?;

        debug!(
            "Read complete: {} {} ({}) with {} distinct plugins",
            metadata.application,
            metadata.version,
            metadata.architecture,
            plugins.len()
        );

        Ok(Project { metadata, plugins })
    }

    /// `Ok(None)` when the marker is absent, `Err` when it matched but the
    /// record is malformed
    fn try_extract<E: Extractor>(
        &self,
        data: &[u8],
        position: usize,
    ) -> std::result::Result<Option<(E::Record, usize)>, ExtractError> {
        if !data[position..].starts_with(E::MARKER) {
            return Ok(None);
        }

        let mut cursor = Cursor::new(data, position + E::MARKER.len(), self.config.nul_policy);
        let record = E::extract(&mut cursor)?;
        Ok(Some((record, cursor.position())))
    }
}

/// Read a project buffer with the default configuration
pub fn parse(data: &[u8]) -> Result<Project> {
    ProjectReader::new().read(data)
}

/// Read a project file with the default configuration
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Project> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    ProjectReader::new().read(&data)
}

/// Read a project file with custom configuration
pub fn parse_file_with_config(
    path: impl AsRef<std::path::Path>,
    config: ReaderConfig,
) -> Result<Project> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
    ProjectReader::with_config(config).read(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fixture::{ProjectBuilder, EQ_GUID, SYLENTH_GUID};
    use crate::project::{Metadata, Plugin, UNSPECIFIED_ARCHITECTURE};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sorted(plugins: &HashSet<Plugin>) -> Vec<Plugin> {
        let mut plugins: Vec<Plugin> = plugins.iter().cloned().collect();
        plugins.sort();
        plugins
    }

    fn cubase_13() -> ProjectBuilder {
        ProjectBuilder::new().metadata("Cubase", "Version 13.0.10", "Oct 10 2023", Some("WIN64"))
    }

    #[test]
    fn test_reader_config_builder() {
        let config = ReaderConfig::new().nul_policy(NulPolicy::Strict);
        assert_eq!(config.nul_policy, NulPolicy::Strict);
        assert_eq!(ReaderConfig::default().nul_policy, NulPolicy::Lenient);
    }

    #[test]
    fn test_empty_input() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptProject);
    }

    #[test]
    fn test_no_metadata_marker() {
        let data = ProjectBuilder::new()
            .noise(b"Plenty of P bytes, but no Project metadata")
            .plugin(EQ_GUID, "EQ")
            .build();

        let err = parse(&data).unwrap_err();
        assert!(matches!(err, Error::CorruptProject));
    }

    #[test]
    fn test_read_project() {
        let data = cubase_13()
            .noise(b"\x01\x02PPP\x00")
            .plugin(EQ_GUID, "EQ")
            .noise(b"Pan\x00P")
            .plugin(SYLENTH_GUID, "Sylenth1")
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(
            project.metadata,
            Metadata {
                application: "Cubase".into(),
                version: "13.0.10".into(),
                release_date: "Oct 10 2023".into(),
                architecture: "WIN64".into(),
            }
        );
        assert_eq!(
            sorted(&project.plugins),
            vec![
                Plugin::new(EQ_GUID, "EQ"),
                Plugin::new(SYLENTH_GUID, "Sylenth1"),
            ]
        );
    }

    #[test]
    fn test_metadata_after_plugins() {
        let data = ProjectBuilder::new()
            .plugin(EQ_GUID, "EQ")
            .metadata("Cubase", "Version 7.0.7", "Jan 21 2014", Some("WIN32"))
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.metadata.version, "7.0.7");
        assert!(!project.metadata.is_64_bit());
        assert_eq!(project.plugins.len(), 1);
    }

    #[test]
    fn test_only_first_metadata_is_used() {
        let data = cubase_13()
            .metadata("Cubase", "Version 12.0.70", "Aug 1 2023", Some("WIN64"))
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.metadata.version, "13.0.10");
    }

    #[test]
    fn test_unspecified_architecture() {
        let data = ProjectBuilder::new()
            .metadata("Cubase SX", "Version 3.1.1", "Oct 13 2005", None)
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.metadata.application, "Cubase SX");
        assert_eq!(project.metadata.architecture, UNSPECIFIED_ARCHITECTURE);
        assert!(project.plugins.is_empty());
    }

    #[test]
    fn test_duplicate_plugins_are_collapsed() {
        let data = cubase_13()
            .plugin(EQ_GUID, "EQ")
            .plugin(EQ_GUID, "EQ")
            .plugin(EQ_GUID, "EQ")
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.plugins.len(), 1);
    }

    #[test]
    fn test_same_guid_different_name_kept() {
        let data = cubase_13()
            .plugin(EQ_GUID, "EQ")
            .plugin(EQ_GUID, "Channel EQ")
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.plugins.len(), 2);
    }

    #[test]
    fn test_byte_distinct_names_kept() {
        let data = cubase_13()
            .plugin_with_raw_name(EQ_GUID, b"Caf\xe9")
            .plugin_with_raw_name(EQ_GUID, "Café".as_bytes())
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(project.plugins.len(), 2);
        assert_eq!(
            sorted(&project.plugins),
            vec![
                Plugin::new(EQ_GUID, "Café"),
                Plugin::new(EQ_GUID, b"Caf\xe9".as_slice()),
            ]
        );
    }

    #[test]
    fn test_renamed_track() {
        let data = cubase_13()
            .renamed_plugin(SYLENTH_GUID, "OldTrackTitle", "RealPluginName")
            .build();

        let project = parse(&data).unwrap();
        assert_eq!(
            sorted(&project.plugins),
            vec![Plugin::new(SYLENTH_GUID, "RealPluginName")]
        );
    }

    #[test]
    fn test_false_positive_prefix() {
        let plain = cubase_13().plugin(EQ_GUID, "EQ").build();
        let noisy = cubase_13()
            .noise(b"P")
            .plugin(EQ_GUID, "EQ")
            .noise(b"PAppVersion Plugin UID PAppVersio")
            .build();

        assert_eq!(parse(&plain).unwrap(), parse(&noisy).unwrap());
    }

    #[test]
    fn test_truncated_fields() {
        let cases: [(&[u8], ErrorKind); 7] = [
            (b"Cubase", ErrorKind::NoApplication),
            (b"Version ", ErrorKind::NoVersion),
            (b"Oct 10", ErrorKind::NoReleaseDate),
            (EQ_GUID.as_bytes(), ErrorKind::NoPluginGuid),
            (b"Plugin Name", ErrorKind::NoPluginName),
            (b"Elephant", ErrorKind::NoPluginName),
            (ProjectBuilder::TRAILING_KEY.as_bytes(), ErrorKind::NoTokenAfterPluginName),
        ];

        for (needle, kind) in cases {
            let data = cubase_13().plugin(EQ_GUID, "Elephant").truncate_inside(needle);
            let err = parse(&data).unwrap_err();
            assert_eq!(err.kind(), kind, "truncated inside {:?}", String::from_utf8_lossy(needle));
            assert!(err.to_string().starts_with("the project is corrupted"));
        }
    }

    #[test]
    fn test_missing_trailing_key() {
        let data = cubase_13()
            .plugin(EQ_GUID, "EQ")
            .truncate_end(ProjectBuilder::TRAILING_KEY_LEN);

        let err = parse(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTokenAfterPluginName);
    }

    #[test]
    fn test_nul_policy() {
        let data = ProjectBuilder::new()
            .metadata("Cubase", "Version 4.5.2", "Sep  2 2008", Some("WIN32"))
            .plugin_with_unterminated_name(EQ_GUID, "EQ")
            .build();

        let lenient = parse(&data).unwrap();
        assert_eq!(sorted(&lenient.plugins), vec![Plugin::new(EQ_GUID, "EQ")]);

        let strict = ProjectReader::with_config(ReaderConfig::new().nul_policy(NulPolicy::Strict));
        let err = strict.read(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPluginName);
    }

    #[test]
    fn test_strict_unterminated_metadata() {
        let strict = ProjectReader::with_config(ReaderConfig::new().nul_policy(NulPolicy::Strict));

        let data = cubase_13().unterminate("Cubase").plugin(EQ_GUID, "EQ").build();
        assert_eq!(parse(&data).unwrap().metadata.application, "Cubase");
        let err = strict.read(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoApplication);

        let data = cubase_13().unterminate("WIN64").plugin(EQ_GUID, "EQ").build();
        assert_eq!(parse(&data).unwrap().metadata.architecture, "WIN64");
        let project = strict.read(&data).unwrap();
        assert_eq!(project.metadata.architecture, UNSPECIFIED_ARCHITECTURE);
        assert_eq!(sorted(&project.plugins), vec![Plugin::new(EQ_GUID, "EQ")]);
    }

    #[test]
    fn test_empty_plugin_name() {
        let data = cubase_13().plugin(EQ_GUID, "").build();

        for policy in [NulPolicy::Lenient, NulPolicy::Strict] {
            let reader = ProjectReader::with_config(ReaderConfig::new().nul_policy(policy));
            let project = reader.read(&data).unwrap();
            assert_eq!(sorted(&project.plugins), vec![Plugin::new(EQ_GUID, "")]);
        }
    }

    #[test]
    fn test_read_is_idempotent() {
        let data = cubase_13()
            .plugin(EQ_GUID, "EQ")
            .renamed_plugin(SYLENTH_GUID, "Lead", "Sylenth1")
            .build();

        let reader = ProjectReader::new();
        assert_eq!(reader.read(&data).unwrap(), reader.read(&data).unwrap());
    }

    #[test]
    fn test_parse_file() {
        let err = parse_file("/nonexistent/project.cpr").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileRead);
    }

    #[test]
    fn test_parse_file_with_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Song.cpr");
        let data = ProjectBuilder::new()
            .metadata("Cubase", "Version 4.5.2", "Sep  2 2008", Some("WIN32"))
            .plugin_with_unterminated_name(EQ_GUID, "EQ")
            .build();
        std::fs::write(&path, data).unwrap();

        let project = parse_file_with_config(&path, ReaderConfig::new()).unwrap();
        assert_eq!(project, parse_file(&path).unwrap());
        assert_eq!(sorted(&project.plugins), vec![Plugin::new(EQ_GUID, "EQ")]);

        let strict = ReaderConfig::new().nul_policy(NulPolicy::Strict);
        let err = parse_file_with_config(&path, strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPluginName);

        let err = parse_file_with_config(temp_dir.path().join("Missing.cpr"), strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileRead);
    }
}
