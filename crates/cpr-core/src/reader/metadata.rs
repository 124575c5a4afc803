//! Application metadata following the `PAppVersion` marker.
//!
//! Layout after the marker (gaps are bytes the reader does not model):
//!
//! ```text
//! [9] application [3] version [3] release date [7] architecture?
//! ```

use super::{Cursor, Extractor};
use crate::error::ExtractError;
use crate::project::{Metadata, Text, UNSPECIFIED_ARCHITECTURE};

const VERSION_PREFIX: &[u8] = b"Version ";

/// Reads the single [`Metadata`] record of a project
pub(crate) struct MetadataExtractor;

impl Extractor for MetadataExtractor {
    const MARKER: &'static [u8] = b"PAppVersion\0";

    type Record = Metadata;

    fn extract(cursor: &mut Cursor<'_>) -> Result<Metadata, ExtractError> {
        cursor.skip(9);
        let offset = cursor.position();
        let application = cursor
            .read_token()
            .map_err(|source| ExtractError::NoApplication { offset, source })?;

        cursor.skip(3);
        let offset = cursor.position();
        let version = cursor
            .read_token()
            .map_err(|source| ExtractError::NoVersion { offset, source })?;
        let version = version
            .bytes
            .strip_prefix(VERSION_PREFIX)
            .unwrap_or(version.bytes);

        cursor.skip(3);
        let offset = cursor.position();
        let release_date = cursor
            .read_token()
            .map_err(|source| ExtractError::NoReleaseDate { offset, source })?;

        // Older 32-bit releases stop after the release date; the cursor stays put.
        cursor.skip(7);
        let architecture = match cursor.peek_token() {
            Ok(token) => {
                cursor.advance(&token);
                token.to_text()
            }
            Err(_) => UNSPECIFIED_ARCHITECTURE.into(),
        };

        Ok(Metadata {
            application: application.to_text(),
            version: Text::from(version),
            release_date: release_date.to_text(),
            architecture,
        })
    }
}
