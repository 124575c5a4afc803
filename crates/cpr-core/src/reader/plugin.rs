//! Plugin records following the `Plugin UID` marker.
//!
//! ```text
//! [22] guid [3] "Plugin Name" [5] name [3] key ([5] original name)?
//! ```
//!
//! From Cubase 8 on, renaming an instrument track with Shift+Enter stores the
//! track title under `Plugin Name` and moves the real plugin name to an
//! `Original Plugin Name` entry that directly follows it.

use super::{Cursor, Extractor};
use crate::error::ExtractError;
use crate::project::Plugin;

const PLUGIN_NAME_KEY: &str = "Plugin Name";
const ORIGINAL_PLUGIN_NAME_KEY: &str = "Original Plugin Name";

/// Reads one [`Plugin`] record
pub(crate) struct PluginExtractor;

impl Extractor for PluginExtractor {
    const MARKER: &'static [u8] = b"Plugin UID\0";

    type Record = Plugin;

    fn extract(cursor: &mut Cursor<'_>) -> Result<Plugin, ExtractError> {
        cursor.skip(22);
        let offset = cursor.position();
        let guid = cursor
            .read_token()
            .map_err(|source| ExtractError::NoPluginGuid { offset, source })?;

        cursor.skip(3);
        let offset = cursor.position();
        let key = cursor.read_token().map_err(|source| ExtractError::NoPluginName {
            offset,
            source: Some(source),
        })?;
        if !key.is(PLUGIN_NAME_KEY) {
            return Err(ExtractError::NoPluginName {
                offset,
                source: None,
            });
        }

        cursor.skip(5);
        let offset = cursor.position();
        let mut name = cursor.read_token().map_err(|source| ExtractError::NoPluginName {
            offset,
            source: Some(source),
        })?;

        cursor.skip(3);
        let offset = cursor.position();
        let key = cursor
            .peek_token()
            .map_err(|source| ExtractError::NoTokenAfterPluginName { offset, source })?;

        // Any other key starts the next record and is left for the scanner.
        if key.is(ORIGINAL_PLUGIN_NAME_KEY) {
            cursor.advance(&key);
            cursor.skip(5);
            let offset = cursor.position();
            name = cursor
                .read_token()
                .map_err(|source| ExtractError::NoOriginalPluginName { offset, source })?;
        }

        Ok(Plugin {
            guid: guid.to_text(),
            name: name.to_text(),
        })
    }
}
