//! Low-level token reading.
//!
//! Every string field in a project file is stored as a token:
//!
//! - One length byte `n` (0-255)
//! - `n` bytes of text, normally ending in a NUL terminator
//!
//! Projects saved by releases before Cubase 5 do not always write the
//! terminator, in which case the whole `n`-byte range is the text.

use crate::error::TokenError;
use crate::project::Text;

/// How a token without a NUL terminator is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NulPolicy {
    /// Use the whole length-prefixed range as the token text
    #[default]
    Lenient,
    /// Fail with [`TokenError::TokenNulMissing`]
    Strict,
}

/// A token borrowed from the project buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text without the terminator
    pub bytes: &'a [u8],
    /// Bytes consumed including the length byte
    pub consumed: usize,
}

impl Token<'_> {
    /// Returns true if the token text equals `text`
    pub fn is(&self, text: &str) -> bool {
        self.bytes == text.as_bytes()
    }

    /// Copies the token text out of the buffer
    pub fn to_text(&self) -> Text {
        Text::from(self.bytes)
    }
}

/// Read the token whose length byte is at `offset`.
///
/// A zero length byte is an empty token under either policy.
pub fn read_token(data: &[u8], offset: usize, policy: NulPolicy) -> Result<Token<'_>, TokenError> {
    let length = *data
        .get(offset)
        .ok_or(TokenError::LengthBeyondEnd { offset })? as usize;

    let start = offset + 1;
    let body = data
        .get(start..start + length)
        .ok_or(TokenError::TokenBeyondEnd { offset, length })?;

    let bytes = match body.iter().position(|&b| b == 0) {
        Some(nul) => &body[..nul],
        None if body.is_empty() => body,
        None => match policy {
            NulPolicy::Lenient => body,
            NulPolicy::Strict => return Err(TokenError::TokenNulMissing { offset }),
        },
    };

    Ok(Token {
        bytes,
        consumed: length + 1,
    })
}
