//! # cpr-core
//!
//! A library for finding out which Cubase build saved a project and which
//! plugins the project uses, read straight from the binary `.cpr` file.
//!
//! The project format is undocumented and has changed across many Cubase
//! releases, so the reader does not try to model it. It scans for two literal
//! markers and reads length-prefixed string tokens at fixed distances after
//! each one.
//!
//! ## Architecture
//!
//! - [`reader`]: Marker scanning, record extraction and token reading
//! - [`project`]: The extracted records
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use cpr_core::ProjectReader;
//! use std::fs;
//!
//! let data = fs::read("Example Project.cpr")?;
//! let project = ProjectReader::new().read(&data)?;
//!
//! println!("{} {}", project.metadata.application, project.metadata.version);
//! for plugin in project.sorted_plugins() {
//!     println!("{} : {}", plugin.guid, plugin.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod project;
pub mod reader;

#[cfg(test)]
mod fixture;

// Re-export primary types for convenience
pub use error::{Error, ErrorKind, ExtractError, Result, TokenError};
pub use project::{Metadata, Plugin, Project, Text, ARCHITECTURES_64_BIT, UNSPECIFIED_ARCHITECTURE};
pub use reader::{parse, parse_file, parse_file_with_config, NulPolicy, ProjectReader, ReaderConfig};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
