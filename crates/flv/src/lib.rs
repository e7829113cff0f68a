//! A crate for inspecting FLV files.
//!
//! [`FlvParser`] reads an FLV file in two passes: the first one looks for the
//! `onMetaData` script tag, the second one decodes every tag into a
//! [`FlvTag`] with human readable [`TagDetails`]. Audio tags are described
//! with the help of the metadata, so the metadata has to be known before the
//! first audio tag is decoded.
//!
//! ```no_run
//! use flv::FlvFile;
//!
//! let file = FlvFile::open("recording.flv")?;
//! for tag in &file.tags {
//!     println!("{:#010x} {} {}ms", tag.offset, tag.tag_type, tag.timestamp_ms);
//! }
//! # Ok::<(), flv::FlvError>(())
//! ```
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

pub mod audio;
pub mod config;
pub mod details;
pub mod error;
pub mod file;
pub mod header;
pub mod metadata;
pub mod parser;
pub mod script;
pub mod tag;
pub mod video;

#[cfg(test)]
mod test_utils;

pub use config::{ParserConfig, ParserConfigBuilder};
pub use details::{DetailValue, TagDetails};
pub use error::FlvError;
pub use file::FlvFile;
pub use header::FlvHeader;
pub use metadata::Metadata;
pub use parser::FlvParser;
pub use tag::{FlvTag, FlvTagHeader, FlvTagType, StreamKind, TagAnalysis};
