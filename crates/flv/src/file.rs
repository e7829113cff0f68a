use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::config::ParserConfig;
use crate::error::FlvError;
use crate::header::FlvHeader;
use crate::metadata::Metadata;
use crate::parser::FlvParser;
use crate::tag::FlvTag;

/// An FLV file is a combination of a [`FlvHeader`] followed by the
/// `FLVFileBody` (which is just a series of [`FlvTag`]s)
///
/// The `FLVFileBody` is defined by:
/// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Page 8)
/// - video_file_format_spec_v10_1.pdf (Annex E.3 - The FLV File Body)
///
/// `metadata` holds the properties of the first `onMetaData` script tag, or
/// nothing if the file has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlvFile {
    pub header: FlvHeader,
    pub metadata: Metadata,
    pub tags: Vec<FlvTag>,
}

impl FlvFile {
    /// Opens and parses the file at `path` with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FlvError> {
        Self::open_with_config(path, ParserConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self, FlvError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let parsed = FlvParser::with_config(BufReader::new(file), config).parse()?;
        info!(
            "Parsed {} tags from {}",
            parsed.tags.len(),
            path.display()
        );
        Ok(parsed)
    }

    /// Parses an FLV file held in memory.
    pub fn from_bytes(bytes: Bytes) -> Result<Self, FlvError> {
        FlvParser::new(Cursor::new(bytes)).parse()
    }

    /// Parses from a reader that cannot seek by buffering it completely.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, FlvError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(Bytes::from(buffer))
    }

    pub fn audio_tags(&self) -> impl Iterator<Item = &FlvTag> {
        self.tags.iter().filter(|tag| tag.is_audio())
    }

    pub fn video_tags(&self) -> impl Iterator<Item = &FlvTag> {
        self.tags.iter().filter(|tag| tag.is_video())
    }

    /// Tags the gap analysis left a warning on.
    pub fn flagged_tags(&self) -> impl Iterator<Item = &FlvTag> {
        self.tags.iter().filter(|tag| tag.analysis.is_some())
    }

    /// Media duration in milliseconds, from the first to the last tag
    /// timestamp.
    pub fn timestamp_span_ms(&self) -> u32 {
        let first = self.tags.iter().map(|tag| tag.timestamp_ms).min();
        let last = self.tags.iter().map(|tag| tag.timestamp_ms).max();
        match (first, last) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}
