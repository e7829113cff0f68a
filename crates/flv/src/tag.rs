use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::config::ParserConfig;
use crate::details::TagDetails;
use crate::metadata::Metadata;
use crate::{audio, script, video};

/// Size of the header in front of every tag payload.
pub const TAG_HEADER_SIZE: usize = 11;
/// Size of the previous-tag-size field following every tag payload.
pub const PREVIOUS_TAG_SIZE: usize = 4;

/// FLV Tag Type
///
/// Defined by:
/// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - FLV tags)
/// - video_file_format_spec_v10_1.pdf (Annex E.4.1 - FLV Tag)
///
/// The 3 types that are supported are:
/// - Audio(8)
/// - Video(9)
/// - ScriptData(18)
///
/// Encrypted tags and anything else end up as [`FlvTagType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlvTagType {
    Audio,
    Video,
    ScriptData,
    Unknown(u8),
}

impl From<u8> for FlvTagType {
    fn from(value: u8) -> Self {
        match value {
            8 => FlvTagType::Audio,
            9 => FlvTagType::Video,
            18 => FlvTagType::ScriptData,
            _ => FlvTagType::Unknown(value),
        }
    }
}

impl From<FlvTagType> for u8 {
    fn from(value: FlvTagType) -> Self {
        match value {
            FlvTagType::Audio => 8,
            FlvTagType::Video => 9,
            FlvTagType::ScriptData => 18,
            FlvTagType::Unknown(value) => value,
        }
    }
}

impl fmt::Display for FlvTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlvTagType::Audio => f.write_str("Audio"),
            FlvTagType::Video => f.write_str("Video"),
            FlvTagType::ScriptData => f.write_str("Script Data"),
            FlvTagType::Unknown(value) => write!(f, "Unknown ({value})"),
        }
    }
}

impl Serialize for FlvTagType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The fixed 11 byte header of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlvTagHeader {
    pub tag_type: FlvTagType,
    pub data_size: u32,
    /// A timestamp in milliseconds
    pub timestamp_ms: u32,
    pub stream_id: u32,
}

impl FlvTagHeader {
    pub fn demux(reader: &mut impl Read) -> io::Result<Self> {
        let tag_type = FlvTagType::from(reader.read_u8()?);
        let data_size = reader.read_u24::<BigEndian>()?;
        // The timestamp is 24 bits followed by an extended 8 bit high byte.
        let timestamp_ms = reader.read_u24::<BigEndian>()? | ((reader.read_u8()? as u32) << 24);
        // The stream id according to the spec is ALWAYS 0. (likely not true)
        let stream_id = reader.read_u24::<BigEndian>()?;

        Ok(Self {
            tag_type,
            data_size,
            timestamp_ms,
            stream_id,
        })
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_u8(self.tag_type.into())?;
        writer.write_u24::<BigEndian>(self.data_size)?;
        writer.write_u24::<BigEndian>(self.timestamp_ms & 0x00FF_FFFF)?;
        writer.write_u8((self.timestamp_ms >> 24) as u8)?;
        writer.write_u24::<BigEndian>(self.stream_id)?;
        Ok(())
    }

    /// Bytes taken by the tag in the file, including the previous-tag-size
    /// field after it.
    pub fn total_size(&self) -> u64 {
        (TAG_HEADER_SIZE + PREVIOUS_TAG_SIZE) as u64 + self.data_size as u64
    }
}

/// Which elementary stream a gap was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamKind {
    Video,
    Audio,
}

/// Annotation left on a tag whose timestamp jumped further than expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAnalysis {
    pub kind: StreamKind,
    /// Timestamp difference to the previous tag of the same stream
    pub gap_ms: i64,
    pub expected_interval_ms: f64,
    /// Estimated number of dropped frames or packets
    pub estimated_loss: i64,
    pub warning: String,
    pub reason: String,
}

/// A decoded FLV tag.
///
/// `offset` is the position of the tag header in the file. Consecutive tags
/// satisfy `next.offset == offset + total_size()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlvTag {
    pub offset: u64,
    #[serde(rename = "type")]
    pub tag_type: FlvTagType,
    pub data_size: u32,
    pub timestamp_ms: u32,
    pub stream_id: u32,
    #[serde(skip)]
    pub data: Bytes,
    pub details: TagDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TagAnalysis>,
}

impl FlvTag {
    /// Decodes the payload of a tag into its details.
    ///
    /// Problems in the payload are recorded as details; decoding a tag never
    /// fails.
    pub fn decode(
        offset: u64,
        header: FlvTagHeader,
        data: Bytes,
        metadata: &Metadata,
        config: &ParserConfig,
    ) -> Self {
        let mut details = TagDetails::new();

        match header.tag_type {
            FlvTagType::Audio => audio::describe(&data, metadata, &mut details),
            FlvTagType::Video => video::describe(&data, &mut details),
            FlvTagType::ScriptData => script::describe(&data, config.max_amf_depth, &mut details),
            FlvTagType::Unknown(_) => {}
        }

        Self {
            offset,
            tag_type: header.tag_type,
            data_size: header.data_size,
            timestamp_ms: header.timestamp_ms,
            stream_id: header.stream_id,
            data,
            details,
            analysis: None,
        }
    }

    pub fn header(&self) -> FlvTagHeader {
        FlvTagHeader {
            tag_type: self.tag_type,
            data_size: self.data_size,
            timestamp_ms: self.timestamp_ms,
            stream_id: self.stream_id,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.header().total_size()
    }

    pub fn is_audio(&self) -> bool {
        self.tag_type == FlvTagType::Audio
    }

    pub fn is_video(&self) -> bool {
        self.tag_type == FlvTagType::Video
    }

    pub fn is_script(&self) -> bool {
        self.tag_type == FlvTagType::ScriptData
    }
}
