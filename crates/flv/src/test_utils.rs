//! # Test Utilities
//!
//! Builders for small in-memory FLV files used across the parser tests.

use std::borrow::Cow;

use amf0::{Amf0Encoder, Amf0Value};
use bytes::Bytes;

use crate::header::FlvHeader;
use crate::tag::{FlvTagHeader, FlvTagType, TAG_HEADER_SIZE};

/// Initialize tracing for tests with appropriate settings
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Writes an FLV file tag by tag, filling in the previous-tag-size fields.
pub struct FlvBuilder {
    buffer: Vec<u8>,
}

impl FlvBuilder {
    pub fn new() -> Self {
        Self::with_header(FlvHeader::new(true, true))
    }

    pub fn with_header(header: FlvHeader) -> Self {
        let mut buffer = Vec::new();
        header.write_to(&mut buffer).unwrap();
        // Anything between the fixed header and the data offset is padding.
        buffer.resize(header.data_offset as usize, 0);
        buffer.extend_from_slice(&[0, 0, 0, 0]);
        Self { buffer }
    }

    pub fn tag(mut self, tag_type: u8, timestamp_ms: u32, payload: &[u8]) -> Self {
        let header = FlvTagHeader {
            tag_type: FlvTagType::from(tag_type),
            data_size: payload.len() as u32,
            timestamp_ms,
            stream_id: 0,
        };
        header.write_to(&mut self.buffer).unwrap();
        self.buffer.extend_from_slice(payload);
        let previous_tag_size = (TAG_HEADER_SIZE + payload.len()) as u32;
        self.buffer
            .extend_from_slice(&previous_tag_size.to_be_bytes());
        self
    }

    pub fn audio(self, timestamp_ms: u32, payload: &[u8]) -> Self {
        self.tag(8, timestamp_ms, payload)
    }

    pub fn video(self, timestamp_ms: u32, payload: &[u8]) -> Self {
        self.tag(9, timestamp_ms, payload)
    }

    pub fn script(self, timestamp_ms: u32, name: &str, value: &Amf0Value) -> Self {
        let mut payload = Vec::new();
        Amf0Encoder::encode_string(&mut payload, name).unwrap();
        Amf0Encoder::encode(&mut payload, value).unwrap();
        self.tag(18, timestamp_ms, &payload)
    }

    pub fn metadata(self, entries: &[(&'static str, Amf0Value<'static>)]) -> Self {
        self.script(0, "onMetaData", &metadata_value(entries))
    }

    /// Appends bytes as they are, for truncated or corrupt endings.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Bytes {
        Bytes::from(self.buffer)
    }
}

pub fn metadata_value(entries: &[(&'static str, Amf0Value<'static>)]) -> Amf0Value<'static> {
    Amf0Value::EcmaArray(
        entries
            .iter()
            .map(|(key, value)| (Cow::Borrowed(*key), value.clone()))
            .collect(),
    )
}

/// AVC NALU of the given frame type with a zero composition time
pub fn avc_frame(keyframe: bool) -> Vec<u8> {
    let frame_type = if keyframe { 1 } else { 2 };
    vec![(frame_type << 4) | 7, 0x01, 0x00, 0x00, 0x00, 0x65]
}

/// AAC raw frame, 44kHz 16-bit stereo in the tag header
pub fn aac_frame() -> Vec<u8> {
    vec![0xAF, 0x01, 0x21, 0x10, 0x04]
}
