//! # FLV Video Module
//!
//! Decoding of the legacy FLV video tag header: frame type, codec id and, for
//! AVC, the packet type and composition time offset. The video bitstream itself
//! is never looked at.
//!
//! ## Specifications
//!
//! - [Flash Video File Format Specification v10](https://www.adobe.com/content/dam/acom/en/devnet/flv/video_file_format_spec_v10.pdf)

use std::fmt;
use std::io;

use byteorder::{BigEndian, ReadBytesExt};

use crate::details::TagDetails;

/// Represents the type of video frame in an FLV video tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFrameType {
    /// Key frame (for AVC, a seekable frame)
    KeyFrame,
    /// Inter frame, for AVC, a non-key seekable frame
    InterFrame,
    /// Disposable inter frame, H.263 only
    DisposableInterFrame,
    /// Generated key frame, reserved for server use only
    GeneratedKeyFrame,
    /// Video info/command frame
    VideoInfoFrame,
    Unknown(u8),
}

impl From<u8> for VideoFrameType {
    fn from(value: u8) -> Self {
        match value {
            1 => VideoFrameType::KeyFrame,
            2 => VideoFrameType::InterFrame,
            3 => VideoFrameType::DisposableInterFrame,
            4 => VideoFrameType::GeneratedKeyFrame,
            5 => VideoFrameType::VideoInfoFrame,
            _ => VideoFrameType::Unknown(value),
        }
    }
}

impl fmt::Display for VideoFrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VideoFrameType::KeyFrame => "Key frame",
            VideoFrameType::InterFrame => "Inter frame",
            VideoFrameType::DisposableInterFrame => "Disposable inter frame",
            VideoFrameType::GeneratedKeyFrame => "Generated key frame",
            VideoFrameType::VideoInfoFrame => "Video info/command frame",
            VideoFrameType::Unknown(value) => return write!(f, "Unknown ({value})"),
        })
    }
}

/// Legacy FLV codec ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodecId {
    SorensonH263,
    ScreenVideo,
    On2VP6,
    On2VP6WithAlphaChannel,
    ScreenVideoVersion2,
    Avc,
    Unknown(u8),
}

impl From<u8> for VideoCodecId {
    fn from(value: u8) -> Self {
        match value {
            2 => VideoCodecId::SorensonH263,
            3 => VideoCodecId::ScreenVideo,
            4 => VideoCodecId::On2VP6,
            5 => VideoCodecId::On2VP6WithAlphaChannel,
            6 => VideoCodecId::ScreenVideoVersion2,
            7 => VideoCodecId::Avc,
            _ => VideoCodecId::Unknown(value),
        }
    }
}

impl VideoCodecId {
    /// Maps the numeric `videocodecid` of `onMetaData` onto a codec.
    pub fn from_metadata(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=15.0).contains(&value) {
            return None;
        }
        match Self::from(value as u8) {
            VideoCodecId::Unknown(_) => None,
            codec => Some(codec),
        }
    }
}

impl fmt::Display for VideoCodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VideoCodecId::SorensonH263 => "Sorenson H.263",
            VideoCodecId::ScreenVideo => "Screen video",
            VideoCodecId::On2VP6 => "On2 VP6",
            VideoCodecId::On2VP6WithAlphaChannel => "On2 VP6 with alpha",
            VideoCodecId::ScreenVideoVersion2 => "Screen video v2",
            VideoCodecId::Avc => "AVC (H.264)",
            VideoCodecId::Unknown(value) => return write!(f, "Unknown ({value})"),
        })
    }
}

/// The first byte of every video tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTagHeader {
    // bit 7-4
    pub frame_type: VideoFrameType,
    // bit 3-0
    pub codec_id: VideoCodecId,
}

impl VideoTagHeader {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            frame_type: VideoFrameType::from(byte >> 4),
            codec_id: VideoCodecId::from(byte & 0x0F),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvcPacketType {
    SeqHdr,
    Nalu,
    EndOfSequence,
    Unknown(u8),
}

impl From<u8> for AvcPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AvcPacketType::SeqHdr,
            1 => AvcPacketType::Nalu,
            2 => AvcPacketType::EndOfSequence,
            _ => AvcPacketType::Unknown(value),
        }
    }
}

impl fmt::Display for AvcPacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AvcPacketType::SeqHdr => "Seq. header",
            AvcPacketType::Nalu => "NALU",
            AvcPacketType::EndOfSequence => "End of seq.",
            AvcPacketType::Unknown(_) => "Unknown",
        })
    }
}

/// The four bytes following the video tag header of an AVC tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvcPacketHeader {
    pub packet_type: AvcPacketType,
    /// Composition time offset in milliseconds, read as an unsigned 24 bit value
    pub composition_time: u32,
}

impl AvcPacketHeader {
    pub fn demux(reader: &mut io::Cursor<&[u8]>) -> io::Result<Self> {
        let packet_type = AvcPacketType::from(reader.read_u8()?);
        let composition_time = reader.read_u24::<BigEndian>()?;
        Ok(Self {
            packet_type,
            composition_time,
        })
    }
}

/// Records the details of a video tag payload.
pub fn describe(data: &[u8], details: &mut TagDetails) {
    let Some(&flags) = data.first() else {
        return;
    };

    let header = VideoTagHeader::from_byte(flags);
    details.insert("Frame Type", header.frame_type.to_string());
    details.insert("Codec ID", header.codec_id.to_string());

    if header.codec_id == VideoCodecId::Avc && data.len() > 4 {
        // The length check guarantees the four bytes are there.
        if let Ok(avc) = AvcPacketHeader::demux(&mut io::Cursor::new(&data[1..])) {
            details.insert("AVC Packet Type", avc.packet_type.to_string());
            details.insert(
                "CompositionTime Offset",
                format!("{} ms", avc.composition_time),
            );
        }
    }
}
