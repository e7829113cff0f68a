//! # FLV Audio Module
//!
//! Decoding of the legacy FLV audio tag header and, for AAC sequence headers,
//! the leading fields of the AudioSpecificConfig.
//!
//! The sample rate and channel layout are taken from the most authoritative
//! source available, in this order:
//!
//! 1. the AudioSpecificConfig of an AAC sequence header
//! 2. the `audiosamplerate` / `stereo` fields of `onMetaData`
//! 3. the bits of the audio tag header
//!
//! ## Specifications
//!
//! - [Flash Video File Format Specification v10](https://www.adobe.com/content/dam/acom/en/devnet/flv/video_file_format_spec_v10.pdf)
//! - ISO/IEC 14496-3 (AudioSpecificConfig)

use std::fmt;

use aac::PartialAudioSpecificConfig;
use tracing::debug;

use crate::details::TagDetails;
use crate::metadata::Metadata;

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SoundFormat {
    /// Uncompressed PCM audio, platform endian
    Pcm,
    AdPcm,
    Mp3,
    /// Uncompressed PCM audio, little endian
    PcmLe,
    Nellymoser16khzMono,
    Nellymoser8khzMono,
    Nellymoser,
    G711ALaw,
    G711MuLaw,
    Reserved,
    Aac,
    Speex,
    Mp38k,
    DeviceSpecific,
    Unknown(u8),
}

impl From<u8> for SoundFormat {
    fn from(value: u8) -> Self {
        match value {
            0 => SoundFormat::Pcm,
            1 => SoundFormat::AdPcm,
            2 => SoundFormat::Mp3,
            3 => SoundFormat::PcmLe,
            4 => SoundFormat::Nellymoser16khzMono,
            5 => SoundFormat::Nellymoser8khzMono,
            6 => SoundFormat::Nellymoser,
            7 => SoundFormat::G711ALaw,
            8 => SoundFormat::G711MuLaw,
            9 => SoundFormat::Reserved,
            10 => SoundFormat::Aac,
            11 => SoundFormat::Speex,
            14 => SoundFormat::Mp38k,
            15 => SoundFormat::DeviceSpecific,
            _ => SoundFormat::Unknown(value),
        }
    }
}

impl SoundFormat {
    /// Maps the numeric `audiocodecid` of `onMetaData` onto a format.
    pub fn from_metadata(value: f64) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=15.0).contains(&value) {
            return None;
        }
        match Self::from(value as u8) {
            SoundFormat::Unknown(_) => None,
            format => Some(format),
        }
    }
}

impl fmt::Display for SoundFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoundFormat::Pcm => "LPCM",
            SoundFormat::AdPcm => "ADPCM",
            SoundFormat::Mp3 => "MP3",
            SoundFormat::PcmLe => "LPCM LE",
            SoundFormat::Nellymoser16khzMono => "Nellymoser 16kHz",
            SoundFormat::Nellymoser8khzMono => "Nellymoser 8kHz",
            SoundFormat::Nellymoser => "Nellymoser",
            SoundFormat::G711ALaw => "G.711 A-law",
            SoundFormat::G711MuLaw => "G.711 mu-law",
            SoundFormat::Reserved => "reserved",
            SoundFormat::Aac => "AAC",
            SoundFormat::Speex => "Speex",
            SoundFormat::Mp38k => "MP3 8kHz",
            SoundFormat::DeviceSpecific => "Device-specific",
            SoundFormat::Unknown(value) => return write!(f, "Unknown ({value})"),
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SoundRate {
    Hz5512,
    Hz11025,
    Hz22050,
    Hz44100,
}

impl SoundRate {
    /// Reads the two rate bits, ignoring anything above them.
    pub fn from_bits(value: u8) -> Self {
        match value & 0b11 {
            0 => SoundRate::Hz5512,
            1 => SoundRate::Hz11025,
            2 => SoundRate::Hz22050,
            _ => SoundRate::Hz44100,
        }
    }
}

impl fmt::Display for SoundRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SoundRate::Hz5512 => "5.5kHz",
            SoundRate::Hz11025 => "11kHz",
            SoundRate::Hz22050 => "22kHz",
            SoundRate::Hz44100 => "44kHz",
        })
    }
}

// Representation of sound size in Audio Data in FLV
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SoundSize {
    Bits8,
    Bits16,
}

impl fmt::Display for SoundSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SoundSize::Bits8 => "8-bit",
            SoundSize::Bits16 => "16-bit",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SoundType {
    Mono,
    Stereo,
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SoundType::Mono => "Mono",
            SoundType::Stereo => "Stereo",
        })
    }
}

/// The first byte of every audio tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTagHeader {
    // bit 7-4
    pub sound_format: SoundFormat,
    // bit 3-2
    pub sound_rate: SoundRate,
    // bit 1
    pub sound_size: SoundSize,
    // bit 0
    pub sound_type: SoundType,
}

impl AudioTagHeader {
    pub fn from_byte(byte: u8) -> Self {
        const SOUND_RATE_MASK: u8 = 0b00001100;
        const SOUND_RATE_SHIFT: u8 = 2;
        const SOUND_SIZE_MASK: u8 = 0b00000010;
        const SOUND_TYPE_MASK: u8 = 0b00000001;

        AudioTagHeader {
            sound_format: SoundFormat::from(byte >> 4),
            sound_rate: SoundRate::from_bits((byte & SOUND_RATE_MASK) >> SOUND_RATE_SHIFT),
            sound_size: if byte & SOUND_SIZE_MASK != 0 {
                SoundSize::Bits16
            } else {
                SoundSize::Bits8
            },
            sound_type: if byte & SOUND_TYPE_MASK != 0 {
                SoundType::Stereo
            } else {
                SoundType::Mono
            },
        }
    }
}

/// The byte following an AAC audio tag header.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum AacPacketType {
    SequenceHeader,
    Raw,
}

impl From<u8> for AacPacketType {
    fn from(value: u8) -> Self {
        match value {
            0 => AacPacketType::SequenceHeader,
            _ => AacPacketType::Raw,
        }
    }
}

impl fmt::Display for AacPacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AacPacketType::SequenceHeader => "AAC sequence header",
            AacPacketType::Raw => "AAC raw",
        })
    }
}

/// Records the details of an audio tag payload.
pub fn describe(data: &[u8], metadata: &Metadata, details: &mut TagDetails) {
    let Some(&flags) = data.first() else {
        return;
    };

    let header = AudioTagHeader::from_byte(flags);
    details.insert("Format", header.sound_format.to_string());
    details.insert("Sample Size", header.sound_size.to_string());

    if header.sound_format == SoundFormat::Aac && data.len() > 1 {
        let packet_type = AacPacketType::from(data[1]);
        details.insert("AAC Packet Type", packet_type.to_string());

        if packet_type == AacPacketType::SequenceHeader && data.len() > 3 {
            match PartialAudioSpecificConfig::parse(&data[2..]) {
                Ok(config) => {
                    describe_audio_specific_config(&config, details);
                    return;
                }
                Err(e) => {
                    debug!("Failed to parse AudioSpecificConfig: {}", e);
                    details.insert("ASC Parse Error", e.to_string());
                }
            }
        }
    }

    let sample_rate = match metadata.audio_sample_rate() {
        Some(hz) => format!("{hz} Hz (from onMetaData)"),
        None => format!("{} (from Tag Header)", header.sound_rate),
    };
    details.insert("Sample Rate", sample_rate);

    let channels = match metadata.stereo() {
        Some(true) => "Stereo (from onMetaData)".to_owned(),
        Some(false) => "Mono (from onMetaData)".to_owned(),
        None => format!("{} (from Tag Header)", header.sound_type),
    };
    details.insert("Channels", channels);
}

fn describe_audio_specific_config(config: &PartialAudioSpecificConfig, details: &mut TagDetails) {
    details.insert("Audio Object Type", config.audio_object_type.name());

    let sample_rate = if config.sampling_frequency.is_explicit() {
        format!("{} (Explicit from ASC)", config.sampling_frequency)
    } else {
        format!("{} (from ASC)", config.sampling_frequency)
    };
    details.insert("Sample Rate", sample_rate);
    details.insert(
        "Channels",
        format!("{} (from ASC)", config.channel_configuration),
    );
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;
    use crate::details::DetailValue;

    fn describe_with(data: &[u8], metadata: &Metadata) -> TagDetails {
        let mut details = TagDetails::new();
        describe(data, metadata, &mut details);
        details
    }

    fn metadata(entries: &[(&str, DetailValue)]) -> Metadata {
        let mut properties = TagDetails::new();
        for (key, value) in entries {
            properties.insert(*key, value.clone());
        }
        Metadata::new(properties)
    }

    #[test]
    fn test_header_byte() {
        // 1010 11 1 1
        let header = AudioTagHeader::from_byte(0xAF);
        assert_eq!(header.sound_format, SoundFormat::Aac);
        assert_eq!(header.sound_rate, SoundRate::Hz44100);
        assert_eq!(header.sound_size, SoundSize::Bits16);
        assert_eq!(header.sound_type, SoundType::Stereo);

        // 0010 10 0 0
        let header = AudioTagHeader::from_byte(0x28);
        assert_eq!(header.sound_format, SoundFormat::Mp3);
        assert_eq!(header.sound_rate, SoundRate::Hz22050);
        assert_eq!(header.sound_size, SoundSize::Bits8);
        assert_eq!(header.sound_type, SoundType::Mono);
    }

    #[test]
    fn test_sound_format_names() {
        let cases = [
            (0, "LPCM"),
            (3, "LPCM LE"),
            (7, "G.711 A-law"),
            (9, "reserved"),
            (10, "AAC"),
            (12, "Unknown (12)"),
            (13, "Unknown (13)"),
            (14, "MP3 8kHz"),
            (15, "Device-specific"),
        ];

        for (value, name) in cases {
            assert_eq!(SoundFormat::from(value).to_string(), name);
        }

        assert_eq!(SoundFormat::from_metadata(10.0), Some(SoundFormat::Aac));
        assert_eq!(SoundFormat::from_metadata(12.0), None);
        assert_eq!(SoundFormat::from_metadata(2.5), None);
    }

    #[test]
    fn test_aac_sequence_header() {
        let details = describe_with(&[0xAF, 0x00, 0x11, 0x90], &Metadata::default());

        let fields: Vec<_> = details.iter().map(|(k, v)| (k, v.to_string())).collect();
        assert_eq!(
            fields,
            [
                ("Format", "AAC".to_owned()),
                ("Sample Size", "16-bit".to_owned()),
                ("AAC Packet Type", "AAC sequence header".to_owned()),
                ("Audio Object Type", "AAC LC".to_owned()),
                ("Sample Rate", "48000 Hz (from ASC)".to_owned()),
                ("Channels", "2 channels: L, R (from ASC)".to_owned()),
            ]
        );
    }

    #[test]
    fn test_config_wins_over_metadata() {
        let meta = metadata(&[
            ("audiosamplerate", DetailValue::Number(22050.0)),
            ("stereo", DetailValue::Bool(false)),
        ]);
        let details = describe_with(&[0xAF, 0x00, 0x11, 0x90], &meta);
        assert_eq!(details.get_str("Sample Rate"), Some("48000 Hz (from ASC)"));
        assert_eq!(
            details.get_str("Channels"),
            Some("2 channels: L, R (from ASC)")
        );
    }

    #[test]
    fn test_explicit_sample_rate() {
        // 00010 1111 <44100 as 24 bits> 0010
        let bits: u64 = ((2 << 32) | (0xF << 28) | (44100 << 4) | 2) << 3;
        let mut data = vec![0xAF, 0x00];
        data.extend_from_slice(&bits.to_be_bytes()[3..]);

        let details = describe_with(&data, &Metadata::default());
        assert_eq!(
            details.get_str("Sample Rate"),
            Some("44100 Hz (Explicit from ASC)")
        );
    }

    #[test]
    fn test_broken_config_falls_back() {
        // Escape index without the explicit frequency.
        let details = describe_with(&[0xAF, 0x00, 0x17, 0x80], &Metadata::default());

        assert_eq!(
            details.get_str("ASC Parse Error"),
            Some("not enough bits left to read")
        );
        assert!(!details.contains_key("Audio Object Type"));
        assert_eq!(details.get_str("Sample Rate"), Some("44kHz (from Tag Header)"));
        assert_eq!(details.get_str("Channels"), Some("Stereo (from Tag Header)"));
    }

    #[test]
    fn test_short_sequence_header_skips_config() {
        let details = describe_with(&[0xAF, 0x00, 0x11], &Metadata::default());
        assert_eq!(
            details.get_str("AAC Packet Type"),
            Some("AAC sequence header")
        );
        assert!(!details.contains_key("ASC Parse Error"));
        assert_eq!(details.get_str("Sample Rate"), Some("44kHz (from Tag Header)"));
    }

    #[test]
    fn test_metadata_overrides_header() {
        // MP3, 22kHz, 16-bit, mono
        let meta = metadata(&[("audiosamplerate", DetailValue::Number(44100.0))]);
        let details = describe_with(&[0x2A, 0xFF], &meta);

        assert_eq!(details.get_str("Format"), Some("MP3"));
        assert_eq!(details.get_str("Sample Rate"), Some("44100 Hz (from onMetaData)"));
        assert_eq!(details.get_str("Channels"), Some("Mono (from Tag Header)"));
        assert!(!details.contains_key("AAC Packet Type"));
    }

    #[test]
    fn test_aac_raw_uses_metadata_channels() {
        let meta = metadata(&[("stereo", DetailValue::Bool(true))]);
        let details = describe_with(&[0xAE, 0x01, 0x21, 0x10], &meta);

        assert_eq!(details.get_str("AAC Packet Type"), Some("AAC raw"));
        assert_eq!(details.get_str("Sample Rate"), Some("44kHz (from Tag Header)"));
        assert_eq!(details.get_str("Channels"), Some("Stereo (from onMetaData)"));
    }

    #[test]
    fn test_empty_payload() {
        assert!(describe_with(&[], &Metadata::default()).is_empty());
    }

    #[test]
    fn test_unknown_format() {
        let details = describe_with(&[0xC0], &Metadata::default());
        assert_eq!(details.get_str("Format"), Some("Unknown (12)"));
        assert_eq!(details.get_str("Sample Size"), Some("8-bit"));
        assert_eq!(details.get_str("Sample Rate"), Some("5.5kHz (from Tag Header)"));
        assert_eq!(details.get_str("Channels"), Some("Mono (from Tag Header)"));
    }
}
