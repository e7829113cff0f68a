//! A crate for decoding AAC audio headers.
//!
//! Only the leading fields of the AudioSpecificConfig are read: enough to
//! describe a stream, not to configure a decoder.
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or
//! [Apache-2.0](./LICENSE.Apache-2.0) license. You can choose between one of
//! them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

use std::fmt;
use std::io;

use bytes_util::BitReader;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// A Partial Audio Specific Config
/// ISO/IEC 14496-3:2019(E) - 1.6
///
/// This struct does not represent the full AudioSpecificConfig, it only
/// represents the top few fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PartialAudioSpecificConfig {
    /// Audio Object Type
    pub audio_object_type: AudioObjectType,
    /// Sampling Frequency
    pub sampling_frequency: SamplingFrequency,
    /// Channel Configuration
    pub channel_configuration: ChannelConfiguration,
}

/// Audio Object Type
/// ISO/IEC 14496-3:2019(E) - 1.5.1.1 (Table 1.17)
///
/// Read as a plain 5 bit field; the escape value 31 is reported as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AudioObjectType {
    /// AAC main
    AacMain,
    /// AAC LC
    AacLowComplexity,
    /// AAC SSR
    AacScalableSampleRate,
    /// AAC LTP
    AacLongTermPrediction,
    /// Spectral band replication
    Sbr,
    /// AAC scalable
    AacScalable,
    /// Any other object type
    Unknown(u8),
}

impl AudioObjectType {
    /// Converts an AudioObjectType to its numeric id
    pub const fn as_u8(&self) -> u8 {
        match self {
            AudioObjectType::AacMain => 1,
            AudioObjectType::AacLowComplexity => 2,
            AudioObjectType::AacScalableSampleRate => 3,
            AudioObjectType::AacLongTermPrediction => 4,
            AudioObjectType::Sbr => 5,
            AudioObjectType::AacScalable => 6,
            AudioObjectType::Unknown(value) => *value,
        }
    }

    /// Converts a numeric id to an AudioObjectType
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => AudioObjectType::AacMain,
            2 => AudioObjectType::AacLowComplexity,
            3 => AudioObjectType::AacScalableSampleRate,
            4 => AudioObjectType::AacLongTermPrediction,
            5 => AudioObjectType::Sbr,
            6 => AudioObjectType::AacScalable,
            _ => AudioObjectType::Unknown(value),
        }
    }

    /// Human readable name, `"Unknown"` for anything outside the table
    pub const fn name(&self) -> &'static str {
        match self {
            AudioObjectType::AacMain => "AAC Main",
            AudioObjectType::AacLowComplexity => "AAC LC",
            AudioObjectType::AacScalableSampleRate => "AAC SSR",
            AudioObjectType::AacLongTermPrediction => "AAC LTP",
            AudioObjectType::Sbr => "SBR",
            AudioObjectType::AacScalable => "AAC Scalable",
            AudioObjectType::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for AudioObjectType {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<AudioObjectType> for u8 {
    fn from(value: AudioObjectType) -> Self {
        value.as_u8()
    }
}

/// Sampling Frequency Index
///
/// The purpose of the FrequencyIndex is to encode commonly used frequencies in
/// 4 bits to save space. These are the set of commonly used frequencies defined
/// in the specification.
///
/// ISO/IEC 14496-3:2019(E) - 1.6.2.4 (Table 1.22)
#[derive(FromPrimitive, Debug, Clone, PartialEq, Copy, Eq, PartialOrd, Ord)]
#[repr(u8)]
#[must_use]
pub enum SampleFrequencyIndex {
    /// 96000 Hz
    Freq96000 = 0x0,
    /// 88200 Hz
    Freq88200 = 0x1,
    /// 64000 Hz
    Freq64000 = 0x2,
    /// 48000 Hz
    Freq48000 = 0x3,
    /// 44100 Hz
    Freq44100 = 0x4,
    /// 32000 Hz
    Freq32000 = 0x5,
    /// 24000 Hz
    Freq24000 = 0x6,
    /// 22050 Hz
    Freq22050 = 0x7,
    /// 16000 Hz
    Freq16000 = 0x8,
    /// 12000 Hz
    Freq12000 = 0x9,
    /// 11025 Hz
    Freq11025 = 0xA,
    /// 8000 Hz
    Freq8000 = 0xB,
    /// 7350 Hz
    Freq7350 = 0xC,
    /// Reserved
    FreqReserved = 0xD,
    /// Reserved
    FreqReserved2 = 0xE,
    /// Escape (Meaning the frequency is not in the table, and we need to read
    /// an additional 24 bits to get the frequency)
    FreqEscape = 0xF,
}

impl SampleFrequencyIndex {
    /// Convert the SampleFrequencyIndex to the actual frequency in Hz
    pub const fn to_freq(&self) -> Option<u32> {
        match self {
            SampleFrequencyIndex::Freq96000 => Some(96000),
            SampleFrequencyIndex::Freq88200 => Some(88200),
            SampleFrequencyIndex::Freq64000 => Some(64000),
            SampleFrequencyIndex::Freq48000 => Some(48000),
            SampleFrequencyIndex::Freq44100 => Some(44100),
            SampleFrequencyIndex::Freq32000 => Some(32000),
            SampleFrequencyIndex::Freq24000 => Some(24000),
            SampleFrequencyIndex::Freq22050 => Some(22050),
            SampleFrequencyIndex::Freq16000 => Some(16000),
            SampleFrequencyIndex::Freq12000 => Some(12000),
            SampleFrequencyIndex::Freq11025 => Some(11025),
            SampleFrequencyIndex::Freq8000 => Some(8000),
            SampleFrequencyIndex::Freq7350 => Some(7350),
            SampleFrequencyIndex::FreqReserved => None,
            SampleFrequencyIndex::FreqReserved2 => None,
            SampleFrequencyIndex::FreqEscape => None,
        }
    }
}

/// Where the sampling frequency of a config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SamplingFrequency {
    /// Looked up from the 4 bit index table.
    Indexed(SampleFrequencyIndex),
    /// Written out as a 24 bit value after the escape index.
    Explicit(u32),
}

impl SamplingFrequency {
    /// The frequency in Hz, if it is known
    pub const fn hz(&self) -> Option<u32> {
        match self {
            SamplingFrequency::Indexed(index) => index.to_freq(),
            SamplingFrequency::Explicit(hz) => Some(*hz),
        }
    }

    /// Whether the frequency was written out explicitly
    pub const fn is_explicit(&self) -> bool {
        matches!(self, SamplingFrequency::Explicit(_))
    }
}

impl fmt::Display for SamplingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hz() {
            Some(hz) => write!(f, "{hz} Hz"),
            None => f.write_str("Unknown"),
        }
    }
}

/// Channel Configuration
/// ISO/IEC 14496-3:2019(E) - 1.6.3.5 (Table 1.19)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ChannelConfiguration(pub u8);

impl ChannelConfiguration {
    /// Speaker layout for the configurations 1 to 7
    pub const fn description(&self) -> Option<&'static str> {
        match self.0 {
            1 => Some("1 channel: C"),
            2 => Some("2 channels: L, R"),
            3 => Some("3 channels: C, L, R"),
            4 => Some("4 channels: C, L, R, B"),
            5 => Some("5 channels: C, L, R, SL, SR"),
            6 => Some("6 channels: C, L, R, SL, SR, LFE"),
            7 => Some("8 channels: C, L, R, SL, SR, BL, BR, LFE"),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description().unwrap_or("Unknown"))
    }
}

impl PartialAudioSpecificConfig {
    /// Parse the Audio Specific Config from given bytes
    /// The implementation is based on ISO/IEC 14496-3:2019(E) - 1.6.2.1 (Table
    /// 1.19) This does not parse the entire AAC Data, it only parses the
    /// top few fields.
    /// - Audio Object Type
    /// - Sampling Frequency
    /// - Channel Configuration
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if `data` ends before the
    /// channel configuration.
    pub fn parse(data: &[u8]) -> io::Result<Self> {
        let mut bitreader = BitReader::new_from_slice(data);

        let audio_object_type = AudioObjectType::from_u8(bitreader.read_bits(5)? as u8);

        // A 4 bit index; 0xF means the frequency follows as 24 bits.
        let index = bitreader.read_bits(4)? as u8;
        // Every 4 bit value names a variant, the fallback is never taken.
        let index =
            SampleFrequencyIndex::from_u8(index).unwrap_or(SampleFrequencyIndex::FreqReserved);
        let sampling_frequency = match index {
            SampleFrequencyIndex::FreqEscape => SamplingFrequency::Explicit(bitreader.read_bits(24)?),
            index => SamplingFrequency::Indexed(index),
        };

        let channel_configuration = ChannelConfiguration(bitreader.read_bits(4)? as u8);

        Ok(Self {
            audio_object_type,
            sampling_frequency,
            channel_configuration,
        })
    }
}
