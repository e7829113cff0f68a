use std::fmt::Display;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::error::FlvError;

/// Size of the fixed FLV file header.
pub const FLV_HEADER_SIZE: usize = 9;

const FLV_SIGNATURE: [u8; 3] = *b"FLV";

const FLAG_VIDEO: u8 = 0b0000_0001;
const FLAG_AUDIO: u8 = 0b0000_0100;

// Struct representing the FLV header, 9 bytes in total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlvHeader {
    // The version of the FLV file format, 1 byte, usually 0x01
    pub version: u8,
    // Whether the FLV file contains audio data (flags bit 2)
    pub has_audio: bool,
    // Whether the FLV file contains video data (flags bit 0)
    pub has_video: bool,
    // Offset of the file body, usually 9. Only used as a seek target.
    pub data_offset: u32,
}

impl Display for FlvHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FLV Header: \n\
            Version: {}\n\
            Has Audio: {}\n\
            Has Video: {}\n\
            Data Offset: {}",
            self.version, self.has_audio, self.has_video, self.data_offset
        )
    }
}

impl FlvHeader {
    /// A version 1 header with the standard data offset.
    pub fn new(has_audio: bool, has_video: bool) -> Self {
        Self {
            version: 1,
            has_audio,
            has_video,
            data_offset: FLV_HEADER_SIZE as u32,
        }
    }

    /// Position of the first tag: the body starts with a 4 byte
    /// previous-tag-size field that is always zero.
    pub fn first_tag_offset(&self) -> u64 {
        self.data_offset as u64 + 4
    }

    /// Reads and parses the header from the start of `reader`.
    ///
    /// Fails with [`FlvError::HeaderTooShort`] when the stream ends before 9
    /// bytes and with [`FlvError::InvalidSignature`] when they do not start
    /// with `FLV`.
    pub fn read_from(reader: &mut impl Read) -> Result<Self, FlvError> {
        let mut buf = [0u8; FLV_HEADER_SIZE];
        let read = read_up_to(reader, &mut buf)?;
        if read < FLV_HEADER_SIZE {
            return Err(FlvError::HeaderTooShort(read));
        }

        Self::parse(&buf)
    }

    /// Parses the 9 header bytes.
    pub fn parse(buf: &[u8; FLV_HEADER_SIZE]) -> Result<Self, FlvError> {
        let mut reader = io::Cursor::new(&buf[..]);

        let mut signature = [0u8; 3];
        reader.read_exact(&mut signature)?;
        if signature != FLV_SIGNATURE {
            return Err(FlvError::InvalidSignature(signature));
        }

        let version = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let data_offset = reader.read_u32::<BigEndian>()?;

        Ok(FlvHeader {
            version,
            has_audio: flags & FLAG_AUDIO != 0,
            has_video: flags & FLAG_VIDEO != 0,
            data_offset,
        })
    }

    /// Writes the header in its 9 byte form.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let mut flags = 0;
        if self.has_audio {
            flags |= FLAG_AUDIO;
        }
        if self.has_video {
            flags |= FLAG_VIDEO;
        }

        writer.write_all(&FLV_SIGNATURE)?;
        writer.write_u8(self.version)?;
        writer.write_u8(flags)?;
        writer.write_u32::<BigEndian>(self.data_offset)?;
        Ok(())
    }
}

/// Fills as much of `buf` as the reader can provide, stopping only at end of
/// stream. Returns the number of bytes read.
pub(crate) fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
