use std::io::{self, Read, Seek, SeekFrom};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::config::ParserConfig;
use crate::error::FlvError;
use crate::file::FlvFile;
use crate::header::{FlvHeader, read_up_to};
use crate::metadata::Metadata;
use crate::script::ScriptData;
use crate::tag::{FlvTag, FlvTagHeader, FlvTagType, PREVIOUS_TAG_SIZE, TAG_HEADER_SIZE};

/// Two pass FLV parser over a seekable source.
///
/// The first pass only looks for the `onMetaData` script tag, skipping every
/// other payload. The second pass decodes every tag with that metadata at
/// hand, so audio tags in front of the metadata tag are described the same
/// way as the ones after it.
pub struct FlvParser<R> {
    reader: R,
    config: ParserConfig,
}

impl<R: Read + Seek> FlvParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ParserConfig::default())
    }

    pub fn with_config(reader: R, config: ParserConfig) -> Self {
        Self { reader, config }
    }

    /// Parses the whole source.
    ///
    /// Only a missing or malformed file header and I/O errors fail; a
    /// truncated tag at the end is dropped and parsing stops there.
    pub fn parse(mut self) -> Result<FlvFile, FlvError> {
        self.reader.seek(SeekFrom::Start(0))?;
        let header = FlvHeader::read_from(&mut self.reader)?;
        debug!(
            version = header.version,
            has_audio = header.has_audio,
            has_video = header.has_video,
            data_offset = header.data_offset,
            "Parsed FLV header"
        );

        let first_tag_offset = header.first_tag_offset();
        let metadata = self.discover_metadata(first_tag_offset)?;
        let tags = self.read_tags(first_tag_offset, &metadata)?;

        Ok(FlvFile {
            header,
            tags,
            metadata,
        })
    }

    fn discover_metadata(&mut self, first_tag_offset: u64) -> Result<Metadata, FlvError> {
        self.reader.seek(SeekFrom::Start(first_tag_offset))?;

        while let Some(header) = self.read_tag_header()? {
            if header.tag_type != FlvTagType::ScriptData {
                self.skip(header.data_size as i64 + PREVIOUS_TAG_SIZE as i64)?;
                continue;
            }

            let Some(data) = self.read_payload(header.data_size)? else {
                break;
            };

            if let Ok(script) = ScriptData::demux(&data, self.config.max_amf_depth) {
                if let Some(metadata) = script.metadata() {
                    debug!("Found onMetaData with {} properties", metadata.properties().len());
                    return Ok(metadata);
                }
            }

            self.skip(PREVIOUS_TAG_SIZE as i64)?;
        }

        debug!("No onMetaData tag found");
        Ok(Metadata::default())
    }

    fn read_tags(
        &mut self,
        first_tag_offset: u64,
        metadata: &Metadata,
    ) -> Result<Vec<FlvTag>, FlvError> {
        self.reader.seek(SeekFrom::Start(first_tag_offset))?;

        let mut tags = Vec::new();
        let mut offset = first_tag_offset;

        while let Some(header) = self.read_tag_header()? {
            let Some(data) = self.read_payload(header.data_size)? else {
                warn!(
                    "Dropping truncated {} tag at offset {:#010x} (declared {} bytes)",
                    header.tag_type, offset, header.data_size
                );
                break;
            };

            let tag = FlvTag::decode(offset, header, data, metadata, &self.config);
            trace!(
                offset = tag.offset,
                tag_type = %tag.tag_type,
                timestamp_ms = tag.timestamp_ms,
                data_size = tag.data_size,
                "Decoded tag"
            );

            offset += tag.total_size();
            tags.push(tag);

            // The previous tag size is only useful for seeking backwards.
            self.skip(PREVIOUS_TAG_SIZE as i64)?;
        }

        debug!("Read {} tags", tags.len());
        Ok(tags)
    }

    /// `None` once fewer than 11 bytes are left.
    fn read_tag_header(&mut self) -> io::Result<Option<FlvTagHeader>> {
        let mut buf = [0u8; TAG_HEADER_SIZE];
        let read = read_up_to(&mut self.reader, &mut buf)?;
        if read < TAG_HEADER_SIZE {
            if read > 0 {
                trace!("Ignoring {} trailing bytes", read);
            }
            return Ok(None);
        }

        FlvTagHeader::demux(&mut &buf[..]).map(Some)
    }

    /// `None` if the source ends before `size` bytes.
    fn read_payload(&mut self, size: u32) -> io::Result<Option<Bytes>> {
        let mut data = Vec::with_capacity(size as usize);
        self.reader
            .by_ref()
            .take(size as u64)
            .read_to_end(&mut data)?;

        if data.len() < size as usize {
            return Ok(None);
        }
        Ok(Some(Bytes::from(data)))
    }

    fn skip(&mut self, count: i64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Current(count))?;
        Ok(())
    }
}
