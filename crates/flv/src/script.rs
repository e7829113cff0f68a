//! # FLV Script Module
//!
//! Script tags carry a name followed by a single AMF0 value. The one that
//! matters is `onMetaData`, whose value holds stream properties such as
//! duration, dimensions and framerate.
//!
//! ## Specifications
//!
//! - [Flash Video File Format Specification v10](https://www.adobe.com/content/dam/acom/en/devnet/flv/video_file_format_spec_v10.pdf)
//! - [Action Message Format -- AMF 0](https://www.adobe.com/content/dam/acom/en/devnet/pdf/amf0-file-format-specification.pdf)

use amf0::{Amf0Decoder, Amf0ReadError, Amf0Value};
use tracing::{debug, trace};

use crate::details::{DetailValue, TagDetails};
use crate::metadata::Metadata;

/// Name of the script tag holding the stream metadata.
pub const ON_METADATA: &str = "onMetaData";

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptData<'a> {
    /// Usually a string such as `onMetaData`
    pub name: Amf0Value<'a>,
    pub value: Amf0Value<'a>,
}

impl<'a> ScriptData<'a> {
    /// Decodes the name and value of a script tag payload.
    pub fn demux(data: &'a [u8], max_depth: usize) -> Result<Self, Amf0ReadError> {
        let mut decoder = Amf0Decoder::with_max_depth(data, max_depth);
        let name = decoder.decode()?;
        let value = decoder.decode()?;

        if !decoder.is_empty() {
            trace!(
                "Ignoring {} trailing bytes in script data",
                data.len() as u64 - decoder.position()
            );
        }

        Ok(Self { name, value })
    }

    pub fn is_metadata(&self) -> bool {
        self.name.as_str() == Some(ON_METADATA)
    }

    /// The metadata carried by an `onMetaData` tag.
    pub fn metadata(&self) -> Option<Metadata> {
        self.is_metadata()
            .then(|| Metadata::from_value(&DetailValue::from(&self.value)))
    }
}

/// Records the details of a script tag payload.
pub fn describe(data: &[u8], max_depth: usize, details: &mut TagDetails) {
    if data.is_empty() {
        return;
    }

    match ScriptData::demux(data, max_depth) {
        Ok(script) => {
            details.insert("Name", DetailValue::from(&script.name));
            let value = DetailValue::from(&script.value);
            if script.is_metadata() {
                details.insert("Type", "Metadata");
                details.insert("Metadata", value);
            } else {
                details.insert("Value", value);
            }
        }
        Err(e) => {
            debug!("Failed to decode script data: {}", e);
            details.insert("Parse Error", e.to_string());
        }
    }
}
