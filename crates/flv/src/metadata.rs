use serde::Serialize;

use crate::details::{DetailValue, TagDetails};

/// Properties of the first `onMetaData` script tag.
///
/// Values are converted to [`DetailValue`]s: objects and ECMA arrays both
/// become maps, and unsupported AMF0 markers become descriptive strings. The
/// typed accessors return `None` for absent keys and for values of the wrong
/// type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    properties: TagDetails,
}

impl Metadata {
    pub fn new(properties: TagDetails) -> Self {
        Self { properties }
    }

    /// Builds metadata from the decoded `onMetaData` value. Anything other
    /// than an object or ECMA array gives empty metadata.
    pub fn from_value(value: &DetailValue) -> Self {
        match value {
            DetailValue::Map(properties) => Self::new(properties.clone()),
            _ => Self::default(),
        }
    }

    pub fn properties(&self) -> &TagDetails {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DetailValue::as_number)
    }

    /// Duration in seconds
    pub fn duration(&self) -> Option<f64> {
        self.number("duration")
    }

    pub fn width(&self) -> Option<f64> {
        self.number("width")
    }

    pub fn height(&self) -> Option<f64> {
        self.number("height")
    }

    /// Frames per second, only when finite and positive.
    pub fn framerate(&self) -> Option<f64> {
        self.number("framerate")
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    pub fn video_codec_id(&self) -> Option<f64> {
        self.number("videocodecid")
    }

    /// Video bitrate in kbps
    pub fn video_data_rate(&self) -> Option<f64> {
        self.number("videodatarate")
    }

    /// Sample rate in Hz, truncated towards zero.
    pub fn audio_sample_rate(&self) -> Option<i64> {
        self.number("audiosamplerate")
            .filter(|rate| rate.is_finite())
            .map(|rate| rate as i64)
    }

    pub fn audio_codec_id(&self) -> Option<f64> {
        self.number("audiocodecid")
    }

    /// Audio bitrate in kbps
    pub fn audio_data_rate(&self) -> Option<f64> {
        self.number("audiodatarate")
    }

    /// Whether the audio is stereo. Numbers are accepted as flags, nonzero
    /// meaning stereo.
    pub fn stereo(&self) -> Option<bool> {
        match self.get("stereo")? {
            DetailValue::Bool(stereo) => Some(*stereo),
            DetailValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }
}
