use std::fmt::Display;

use amf0::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest nesting of AMF0 objects and arrays accepted in script data
    pub max_amf_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_amf_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Display for ParserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParserConfig {{ max_amf_depth: {} }}", self.max_amf_depth)
    }
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Values below 1 are raised to 1 so that the top level metadata object
    /// can still be read.
    pub fn max_amf_depth(mut self, max_amf_depth: usize) -> Self {
        self.config.max_amf_depth = max_amf_depth.max(1);
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
