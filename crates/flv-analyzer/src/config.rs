use std::fmt::Display;

/// Thresholds used by the [`GapAnalyzer`](crate::GapAnalyzer).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// A video gap is flagged once it exceeds this many frame intervals
    pub video_gap_factor: f64,
    /// An audio gap is flagged once it exceeds this many modal intervals
    pub audio_gap_factor: f64,
    /// The audio pass only runs with more audio tags than this
    pub min_audio_tags: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            video_gap_factor: 2.0,
            audio_gap_factor: 2.5,
            min_audio_tags: 10,
        }
    }
}

impl Display for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AnalyzerConfig {{ video_gap_factor: {}, audio_gap_factor: {}, min_audio_tags: {} }}",
            self.video_gap_factor, self.audio_gap_factor, self.min_audio_tags
        )
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn video_gap_factor(mut self, factor: f64) -> Self {
        self.config.video_gap_factor = factor;
        self
    }

    pub fn audio_gap_factor(mut self, factor: f64) -> Self {
        self.config.audio_gap_factor = factor;
        self
    }

    pub fn min_audio_tags(mut self, min_audio_tags: usize) -> Self {
        self.config.min_audio_tags = min_audio_tags;
        self
    }

    pub fn build(self) -> AnalyzerConfig {
        self.config
    }
}
