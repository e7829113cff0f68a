use std::collections::HashMap;

use flv::{FlvFile, FlvTag, FlvTagType, Metadata, StreamKind, TagAnalysis};
use serde::Serialize;
use tracing::debug;

use crate::config::AnalyzerConfig;

const VIDEO_REASON: &str = "Possible causes: insufficient encoder/streamer performance, network jitter or packet loss, encoder latency.";
const AUDIO_REASON: &str = "Possible causes: audio capture problems at the source, network jitter, server processing delay.";

/// Outcome of one stream's pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamGapSummary {
    pub expected_interval_ms: f64,
    pub threshold_ms: f64,
    /// Number of tags that were annotated
    pub flagged: usize,
    /// Sum of the estimated losses over all annotated tags
    pub estimated_loss: i64,
}

/// Outcome of [`GapAnalyzer::analyze`]. A stream is `None` when its pass did
/// not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GapSummary {
    pub video: Option<StreamGapSummary>,
    pub audio: Option<StreamGapSummary>,
}

impl GapSummary {
    pub fn flagged(&self) -> usize {
        [&self.video, &self.audio]
            .into_iter()
            .flatten()
            .map(|summary| summary.flagged)
            .sum()
    }
}

/// Flags tags whose timestamp jumped further than expected from the previous
/// tag of the same stream.
#[derive(Debug, Clone, Default)]
pub struct GapAnalyzer {
    config: AnalyzerConfig,
}

impl GapAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Annotates the tags of `file` in place.
    pub fn analyze(&self, file: &mut FlvFile) -> GapSummary {
        self.analyze_tags(&mut file.tags, &file.metadata)
    }

    /// Annotates `tags` in place. Only the `analysis` of a tag is touched;
    /// earlier annotations are replaced.
    pub fn analyze_tags(&self, tags: &mut [FlvTag], metadata: &Metadata) -> GapSummary {
        for tag in tags.iter_mut() {
            tag.analysis = None;
        }

        let video = metadata
            .framerate()
            .map(|framerate| self.analyze_video(tags, framerate));

        let audio = self.analyze_audio(tags);

        GapSummary { video, audio }
    }

    fn analyze_video(&self, tags: &mut [FlvTag], framerate: f64) -> StreamGapSummary {
        let expected = 1000.0 / framerate;
        let threshold = self.config.video_gap_factor * expected;

        let mut summary = StreamGapSummary {
            expected_interval_ms: expected,
            threshold_ms: threshold,
            flagged: 0,
            estimated_loss: 0,
        };

        let indices = stream_indices(tags, FlvTagType::Video);
        for pair in indices.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let gap = timestamp_gap(&tags[previous], &tags[current]);
            if gap as f64 <= threshold {
                continue;
            }

            let loss = estimate_loss(gap, expected);
            tags[current].analysis = Some(TagAnalysis {
                kind: StreamKind::Video,
                gap_ms: gap,
                expected_interval_ms: expected,
                estimated_loss: loss,
                warning: format!(
                    "Video timestamp jump of {gap}ms (expected ~{expected:.1}ms), possibly {loss} frames dropped."
                ),
                reason: VIDEO_REASON.to_owned(),
            });
            summary.flagged += 1;
            summary.estimated_loss = summary.estimated_loss.saturating_add(loss);
        }

        debug!(
            expected_interval_ms = expected,
            threshold_ms = threshold,
            flagged = summary.flagged,
            "Video gap analysis done"
        );
        summary
    }

    fn analyze_audio(&self, tags: &mut [FlvTag]) -> Option<StreamGapSummary> {
        let indices = stream_indices(tags, FlvTagType::Audio);
        if indices.len() <= self.config.min_audio_tags {
            debug!(
                "Skipping audio gap analysis, only {} audio tags",
                indices.len()
            );
            return None;
        }

        let gaps: Vec<i64> = indices
            .windows(2)
            .map(|pair| timestamp_gap(&tags[pair[0]], &tags[pair[1]]))
            .collect();
        let Some(modal) = modal_positive_gap(&gaps) else {
            debug!("Skipping audio gap analysis, no positive gaps");
            return None;
        };

        let expected = modal as f64;
        let threshold = self.config.audio_gap_factor * expected;

        let mut summary = StreamGapSummary {
            expected_interval_ms: expected,
            threshold_ms: threshold,
            flagged: 0,
            estimated_loss: 0,
        };

        for (pair, &gap) in indices.windows(2).zip(&gaps) {
            if gap as f64 <= threshold {
                continue;
            }

            let loss = estimate_loss(gap, expected);
            tags[pair[1]].analysis = Some(TagAnalysis {
                kind: StreamKind::Audio,
                gap_ms: gap,
                expected_interval_ms: expected,
                estimated_loss: loss,
                warning: format!(
                    "Audio timestamp jump of {gap}ms (expected ~{modal}ms), possibly {loss} audio packets dropped."
                ),
                reason: AUDIO_REASON.to_owned(),
            });
            summary.flagged += 1;
            summary.estimated_loss = summary.estimated_loss.saturating_add(loss);
        }

        debug!(
            expected_interval_ms = expected,
            threshold_ms = threshold,
            flagged = summary.flagged,
            "Audio gap analysis done"
        );
        Some(summary)
    }
}

fn stream_indices(tags: &[FlvTag], tag_type: FlvTagType) -> Vec<usize> {
    tags.iter()
        .enumerate()
        .filter(|(_, tag)| tag.tag_type == tag_type)
        .map(|(index, _)| index)
        .collect()
}

fn timestamp_gap(previous: &FlvTag, current: &FlvTag) -> i64 {
    current.timestamp_ms as i64 - previous.timestamp_ms as i64
}

/// Frames or packets missing from a gap, rounding halves to even.
fn estimate_loss(gap: i64, expected: f64) -> i64 {
    (gap as f64 / expected).round_ties_even() as i64 - 1
}

/// The most frequent positive gap. Ties go to the value seen first.
fn modal_positive_gap(gaps: &[i64]) -> Option<i64> {
    // gap -> (count, index of first occurrence)
    let mut counts: HashMap<i64, (usize, usize)> = HashMap::new();
    for (index, &gap) in gaps.iter().enumerate().filter(|(_, gap)| **gap > 0) {
        counts.entry(gap).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(gap, _)| gap)
}
