use std::io::Write;
use std::path::Path;

use flv::audio::SoundFormat;
use flv::video::VideoCodecId;
use flv::{FlvFile, FlvHeader, FlvTag, Metadata};
use flv_analyzer::GapSummary;
use serde::Serialize;

use crate::config::ProgramConfig;
use crate::error::AppError;

const NOT_AVAILABLE: &str = "N/A";

/// Format of the report written for every file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable listing
    Text,
    /// One pretty printed JSON document per file
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    header: &'a FlvHeader,
    metadata: &'a Metadata,
    gaps: &'a GapSummary,
    tags: Vec<&'a FlvTag>,
}

/// Writes the report for one parsed and analyzed file.
pub fn write_report(
    out: &mut impl Write,
    path: &Path,
    file: &FlvFile,
    summary: &GapSummary,
    config: &ProgramConfig,
) -> Result<(), AppError> {
    match config.output_format {
        OutputFormat::Text => write_text(out, path, file, config.only_flagged)?,
        OutputFormat::Json => {
            let report = JsonReport {
                file: path.display().to_string(),
                header: &file.header,
                metadata: &file.metadata,
                gaps: summary,
                tags: file
                    .tags
                    .iter()
                    .filter(|tag| !config.only_flagged || tag.analysis.is_some())
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text(
    out: &mut impl Write,
    path: &Path,
    file: &FlvFile,
    only_flagged: bool,
) -> std::io::Result<()> {
    let header = &file.header;
    writeln!(out, "File: {}", path.display())?;
    writeln!(
        out,
        "Version: {} | Audio: {} | Video: {} | Header Size: {}",
        header.version,
        yes_no(header.has_audio),
        yes_no(header.has_video),
        header.data_offset
    )?;
    if let Some(duration) = file
        .metadata
        .duration()
        .filter(|d| d.is_finite() && *d > 0.0)
    {
        writeln!(out, "Duration: {}", format_duration(duration))?;
    }
    writeln!(
        out,
        "Tags: {} (video {}, audio {}, script {})",
        file.tags.len(),
        file.video_tags().count(),
        file.audio_tags().count(),
        file.tags.iter().filter(|tag| tag.is_script()).count()
    )?;

    writeln!(out)?;
    writeln!(out, "--- Media Info ---")?;
    let rows = media_info(&file.metadata);
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in &rows {
        writeln!(out, "{name:<width$} | {value}")?;
    }

    writeln!(out)?;
    writeln!(out, "--- Tags ---")?;
    for (index, tag) in file.tags.iter().enumerate() {
        if only_flagged && tag.analysis.is_none() {
            continue;
        }
        writeln!(
            out,
            "#{} 0x{:08X} {} size={} timestamp={} ms",
            index + 1,
            tag.offset,
            tag.tag_type,
            tag.data_size,
            tag.timestamp_ms
        )?;
        if let Some(analysis) = &tag.analysis {
            writeln!(out, "    Analysis: {}", analysis.warning)?;
        }
        for (key, value) in tag.details.iter() {
            writeln!(out, "    {key}: {value}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "--- Timestamp Gap Analysis ---")?;
    let flagged: Vec<_> = file
        .tags
        .iter()
        .enumerate()
        .filter_map(|(index, tag)| tag.analysis.as_ref().map(|analysis| (index, tag, analysis)))
        .collect();
    if flagged.is_empty() {
        writeln!(out, "No obvious timestamp jumps or frame drops detected.")?;
    } else {
        writeln!(out, "Detected {} problematic tags:", flagged.len())?;
        for (index, tag, analysis) in flagged {
            writeln!(
                out,
                "Tag #{} ({} @ {} ms):",
                index + 1,
                tag.tag_type,
                tag.timestamp_ms
            )?;
            writeln!(out, "  - Warning: {}", analysis.warning)?;
            writeln!(out, "  - Reason: {}", analysis.reason)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn media_info(metadata: &Metadata) -> Vec<(&'static str, String)> {
    let raw = |key: &str| {
        metadata
            .get(key)
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |value| value.to_string())
    };

    let video_codec = metadata
        .video_codec_id()
        .and_then(VideoCodecId::from_metadata)
        .map_or_else(|| NOT_AVAILABLE.to_owned(), |codec| codec.to_string());
    let audio_codec = metadata
        .audio_codec_id()
        .and_then(SoundFormat::from_metadata)
        .map_or_else(|| NOT_AVAILABLE.to_owned(), |format| format.to_string());
    let channels = if metadata.stereo().unwrap_or(false) {
        "Stereo"
    } else {
        "Mono"
    };

    vec![
        ("Video Width", raw("width")),
        ("Video Height", raw("height")),
        ("Video Framerate", raw("framerate")),
        ("Video Bitrate (kbps)", raw("videodatarate")),
        ("Video Codec", video_codec),
        ("Audio Sample Rate (Hz)", raw("audiosamplerate")),
        ("Audio Channels", channels.to_owned()),
        ("Audio Bitrate (kbps)", raw("audiodatarate")),
        ("Audio Codec", audio_codec),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Formats seconds as `mm:ss.ss`.
pub fn format_duration(seconds: f64) -> String {
    let minutes = seconds.div_euclid(60.0) as u64;
    let seconds = seconds.rem_euclid(60.0);
    format!("{minutes:02}:{seconds:05.2}")
}
