use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    version,
    about = "FLV container inspector",
    long_about = "Parses FLV files tag by tag and reports the header, the onMetaData\n\
                  properties and the decoded details of every audio, video and script tag.\n\
                  \n\
                  Timestamp jumps larger than the expected frame or packet interval are\n\
                  flagged together with an estimate of how much was dropped."
)]
pub struct CliArgs {
    /// FLV files to inspect
    #[arg(required = true, help = "Path to one or more FLV files")]
    pub files: Vec<PathBuf>,

    /// Report format
    #[arg(
        short,
        long,
        default_value = "text",
        help = "Output format: \"text\" for a readable listing, \"json\" for machine consumption"
    )]
    pub format: OutputFormat,

    /// Only list tags with a gap warning
    #[arg(long, help = "Restrict the tag listing to tags flagged by the gap analysis")]
    pub only_flagged: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable detailed debug logging")]
    pub verbose: bool,

    #[arg(
        long,
        default_value = "2.0",
        help = "Flag video gaps larger than this many frame intervals"
    )]
    pub video_gap_factor: f64,

    #[arg(
        long,
        default_value = "2.5",
        help = "Flag audio gaps larger than this many modal intervals"
    )]
    pub audio_gap_factor: f64,

    #[arg(
        long,
        default_value = "10",
        help = "Skip the audio gap analysis unless there are more audio tags than this"
    )]
    pub min_audio_tags: usize,

    #[arg(
        long,
        default_value = "64",
        help = "Maximum nesting depth of AMF0 values in script tags"
    )]
    pub max_amf_depth: usize,
}
