use flv::ParserConfig;
use flv_analyzer::AnalyzerConfig;

use crate::cli::CliArgs;
use crate::output::OutputFormat;

/// Configuration for the entire program
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// How script data is decoded
    pub parser_config: ParserConfig,

    /// When timestamp gaps are flagged
    pub analyzer_config: AnalyzerConfig,

    /// Output format to use
    pub output_format: OutputFormat,

    /// Whether the tag listing only shows flagged tags
    pub only_flagged: bool,
}

impl From<&CliArgs> for ProgramConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            parser_config: ParserConfig::builder()
                .max_amf_depth(args.max_amf_depth)
                .build(),
            analyzer_config: AnalyzerConfig::builder()
                .video_gap_factor(args.video_gap_factor)
                .audio_gap_factor(args.audio_gap_factor)
                .min_audio_tags(args.min_audio_tags)
                .build(),
            output_format: args.format,
            only_flagged: args.only_flagged,
        }
    }
}
