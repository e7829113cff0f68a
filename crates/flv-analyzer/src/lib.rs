//! Timestamp gap analysis for parsed FLV files.
//!
//! Video gaps are measured against the framerate announced in `onMetaData`.
//! Audio has no such announcement, so the most common interval between audio
//! tags is taken as the expected one. Tags following a gap much larger than
//! expected get a [`flv::TagAnalysis`] with an estimate of what was lost.
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

pub mod config;
pub mod gap;

pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use gap::{GapAnalyzer, GapSummary, StreamGapSummary};
