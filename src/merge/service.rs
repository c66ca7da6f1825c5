/*!
 * Merge service running the full pipeline.
 *
 * Single entry point for callers that want SRT text out of two decoded
 * tracks: credit filtering on the primary, timestamp alignment, rendering.
 */

use log::debug;

use crate::subtitle_track::Track;

use super::align::merge_tracks;
use super::filter::filter_credit_cues;
use super::render::render_srt;

/// Default substring identifying provider-credit cues
pub const DEFAULT_CREDIT_MARKER: &str = "字幕组";

/// Default attribution line for the synthetic first block
pub const DEFAULT_CREDIT_LINE: &str = "字幕制作/整理：Edx";

/// Options for one merge run
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Substring identifying credit cues to drop from the primary track;
    /// empty disables the filter
    pub credit_marker: String,

    /// Text of the synthetic attribution block
    pub credit_line: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            credit_marker: DEFAULT_CREDIT_MARKER.to_string(),
            credit_line: DEFAULT_CREDIT_LINE.to_string(),
        }
    }
}

impl From<&crate::app_config::MergeConfig> for MergeOptions {
    fn from(config: &crate::app_config::MergeConfig) -> Self {
        MergeOptions {
            credit_marker: config.credit_marker.clone(),
            credit_line: config.credit_line.clone(),
        }
    }
}

/// Counters and output of one merge run
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Rendered SRT text, empty when both tracks were empty
    pub srt: String,
    /// Primary cues that survived the credit filter
    pub primary_cues: usize,
    /// Secondary cues fed to the alignment
    pub secondary_cues: usize,
    /// Credit cues dropped from the primary track
    pub dropped_credits: usize,
    /// Bilingual rows produced by the alignment
    pub rows: usize,
}

impl MergeReport {
    /// One-line human summary for logs
    pub fn summary(&self) -> String {
        format!(
            "Merged {} + {} cues into {} rows ({} credit cue(s) dropped)",
            self.primary_cues, self.secondary_cues, self.rows, self.dropped_credits
        )
    }
}

/// Merge pipeline service
pub struct MergeService {
    options: MergeOptions,
}

impl MergeService {
    /// Create a service with default options
    pub fn new() -> Self {
        Self::with_options(MergeOptions::default())
    }

    /// Create a service with custom options
    pub fn with_options(options: MergeOptions) -> Self {
        MergeService { options }
    }

    /// Run filter, alignment and rendering over two decoded tracks
    pub fn build(&self, primary: &Track, secondary: &Track) -> MergeReport {
        let filtered = filter_credit_cues(primary, &self.options.credit_marker);
        let dropped_credits = primary.len() - filtered.len();

        let merged = merge_tracks(&filtered, secondary);
        let srt = render_srt(&merged, &self.options.credit_line);

        let report = MergeReport {
            srt,
            primary_cues: filtered.len(),
            secondary_cues: secondary.len(),
            dropped_credits,
            rows: merged.len(),
        };
        debug!("{}", report.summary());

        report
    }
}

impl Default for MergeService {
    fn default() -> Self {
        Self::new()
    }
}
