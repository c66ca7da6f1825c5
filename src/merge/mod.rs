/*!
 * Bilingual merge pipeline.
 *
 * This module turns two per-language cue tracks into one SubRip document:
 * - Credit-cue filtering (provider attribution lines in the primary track)
 * - Two-pointer alignment of the filtered primary track with the secondary
 * - SRT rendering with the synthetic attribution block
 *
 * # Architecture
 *
 * - `filter`: Drops provider-credit cues from a track
 * - `align`: Pairs cues across tracks by timestamp
 * - `render`: Serializes the aligned rows to SRT text
 * - `service`: Runs the three stages as one pipeline
 */

pub mod filter;
pub mod align;
pub mod render;
pub mod service;

// Re-export main entry points
pub use service::{MergeOptions, MergeReport, MergeService};
pub use align::merge_tracks;
pub use filter::filter_credit_cues;
pub use render::render_srt;
