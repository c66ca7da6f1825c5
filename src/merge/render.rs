/*!
 * SRT rendering of a merged bilingual track.
 *
 * Produces numbered SubRip blocks separated by blank lines, prefixed with a
 * synthetic attribution block. Rows whose two texts are both provider
 * placeholders ("null"/"none") are dropped entirely: no block, no index.
 */

use crate::subtitle_track::{BilingualTrack, format_time_range};

/// Values some transcript providers emit in place of real cue text
const PLACEHOLDER_VALUES: [&str; 2] = ["null", "none"];

fn is_placeholder(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PLACEHOLDER_VALUES.contains(&lowered.as_str())
}

/// Render a bilingual track as SRT text.
///
/// The attribution block is always block 1 and spans from zero to one tenth
/// of the first row's end time. The first emitted row has its displayed
/// start pinned to that same boundary so the attribution never overlaps it;
/// every later row keeps its own start. A row whose two texts are both
/// empty emits no block but still counts as the first row for the pinned
/// start.
///
/// Cue text is emitted as-is apart from one cleanup: the HTML-escaped
/// apostrophe `&#39;` becomes `'`. Rows carrying both languages stack the
/// primary line above the secondary one.
///
/// An empty track renders to an empty string. Blocks are joined with a
/// single blank line and the result carries no trailing newline.
pub fn render_srt(track: &BilingualTrack, credit_line: &str) -> String {
    if track.is_empty() {
        return String::new();
    }

    let mut blocks: Vec<String> = Vec::with_capacity(track.len() + 1);

    // Attribution block, pinned to the opening sliver of the timeline
    let credit_end_ms = track.cues[0].end_ms / 10;
    blocks.push(format!(
        "{}\n{}\n{}",
        blocks.len() + 1,
        format_time_range(0, credit_end_ms),
        credit_line
    ));

    let mut first_block_pending = true;
    for row in &track.cues {
        if is_placeholder(&row.primary) && is_placeholder(&row.secondary) {
            continue;
        }

        // The pinned start is consumed by the first surviving row even if
        // that row ends up emitting nothing.
        let time_range = if first_block_pending {
            first_block_pending = false;
            format_time_range(credit_end_ms, row.end_ms)
        } else {
            format_time_range(row.start_ms, row.end_ms)
        };

        let primary = row.primary.replace("&#39;", "'");
        let secondary = row.secondary.replace("&#39;", "'");

        let body = if !primary.is_empty() && !secondary.is_empty() {
            format!("{}\n{}", primary, secondary)
        } else if !primary.is_empty() {
            primary
        } else if !secondary.is_empty() {
            secondary
        } else {
            continue;
        };

        blocks.push(format!("{}\n{}\n{}", blocks.len() + 1, time_range, body));
    }

    blocks.join("\n\n")
}
