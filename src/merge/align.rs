/*!
 * Timestamp alignment of two cue tracks.
 *
 * Transcripts for the same recording are timed against the same clock, so
 * cues covering the same utterance usually carry identical start and end
 * times. The merge walks both tracks front to back with one pointer each
 * and decides, cue pair by cue pair, which side to emit next.
 */

use crate::subtitle_track::{BilingualTrack, MergedCue, Track};

/// Merge a primary and a secondary track into one ordered bilingual track.
///
/// At each step the two front cues are compared:
/// - identical time range: emitted as one bilingual row, both pointers move;
/// - primary starts and ends strictly earlier: the primary cue is emitted
///   alone;
/// - anything else (including partial overlap and boundary ties): the
///   secondary cue is emitted alone. This favors the secondary track on
///   ambiguous timing; a primary cue held back this way is emitted on a
///   later iteration, so nothing is lost.
///
/// Once one track is exhausted the other is drained verbatim. Every input
/// cue lands in exactly one output row with its own timestamps; the merge
/// never invents or adjusts timing. Non-monotonic input is not detected,
/// the walk just processes cues in the order given.
pub fn merge_tracks(primary: &Track, secondary: &Track) -> BilingualTrack {
    let a = &primary.cues;
    let b = &secondary.cues;

    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        let p = &a[i];
        let s = &b[j];

        if p.same_moment(s) {
            merged.push(MergedCue::pair(
                p.start_ms,
                p.end_ms,
                p.text.clone(),
                s.text.clone(),
            ));
            i += 1;
            j += 1;
        } else if p.strictly_precedes(s) {
            merged.push(MergedCue::primary_only(p));
            i += 1;
        } else {
            merged.push(MergedCue::secondary_only(s));
            j += 1;
        }
    }

    for cue in &a[i..] {
        merged.push(MergedCue::primary_only(cue));
    }
    for cue in &b[j..] {
        merged.push(MergedCue::secondary_only(cue));
    }

    BilingualTrack { cues: merged }
}
