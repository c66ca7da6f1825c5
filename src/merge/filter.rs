/*!
 * Credit-cue filtering.
 *
 * Fan-subtitled primary tracks open and close with attribution cues naming
 * the subtitle group. Those cues have no counterpart in the secondary track
 * and would misalign the merge, so they are dropped before alignment.
 */

use log::debug;

use crate::subtitle_track::Track;

/// Drop every cue whose text contains the credit marker.
///
/// Matching is plain substring containment anywhere in the cue text; the
/// surviving cues keep their order and timestamps untouched. An empty marker
/// disables filtering and returns the track as-is.
pub fn filter_credit_cues(track: &Track, marker: &str) -> Track {
    if marker.is_empty() {
        debug!("Empty credit marker, skipping credit filter");
        return track.clone();
    }

    let before = track.len();
    let cues = track
        .cues
        .iter()
        .filter(|cue| !cue.text.contains(marker))
        .cloned()
        .collect();
    let filtered = Track::with_cues(track.language.clone(), cues);

    let dropped = before - filtered.len();
    if dropped > 0 {
        debug!(
            "Dropped {} credit cue(s) matching {:?} from {} track",
            dropped, marker, track.language
        );
    }

    filtered
}
