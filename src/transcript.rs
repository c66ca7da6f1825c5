/*!
 * Transcript document decoding.
 *
 * edX course videos expose their transcripts as JSON objects holding three
 * parallel arrays keyed by cue index: start times, end times (both in
 * milliseconds) and cue text. This module decodes those documents and turns
 * them into ordered cue tracks. Extra keys in the document are ignored;
 * the three arrays are required.
 */

use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::errors::TranscriptError;
use crate::subtitle_track::{Cue, Track};

/// One decoded transcript document
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    /// Cue start times in ms
    pub start: Vec<u64>,

    /// Cue end times in ms
    pub end: Vec<u64>,

    /// Cue texts
    pub text: Vec<String>,
}

impl TranscriptDocument {
    /// Decode a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TranscriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and decode a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TranscriptError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TranscriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| TranscriptError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Convert the parallel arrays into an ordered cue track.
    ///
    /// Ragged documents, where the three arrays disagree on length, are
    /// accepted and truncated to the shortest array; the surplus entries
    /// are dropped with a warning. Cue order and timestamps are carried
    /// over unchanged.
    pub fn into_track<S: Into<String>>(self, language: S) -> Track {
        let start_len = self.start.len();
        let end_len = self.end.len();
        let text_len = self.text.len();
        let len = start_len.min(end_len).min(text_len);
        if start_len != len || end_len != len || text_len != len {
            warn!(
                "Transcript arrays have uneven lengths (start={}, end={}, text={}), keeping the first {} cue(s)",
                start_len, end_len, text_len, len
            );
        }

        let cues = self
            .start
            .into_iter()
            .zip(self.end)
            .zip(self.text)
            .map(|((start_ms, end_ms), text)| Cue {
                start_ms,
                end_ms,
                text,
            })
            .collect();
        Track::with_cues(language, cues)
    }
}
