use std::fmt;

// @module: Bilingual subtitle track model

/// Single timed cue from one language track.
///
/// Times are milliseconds from the start of the track. `end_ms >= start_ms`
/// is assumed but not enforced; malformed timing from a source document is
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Cue text, possibly empty
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new<S: Into<String>>(start_ms: u64, end_ms: u64, text: S) -> Self {
        Cue {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// True when this cue occupies exactly the same time range as another
    pub fn same_moment(&self, other: &Cue) -> bool {
        self.start_ms == other.start_ms && self.end_ms == other.end_ms
    }

    /// True when this cue starts and ends strictly before another
    pub fn strictly_precedes(&self, other: &Cue) -> bool {
        self.start_ms < other.start_ms && self.end_ms < other.end_ms
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            format_time_range(self.start_ms, self.end_ms),
            self.text
        )
    }
}

/// Ordered cue list decoded from one transcript document.
///
/// The cue order is whatever the source document carried; tracks are never
/// re-sorted after construction.
#[derive(Debug, Clone)]
pub struct Track {
    /// Cues in document order
    pub cues: Vec<Cue>,

    /// Language code the track was decoded as
    pub language: String,
}

impl Track {
    /// Create an empty track for a language
    pub fn new<S: Into<String>>(language: S) -> Self {
        Track {
            cues: Vec::new(),
            language: language.into(),
        }
    }

    /// Create a track from already-decoded cues
    pub fn with_cues<S: Into<String>>(language: S, cues: Vec<Cue>) -> Self {
        Track {
            cues,
            language: language.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// One aligned row of the merged output: a time range plus the text each
/// language contributed at that position. An empty string means that
/// language had no cue there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCue {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Primary-language text, empty when absent
    pub primary: String,

    // @field: Secondary-language text, empty when absent
    pub secondary: String,
}

impl MergedCue {
    /// Row carrying both languages over one shared time range
    pub fn pair(start_ms: u64, end_ms: u64, primary: String, secondary: String) -> Self {
        MergedCue {
            start_ms,
            end_ms,
            primary,
            secondary,
        }
    }

    /// Row carrying only the primary language
    pub fn primary_only(cue: &Cue) -> Self {
        MergedCue {
            start_ms: cue.start_ms,
            end_ms: cue.end_ms,
            primary: cue.text.clone(),
            secondary: String::new(),
        }
    }

    /// Row carrying only the secondary language
    pub fn secondary_only(cue: &Cue) -> Self {
        MergedCue {
            start_ms: cue.start_ms,
            end_ms: cue.end_ms,
            primary: String::new(),
            secondary: cue.text.clone(),
        }
    }
}

/// Ordered merged rows ready for rendering
#[derive(Debug, Clone, Default)]
pub struct BilingualTrack {
    /// Merged rows in output order
    pub cues: Vec<MergedCue>,
}

impl BilingualTrack {
    pub fn new() -> Self {
        BilingualTrack { cues: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm).
///
/// The hour field widens past two digits instead of wrapping, so a track
/// longer than 24 hours still renders monotonically increasing timestamps.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format an SRT time range line body (without the trailing newline)
pub fn format_time_range(start_ms: u64, end_ms: u64) -> String {
    format!("{} --> {}", format_timestamp(start_ms), format_timestamp(end_ms))
}
