use anyhow::{Result, Context};
use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::io::Write;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @const: Transcript filename pattern, `{stem}.{lang}.json`
static TRANSCRIPT_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)\.([A-Za-z]{2,3})\.json$").expect("Invalid transcript filename regex")
});

/// A transcript file discovered on disk, split into its naming parts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptFile {
    /// Full path of the file
    pub path: PathBuf,
    /// Directory the file lives in
    pub directory: PathBuf,
    /// Lesson stem, the filename without language suffix and extension
    pub stem: String,
    /// Language suffix from the filename
    pub language: String,
}

/// Two same-lesson transcript files in different languages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptPair {
    /// Primary-language transcript
    pub primary: PathBuf,
    /// Secondary-language transcript
    pub secondary: PathBuf,
    /// Shared lesson stem
    pub stem: String,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a string to a file through a temporary sibling, so readers
    /// never observe a half-written file
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        Self::ensure_dir(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        tmp.persist(path)
            .with_context(|| format!("Failed to move temporary file into place: {:?}", path))?;

        Ok(())
    }

    /// Split a transcript filename into its lesson stem and language suffix
    pub fn split_transcript_name(path: &Path) -> Option<(String, String)> {
        let name = path.file_name()?.to_str()?;
        let caps = TRANSCRIPT_FILE_REGEX.captures(name)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    /// Find all transcript files under a directory, recursively
    pub fn find_transcript_files<P: AsRef<Path>>(dir: P) -> Result<Vec<TranscriptFile>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if let Some((stem, language)) = Self::split_transcript_name(path) {
                result.push(TranscriptFile {
                    path: path.to_path_buf(),
                    directory: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
                    stem,
                    language,
                });
            }
        }

        Ok(result)
    }

    /// Find same-stem transcript pairs for the two configured languages.
    ///
    /// A pair is two files in the same directory sharing a lesson stem, one
    /// with a suffix matching the primary language and one matching the
    /// secondary. Suffix matching goes through ISO normalization, so
    /// `lecture.zh.json` pairs with `lecture.en.json` under `zho`/`eng`
    /// configuration just as well.
    pub fn find_transcript_pairs<P: AsRef<Path>>(
        dir: P,
        primary_language: &str,
        secondary_language: &str,
    ) -> Result<Vec<TranscriptPair>> {
        let files = Self::find_transcript_files(dir)?;

        let mut pairs = Vec::new();
        for file in &files {
            if !crate::language_utils::language_codes_match(&file.language, primary_language) {
                continue;
            }
            let partner = files.iter().find(|candidate| {
                candidate.path != file.path
                    && candidate.directory == file.directory
                    && candidate.stem == file.stem
                    && crate::language_utils::language_codes_match(
                        &candidate.language,
                        secondary_language,
                    )
            });
            match partner {
                Some(partner) => pairs.push(TranscriptPair {
                    primary: file.path.clone(),
                    secondary: partner.path.clone(),
                    stem: file.stem.clone(),
                }),
                None => warn!(
                    "No {} transcript found next to {:?}, skipping",
                    secondary_language, file.path
                ),
            }
        }

        pairs.sort_by(|a, b| a.primary.cmp(&b.primary));
        Ok(pairs)
    }

    /// Default output path for a merged pair: `{stem}.{primary}-{secondary}.srt`
    pub fn merged_output_path(
        primary_input: &Path,
        output_dir: &Path,
        primary_language: &str,
        secondary_language: &str,
    ) -> PathBuf {
        let stem = Self::split_transcript_name(primary_input)
            .map(|(stem, _)| stem)
            .unwrap_or_else(|| {
                primary_input
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string()
            });
        output_dir.join(format!("{}.{}-{}.srt", stem, primary_language, secondary_language))
    }
}

/// Sanitize a string for use as a filename.
///
/// With `minimal_change` only the characters filesystems cannot take are
/// rewritten: `:`, `/` and NUL become `-`, newlines are dropped. The full
/// cleanup additionally strips parentheses and trailing dots, turns spaces
/// into underscores, collapses `-_`/`_-` runs and keeps only ASCII
/// alphanumerics plus `-_.()`. HTML character references in the input are
/// decoded first, course titles scraped from pages tend to carry them.
pub fn clean_filename(s: &str, minimal_change: bool) -> String {
    let s = unescape_html_entities(s);

    let s = s
        .replace(':', "-")
        .replace('/', "-")
        .replace('\0', "-")
        .replace('\n', "");

    if minimal_change {
        return s;
    }

    let s = s.replace(['(', ')'], "");
    let s = s.trim_end_matches('.');
    let s = s.trim().replace(' ', "_");
    let s = s.replace("-_", "-").replace("_-", "-");
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
        .collect()
}

/// Directory-safe version of a name, with a fallback for names that
/// sanitize away to nothing
pub fn directory_name(initial_name: &str) -> String {
    let result = clean_filename(initial_name, false);
    if result.is_empty() {
        "course_folder".to_string()
    } else {
        result
    }
}

/// Order-preserving de-duplication against a caller-supplied seen set.
///
/// Returns the items not in `seen` and not repeated earlier in `items`,
/// plus the seen set extended with everything from `items`. Neither input
/// is modified.
pub fn remove_duplicates<T: Clone + Eq + Hash>(
    items: &[T],
    seen: &HashSet<T>,
) -> (Vec<T>, HashSet<T>) {
    let mut new_list = Vec::new();
    let mut new_seen = seen.clone();

    for item in items {
        if new_seen.insert(item.clone()) {
            new_list.push(item.clone());
        }
    }

    (new_list, new_seen)
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

fn unescape_html_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        // A reference is `&name;` or `&#digits;`, short and semicolon-closed
        let reference = tail[1..]
            .find(';')
            .filter(|end| *end > 0 && *end <= 8)
            .and_then(|end| decode_entity(&tail[1..=end]).map(|ch| (ch, end + 2)));
        match reference {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    out
}
