use anyhow::Result;
use log::{error, warn, info, debug};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::app_config::Config;
use crate::errors::AppError;
use crate::transcript::TranscriptDocument;
use crate::merge::{MergeOptions, MergeService};
use crate::language_utils;
use crate::file_utils::{self, FileManager, TranscriptPair};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

// @module: Application controller for transcript merging

/// One captured log line from a batch worker
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Outcome of merging one transcript pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Output written to the given path
    Written(PathBuf),
    /// Output already present and overwrite not forced
    SkippedExisting(PathBuf),
    /// Pipeline produced no text, nothing was written
    EmptyOutput,
}

/// Options for merging a single transcript pair
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit output path, wins over any derived name
    pub output: Option<PathBuf>,

    /// Title to derive the output filename from
    pub title: Option<String>,

    /// Overwrite an existing output file
    pub force_overwrite: bool,
}

/// Options for a batch run over directories
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Directory collecting all outputs; defaults to each pair's own directory
    pub output_dir: Option<PathBuf>,

    /// Title grouping outputs under a derived course folder
    pub title: Option<String>,

    /// Overwrite existing output files
    pub force_overwrite: bool,
}

struct BatchJob {
    pair: TranscriptPair,
    output_path: PathBuf,
}

/// Main application controller for transcript pair merging
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Merge pipeline built from the config
    merge_service: MergeService,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let merge_service = MergeService::with_options(MergeOptions::from(&config.merge));
        Ok(Self {
            config,
            merge_service,
        })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.primary_language.is_empty() && !self.config.secondary_language.is_empty()
    }

    /// Merge one transcript pair and write the SRT output.
    ///
    /// The output path is the explicit `output` option if given, else a
    /// filename derived from `title`, else `{stem}.{primary}-{secondary}.srt`
    /// next to the primary input. An existing output is only replaced with
    /// `force_overwrite`; a merge that renders to nothing writes no file.
    pub async fn run_pair(
        &self,
        primary_path: &Path,
        secondary_path: &Path,
        options: &RunOptions,
    ) -> Result<RunOutcome> {
        if !FileManager::file_exists(primary_path) {
            return Err(AppError::MissingInput(primary_path.to_path_buf()).into());
        }
        if !FileManager::file_exists(secondary_path) {
            return Err(AppError::MissingInput(secondary_path.to_path_buf()).into());
        }

        let output_path = self.pair_output_path(primary_path, options);
        if output_path.exists() && !options.force_overwrite {
            warn!(
                "Skipping pair, output already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(RunOutcome::SkippedExisting(output_path));
        }

        let primary = TranscriptDocument::load(primary_path)
            .map_err(AppError::from)?
            .into_track(self.config.primary_language.clone());
        let secondary = TranscriptDocument::load(secondary_path)
            .map_err(AppError::from)?
            .into_track(self.config.secondary_language.clone());
        debug!(
            "Loaded {:?} ({} cues) and {:?} ({} cues)",
            primary_path,
            primary.len(),
            secondary_path,
            secondary.len()
        );

        let report = self.merge_service.build(&primary, &secondary);
        if report.srt.is_empty() {
            warn!(
                "Merge of {:?} produced no cues, nothing to write",
                primary_path
            );
            return Ok(RunOutcome::EmptyOutput);
        }

        FileManager::write_atomic(&output_path, &report.srt)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        info!("Success: {}", output_path.display());
        Ok(RunOutcome::Written(output_path))
    }

    /// Run the workflow in batch mode over one or more directories.
    ///
    /// Transcript pairs are discovered recursively and merged concurrently,
    /// up to `concurrent_merges` at a time; pairs are independent, so a
    /// failing one never blocks the rest. Overlapping input directories are
    /// tolerated, each pair is processed once.
    pub async fn run_batch(&self, input_dirs: &[PathBuf], options: &BatchOptions) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        let primary_name = language_utils::get_language_name(&self.config.primary_language)
            .unwrap_or_else(|_| self.config.primary_language.clone());
        let secondary_name = language_utils::get_language_name(&self.config.secondary_language)
            .unwrap_or_else(|_| self.config.secondary_language.clone());
        info!(
            "Looking for {}/{} transcript pairs in {} directorie(s)",
            primary_name,
            secondary_name,
            input_dirs.len()
        );

        // Discover pairs per directory, dropping pairs already seen through
        // an earlier (possibly overlapping) directory
        let mut pairs: Vec<TranscriptPair> = Vec::new();
        let mut seen: HashSet<TranscriptPair> = HashSet::new();
        for dir in input_dirs {
            if !FileManager::dir_exists(dir) {
                return Err(AppError::MissingInput(dir.clone()).into());
            }
            let found = FileManager::find_transcript_pairs(
                dir,
                &self.config.primary_language,
                &self.config.secondary_language,
            )?;
            let (new_pairs, new_seen) = file_utils::remove_duplicates(&found, &seen);
            seen = new_seen;
            pairs.extend(new_pairs);
        }

        if pairs.is_empty() {
            return Err(AppError::NothingToMerge(input_dirs[0].clone()).into());
        }
        info!("Found {} transcript pair(s)", pairs.len());

        // Plan output paths up front; flat output layouts can collide when
        // two subdirectories share a lesson stem, first pair wins
        let mut jobs: Vec<BatchJob> = Vec::new();
        let mut claimed_outputs: HashSet<PathBuf> = HashSet::new();
        for pair in pairs {
            let output_path = self.batch_output_path(&pair, options);
            if !claimed_outputs.insert(output_path.clone()) {
                warn!(
                    "Skipping {:?}, output path {:?} already claimed by an earlier pair",
                    pair.primary, output_path
                );
                continue;
            }
            jobs.push(BatchJob { pair, output_path });
        }

        // Create a progress bar for batch processing
        let batch_pb = ProgressBar::new(jobs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        batch_pb.set_style(template_result.progress_chars("█▓▒░"));
        batch_pb.set_message("Merging pairs");

        // Create log capture for collecting issues across workers
        let log_capture: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

        let force_overwrite = options.force_overwrite;
        let mut results: Vec<(usize, String, Result<RunOutcome>)> =
            stream::iter(jobs.into_iter().enumerate())
                .map(|(index, job)| {
                    let pb = batch_pb.clone();
                    let logs = Arc::clone(&log_capture);
                    let run_options = RunOptions {
                        output: Some(job.output_path.clone()),
                        title: None,
                        force_overwrite,
                    };
                    async move {
                        let outcome = self
                            .run_pair(&job.pair.primary, &job.pair.secondary, &run_options)
                            .await;
                        match &outcome {
                            Err(e) => logs.lock().push(LogEntry {
                                level: "ERROR".to_string(),
                                message: format!("{:?}: {:#}", job.pair.primary, e),
                            }),
                            Ok(RunOutcome::EmptyOutput) => logs.lock().push(LogEntry {
                                level: "WARN".to_string(),
                                message: format!("{:?}: merge produced no cues", job.pair.primary),
                            }),
                            _ => {}
                        }
                        pb.inc(1);
                        (index, job.pair.stem.clone(), outcome)
                    }
                })
                .buffer_unordered(self.config.concurrent_merges)
                .collect()
                .await;

        // Finish the batch progress bar
        batch_pb.finish_with_message("Batch processing complete");

        // Restore discovery order for stable reporting
        results.sort_by_key(|(index, _, _)| *index);

        // Track success and failure counts
        let mut success_count = 0;
        let mut skip_count = 0;
        let mut empty_count = 0;
        let mut error_count = 0;
        for (_, stem, outcome) in &results {
            match outcome {
                Ok(RunOutcome::Written(_)) => success_count += 1,
                Ok(RunOutcome::SkippedExisting(_)) => skip_count += 1,
                Ok(RunOutcome::EmptyOutput) => empty_count += 1,
                Err(e) => {
                    error!("Error merging pair {}: {:#}", stem, e);
                    error_count += 1;
                }
            }
        }

        // Calculate and display the total elapsed time
        let duration = start_time.elapsed();

        // Give summary results - important for batch operations
        let summary_message = format!(
            "Batch processing completed: {} merged, {} skipped, {} empty, {} errors",
            success_count, skip_count, empty_count, error_count
        );
        info!("{}", summary_message);

        // Write summary and captured issues to a log file
        let log_dir = options.output_dir.as_deref().unwrap_or(&input_dirs[0]);
        let log_file_path = log_dir.join("submerge.issues.log").to_string_lossy().to_string();
        let context = format!(
            "Batch: {} ({})",
            input_dirs[0].display(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let mut batch_logs = vec![LogEntry {
            level: "INFO".to_string(),
            message: format!(
                "{} - Duration: {}",
                summary_message,
                Self::format_duration(duration)
            ),
        }];
        batch_logs.extend(log_capture.lock().iter().cloned());

        if let Err(e) = self.write_logs_to_file(&batch_logs, &log_file_path, &context) {
            warn!("Failed to write batch logs to file: {}", e);
        } else {
            info!("Batch processing logs written to {}", log_file_path);
        }

        Ok(())
    }

    /// Resolve the output path for a single-pair run
    fn pair_output_path(&self, primary_path: &Path, options: &RunOptions) -> PathBuf {
        if let Some(output) = &options.output {
            return output.clone();
        }

        let output_dir = primary_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        if let Some(title) = &options.title {
            return output_dir.join(format!("{}.srt", file_utils::clean_filename(title, false)));
        }

        FileManager::merged_output_path(
            primary_path,
            &output_dir,
            &self.config.primary_language,
            &self.config.secondary_language,
        )
    }

    /// Resolve the output path for one pair of a batch run
    fn batch_output_path(&self, pair: &TranscriptPair, options: &BatchOptions) -> PathBuf {
        let base = match (&options.output_dir, &options.title) {
            (Some(dir), Some(title)) => dir.join(file_utils::directory_name(title)),
            (Some(dir), None) => dir.clone(),
            (None, Some(title)) => PathBuf::from(file_utils::directory_name(title)),
            (None, None) => pair.primary.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };

        FileManager::merged_output_path(
            &pair.primary,
            &base,
            &self.config.primary_language,
            &self.config.secondary_language,
        )
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Write captured log entries to a log file
    fn write_logs_to_file(
        &self,
        logs: &[LogEntry],
        file_path: &str,
        batch_context: &str,
    ) -> Result<()> {
        let mut log_content = String::new();

        // Add header
        log_content.push_str(&format!(
            "Merge Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!("Context: {}\n\n", batch_context));

        // Add each log entry
        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        // Write to file
        FileManager::write_to_file(file_path, &log_content)?;

        Ok(())
    }
}
