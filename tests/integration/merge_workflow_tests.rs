/*!
 * Integration tests for the transcript merge workflow
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tokio_test;

use submerge::app_controller::{BatchOptions, Controller, RunOptions, RunOutcome};
use submerge::errors::AppError;
use crate::common;

/// Expected SRT output for the pair written by common::create_transcript_pair
const EXPECTED_SRT: &str = "1\n00:00:00,000 --> 00:00:00,300\n字幕制作/整理：Edx\n\n\
                            2\n00:00:00,300 --> 00:00:03,000\n你好\nHello\n\n\
                            3\n00:00:04,000 --> 00:00:07,000\n再见\nGoodbye";

/// Test the full single-pair workflow from JSON files to SRT output
#[test]
fn test_run_pair_withValidPair_shouldWriteExpectedSrt() -> Result<()> {
    // 1. Create a transcript pair on disk
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let (primary, secondary) = common::create_transcript_pair(&root, "lecture-01")?;

    // 2. Merge it with the default configuration
    let controller = Controller::new_for_test()?;
    let outcome = tokio_test::block_on(async {
        controller
            .run_pair(&primary, &secondary, &RunOptions::default())
            .await
    })?;

    // 3. The output lands next to the primary input under the derived name
    let expected_path = root.join("lecture-01.zh-en.srt");
    assert_eq!(outcome, RunOutcome::Written(expected_path.clone()));
    assert!(expected_path.exists(), "Output file should exist");

    // 4. And its content matches the expected SRT exactly
    let content = fs::read_to_string(&expected_path)?;
    assert_eq!(content, EXPECTED_SRT);

    Ok(())
}

/// Test that an explicit output path wins over the derived name
#[test]
fn test_run_pair_withExplicitOutput_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let (primary, secondary) = common::create_transcript_pair(&root, "lecture-01")?;
    let output = root.join("custom").join("merged.srt");

    let controller = Controller::new_for_test()?;
    let options = RunOptions {
        output: Some(output.clone()),
        ..RunOptions::default()
    };
    tokio_test::block_on(async { controller.run_pair(&primary, &secondary, &options).await })?;

    assert!(output.exists());
    assert!(!root.join("lecture-01.zh-en.srt").exists());

    Ok(())
}

/// Test that a title derives a cleaned output filename
#[test]
fn test_run_pair_withTitle_shouldDeriveCleanedFilename() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let (primary, secondary) = common::create_transcript_pair(&root, "lecture-01")?;

    let controller = Controller::new_for_test()?;
    let options = RunOptions {
        title: Some("Intro: Lesson (1)".to_string()),
        ..RunOptions::default()
    };
    tokio_test::block_on(async { controller.run_pair(&primary, &secondary, &options).await })?;

    assert!(root.join("Intro-Lesson_1.srt").exists());

    Ok(())
}

/// Test that an existing output is skipped unless overwrite is forced
#[test]
fn test_run_pair_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let (primary, secondary) = common::create_transcript_pair(&root, "lecture-01")?;
    let output = common::create_test_file(&root, "lecture-01.zh-en.srt", "old content")?;

    let controller = Controller::new_for_test()?;

    // 1. Without force the pair is skipped and the file untouched
    let outcome = tokio_test::block_on(async {
        controller
            .run_pair(&primary, &secondary, &RunOptions::default())
            .await
    })?;
    assert_eq!(
        outcome,
        RunOutcome::SkippedExisting(output.clone())
    );
    assert_eq!(fs::read_to_string(&output)?, "old content");

    // 2. With force the file is replaced by the merged output
    let options = RunOptions {
        force_overwrite: true,
        ..RunOptions::default()
    };
    let outcome = tokio_test::block_on(async {
        controller.run_pair(&primary, &secondary, &options).await
    })?;
    assert!(matches!(outcome, RunOutcome::Written(_)));
    assert_eq!(fs::read_to_string(&output)?, EXPECTED_SRT);

    Ok(())
}

/// Test that an empty merge writes no file
#[test]
fn test_run_pair_withEmptyTranscripts_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let primary = common::create_test_transcript(&root, "empty.zh.json", &[], &[], &[])?;
    let secondary = common::create_test_transcript(&root, "empty.en.json", &[], &[], &[])?;

    let controller = Controller::new_for_test()?;
    let outcome = tokio_test::block_on(async {
        controller
            .run_pair(&primary, &secondary, &RunOptions::default())
            .await
    })?;

    assert_eq!(outcome, RunOutcome::EmptyOutput);
    assert!(!root.join("empty.zh-en.srt").exists());

    Ok(())
}

/// Test that a missing input classifies as a missing-input error
#[test]
fn test_run_pair_withMissingInput_shouldClassifyError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let secondary = common::create_test_transcript(&root, "only.en.json", &[0], &[1000], &["hi"])?;
    let missing = root.join("only.zh.json");

    let controller = Controller::new_for_test()?;
    let result = tokio_test::block_on(async {
        controller
            .run_pair(&missing, &secondary, &RunOptions::default())
            .await
    });

    let error = result.expect_err("Missing primary input should fail");
    let app_error = error
        .downcast_ref::<AppError>()
        .expect("Error should classify as an AppError");
    assert!(matches!(app_error, AppError::MissingInput(_)));
    assert_eq!(app_error.exit_code(), 3);

    Ok(())
}

/// Test that provider credit cues are dropped from the merged output
#[test]
fn test_run_pair_withCreditCue_shouldDropItFromOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let primary = common::create_test_transcript(
        &root,
        "lesson.zh.json",
        &[0, 0],
        &[1000, 1000],
        &["本视频由某字幕组整理", "你好"],
    )?;
    let secondary =
        common::create_test_transcript(&root, "lesson.en.json", &[0], &[1000], &["hello"])?;

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(async {
        controller
            .run_pair(&primary, &secondary, &RunOptions::default())
            .await
    })?;

    let content = fs::read_to_string(root.join("lesson.zh-en.srt"))?;
    assert!(!content.contains("字幕组整理"), "Credit cue should be filtered out");
    assert!(content.contains("你好\nhello"));

    Ok(())
}

/// Test batch processing over a course directory tree
#[test]
fn test_run_batch_withCourseTree_shouldMergeAllPairs() -> Result<()> {
    // 1. Build a two-week course tree with one unpaired transcript
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let week1 = root.join("week1");
    let week2 = root.join("week2");
    fs::create_dir(&week1)?;
    fs::create_dir(&week2)?;
    common::create_transcript_pair(&week1, "lesson-a")?;
    common::create_transcript_pair(&week2, "lesson-b")?;
    common::create_test_transcript(&week2, "lonely.zh.json", &[0], &[1000], &["你好"])?;

    // 2. Run the batch with outputs next to their inputs
    let controller = Controller::new_for_test()?;
    tokio_test::block_on(async {
        controller
            .run_batch(&[root.clone()], &BatchOptions::default())
            .await
    })?;

    // 3. Each pair produced its own output, the unpaired file none
    assert!(week1.join("lesson-a.zh-en.srt").exists());
    assert!(week2.join("lesson-b.zh-en.srt").exists());
    assert!(!week2.join("lonely.zh-en.srt").exists());

    // 4. A batch log summarizing the run lands in the input directory
    assert!(root.join("submerge.issues.log").exists());

    Ok(())
}

/// Test batch processing into a collecting output directory
#[test]
fn test_run_batch_withOutputDir_shouldCollectOutputsThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let week1 = root.join("week1");
    let week2 = root.join("week2");
    fs::create_dir(&week1)?;
    fs::create_dir(&week2)?;
    common::create_transcript_pair(&week1, "lesson-a")?;
    common::create_transcript_pair(&week2, "lesson-b")?;
    let out_dir = temp_dir.path().join("merged");

    let controller = Controller::new_for_test()?;
    let options = BatchOptions {
        output_dir: Some(out_dir.clone()),
        ..BatchOptions::default()
    };
    tokio_test::block_on(async { controller.run_batch(&[root], &options).await })?;

    assert!(out_dir.join("lesson-a.zh-en.srt").exists());
    assert!(out_dir.join("lesson-b.zh-en.srt").exists());

    Ok(())
}

/// Test that colliding flat output names keep only the first pair
#[test]
fn test_run_batch_withCollidingStems_shouldKeepFirstPairOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let week1 = root.join("week1");
    let week2 = root.join("week2");
    fs::create_dir(&week1)?;
    fs::create_dir(&week2)?;
    common::create_transcript_pair(&week1, "lesson")?;
    common::create_transcript_pair(&week2, "lesson")?;
    let out_dir = temp_dir.path().join("merged");

    let controller = Controller::new_for_test()?;
    let options = BatchOptions {
        output_dir: Some(out_dir.clone()),
        ..BatchOptions::default()
    };
    tokio_test::block_on(async { controller.run_batch(&[root], &options).await })?;

    let srt_files: Vec<_> = fs::read_dir(&out_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "srt"))
        .collect();
    assert_eq!(srt_files.len(), 1, "Colliding pairs should produce one output");

    Ok(())
}

/// Test that a title groups batch outputs under a derived course folder
#[test]
fn test_run_batch_withTitle_shouldGroupUnderCourseFolder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_transcript_pair(&root, "lesson-a")?;
    let out_dir = temp_dir.path().join("merged");

    let controller = Controller::new_for_test()?;
    let options = BatchOptions {
        output_dir: Some(out_dir.clone()),
        title: Some("My Course: Basics".to_string()),
        ..BatchOptions::default()
    };
    tokio_test::block_on(async { controller.run_batch(&[root], &options).await })?;

    assert!(out_dir.join("My_Course-Basics").join("lesson-a.zh-en.srt").exists());

    Ok(())
}

/// Test that a batch over a directory without pairs classifies the error
#[test]
fn test_run_batch_withNoPairs_shouldClassifyAsNothingToMerge() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_test_file(&root, "notes.txt", "no transcripts here")?;

    let controller = Controller::new_for_test()?;
    let result = tokio_test::block_on(async {
        controller
            .run_batch(&[root], &BatchOptions::default())
            .await
    });

    let error = result.expect_err("Batch without pairs should fail");
    let app_error = error
        .downcast_ref::<AppError>()
        .expect("Error should classify as an AppError");
    assert!(matches!(app_error, AppError::NothingToMerge(_)));
    assert_eq!(app_error.exit_code(), 6);

    Ok(())
}

/// Test that overlapping input directories process each pair once
#[test]
fn test_run_batch_withOverlappingDirs_shouldProcessPairsOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_transcript_pair(&root, "lesson-a")?;

    let controller = Controller::new_for_test()?;
    let dirs = vec![root.clone(), root.clone()];
    tokio_test::block_on(async {
        controller.run_batch(&dirs, &BatchOptions::default()).await
    })?;

    let output = root.join("lesson-a.zh-en.srt");
    assert!(output.exists());
    assert_eq!(fs::read_to_string(&output)?, EXPECTED_SRT);

    Ok(())
}

/// Test that a missing input directory classifies the error
#[test]
fn test_run_batch_withMissingDirectory_shouldClassifyError() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let missing = PathBuf::from("/definitely/not/a/real/course/dir");

    let result = tokio_test::block_on(async {
        controller
            .run_batch(&[missing], &BatchOptions::default())
            .await
    });

    let error = result.expect_err("Missing directory should fail");
    let app_error = error
        .downcast_ref::<AppError>()
        .expect("Error should classify as an AppError");
    assert_eq!(app_error.exit_code(), 3);

    Ok(())
}

/// Test that rerunning a batch without force leaves outputs alone
#[test]
fn test_run_batch_withSecondRun_shouldSkipExistingOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_transcript_pair(&root, "lesson-a")?;

    let controller = Controller::new_for_test()?;
    tokio_test::block_on(async {
        controller
            .run_batch(&[root.clone()], &BatchOptions::default())
            .await
    })?;

    // Second pass finds every output in place and still reports success
    tokio_test::block_on(async {
        controller
            .run_batch(&[root.clone()], &BatchOptions::default())
            .await
    })?;

    assert_eq!(
        fs::read_to_string(root.join("lesson-a.zh-en.srt"))?,
        EXPECTED_SRT
    );

    Ok(())
}
