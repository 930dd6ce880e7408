//! 参照データディレクトリの一括処理
//!
//! `<name>_pose_data.json` を全部読み、理想区間を `<name>_ideal_segment.json` に書き出す。
//! 1ファイルの失敗で全体は止めない。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::segment::{extract_ideal_segment, Window};
use crate::session::{parse_session, to_json_pretty};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Extracted {
        output: PathBuf,
        window: Window,
        skipped_frames: usize,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn extracted(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Extracted { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.extracted()
    }

    /// 全ファイルで読み飛ばしたフレーム数の合計
    pub fn skipped_frames(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Extracted { skipped_frames, .. } => skipped_frames,
                FileOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// ディレクトリ内の対象ファイル（名前順）
pub fn find_session_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 入力ファイル名から出力ファイル名を作る
pub fn output_path_for(input: &Path, config: &Config) -> PathBuf {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(config.batch.input_suffix.as_str())
        .unwrap_or(file_name);
    config
        .batch
        .output_dir
        .join(format!("{}{}", stem, config.batch.output_suffix))
}

/// 1ファイル処理
///
/// 読み込み・書き込みの失敗はエラー、データ不足は `Skipped`。
pub fn process_file(input: &Path, config: &Config) -> Result<FileOutcome> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let session = parse_session(&content)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    if session.records.is_empty() {
        return Ok(FileOutcome::Skipped {
            reason: "no usable frames".to_string(),
        });
    }

    let segment = match extract_ideal_segment(&session.records, &config.segment) {
        Ok(segment) => segment,
        Err(e) => {
            return Ok(FileOutcome::Skipped {
                reason: e.to_string(),
            })
        }
    };

    let output = output_path_for(input, config);
    let json = to_json_pretty(&segment.frames)?;
    fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(FileOutcome::Extracted {
        output,
        window: segment.window,
        skipped_frames: session.summary.skipped_count(),
    })
}

pub fn run_batch(config: &Config) -> Result<BatchReport> {
    let batch = &config.batch;
    fs::create_dir_all(&batch.output_dir).with_context(|| {
        format!("Failed to create output directory {}", batch.output_dir.display())
    })?;

    let inputs = find_session_files(&batch.input_dir, &batch.input_suffix)?;
    tracing::info!(
        dir = %batch.input_dir.display(),
        files = inputs.len(),
        window_size = config.segment.window_size,
        penalty_factor = config.segment.penalty_factor(),
        "starting ideal segment extraction"
    );

    let mut report = BatchReport::default();
    for input in inputs {
        let outcome = match process_file(&input, config) {
            Ok(outcome) => outcome,
            Err(e) => FileOutcome::Skipped {
                reason: format!("{:#}", e),
            },
        };
        match &outcome {
            FileOutcome::Extracted { output, window, skipped_frames } => tracing::info!(
                input = %input.display(),
                output = %output.display(),
                start = window.start_index,
                total_cost = window.total_cost,
                skipped_frames,
                "ideal segment written"
            ),
            FileOutcome::Skipped { reason } => {
                tracing::warn!(input = %input.display(), reason = %reason, "file skipped")
            }
        }
        report.files.push(FileReport { input, outcome });
    }

    Ok(report)
}
