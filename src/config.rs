use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::angle::core_joint_names;
use crate::pose::LandmarkIndex;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub segment: SegmentConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    /// trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 理想区間抽出の設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentConfig {
    /// ウィンドウ長（フレーム数）。30fps なら 25 で約0.8秒
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// 角度変化を見る関節
    #[serde(default = "core_joint_names")]
    pub important_joints: Vec<String>,
    /// 可視性を見るランドマークID
    #[serde(default = "default_important_landmarks")]
    pub important_landmarks: Vec<usize>,
    /// 可視性ペナルティ係数。未指定なら 関節数 * 50
    #[serde(default)]
    pub visibility_penalty_factor: Option<f64>,
}

/// ライブ比較の設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareConfig {
    #[serde(default = "core_joint_names")]
    pub joints: Vec<String>,
    /// 距離ベース一致度で使うランドマークID（耳は含めない）
    #[serde(default = "default_compare_landmarks")]
    pub landmarks: Vec<usize>,
    /// 距離ベース一致度で使う可視性閾値
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// 参照動画のフレームレート
    #[serde(default = "default_reference_fps")]
    pub reference_fps: f64,
}

/// ディレクトリ一括処理の設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    #[serde(default = "default_data_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_data_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_input_suffix")]
    pub input_suffix: String,
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_window_size() -> usize { 25 }
fn default_visibility_threshold() -> f64 { 0.7 }
fn default_reference_fps() -> f64 { 30.0 }
fn default_data_dir() -> PathBuf { PathBuf::from("reference_data") }
fn default_input_suffix() -> String { "_pose_data.json".to_string() }
fn default_output_suffix() -> String { "_ideal_segment.json".to_string() }

fn default_important_landmarks() -> Vec<usize> {
    use LandmarkIndex::*;
    [
        Nose, LeftEar, RightEar,
        LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
        LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
    ]
    .iter()
    .map(|idx| idx.id())
    .collect()
}

fn default_compare_landmarks() -> Vec<usize> {
    use LandmarkIndex::*;
    [
        Nose,
        LeftShoulder, RightShoulder, LeftElbow, RightElbow, LeftWrist, RightWrist,
        LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
    ]
    .iter()
    .map(|idx| idx.id())
    .collect()
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            important_joints: core_joint_names(),
            important_landmarks: default_important_landmarks(),
            visibility_penalty_factor: None,
        }
    }
}

impl SegmentConfig {
    /// 可視性の欠落が角度変化と同じスケールで効くよう、関節数に比例させる
    pub fn penalty_factor(&self) -> f64 {
        self.visibility_penalty_factor
            .unwrap_or(self.important_joints.len() as f64 * 50.0)
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            joints: core_joint_names(),
            landmarks: default_compare_landmarks(),
            visibility_threshold: default_visibility_threshold(),
            reference_fps: default_reference_fps(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_data_dir(),
            output_dir: default_data_dir(),
            input_suffix: default_input_suffix(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segment: SegmentConfig::default(),
            compare: CompareConfig::default(),
            batch: BatchConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルが無い・読めない場合は既定値
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment.window_size == 0 {
            bail!("segment.window_size must be at least 1");
        }
        if self.segment.penalty_factor() < 0.0 {
            bail!("segment.visibility_penalty_factor must not be negative");
        }
        if !(0.0..=1.0).contains(&self.compare.visibility_threshold) {
            bail!("compare.visibility_threshold must be within [0, 1]");
        }
        if !(self.compare.reference_fps > 0.0) {
            bail!("compare.reference_fps must be positive");
        }
        Ok(())
    }
}
