use crate::config::SegmentConfig;
use crate::session::PoseRecord;

/// フレームごとの「不安定さ + 不確かさ」コスト
///
/// 連続する2フレームの関節角度変化と、可視性の低さに対するペナルティの和。
/// 小さいほど安定して確実に追跡できている。
#[derive(Debug, Clone)]
pub struct SegmentScorer {
    important_joints: Vec<String>,
    important_landmarks: Vec<usize>,
    penalty_factor: f64,
}

impl SegmentScorer {
    pub fn new(important_joints: Vec<String>, important_landmarks: Vec<usize>, penalty_factor: f64) -> Self {
        Self {
            important_joints,
            important_landmarks,
            penalty_factor,
        }
    }

    pub fn from_config(config: &SegmentConfig) -> Self {
        Self::new(
            config.important_joints.clone(),
            config.important_landmarks.clone(),
            config.penalty_factor(),
        )
    }

    /// 角度の連続性: 両フレームで定義された関節だけの |Δθ| の和
    ///
    /// 比較ではないので番兵値は使わず、未定義は単に飛ばす。
    pub fn temporal_delta(&self, current: &PoseRecord, next: &PoseRecord) -> f64 {
        self.important_joints
            .iter()
            .filter_map(|joint| match (current.angles.get(joint), next.angles.get(joint)) {
                (Some(a), Some(b)) => Some((a - b).abs()),
                _ => None,
            })
            .sum()
    }

    /// (1 - 平均可視性) * 係数
    pub fn visibility_penalty(&self, record: &PoseRecord) -> f64 {
        let avg = record.average_visibility(&self.important_landmarks);
        (1.0 - avg) * self.penalty_factor
    }

    pub fn frame_cost(&self, current: &PoseRecord, next: &PoseRecord) -> f64 {
        self.temporal_delta(current, next) + self.visibility_penalty(current)
    }

    /// 長さ `len - 1` のコスト列（フレーム i と i+1 の組ごと）
    pub fn score(&self, records: &[PoseRecord]) -> Vec<f64> {
        records
            .windows(2)
            .map(|pair| self.frame_cost(&pair[0], &pair[1]))
            .collect()
    }
}
