//! ポーズ比較リクエストの入口
//!
//! HTTP層から渡される `{"user_pose": [...], "reference_pose": [...]}` を想定。
//! 配列は骨格順で、null や座標欠落の点を含んでよい。

use serde::{Deserialize, Serialize};

use crate::angle::{compare_frames, landmark_similarity, PoseComparison, JOINT_CATALOGUE};
use crate::config::CompareConfig;
use crate::error::Result;
use crate::pose::{ensure_full_skeleton, missing_points, Frame, RawPoint};

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub user_pose: Vec<Option<RawPoint>>,
    pub reference_pose: Vec<Option<RawPoint>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub comparison: PoseComparison,
    /// ランドマーク位置ベースの一致度 (0〜100)
    pub landmark_similarity: u8,
    /// null や座標欠落で使えなかった点のID
    pub user_missing: Vec<usize>,
    pub reference_missing: Vec<usize>,
}

/// 2つのポーズ配列を比較
///
/// どちらかの配列が骨格の点数に満たなければ `IncompleteSkeleton`。
/// 個々の点の欠落はエラーにせず、該当関節を比較不能として報告する。
pub fn evaluate(
    request: &EvaluationRequest,
    compare: &CompareConfig,
) -> Result<EvaluationReport> {
    ensure_full_skeleton(&request.user_pose)?;
    ensure_full_skeleton(&request.reference_pose)?;

    let user = Frame::from_positional(0, &request.user_pose);
    let reference = Frame::from_positional(0, &request.reference_pose);
    let user_missing = missing_points(&request.user_pose);
    let reference_missing = missing_points(&request.reference_pose);

    let comparison = compare_frames(&user, &reference, &JOINT_CATALOGUE, &compare.joints);
    let landmark_similarity = landmark_similarity(
        &user,
        &reference,
        &compare.landmarks,
        compare.visibility_threshold,
    );

    tracing::debug!(
        similarity = comparison.similarity,
        landmark_similarity,
        user_missing = user_missing.len(),
        reference_missing = reference_missing.len(),
        worst_joint = comparison.worst_joint.as_deref().unwrap_or("-"),
        "pose evaluated"
    );

    Ok(EvaluationReport {
        comparison,
        landmark_similarity,
        user_missing,
        reference_missing,
    })
}
