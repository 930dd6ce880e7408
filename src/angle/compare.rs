use std::collections::BTreeMap;

use serde::Serialize;

use super::profile::{build_profile, AngleProfile, JointDefinition};
use crate::pose::Frame;

/// 比較不能（どちらかが未定義）な関節に入れる差分
///
/// 0 にすると追跡失敗が「完璧に一致」に見えてしまうため、大きな値で最大の不一致として扱う。
pub const INCOMPARABLE: f64 = 999.0;

/// 関節ごとの角度差
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComparisonResult {
    differences: BTreeMap<String, f64>,
}

impl ComparisonResult {
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.differences.get(joint).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.differences.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn is_comparable(&self, joint: &str) -> bool {
        self.get(joint).map_or(false, |d| d < INCOMPARABLE)
    }

    pub fn incomparable_joints(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, d)| *d >= INCOMPARABLE)
            .map(|(k, _)| k)
            .collect()
    }

    /// 差分の合計（比較不能は番兵値のまま加算）
    pub fn total(&self) -> f64 {
        self.differences.values().sum()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.differences.is_empty() {
            None
        } else {
            Some(self.total() / self.differences.len() as f64)
        }
    }

    /// 最も差の大きい関節（同値なら名前順で先のもの）
    pub fn worst_joint(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (joint, diff) in self.iter() {
            if best.map_or(true, |(_, b)| diff > b) {
                best = Some((joint, diff));
            }
        }
        best
    }

    /// 角度ベースの一致度 (0〜100)
    ///
    /// `1 - 合計差 / (関節数 * 180)` を [0, 1] にクランプして百分率に切り捨て。
    pub fn similarity_percent(&self) -> u8 {
        if self.differences.is_empty() {
            return 0;
        }
        let max_total = self.differences.len() as f64 * 180.0;
        let similarity = (1.0 - self.total() / max_total).clamp(0.0, 1.0);
        (similarity * 100.0).floor() as u8
    }
}

/// 2つの角度プロファイルを関節ごとに比較
pub fn compare(a: &AngleProfile, b: &AngleProfile, joints: &[String]) -> ComparisonResult {
    let differences = joints
        .iter()
        .map(|joint| {
            let diff = match (a.get(joint), b.get(joint)) {
                (Some(x), Some(y)) => (x - y).abs(),
                _ => INCOMPARABLE,
            };
            (joint.clone(), diff)
        })
        .collect();
    ComparisonResult { differences }
}

/// 比較結果の1関節分。角度が取れなければ `null`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointReport {
    pub user: Option<f64>,
    pub reference: Option<f64>,
    pub difference: f64,
}

/// ユーザーと参照ポーズの比較レポート
#[derive(Debug, Clone, Serialize)]
pub struct PoseComparison {
    pub joints: BTreeMap<String, JointReport>,
    pub similarity: u8,
    pub worst_joint: Option<String>,
}

/// ランドマークフレーム同士を比較する入口
pub fn compare_frames(
    user: &Frame,
    reference: &Frame,
    catalogue: &[JointDefinition],
    joints: &[String],
) -> PoseComparison {
    let user_profile = build_profile(user, catalogue);
    let ref_profile = build_profile(reference, catalogue);
    let result = compare(&user_profile, &ref_profile, joints);

    let reports = result
        .iter()
        .map(|(joint, difference)| {
            (
                joint.to_string(),
                JointReport {
                    user: user_profile.get(joint),
                    reference: ref_profile.get(joint),
                    difference,
                },
            )
        })
        .collect();

    PoseComparison {
        joints: reports,
        similarity: result.similarity_percent(),
        worst_joint: result.worst_joint().map(|(k, _)| k.to_string()),
    }
}

/// ランドマーク位置の距離ベース一致度 (0〜100)
///
/// 両フレームで可視性が閾値を超えるランドマークだけを使う。
/// z は両方にあるときだけ距離に含める。1点あたりの最大距離は √3 として正規化。
pub fn landmark_similarity(user: &Frame, reference: &Frame, ids: &[usize], threshold: f64) -> u8 {
    let mut total_distance = 0.0;
    let mut count = 0usize;

    for &id in ids {
        let (Some(u), Some(r)) = (user.landmark(id), reference.landmark(id)) else {
            continue;
        };
        if !u.is_visible(threshold) || !r.is_visible(threshold) {
            continue;
        }
        let dx = u.x - r.x;
        let dy = u.y - r.y;
        let dz = match (u.z, r.z) {
            (Some(uz), Some(rz)) => uz - rz,
            _ => 0.0,
        };
        total_distance += (dx * dx + dy * dy + dz * dz).sqrt();
        count += 1;
    }

    if count == 0 {
        return 0;
    }

    let max_total = count as f64 * 3f64.sqrt();
    let similarity = (1.0 - total_distance / max_total).clamp(0.0, 1.0);
    (similarity * 100.0).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::profile::{core_joint_names, JOINT_CATALOGUE};
    use crate::pose::{Landmark, LandmarkIndex};

    fn profile(pairs: &[(&str, f64)]) -> AngleProfile {
        let mut p = AngleProfile::new();
        for (k, v) in pairs {
            p.set(k, Some(*v));
        }
        p
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_self_is_zero() {
        let p = profile(&[("left_elbow", 90.0), ("right_knee", 170.5), ("left_hip", 12.0)]);
        let joints = names(&["left_elbow", "right_knee", "left_hip"]);
        let result = compare(&p, &p, &joints);
        for joint in &joints {
            assert_eq!(result.get(joint), Some(0.0));
        }
        assert_eq!(result.similarity_percent(), 100);
    }

    #[test]
    fn test_compare_absolute_difference() {
        let a = profile(&[("left_elbow", 90.0)]);
        let b = profile(&[("left_elbow", 120.0)]);
        let result = compare(&a, &b, &names(&["left_elbow"]));
        assert_eq!(result.get("left_elbow"), Some(30.0));
        let result = compare(&b, &a, &names(&["left_elbow"]));
        assert_eq!(result.get("left_elbow"), Some(30.0));
    }

    #[test]
    fn test_compare_undefined_is_sentinel() {
        let a = profile(&[("left_elbow", 90.0)]);
        let b = profile(&[("right_elbow", 90.0)]);
        let joints = names(&["left_elbow", "right_elbow", "left_knee"]);
        let result = compare(&a, &b, &joints);
        for joint in &joints {
            assert_eq!(result.get(joint), Some(INCOMPARABLE));
            assert!(!result.is_comparable(joint));
        }
        assert_eq!(result.incomparable_joints().len(), 3);
    }

    #[test]
    fn test_tracking_loss_drives_similarity_to_zero() {
        let a = AngleProfile::new();
        let b = profile(&[("left_elbow", 90.0)]);
        let result = compare(&a, &b, &core_joint_names());
        assert_eq!(result.similarity_percent(), 0);
    }

    #[test]
    fn test_aggregates() {
        let a = profile(&[("left_elbow", 90.0), ("right_elbow", 100.0)]);
        let b = profile(&[("left_elbow", 80.0), ("right_elbow", 130.0)]);
        let result = compare(&a, &b, &names(&["left_elbow", "right_elbow"]));
        assert_eq!(result.total(), 40.0);
        assert_eq!(result.mean(), Some(20.0));
        assert_eq!(result.worst_joint(), Some(("right_elbow", 30.0)));
        // 1 - 40/360 = 0.888.. -> 88
        assert_eq!(result.similarity_percent(), 88);
    }

    #[test]
    fn test_empty_result() {
        let result = compare(&AngleProfile::new(), &AngleProfile::new(), &[]);
        assert!(result.is_empty());
        assert_eq!(result.mean(), None);
        assert_eq!(result.worst_joint(), None);
        assert_eq!(result.similarity_percent(), 0);
    }

    fn arm_frame(wrist_x: f64) -> Frame {
        use LandmarkIndex::*;
        Frame::new(
            0,
            None,
            vec![
                Landmark::new(LeftShoulder.id(), 0.4, 0.3, 0.9),
                Landmark::new(LeftElbow.id(), 0.4, 0.45, 0.9),
                Landmark::new(LeftWrist.id(), wrist_x, 0.45, 0.9),
            ],
        )
    }

    #[test]
    fn test_compare_frames_reports_missing_as_none() {
        let user = arm_frame(0.55);
        let reference = arm_frame(0.55);
        let report = compare_frames(&user, &reference, &JOINT_CATALOGUE, &core_joint_names());

        let elbow = report.joints["left_elbow"];
        assert!((elbow.user.unwrap() - 90.0).abs() < 1e-6);
        assert_eq!(elbow.difference, 0.0);

        let knee = report.joints["right_knee"];
        assert_eq!(knee.user, None);
        assert_eq!(knee.reference, None);
        assert_eq!(knee.difference, INCOMPARABLE);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["joints"]["right_knee"]["user"].is_null());
    }

    #[test]
    fn test_landmark_similarity_identical() {
        let f = arm_frame(0.55);
        let ids: Vec<usize> = f.landmarks.iter().map(|l| l.id).collect();
        assert_eq!(landmark_similarity(&f, &f, &ids, 0.7), 100);
    }

    #[test]
    fn test_landmark_similarity_ignores_low_visibility() {
        let user = Frame::new(0, None, vec![Landmark::new(0, 0.0, 0.0, 0.5)]);
        let reference = Frame::new(0, None, vec![Landmark::new(0, 1.0, 1.0, 0.9)]);
        assert_eq!(landmark_similarity(&user, &reference, &[0], 0.7), 0);
    }

    #[test]
    fn test_landmark_similarity_partial_distance() {
        let user = Frame::new(0, None, vec![Landmark::new(0, 0.0, 0.0, 0.9)]);
        let reference = Frame::new(0, None, vec![Landmark::new(0, 0.3, 0.4, 0.9)]);
        // 距離 0.5, 1 - 0.5/√3 = 0.711..
        assert_eq!(landmark_similarity(&user, &reference, &[0], 0.7), 71);
    }
}
