use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::calculator::joint_angle;
use crate::pose::{Frame, LandmarkIndex};

/// 関節定義: 頂点と2つの隣接ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointDefinition {
    pub name: &'static str,
    pub vertex: LandmarkIndex,
    pub neighbor_a: LandmarkIndex,
    pub neighbor_b: LandmarkIndex,
}

impl JointDefinition {
    pub const fn new(
        name: &'static str,
        neighbor_a: LandmarkIndex,
        vertex: LandmarkIndex,
        neighbor_b: LandmarkIndex,
    ) -> Self {
        Self {
            name,
            vertex,
            neighbor_a,
            neighbor_b,
        }
    }

    /// フレームからこの関節の角度を計算
    pub fn angle(&self, frame: &Frame) -> Option<f64> {
        joint_angle(
            frame.point(self.neighbor_a.id()),
            frame.point(self.vertex.id()),
            frame.point(self.neighbor_b.id()),
        )
    }
}

/// 標準の関節カタログ
pub const JOINT_CATALOGUE: [JointDefinition; 10] = {
    use LandmarkIndex::*;
    [
        JointDefinition::new("left_elbow", LeftShoulder, LeftElbow, LeftWrist),
        JointDefinition::new("right_elbow", RightShoulder, RightElbow, RightWrist),
        JointDefinition::new("left_shoulder", LeftElbow, LeftShoulder, LeftHip),
        JointDefinition::new("right_shoulder", RightElbow, RightShoulder, RightHip),
        JointDefinition::new("left_hip", LeftShoulder, LeftHip, LeftKnee),
        JointDefinition::new("right_hip", RightShoulder, RightHip, RightKnee),
        JointDefinition::new("left_knee", LeftHip, LeftKnee, LeftAnkle),
        JointDefinition::new("right_knee", RightHip, RightKnee, RightAnkle),
        JointDefinition::new("left_neck", LeftShoulder, Nose, LeftEar),
        JointDefinition::new("right_neck", RightShoulder, Nose, RightEar),
    ]
};

/// 四肢の8関節（ライブ比較・安定度評価の既定）
pub const CORE_JOINTS: [&str; 8] = [
    "left_elbow",
    "right_elbow",
    "left_shoulder",
    "right_shoulder",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
];

pub fn core_joint_names() -> Vec<String> {
    CORE_JOINTS.iter().map(|s| s.to_string()).collect()
}

/// 関節名 → 角度（度）
///
/// 未定義の関節はキーごと持たない。値は常に [0, 180]。
/// 読み込み時は `null` の値も受け付け、未定義として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Option<f64>>", into = "BTreeMap<String, f64>")]
pub struct AngleProfile {
    angles: BTreeMap<String, f64>,
}

impl AngleProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: &str) -> Option<f64> {
        self.angles.get(joint).copied()
    }

    /// `None` や範囲外の値は未定義として扱う
    pub fn set(&mut self, joint: &str, angle: Option<f64>) {
        match angle.filter(|a| a.is_finite() && (0.0..=180.0).contains(a)) {
            Some(a) => {
                self.angles.insert(joint.to_string(), a);
            }
            None => {
                self.angles.remove(joint);
            }
        }
    }

    pub fn is_defined(&self, joint: &str) -> bool {
        self.angles.contains_key(joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.angles.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

/// 旧形式の `left_elbow_angle` のようなキーをカタログ名に揃える
fn normalize_joint_key(key: &str) -> &str {
    key.strip_suffix("_angle").unwrap_or(key)
}

impl From<BTreeMap<String, Option<f64>>> for AngleProfile {
    fn from(map: BTreeMap<String, Option<f64>>) -> Self {
        let mut profile = AngleProfile::new();
        for (key, angle) in map {
            profile.set(normalize_joint_key(&key), angle);
        }
        profile
    }
}

impl From<AngleProfile> for BTreeMap<String, f64> {
    fn from(profile: AngleProfile) -> Self {
        profile.angles
    }
}

/// 1フレームに関節カタログを適用して角度プロファイルを作る
///
/// 必要なランドマークが欠けた関節だけが未定義になり、フレーム全体は必ず処理される。
pub fn build_profile(frame: &Frame, catalogue: &[JointDefinition]) -> AngleProfile {
    let mut profile = AngleProfile::new();
    for joint in catalogue {
        profile.set(joint.name, joint.angle(frame));
    }
    profile
}
