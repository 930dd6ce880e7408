//! フレーム列のシリアライズ形式
//!
//! ```json
//! [{"frame_number": 1, "timestamp_ms": 33.3, "angles": {"left_elbow": 91.2},
//!   "landmarks": [{"id": 0, "x": 0.5, "y": 0.2, "z": -0.1, "visibility": 0.99}]}]
//! ```
//!
//! 理想区間ファイルも同じ形式（選ばれた連続区間だけ）。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::angle::{build_profile, AngleProfile, JointDefinition};
use crate::error::{PoseError, Result};
use crate::pose::{average_visibility, Frame, Landmark};

/// 1フレーム分の記録（角度 + ランドマーク）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub frame_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<f64>,
    #[serde(default)]
    pub angles: AngleProfile,
    pub landmarks: Vec<Landmark>,
}

impl PoseRecord {
    /// ランドマークフレームから角度を計算して記録を作る
    pub fn from_frame(frame: Frame, catalogue: &[JointDefinition]) -> Self {
        let angles = build_profile(&frame, catalogue);
        Self {
            frame_number: frame.frame_number,
            timestamp_ms: frame.timestamp_ms,
            angles,
            landmarks: frame.landmarks,
        }
    }

    pub fn to_frame(&self) -> Frame {
        Frame::new(self.frame_number, self.timestamp_ms, self.landmarks.clone())
    }

    pub fn average_visibility(&self, ids: &[usize]) -> f64 {
        average_visibility(&self.landmarks, ids)
    }

    pub fn is_well_formed(&self) -> bool {
        self.timestamp_ms.map_or(true, f64::is_finite)
            && self.landmarks.iter().all(Landmark::is_well_formed)
    }

    /// 保存済みの角度を現在の関節カタログで計算し直す
    pub fn recompute_angles(&mut self, catalogue: &[JointDefinition]) {
        self.angles = build_profile(&self.to_frame(), catalogue);
    }
}

/// 読み飛ばしたフレーム
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFrame {
    /// 配列内の位置
    pub index: usize,
    pub reason: String,
}

/// セッション読み込みの集計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub skipped: Vec<SkippedFrame>,
}

impl SessionSummary {
    pub fn accepted(&self) -> usize {
        self.total - self.skipped.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub records: Vec<PoseRecord>,
    pub summary: SessionSummary,
}

/// 1要素ずつの解釈結果
enum FrameOutcome {
    Parsed(PoseRecord),
    Skipped(String),
}

fn parse_frame(value: Value) -> FrameOutcome {
    match serde_json::from_value::<PoseRecord>(value) {
        Ok(record) if record.is_well_formed() => FrameOutcome::Parsed(record),
        Ok(_) => FrameOutcome::Skipped("non-finite coordinate or visibility outside [0, 1]".into()),
        Err(e) => FrameOutcome::Skipped(e.to_string()),
    }
}

/// セッションJSONを読む
///
/// 壊れたフレームは読み飛ばして `summary` に理由を残す。
/// トップレベルが配列でない場合だけエラー。
pub fn parse_session(json: &str) -> Result<Session> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(PoseError::NotAFrameArray);
    };

    let mut session = Session {
        records: Vec::with_capacity(items.len()),
        summary: SessionSummary {
            total: items.len(),
            skipped: Vec::new(),
        },
    };

    for (index, item) in items.into_iter().enumerate() {
        match parse_frame(item) {
            FrameOutcome::Parsed(record) => session.records.push(record),
            FrameOutcome::Skipped(reason) => {
                tracing::warn!(index, reason = %reason, "skipping malformed frame");
                session.summary.skipped.push(SkippedFrame { index, reason });
            }
        }
    }

    Ok(session)
}

/// ランドマークフレーム列を記録形式に変換
pub fn record_session(frames: Vec<Frame>, catalogue: &[JointDefinition]) -> Vec<PoseRecord> {
    frames
        .into_iter()
        .map(|frame| PoseRecord::from_frame(frame, catalogue))
        .collect()
}

pub fn to_json_pretty(records: &[PoseRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::JOINT_CATALOGUE;
    use crate::pose::LandmarkIndex;

    const SAMPLE: &str = r#"[
        {"frame_number": 1, "timestamp_ms": 0.0,
         "angles": {"left_elbow_angle": 90.0, "right_knee_angle": 175.0},
         "landmarks": [{"id": 0, "x": 0.5, "y": 0.1, "z": -0.2, "visibility": 0.99}]},
        {"frame_number": 2, "angles": {},
         "landmarks": [{"id": 0, "x": 0.5, "visibility": 0.99}]},
        {"frame_number": 3, "timestamp_ms": 66.6,
         "landmarks": [{"id": 0, "x": 0.5, "y": 0.1, "visibility": 1.7}]},
        {"frame_number": 4, "timestamp_ms": 99.9, "angles": {"left_elbow": 92.0},
         "landmarks": []}
    ]"#;

    #[test]
    fn test_parse_session_skips_malformed() {
        let session = parse_session(SAMPLE).unwrap();
        assert_eq!(session.summary.total, 4);
        assert_eq!(session.records.len(), 2);
        assert_eq!(session.summary.skipped_count(), 2);
        assert_eq!(session.summary.accepted(), 2);
        assert_eq!(session.summary.skipped[0].index, 1);
        assert_eq!(session.summary.skipped[1].index, 2);

        let first = &session.records[0];
        assert_eq!(first.angles.get("left_elbow"), Some(90.0));
        assert_eq!(first.angles.get("right_knee"), Some(175.0));
        assert_eq!(first.landmarks[0].z, Some(-0.2));
        assert_eq!(session.records[1].frame_number, 4);
    }

    #[test]
    fn test_parse_session_not_array() {
        assert!(matches!(
            parse_session(r#"{"frame_number": 1}"#),
            Err(PoseError::NotAFrameArray)
        ));
        assert!(matches!(parse_session("not json"), Err(PoseError::Json(_))));
    }

    #[test]
    fn test_parse_empty_session() {
        let session = parse_session("[]").unwrap();
        assert!(session.records.is_empty());
        assert_eq!(session.summary.total, 0);
    }

    #[test]
    fn test_record_session_computes_angles() {
        use LandmarkIndex::*;
        let frame = Frame::new(
            5,
            Some(166.0),
            vec![
                Landmark::new(RightHip.id(), 0.6, 0.6, 0.9),
                Landmark::new(RightKnee.id(), 0.6, 0.75, 0.9),
                Landmark::new(RightAnkle.id(), 0.75, 0.75, 0.9),
            ],
        );
        let records = record_session(vec![frame], &JOINT_CATALOGUE);
        assert_eq!(records.len(), 1);
        let knee = records[0].angles.get("right_knee").unwrap();
        assert!((knee - 90.0).abs() < 1e-6);
        assert_eq!(records[0].angles.len(), 1);

        // 書き出して読み直しても同じ
        let json = to_json_pretty(&records).unwrap();
        let session = parse_session(&json).unwrap();
        assert_eq!(session.records, records);
    }

    #[test]
    fn test_recompute_angles_replaces_stale_values() {
        let mut session = parse_session(SAMPLE).unwrap();
        let record = &mut session.records[0];
        record.recompute_angles(&JOINT_CATALOGUE);
        // 鼻しかないので全関節が未定義
        assert!(record.angles.is_empty());
    }

    #[test]
    fn test_null_angle_keeps_frame() {
        let json = r#"[{"frame_number": 1,
            "angles": {"left_elbow": null, "right_knee": 170.0},
            "landmarks": [{"id": 26, "x": 0.6, "y": 0.75, "visibility": 0.9}]}]"#;
        let session = parse_session(json).unwrap();
        assert_eq!(session.summary.skipped_count(), 0);
        assert_eq!(session.records.len(), 1);
        let angles = &session.records[0].angles;
        assert_eq!(angles.get("left_elbow"), None);
        assert_eq!(angles.get("right_knee"), Some(170.0));
    }
}
