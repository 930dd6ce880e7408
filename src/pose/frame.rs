use serde::{Deserialize, Serialize};

use super::landmark::{Landmark, LandmarkIndex, Point2, RawPoint};
use crate::error::PoseError;

/// ある時刻のランドマーク集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<f64>,
    pub landmarks: Vec<Landmark>,
}

impl Frame {
    pub fn new(frame_number: u64, timestamp_ms: Option<f64>, landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_number,
            timestamp_ms,
            landmarks,
        }
    }

    /// 位置配列（骨格順）からフレームを作る
    ///
    /// null の点や x/y が欠けた点はフレームに含めない。
    /// 参照はすべてIDで引くので、欠けたIDは `landmark` が `None` を返し、
    /// それを使う関節の角度が未定義になる。どのIDが落ちたかは [`missing_points`] で分かる。
    pub fn from_positional(frame_number: u64, points: &[Option<RawPoint>]) -> Self {
        let landmarks = points
            .iter()
            .enumerate()
            .filter_map(|(id, p)| p.as_ref().and_then(|p| p.to_landmark(id)))
            .collect();
        Self::new(frame_number, None, landmarks)
    }

    /// IDでランドマークを取得
    pub fn landmark(&self, id: usize) -> Option<&Landmark> {
        self.landmarks.iter().find(|lm| lm.id == id)
    }

    pub fn get(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.landmark(index.id())
    }

    pub fn point(&self, id: usize) -> Option<Point2> {
        self.landmark(id).map(Landmark::point)
    }

    /// 指定IDのうちフレームに存在するものの平均可視性
    /// 1つも存在しなければ 0.0（最悪値）
    pub fn average_visibility(&self, ids: &[usize]) -> f64 {
        average_visibility(&self.landmarks, ids)
    }

    /// 全ランドマークが構造的に正しいか
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.iter().all(Landmark::is_well_formed)
    }
}

/// ランドマーク列のうち `ids` に含まれるものの平均可視性（無ければ 0.0）
pub fn average_visibility(landmarks: &[Landmark], ids: &[usize]) -> f64 {
    let (sum, count) = landmarks
        .iter()
        .filter(|lm| ids.contains(&lm.id))
        .fold((0.0, 0usize), |(s, c), lm| (s + lm.visibility, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 位置配列のうちランドマークにならない点のID（null や x/y 欠落）
pub fn missing_points(points: &[Option<RawPoint>]) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter_map(|(id, p)| match p {
            Some(p) if p.to_landmark(id).is_some() => None,
            _ => Some(id),
        })
        .collect()
}

/// 比較リクエストの配列が骨格全体を含んでいるか
pub fn ensure_full_skeleton(points: &[Option<RawPoint>]) -> Result<(), PoseError> {
    if points.len() < LandmarkIndex::COUNT {
        return Err(PoseError::IncompleteSkeleton {
            expected: LandmarkIndex::COUNT,
            actual: points.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(x: f64, y: f64, v: f64) -> Option<RawPoint> {
        Some(RawPoint {
            x: Some(x),
            y: Some(y),
            z: None,
            visibility: Some(v),
        })
    }

    #[test]
    fn test_landmark_lookup_by_id() {
        let frame = Frame::new(
            1,
            None,
            vec![Landmark::new(13, 0.4, 0.5, 0.9), Landmark::new(11, 0.3, 0.3, 0.8)],
        );
        assert_eq!(frame.landmark(11).unwrap().x, 0.3);
        assert_eq!(frame.get(LandmarkIndex::LeftElbow).unwrap().y, 0.5);
        assert!(frame.landmark(15).is_none());
    }

    #[test]
    fn test_from_positional_drops_missing_points() {
        let points = vec![raw(0.5, 0.1, 0.9), None, raw(0.2, 0.2, 0.5)];
        let frame = Frame::from_positional(7, &points);
        assert_eq!(frame.frame_number, 7);
        assert_eq!(frame.landmarks.len(), 2);
        assert!(frame.landmark(1).is_none());
        assert_eq!(frame.landmark(2).unwrap().x, 0.2);
    }

    #[test]
    fn test_missing_points_lists_dropped_ids() {
        let partial = Some(RawPoint {
            x: Some(0.5),
            y: None,
            z: None,
            visibility: Some(0.9),
        });
        let points = vec![raw(0.5, 0.1, 0.9), None, partial, raw(0.2, 0.2, 0.5)];
        assert_eq!(missing_points(&points), vec![1, 2]);

        let frame = Frame::from_positional(0, &points);
        for id in missing_points(&points) {
            assert!(frame.landmark(id).is_none());
        }
        assert_eq!(frame.landmarks.len(), points.len() - 2);
    }

    #[test]
    fn test_average_visibility_present_only() {
        let frame = Frame::new(
            0,
            None,
            vec![Landmark::new(11, 0.0, 0.0, 1.0), Landmark::new(12, 0.0, 0.0, 0.5)],
        );
        let avg = frame.average_visibility(&[11, 12, 13]);
        assert!((avg - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_average_visibility_none_present_is_zero() {
        let frame = Frame::new(0, None, vec![Landmark::new(1, 0.0, 0.0, 1.0)]);
        assert_eq!(frame.average_visibility(&[11, 12]), 0.0);
    }

    #[test]
    fn test_ensure_full_skeleton() {
        let short = vec![raw(0.0, 0.0, 1.0); 20];
        assert!(matches!(
            ensure_full_skeleton(&short),
            Err(PoseError::IncompleteSkeleton { expected: 33, actual: 20 })
        ));
        let full = vec![None; 33];
        assert!(ensure_full_skeleton(&full).is_ok());
    }
}
