use crate::pose::Point2;

/// 頂点 `vertex` で2つの隣接点がなす角度（度, 0〜180）
///
/// 無向の余弦定理で計算する。符号付きの atan2 差分は使わない。
/// 点の欠落・長さ0のベクトルは `None`（角度が定まらない）。
pub fn joint_angle(p1: Option<Point2>, vertex: Option<Point2>, p2: Option<Point2>) -> Option<f64> {
    let (p1, vertex, p2) = (p1?, vertex?, p2?);

    let v1 = (p1.x - vertex.x, p1.y - vertex.y);
    let v2 = (p2.x - vertex.x, p2.y - vertex.y);

    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);
    if !(mag1 > 0.0 && mag2 > 0.0) || !mag1.is_finite() || !mag2.is_finite() {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    Some(cosine_to_degrees(dot / (mag1 * mag2)))
}

/// 余弦比を角度に変換
/// 浮動小数誤差で [-1, 1] をはみ出すので acos の前に必ずクランプする
pub fn cosine_to_degrees(cos: f64) -> f64 {
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}
