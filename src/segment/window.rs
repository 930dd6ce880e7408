use serde::Serialize;

use crate::error::{PoseError, Result};

/// 連続区間
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub start_index: usize,
    pub length: usize,
    pub total_cost: f64,
}

impl Window {
    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }
}

/// 浮動小数の丸めで同値の区間が別の値にならないための許容差（相対）
const TIE_TOLERANCE: f64 = 1e-9;

/// コスト和が最小の長さ `window_length` の区間を探す
///
/// 各区間の和は毎回先頭から足し直す。差分更新の累積誤差で後ろの区間が勝たないように。
/// 許容差以内の差は同値とみなし、先頭に近い区間を残す。
/// 返す `start_index` はコスト列上の位置で、そのまま元のフレーム列の開始位置になる。
pub fn select_best_window(costs: &[f64], window_length: usize) -> Result<Window> {
    if window_length == 0 {
        return Err(PoseError::InvalidWindow(window_length));
    }
    if costs.len() < window_length {
        return Err(PoseError::InsufficientData {
            available: costs.len(),
            required: window_length,
        });
    }

    let mut best = Window {
        start_index: 0,
        length: window_length,
        total_cost: costs[..window_length].iter().sum(),
    };

    for start in 1..=costs.len() - window_length {
        let sum: f64 = costs[start..start + window_length].iter().sum();
        if is_strictly_lower(sum, best.total_cost) {
            best.start_index = start;
            best.total_cost = sum;
        }
    }

    Ok(best)
}

fn is_strictly_lower(candidate: f64, best: f64) -> bool {
    candidate < best - TIE_TOLERANCE * best.abs().max(1.0)
}
