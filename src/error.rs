//! ライブラリ層のエラー型
//!
//! 追跡データの欠落（未定義角度・比較不能な関節）はエラーではなく値で表す。
//! ここに並ぶのは最小限の入力契約を満たさない場合だけ。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoseError {
    /// ウィンドウ長に対してデータが足りない
    #[error("insufficient data: {available} available, {required} required")]
    InsufficientData { available: usize, required: usize },

    /// ウィンドウ長 0 は探索できない
    #[error("invalid window length: {0}")]
    InvalidWindow(usize),

    /// 比較リクエストの点配列が骨格を特定できる長さに満たない
    #[error("incomplete skeleton: expected {expected} landmarks, got {actual}")]
    IncompleteSkeleton { expected: usize, actual: usize },

    /// セッションJSONのトップレベルが配列でない
    #[error("session document is not a frame array")]
    NotAFrameArray,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PoseError>;
