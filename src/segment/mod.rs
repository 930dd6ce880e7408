pub mod score;
pub mod window;

pub use score::SegmentScorer;
pub use window::{select_best_window, Window};

use crate::config::SegmentConfig;
use crate::error::{PoseError, Result};
use crate::session::PoseRecord;

/// 参照録画から選ばれた理想区間
#[derive(Debug, Clone)]
pub struct IdealSegment {
    pub window: Window,
    pub frames: Vec<PoseRecord>,
}

/// 最も安定して確実に追跡されている固定長区間を抜き出す
///
/// コストは隣接フレームの組で計算するため、`window_size + 1` フレーム必要。
pub fn extract_ideal_segment(records: &[PoseRecord], config: &SegmentConfig) -> Result<IdealSegment> {
    let window_size = config.window_size;
    if window_size == 0 {
        return Err(PoseError::InvalidWindow(window_size));
    }
    if records.len() < window_size + 1 {
        return Err(PoseError::InsufficientData {
            available: records.len(),
            required: window_size + 1,
        });
    }

    let scorer = SegmentScorer::from_config(config);
    let costs = scorer.score(records);
    let window = select_best_window(&costs, window_size)?;

    tracing::debug!(
        start = window.start_index,
        length = window.length,
        total_cost = window.total_cost,
        candidates = costs.len() - window_size + 1,
        "selected ideal segment"
    );

    Ok(IdealSegment {
        window,
        frames: records[window.start_index..window.end_index()].to_vec(),
    })
}
