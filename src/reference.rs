use crate::session::PoseRecord;

/// 参照動画の再生位置から理想区間のフレームを引く
///
/// 理想区間は参照動画より短いので、再生中はループして対応させる。
#[derive(Debug, Clone)]
pub struct ReferenceClip {
    frames: Vec<PoseRecord>,
    fps: f64,
}

impl ReferenceClip {
    pub fn new(frames: Vec<PoseRecord>, fps: f64) -> Self {
        Self { frames, fps }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// 再生位置（秒）に対応するフレーム: floor(t * fps) % len
    pub fn frame_at(&self, playback_secs: f64) -> Option<&PoseRecord> {
        if self.frames.is_empty() || !playback_secs.is_finite() || playback_secs < 0.0 {
            return None;
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return None;
        }
        let frame_number = (playback_secs * self.fps).floor() as usize;
        self.frames.get(frame_number % self.frames.len())
    }
}
