//! 主时钟模块
//!
//! 主时间只跟随前进得最远的播放中音频源，从不取平均值，这样任何轨道都不会
//! 跑到光标前面。除显式 seek 之外主时间不会回退。

use crate::structure::TrackState;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockState {
    current_time: f64,
    max_duration: f64,
}

impl ClockState {
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// 光标的归一化位置；总时长为 0 时返回 0
    pub fn normalized(&self) -> f64 {
        if self.max_duration > 0.0 {
            self.current_time / self.max_duration
        } else {
            0.0
        }
    }

    /// 返回时间是否发生了变化
    pub(crate) fn set_time(&mut self, time: f64) -> bool {
        if time == self.current_time {
            return false;
        }
        self.current_time = time;
        true
    }

    pub(crate) fn recompute_max_duration<'a>(
        &mut self,
        tracks: impl IntoIterator<Item = &'a TrackState>,
    ) -> f64 {
        self.max_duration = max_duration(tracks);
        self.max_duration
    }
}

/// `max(offset + duration)`，没有轨道时为 0
pub fn max_duration<'a>(tracks: impl IntoIterator<Item = &'a TrackState>) -> f64 {
    tracks
        .into_iter()
        .map(TrackState::end_time)
        .fold(0.0, f64::max)
}

/// 一次采样中单个音频源的读数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceSample {
    pub paused: bool,
    pub source_time: f64, // 本地时间
    pub offset: f64,
}

/// 计算新的主时间候选值
///
/// 只有候选值严格大于当前时间时才返回 `Some`。
pub fn sample_candidate(
    current_time: f64,
    samples: impl IntoIterator<Item = SourceSample>,
) -> Option<f64> {
    let candidate = samples
        .into_iter()
        .filter(|sample| !sample.paused)
        .map(|sample| sample.source_time + sample.offset)
        .fold(current_time, f64::max);

    (candidate > current_time).then_some(candidate)
}
