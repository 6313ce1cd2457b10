//! 拖拽定位模块
//!
//! 把归一化的拖拽位移换算为新的起点，并以"主轨道"为锚点校验范围。
//! 拖拽不做吸附也没有动画：每次位移要么整体生效，要么什么都不改。

use crate::structure::TrackState;

/// 第一条有音频源且不可拖拽的轨道
pub fn main_track_index(tracks: &[TrackState]) -> Option<usize> {
    tracks.iter().position(|t| t.has_source() && !t.draggable)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragRepositioner {
    /// 开启后拒绝负起点
    pub drag_bounds: bool,
}

impl DragRepositioner {
    pub fn new(drag_bounds: bool) -> Self {
        Self { drag_bounds }
    }

    /// 轨道 `index` 允许的起点范围 `[min_start, max_start]`（闭区间）
    pub fn bounds(&self, tracks: &[TrackState], index: usize, max_duration: f64) -> (f64, f64) {
        let duration = tracks.get(index).map_or(0.0, |t| t.duration);
        match main_track_index(tracks).and_then(|i| tracks.get(i)) {
            Some(main) => (main.offset - duration, main.offset + main.duration),
            None => (-duration, max_duration),
        }
    }

    /// 校验一个候选起点；拒绝时返回 `None`
    pub fn validate(
        &self,
        tracks: &[TrackState],
        index: usize,
        proposed: f64,
        max_duration: f64,
    ) -> Option<f64> {
        if self.drag_bounds && proposed < 0.0 {
            return None;
        }
        let (min_start, max_start) = self.bounds(tracks, index, max_duration);
        (proposed >= min_start && proposed <= max_start).then_some(proposed)
    }

    /// 由归一化位移得到新的起点；不可拖拽或越界时返回 `None`
    pub fn propose(
        &self,
        tracks: &[TrackState],
        index: usize,
        delta: f64,
        max_duration: f64,
    ) -> Option<f64> {
        let track = tracks.get(index)?;
        if !track.draggable {
            return None;
        }
        let proposed = track.offset + delta * max_duration;
        self.validate(tracks, index, proposed, max_duration)
    }
}
