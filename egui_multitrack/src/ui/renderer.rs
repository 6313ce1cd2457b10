use crate::renderer::TimelineRenderer;
use std::cell::RefCell;
use std::rc::Rc;

/// 引擎写入、视图读取的几何状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub offsets: Vec<f64>,
    pub durations: Vec<f64>,
    pub max_duration: f64,
    pub cursor: f64, // 归一化位置
    pub auto_center: bool,
    pub px_per_sec: f64, // 0 表示铺满可用宽度
}

impl ViewState {
    /// 实际使用的每秒像素数
    pub fn effective_px_per_sec(&self, available_width: f32) -> f64 {
        if self.px_per_sec > 0.0 {
            self.px_per_sec
        } else if self.max_duration > 0.0 {
            available_width as f64 / self.max_duration
        } else {
            0.0
        }
    }
}

pub type SharedViewState = Rc<RefCell<ViewState>>;

/// `TimelineRenderer` 的 egui 实现，只记录几何信息，绘制在 `MultitrackView::ui` 中进行
#[derive(Clone, Debug, Default)]
pub struct EguiTimeline {
    state: SharedViewState,
}

impl EguiTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SharedViewState {
        Rc::clone(&self.state)
    }
}

impl TimelineRenderer for EguiTimeline {
    fn set_container_offsets(&mut self, offsets: &[f64]) {
        self.state.borrow_mut().offsets = offsets.to_vec();
    }

    fn set_main_width(&mut self, durations: &[f64], max_duration: f64) {
        let mut state = self.state.borrow_mut();
        state.durations = durations.to_vec();
        state.max_duration = max_duration;
    }

    fn update_cursor(&mut self, position: f64, auto_center: bool) {
        let mut state = self.state.borrow_mut();
        state.cursor = position;
        state.auto_center = auto_center;
    }

    fn zoom(&mut self, px_per_sec: f64) {
        self.state.borrow_mut().px_per_sec = px_per_sec;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_geometry_for_the_view() {
        let mut timeline = EguiTimeline::new();
        let state = timeline.state();
        timeline.set_main_width(&[10.0, 10.0], 15.0);
        timeline.set_container_offsets(&[0.0, 5.0]);
        timeline.update_cursor(0.5, true);

        let state = state.borrow();
        assert_eq!(state.offsets, vec![0.0, 5.0]);
        assert_eq!(state.max_duration, 15.0);
        assert_eq!(state.cursor, 0.5);
        assert!(state.auto_center);
    }

    #[test]
    fn fit_mode_spreads_timeline_over_width() {
        let mut state = ViewState {
            max_duration: 20.0,
            ..ViewState::default()
        };
        assert_eq!(state.effective_px_per_sec(400.0), 20.0);
        state.px_per_sec = 50.0;
        assert_eq!(state.effective_px_per_sec(400.0), 50.0);
    }
}
