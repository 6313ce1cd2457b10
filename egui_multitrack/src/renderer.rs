//! 渲染器接口
//!
//! 引擎在偏移、时长或位置变化后调用这些方法，从不回读几何信息。

pub trait TimelineRenderer {
    /// 各轨道在主时间轴上的起点（秒），按轨道顺序
    fn set_container_offsets(&mut self, offsets: &[f64]);

    fn set_main_width(&mut self, durations: &[f64], max_duration: f64);

    /// `position` 为 `[0, 1]` 的归一化光标位置
    fn update_cursor(&mut self, position: f64, auto_center: bool);

    fn zoom(&mut self, px_per_sec: f64);
}

/// 空实现，用于无界面的宿主
#[derive(Default, Debug, Clone, Copy)]
pub struct NullRenderer;

impl TimelineRenderer for NullRenderer {
    fn set_container_offsets(&mut self, _offsets: &[f64]) {}
    fn set_main_width(&mut self, _durations: &[f64], _max_duration: f64) {}
    fn update_cursor(&mut self, _position: f64, _auto_center: bool) {}
    fn zoom(&mut self, _px_per_sec: f64) {}
}
