//! 引擎配置模块

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 默认漂移容差（秒）
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 0.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultitrackOptions {
    /// 音频源时间与期望本地时间的最大允许偏差，超过则强制 seek
    pub drift_tolerance: f64,
    /// 开启后拒绝任何使起点小于 0 的拖拽
    pub drag_bounds: bool,
    /// 最小缩放（像素/秒），0 表示自适应容器宽度
    pub min_px_per_sec: f64,
    /// 拖拽结束后忽略点击的时间窗口（毫秒）
    pub click_guard_ms: u64,
    /// 播放时光标是否自动居中
    pub auto_center: bool,
}

impl Default for MultitrackOptions {
    fn default() -> Self {
        Self {
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            drag_bounds: false,
            min_px_per_sec: 0.0,
            click_guard_ms: 300,
            auto_center: true,
        }
    }
}

impl MultitrackOptions {
    /// 从宿主提供的 JSON 配置解析，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self> {
        let options = serde_json::from_str(json)?;
        Ok(options)
    }
}
