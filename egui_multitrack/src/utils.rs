//! 工具函数模块

/// 将时间（秒）格式化为 "MM:SS.mmm"，负数按 0 处理
pub fn format_time(time_seconds: f64) -> String {
    let total_ms = if time_seconds.is_finite() {
        (time_seconds.max(0.0) * 1000.0).round() as u64
    } else {
        0
    };
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let milliseconds = total_ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
}
