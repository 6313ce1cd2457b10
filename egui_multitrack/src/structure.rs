//! 数据结构模块
//!
//! 定义了多轨同步引擎使用的核心数据结构：轨道配置、包络点和加载状态。

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static TRACK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl TrackId {
    pub fn next() -> Self {
        TrackId(TRACK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 包络断点，时间为轨道本地时间（秒）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub time: f64,
    pub volume: f32,
    #[serde(default)]
    pub id: Option<String>,
}

impl EnvelopePoint {
    pub fn new(time: f64, volume: f32) -> Self {
        Self { time, volume, id: None }
    }

    pub fn with_id(time: f64, volume: f32, id: &str) -> Self {
        Self {
            time,
            volume,
            id: Some(id.to_string()),
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// 音频源的加载状态
///
/// 加载失败的轨道时长保持为 0，且不参与"当前轨道"的选择。
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    /// 没有音频源（占位轨道，可作为拖放目标）
    #[default]
    NoSource,
    Pending,
    Loaded,
    Failed(SourceError),
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Pending)
    }
}

fn default_volume() -> f32 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackState {
    pub id: TrackId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub offset: f64,            // 在主时间轴上的起点（秒）
    #[serde(skip)]
    pub duration: f64,          // 加载完成前为 0
    pub cue_start: Option<f64>, // 本地时间
    pub cue_end: Option<f64>,
    pub fade_in_end: Option<f64>,
    pub fade_out_start: Option<f64>,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub draggable: bool,
    #[serde(default)]
    pub envelope: Vec<EnvelopePoint>,
    pub intro_end: Option<f64>,
    #[serde(skip)]
    pub load_state: LoadState,
}

impl TrackState {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            url: None,
            offset: 0.0,
            duration: 0.0,
            cue_start: None,
            cue_end: None,
            fade_in_end: None,
            fade_out_start: None,
            volume: 1.0,
            draggable: false,
            envelope: Vec::new(),
            intro_end: None,
            load_state: LoadState::NoSource,
        }
    }

    pub fn with_source(id: TrackId, url: &str, offset: f64) -> Self {
        Self {
            url: Some(url.to_string()),
            offset,
            ..Self::new(id)
        }
    }

    pub fn has_source(&self) -> bool {
        self.url.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    pub fn end_time(&self) -> f64 {
        self.offset + self.duration
    }

    /// 主时间 -> 轨道本地时间
    pub fn local_time(&self, master_time: f64) -> f64 {
        master_time - self.offset
    }

    /// 主时间是否落在 `[offset, offset + duration)` 内
    pub fn contains(&self, master_time: f64) -> bool {
        master_time >= self.offset && master_time < self.end_time()
    }

    /// 静音判定使用的 cue 窗口，缺省为 `[0, +∞)`
    pub fn cue_window(&self) -> (f64, f64) {
        (
            self.cue_start.unwrap_or(0.0),
            self.cue_end.unwrap_or(f64::INFINITY),
        )
    }

    pub fn is_muted_at(&self, local_time: f64) -> bool {
        let (start, end) = self.cue_window();
        local_time < start || local_time > end
    }

    pub fn envelope_enabled(&self) -> bool {
        !self.envelope.is_empty() || self.fade_in_end.is_some() || self.fade_out_start.is_some()
    }
}
