//! 命令和事件模块
//!
//! 定义了多轨引擎的命令系统、事件系统以及渲染层回传的输入，用于与宿主应用交互。

use crate::structure::{EnvelopePoint, TrackId, TrackState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueEdge {
    Start,
    End,
}

#[derive(Clone, Debug)]
pub enum MultitrackCommand {
    Play,
    Pause,
    SeekTo {
        fraction: f64,
    },
    SetTime {
        seconds: f64,
    },
    Zoom {
        px_per_sec: f64,
    },
    AddOrReplaceTrack {
        track: TrackState,
    },
    SetTrackVolume {
        index: usize,
        volume: f32,
    },
    SetEnvelopePoints {
        index: usize,
        points: Vec<EnvelopePoint>,
    },
    SetTrackOffset {
        index: usize,
        offset: f64,
    },
    SetCue {
        track_id: TrackId,
        edge: CueEdge,
        time: f64,
    },
    SetIntroEnd {
        track_id: TrackId,
        end_time: f64,
    },
}

/// 宿主可监听的领域事件
#[derive(Clone, Debug, PartialEq)]
pub enum MultitrackEvent {
    CanPlay,
    TrackReady {
        id: TrackId,
    },
    StartPositionChange {
        id: TrackId,
        start_position: f64,
    },
    StartCueChange {
        id: TrackId,
        start_cue: f64,
    },
    EndCueChange {
        id: TrackId,
        end_cue: f64,
    },
    FadeInChange {
        id: TrackId,
        fade_in_end: f64,
    },
    FadeOutChange {
        id: TrackId,
        fade_out_start: f64,
    },
    EnvelopePointsChange {
        id: TrackId,
        points: Vec<EnvelopePoint>,
    },
    VolumeChange {
        id: TrackId,
        volume: f32,
    },
    IntroEndChange {
        id: TrackId,
        end_time: f64,
    },
    Drop {
        id: TrackId,
    },
}

/// 渲染层/输入层回传给引擎的交互
///
/// 渲染器不持有引擎的引用，点击、拖拽、放置都以值的形式交给 `Multitrack::handle_input`。
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineInput {
    /// 点击时间轴，位置为 `[0, 1]` 的归一化值
    Click { fraction: f64 },
    /// 拖拽轨道，delta 为 `[-1, 1]` 的归一化位移
    Drag { track_id: TrackId, delta: f64 },
    /// 文件等被放置到某条轨道上
    Drop { track_id: TrackId },
    /// 拖动 cue 区域边界（本地时间）
    MoveCue {
        track_id: TrackId,
        edge: CueEdge,
        time: f64,
    },
    /// 拖动 intro 区域终点（本地时间）
    MoveIntroEnd { track_id: TrackId, time: f64 },
}
