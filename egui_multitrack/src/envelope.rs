//! 音量包络模块
//!
//! 每条启用了包络的轨道拥有一组按时间排序的断点。断点之间线性插值，
//! 在断点时刻精确返回该断点的音量。
//!
//! 断点音量 = 曲线形状 × 基础音量。形状单独保存，基础音量降到 0 后再恢复时曲线不丢失。

use crate::structure::{EnvelopePoint, TrackState};
use std::collections::HashSet;

pub const START_CUE: &str = "startCue";
pub const END_CUE: &str = "endCue";
pub const FADE_IN_END: &str = "fadeInEnd";
pub const FADE_OUT_START: &str = "fadeOutStart";

/// `set_points` 检测到的淡入/淡出时间变化
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FadeChange {
    FadeIn(f64),
    FadeOut(f64),
}

#[derive(Clone, Debug)]
pub struct Envelope {
    points: Vec<EnvelopePoint>,
    // 与 points 同序，音量为相对基础音量的比例
    shape: Vec<EnvelopePoint>,
    volume: f32,
    // 上一次已知的淡入/淡出时间，用于边沿触发
    last_fade_in: Option<f64>,
    last_fade_out: Option<f64>,
}

impl Envelope {
    pub fn new(volume: f32) -> Self {
        Self {
            points: Vec::new(),
            shape: Vec::new(),
            volume: volume.clamp(0.0, 1.0),
            last_fade_in: None,
            last_fade_out: None,
        }
    }

    /// 按轨道配置建立包络：先放入显式断点，再补上 cue/淡入淡出断点
    pub fn from_track(track: &TrackState) -> Self {
        let mut envelope = Self::new(track.volume);
        envelope.replace_points(normalize(track.envelope.clone()));

        if let Some(fade_in_end) = track.fade_in_end {
            if let Some(start_cue) = track.cue_start {
                envelope.insert(start_cue, 0.0, START_CUE);
            }
            envelope.insert(fade_in_end, 1.0, FADE_IN_END);
        }
        if let Some(fade_out_start) = track.fade_out_start {
            envelope.insert(fade_out_start, 1.0, FADE_OUT_START);
            if let Some(end_cue) = track.cue_end {
                envelope.insert(end_cue, 0.0, END_CUE);
            }
        }

        envelope.last_fade_in = track.fade_in_end;
        envelope.last_fade_out = track.fade_out_start;
        envelope
    }

    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }

    pub fn point_time(&self, id: &str) -> Option<f64> {
        self.points.iter().find(|p| p.has_id(id)).map(|p| p.time)
    }

    /// 整体替换断点，返回发生变化的淡入/淡出时间
    ///
    /// 同一 ID 出现多次时保留最后一个。
    pub fn set_points(&mut self, points: Vec<EnvelopePoint>) -> Vec<FadeChange> {
        self.replace_points(normalize(points));

        let mut changes = Vec::new();
        if let Some(time) = self.point_time(FADE_IN_END) {
            if self.last_fade_in != Some(time) {
                self.last_fade_in = Some(time);
                changes.push(FadeChange::FadeIn(time));
            }
        }
        if let Some(time) = self.point_time(FADE_OUT_START) {
            if self.last_fade_out != Some(time) {
                self.last_fade_out = Some(time);
                changes.push(FadeChange::FadeOut(time));
            }
        }
        changes
    }

    /// 移动指定 ID 的断点，音量不变；时间未变或断点不存在时返回 false
    pub fn move_point(&mut self, id: &str, time: f64) -> bool {
        let Some(index) = self.points.iter().position(|p| p.has_id(id)) else {
            return false;
        };
        if self.points[index].time == time {
            return false;
        }
        self.points[index].time = time;
        self.shape[index].time = time;
        // 两列时间序列相同，稳定排序得到同一排列
        self.points.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.shape.sort_by(|a, b| a.time.total_cmp(&b.time));
        true
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// 修改基础音量，断点按保存的形状重新计算；返回是否有断点音量变化
    pub fn set_volume(&mut self, volume: f32) -> bool {
        let volume = volume.clamp(0.0, 1.0);
        if volume == self.volume {
            return false;
        }
        self.volume = volume;

        let mut changed = false;
        for (point, shape) in self.points.iter_mut().zip(&self.shape) {
            let scaled = (shape.volume * volume).clamp(0.0, 1.0);
            if point.volume != scaled {
                point.volume = scaled;
                changed = true;
            }
        }
        changed
    }

    /// 本地时间 `time` 处的音量
    pub fn volume_at(&self, time: f64) -> f32 {
        let points = self.points.as_slice();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return self.volume;
        };
        if time <= first.time {
            return first.volume;
        }
        if time >= last.time {
            return last.volume;
        }

        for pair in points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if time >= a.time && time < b.time {
                let frac = (time - a.time) / (b.time - a.time);
                let a_vol = a.volume as f64;
                let b_vol = b.volume as f64;
                return (a_vol + (b_vol - a_vol) * frac) as f32;
            }
        }
        last.volume
    }

    /// 插入带 ID 的断点，`level` 为相对基础音量的比例
    fn insert(&mut self, time: f64, level: f32, id: &str) {
        self.points.retain(|p| !p.has_id(id));
        self.shape.retain(|p| !p.has_id(id));
        let index = self.points.partition_point(|p| p.time <= time);
        let volume = (level * self.volume).clamp(0.0, 1.0);
        self.points.insert(index, EnvelopePoint::with_id(time, volume, id));
        self.shape.insert(index, EnvelopePoint::with_id(time, level, id));
    }

    /// 以绝对音量给出的断点整体替换，并据此记录形状
    fn replace_points(&mut self, points: Vec<EnvelopePoint>) {
        self.shape = points.iter().map(|p| self.shape_of(p)).collect();
        self.points = points;
    }

    // 基础音量为 0 时无法反推比例，按满音量下的形状保存
    fn shape_of(&self, point: &EnvelopePoint) -> EnvelopePoint {
        let mut shape = point.clone();
        if self.volume > 0.0 {
            shape.volume = point.volume / self.volume;
        }
        shape
    }
}

/// 去掉重复 ID（保留最后写入的），再按时间稳定排序
fn normalize(points: Vec<EnvelopePoint>) -> Vec<EnvelopePoint> {
    let mut seen = HashSet::new();
    let mut kept: Vec<EnvelopePoint> = points
        .into_iter()
        .rev()
        .filter(|p| match &p.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect();
    kept.reverse();
    kept.sort_by(|a, b| a.time.total_cmp(&b.time));
    kept
}
