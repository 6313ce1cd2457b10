//! 音频源接口
//!
//! 引擎只对音频源做采样（读当前时间、是否暂停），真正的解码和播放由宿主实现。

use crate::error::SourceError;
use crate::structure::{TrackId, TrackState};
use crossbeam_channel::Sender;

/// 宿主可替换的单轨播放原语。
///
/// 时间均为轨道本地时间（秒）。`load` 必须立即返回，加载完成后通过
/// [`LoadNotifier`] 通知引擎；可以在任何线程上调用通知。
pub trait AudioSource {
    fn play(&mut self);
    fn pause(&mut self);
    fn paused(&self) -> bool;

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);

    /// 加载完成前返回 `None`
    fn duration(&self) -> Option<f64>;

    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);

    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    fn load(&mut self, url: &str, notifier: LoadNotifier);
}

/// 为轨道创建音频源
pub trait SourceFactory {
    fn create(&mut self, track: &TrackState) -> Box<dyn AudioSource>;
}

/// 输出上下文（例如可能被系统挂起的音频设备）
pub trait OutputContext {
    fn is_suspended(&self) -> bool;
    fn resume(&mut self);
}

/// 加载完成的通知消息
#[derive(Clone, Debug, PartialEq)]
pub struct LoadNotice {
    pub track_id: TrackId,
    pub generation: u64,
    pub result: Result<f64, SourceError>,
}

/// 一次性的加载完成回执
///
/// `generation` 用于丢弃被替换轨道的过期通知。
#[derive(Clone, Debug)]
pub struct LoadNotifier {
    track_id: TrackId,
    generation: u64,
    sender: Sender<LoadNotice>,
}

impl LoadNotifier {
    pub(crate) fn new(track_id: TrackId, generation: u64, sender: Sender<LoadNotice>) -> Self {
        Self {
            track_id,
            generation,
            sender,
        }
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    pub fn loaded(self, duration: f64) {
        self.send(Ok(duration));
    }

    pub fn failed(self, error: SourceError) {
        self.send(Err(error));
    }

    fn send(self, result: Result<f64, SourceError>) {
        let notice = LoadNotice {
            track_id: self.track_id,
            generation: self.generation,
            result,
        };
        if self.sender.send(notice).is_err() {
            // 引擎已销毁
            log::debug!("Load notice for track {} dropped", self.track_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn notifier_carries_generation() {
        let (sender, receiver) = unbounded();
        LoadNotifier::new(TrackId(3), 2, sender).loaded(4.5);
        let notice = receiver.try_recv().unwrap();
        assert_eq!(notice.track_id, TrackId(3));
        assert_eq!(notice.generation, 2);
        assert_eq!(notice.result, Ok(4.5));
    }

    #[test]
    fn notifying_after_receiver_dropped_is_harmless() {
        let (sender, receiver) = unbounded();
        drop(receiver);
        LoadNotifier::new(TrackId(1), 0, sender).failed(SourceError::Decode("bad header".into()));
    }
}
