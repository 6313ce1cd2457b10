//! 轨道间联动的订阅表
//!
//! cue 区域和包络断点之间是双向绑定。订阅由引擎持有，生命周期跟随轨道：
//! 轨道被替换或引擎销毁时显式释放。

use crate::structure::TrackId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    /// cue 起点变化 -> 移动 `startCue` 断点
    StartCue,
    /// cue 终点变化 -> 移动 `endCue` 断点
    EndCue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub track_id: TrackId,
    pub topic: Topic,
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
}

impl Subscriptions {
    /// 重复订阅同一主题不会产生第二条记录
    pub fn subscribe(&mut self, track_id: TrackId, topic: Topic) {
        if !self.is_subscribed(track_id, topic) {
            self.entries.push(Subscription { track_id, topic });
        }
    }

    /// 释放某条轨道的全部订阅，返回释放的数量
    pub fn dispose_track(&mut self, track_id: TrackId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| s.track_id != track_id);
        before - self.entries.len()
    }

    /// 释放全部订阅，返回释放的数量
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn is_subscribed(&self, track_id: TrackId, topic: Topic) -> bool {
        self.entries
            .iter()
            .any(|s| s.track_id == track_id && s.topic == topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispose_only_touches_one_track() {
        let mut subs = Subscriptions::default();
        subs.subscribe(TrackId(1), Topic::StartCue);
        subs.subscribe(TrackId(1), Topic::EndCue);
        subs.subscribe(TrackId(2), Topic::StartCue);

        assert_eq!(subs.dispose_track(TrackId(1)), 2);
        assert!(!subs.is_subscribed(TrackId(1), Topic::StartCue));
        assert!(subs.is_subscribed(TrackId(2), Topic::StartCue));
        assert_eq!(subs.dispose_track(TrackId(1)), 0);
    }

    #[test]
    fn subscribing_twice_keeps_one_entry() {
        let mut subs = Subscriptions::default();
        subs.subscribe(TrackId(1), Topic::EndCue);
        subs.subscribe(TrackId(1), Topic::EndCue);
        assert_eq!(subs.clear(), 1);
        assert!(!subs.is_subscribed(TrackId(1), Topic::EndCue));
    }
}
