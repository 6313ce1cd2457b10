//! 传输控制模块
//!
//! 决定在某个主时间上哪些轨道应当发声，并把每条轨道的音频源校正到主时钟：
//! 漂移校正、区间启停、cue 静音和包络音量。

use crate::envelope::Envelope;
use crate::source::AudioSource;
use crate::structure::TrackState;

/// 单条轨道一次校正中实际发生的写操作
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub seeked: bool,
    pub started: bool,
    pub paused: bool,
    pub mute_changed: bool,
    pub volume_changed: bool,
}

/// 主时间 `time` 处应当开始播放的轨道
///
/// 只考虑已加载的轨道。没有任何轨道覆盖 `time`（位于空隙中）时，
/// 选择起点最早的那一条，保证传输总能从空隙处恢复。
pub fn current_tracks(tracks: &[TrackState], time: f64) -> Vec<usize> {
    let current: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_loaded() && t.contains(time))
        .map(|(i, _)| i)
        .collect();
    if !current.is_empty() {
        return current;
    }

    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_loaded())
        .min_by(|(_, a), (_, b)| a.offset.total_cmp(&b.offset))
        .map(|(i, _)| vec![i])
        .unwrap_or_default()
}

/// 把一条轨道的音频源校正到主时间 `master_time`
///
/// `transport_playing` 在整轮校正开始前取一次，保证所有轨道看到同一个传输状态。
pub fn reconcile_track(
    track: &TrackState,
    source: &mut dyn AudioSource,
    envelope: Option<&Envelope>,
    master_time: f64,
    transport_playing: bool,
    drift_tolerance: f64,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    let local_time = track.local_time(master_time);

    // 区间外的目标夹到 [0, duration]，避免每帧对同一位置反复 seek
    let target = local_time.clamp(0.0, track.duration.max(0.0));
    if (source.current_time() - target).abs() > drift_tolerance {
        log::debug!(
            "Track {} drifted: source={:.3} expected={:.3}",
            track.id,
            source.current_time(),
            target
        );
        source.set_current_time(target);
        outcome.seeked = true;
    }

    let out_of_range = local_time < 0.0 || local_time > track.duration;
    if !transport_playing || out_of_range {
        if !source.paused() {
            source.pause();
            outcome.paused = true;
        }
    } else if source.paused() {
        source.play();
        outcome.started = true;
    }

    let muted = track.is_muted_at(local_time);
    if muted != source.muted() {
        source.set_muted(muted);
        outcome.mute_changed = true;
    }

    if let Some(envelope) = envelope {
        let volume = envelope.volume_at(target);
        if volume != source.volume() {
            source.set_volume(volume);
            outcome.volume_changed = true;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LoadNotifier;
    use crate::structure::{EnvelopePoint, LoadState, TrackId};

    #[derive(Default)]
    struct FakeSource {
        time: f64,
        paused: bool,
        muted: bool,
        volume: f32,
        seeks: usize,
    }

    impl FakeSource {
        fn at(time: f64) -> Self {
            Self {
                time,
                paused: true,
                volume: 1.0,
                ..Self::default()
            }
        }
    }

    impl AudioSource for FakeSource {
        fn play(&mut self) {
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn paused(&self) -> bool {
            self.paused
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn set_current_time(&mut self, time: f64) {
            self.time = time;
            self.seeks += 1;
        }
        fn duration(&self) -> Option<f64> {
            Some(10.0)
        }
        fn volume(&self) -> f32 {
            self.volume
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn muted(&self) -> bool {
            self.muted
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn load(&mut self, _url: &str, notifier: LoadNotifier) {
            notifier.loaded(10.0);
        }
    }

    fn loaded(id: u64, offset: f64, duration: f64) -> TrackState {
        let mut track = TrackState::with_source(TrackId(id), "t.wav", offset);
        track.duration = duration;
        track.load_state = LoadState::Loaded;
        track
    }

    #[test]
    fn drift_within_tolerance_is_left_alone() {
        let track = loaded(1, 0.0, 10.0);
        let mut source = FakeSource::at(0.0);
        let outcome = reconcile_track(&track, &mut source, None, 0.3, false, 0.3);
        assert!(!outcome.seeked);
        assert_eq!(source.time, 0.0);

        let mut source = FakeSource::at(0.6);
        reconcile_track(&track, &mut source, None, 0.3, false, 0.3);
        assert_eq!(source.seeks, 0);
    }

    #[test]
    fn drift_beyond_tolerance_snaps_to_local_time() {
        let track = loaded(1, 0.0, 10.0);
        let mut source = FakeSource::at(0.0);
        let outcome = reconcile_track(&track, &mut source, None, 0.31, false, 0.3);
        assert!(outcome.seeked);
        assert_eq!(source.time, 0.31);

        let track = loaded(2, 4.0, 10.0);
        let mut source = FakeSource::at(9.0);
        reconcile_track(&track, &mut source, None, 6.5, false, 0.3);
        assert_eq!(source.time, 2.5);
    }

    #[test]
    fn outside_window_seeks_to_edge_once() {
        let track = loaded(1, 5.0, 10.0);
        let mut source = FakeSource::at(3.0);
        reconcile_track(&track, &mut source, None, 1.0, true, 0.3);
        assert_eq!(source.time, 0.0);
        reconcile_track(&track, &mut source, None, 2.0, true, 0.3);
        assert_eq!(source.seeks, 1);
        assert!(source.paused);
    }

    #[test]
    fn starts_lazily_when_entering_window() {
        let track = loaded(1, 5.0, 10.0);
        let mut source = FakeSource::at(0.0);

        let outcome = reconcile_track(&track, &mut source, None, 4.9, true, 0.3);
        assert!(!outcome.started);
        assert!(source.paused);

        let outcome = reconcile_track(&track, &mut source, None, 5.0, true, 0.3);
        assert!(outcome.started);
        assert!(!source.paused);

        // 已在播放时不会重复启动
        let outcome = reconcile_track(&track, &mut source, None, 5.1, true, 0.3);
        assert!(!outcome.started);
    }

    #[test]
    fn paused_transport_pauses_everything() {
        let track = loaded(1, 0.0, 10.0);
        let mut source = FakeSource::at(2.0);
        source.paused = false;
        let outcome = reconcile_track(&track, &mut source, None, 2.0, false, 0.3);
        assert!(outcome.paused);
        assert!(source.paused);
    }

    #[test]
    fn mute_written_only_on_change() {
        let mut track = loaded(1, 0.0, 6.0);
        track.cue_start = Some(1.0);
        track.cue_end = Some(4.0);
        let mut source = FakeSource::at(0.5);

        assert!(reconcile_track(&track, &mut source, None, 0.5, false, 0.3).mute_changed);
        assert!(source.muted);
        assert!(!reconcile_track(&track, &mut source, None, 0.6, false, 0.3).mute_changed);

        reconcile_track(&track, &mut source, None, 2.0, false, 0.3);
        assert!(!source.muted);
        reconcile_track(&track, &mut source, None, 5.0, false, 0.3);
        assert!(source.muted);
    }

    #[test]
    fn envelope_volume_is_pushed() {
        let track = loaded(1, 0.0, 10.0);
        let mut envelope = Envelope::new(1.0);
        envelope.set_points(vec![EnvelopePoint::new(0.0, 0.0), EnvelopePoint::new(2.0, 1.0)]);
        let mut source = FakeSource::at(0.0);

        reconcile_track(&track, &mut source, Some(&envelope), 0.0, false, 0.3);
        assert_eq!(source.volume, 0.0);
        let outcome = reconcile_track(&track, &mut source, Some(&envelope), 0.0, false, 0.3);
        assert!(!outcome.volume_changed);
    }

    #[test]
    fn current_tracks_cover_position() {
        let tracks = vec![loaded(1, 0.0, 10.0), loaded(2, 5.0, 10.0)];
        assert_eq!(current_tracks(&tracks, 7.5), vec![0, 1]);
        assert_eq!(current_tracks(&tracks, 12.0), vec![1]);
    }

    #[test]
    fn gap_falls_back_to_earliest_track() {
        let tracks = vec![loaded(1, 20.0, 5.0), loaded(2, 2.0, 5.0), loaded(3, 2.0, 1.0)];
        assert_eq!(current_tracks(&tracks, 10.0), vec![1]);
    }

    #[test]
    fn unloaded_tracks_are_never_current() {
        let mut pending = loaded(1, 0.0, 10.0);
        pending.load_state = LoadState::Pending;
        let mut failed = loaded(2, 0.0, 0.0);
        failed.load_state = LoadState::Failed(crate::error::SourceError::Decode("x".into()));
        assert!(current_tracks(&[pending, failed], 1.0).is_empty());
    }
}
