//! 多轨引擎
//!
//! 持有全部轨道（配置、音频源、包络按相同下标排列），运行同步循环并发出领域事件。
//! 所有状态修改都经由这里的方法完成，其它组件不持有轨道的可变别名。

use crate::bindings::{Subscriptions, Topic};
use crate::clock::{sample_candidate, ClockState, SourceSample};
use crate::drag::DragRepositioner;
use crate::editor::{CueEdge, MultitrackCommand, MultitrackEvent, TimelineInput};
use crate::envelope::{Envelope, FadeChange, END_CUE, START_CUE};
use crate::options::MultitrackOptions;
use crate::renderer::TimelineRenderer;
use crate::scheduler::{Scheduler, TickHandle};
use crate::source::{AudioSource, LoadNotice, LoadNotifier, OutputContext, SourceFactory};
use crate::structure::{EnvelopePoint, LoadState, TrackId, TrackState};
use crate::transport;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

pub struct Multitrack {
    tracks: Vec<TrackState>,
    sources: Vec<Option<Box<dyn AudioSource>>>,
    envelopes: Vec<Option<Envelope>>,
    generations: Vec<u64>,

    clock: ClockState,
    options: MultitrackOptions,
    repositioner: DragRepositioner,

    // Collaborators
    factory: Box<dyn SourceFactory>,
    renderer: Box<dyn TimelineRenderer>,
    scheduler: Box<dyn Scheduler>,
    output: Option<Box<dyn OutputContext>>,

    pending_tick: Option<TickHandle>,
    load_sender: Sender<LoadNotice>,
    load_receiver: Receiver<LoadNotice>,
    subscriptions: Subscriptions,
    awaiting_can_play: bool,
    last_drag: Option<Instant>,
    destroyed: bool,

    // Events
    outbox: Vec<MultitrackEvent>,
    pending_events: Vec<MultitrackEvent>,
    event_listener: Option<Box<dyn FnMut(&MultitrackEvent)>>,
}

impl Multitrack {
    /// 创建引擎并立即开始加载所有带 URL 的轨道
    ///
    /// # 参数
    ///
    /// * `tracks` - 初始轨道；第一条有音频源且不可拖拽的轨道作为主轨道
    /// * `options` - 引擎配置
    /// * `factory` - 为每条轨道创建音频源
    /// * `renderer` - 接收光标、宽度和起点的渲染层
    /// * `scheduler` - 驱动同步循环的调度器
    ///
    /// # 示例
    ///
    /// ```
    /// use egui_multitrack::{
    ///     AudioSource, ManualScheduler, Multitrack, MultitrackOptions, NullRenderer,
    ///     SourceFactory, TrackState,
    /// };
    ///
    /// struct NoAudio;
    ///
    /// impl SourceFactory for NoAudio {
    ///     fn create(&mut self, _track: &TrackState) -> Box<dyn AudioSource> {
    ///         unreachable!("no tracks to load")
    ///     }
    /// }
    ///
    /// let multitrack = Multitrack::new(
    ///     Vec::new(),
    ///     MultitrackOptions::default(),
    ///     Box::new(NoAudio),
    ///     Box::new(NullRenderer),
    ///     Box::new(ManualScheduler::new()),
    /// );
    /// assert_eq!(multitrack.max_duration(), 0.0);
    /// assert!(!multitrack.is_playing());
    /// ```
    pub fn new(
        tracks: Vec<TrackState>,
        options: MultitrackOptions,
        factory: Box<dyn SourceFactory>,
        renderer: Box<dyn TimelineRenderer>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        let (load_sender, load_receiver) = unbounded();
        let count = tracks.len();
        let mut engine = Self {
            tracks,
            sources: (0..count).map(|_| None).collect(),
            envelopes: vec![None; count],
            generations: vec![0; count],
            clock: ClockState::default(),
            repositioner: DragRepositioner::new(options.drag_bounds),
            options,
            factory,
            renderer,
            scheduler,
            output: None,
            pending_tick: None,
            load_sender,
            load_receiver,
            subscriptions: Subscriptions::default(),
            awaiting_can_play: true,
            last_drag: None,
            destroyed: false,
            outbox: Vec::new(),
            pending_events: Vec::new(),
            event_listener: None,
        };

        for index in 0..count {
            engine.start_loading(index);
        }
        engine.refresh_geometry();
        engine.poll_loads();
        engine
    }

    /// 附加一个可能被挂起的输出上下文，`play` 时会先恢复它
    pub fn with_output_context(mut self, output: Box<dyn OutputContext>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn set_event_listener(&mut self, listener: Box<dyn FnMut(&MultitrackEvent)>) {
        self.event_listener = Some(listener);
    }

    pub fn take_events(&mut self) -> Vec<MultitrackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn execute_command(&mut self, command: MultitrackCommand) {
        match command {
            MultitrackCommand::Play => self.play(),
            MultitrackCommand::Pause => self.pause(),
            MultitrackCommand::SeekTo { fraction } => self.seek_to(fraction),
            MultitrackCommand::SetTime { seconds } => self.set_time(seconds),
            MultitrackCommand::Zoom { px_per_sec } => self.zoom(px_per_sec),
            MultitrackCommand::AddOrReplaceTrack { track } => self.add_or_replace_track(track),
            MultitrackCommand::SetTrackVolume { index, volume } => {
                self.set_track_volume(index, volume)
            }
            MultitrackCommand::SetEnvelopePoints { index, points } => {
                self.set_envelope_points(index, points)
            }
            MultitrackCommand::SetTrackOffset { index, offset } => {
                self.set_track_offset(index, offset)
            }
            MultitrackCommand::SetCue {
                track_id,
                edge,
                time,
            } => self.set_cue(track_id, edge, time),
            MultitrackCommand::SetIntroEnd { track_id, end_time } => {
                self.set_intro_end(track_id, end_time)
            }
        }
    }

    /// 处理渲染层回传的交互
    pub fn handle_input(&mut self, input: TimelineInput) {
        if self.destroyed {
            return;
        }
        match input {
            TimelineInput::Click { fraction } => {
                if self.click_guarded() {
                    log::debug!("Click ignored right after a drag");
                    return;
                }
                self.seek_to(fraction);
            }
            TimelineInput::Drag { track_id, delta } => {
                if let Some(index) = self.index_of(track_id) {
                    self.last_drag = Some(Instant::now());
                    self.reposition(index, delta);
                }
            }
            TimelineInput::Drop { track_id } => {
                if self.index_of(track_id).is_some() {
                    self.emit(MultitrackEvent::Drop { id: track_id });
                    self.flush_events();
                }
            }
            TimelineInput::MoveCue {
                track_id,
                edge,
                time,
            } => self.set_cue(track_id, edge, time),
            TimelineInput::MoveIntroEnd { track_id, time } => self.set_intro_end(track_id, time),
        }
    }

    // Transport

    pub fn play(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(output) = self.output.as_mut() {
            if output.is_suspended() {
                log::debug!("Resuming suspended audio output");
                output.resume();
            }
        }
        self.start_sync();

        let time = self.clock.current_time();
        for index in transport::current_tracks(&self.tracks, time) {
            if let Some(source) = self.sources.get_mut(index).and_then(Option::as_mut) {
                if source.paused() {
                    source.play();
                }
            }
        }
        self.flush_events();
    }

    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        for source in self.sources.iter_mut().flatten() {
            if !source.paused() {
                source.pause();
            }
        }
        self.stop_sync();
        self.flush_events();
    }

    pub fn is_playing(&self) -> bool {
        self.sources.iter().flatten().any(|source| !source.paused())
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn max_duration(&self) -> f64 {
        self.clock.max_duration()
    }

    /// 跳转到归一化位置
    ///
    /// # 参数
    ///
    /// * `fraction` - 相对总时长的位置，超出 `[0, 1]` 时被夹住，非有限值被忽略
    ///
    /// 跳转前正在播放的话，跳转后继续播放。
    pub fn seek_to(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let time = fraction.clamp(0.0, 1.0) * self.clock.max_duration();
        self.seek(time);
    }

    /// 跳转到绝对时间（秒）
    pub fn set_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let max = self.clock.max_duration();
        let time = if max > 0.0 {
            seconds.clamp(0.0, max)
        } else {
            seconds.max(0.0)
        };
        self.seek(time);
    }

    fn seek(&mut self, time: f64) {
        if self.destroyed {
            return;
        }
        let was_playing = self.is_playing();
        self.update_position(time, false);
        if was_playing {
            self.play();
        } else {
            self.flush_events();
        }
    }

    pub fn zoom(&mut self, px_per_sec: f64) {
        if self.destroyed || !px_per_sec.is_finite() {
            return;
        }
        self.renderer.zoom(px_per_sec.max(self.options.min_px_per_sec));
    }

    /// 调度器的 tick 到期时由宿主调用
    pub fn tick(&mut self) {
        self.pending_tick = None;
        if self.destroyed {
            return;
        }
        self.drain_load_notices();

        if !self.is_playing() {
            log::debug!("Nothing playing, sync loop stopped");
            self.flush_events();
            return;
        }

        let current = self.clock.current_time();
        let samples = self
            .tracks
            .iter()
            .zip(&self.sources)
            .filter(|(track, _)| track.is_loaded())
            .filter_map(|(track, source)| {
                source.as_ref().map(|source| SourceSample {
                    paused: source.paused(),
                    source_time: source.current_time(),
                    offset: track.offset,
                })
            });
        if let Some(candidate) = sample_candidate(current, samples) {
            self.update_position(candidate, self.options.auto_center);
        }

        self.start_sync();
        self.flush_events();
    }

    // Tracks

    pub fn tracks(&self) -> &[TrackState] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&TrackState> {
        self.tracks.get(index)
    }

    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn options(&self) -> &MultitrackOptions {
        &self.options
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// 用相同 ID 的新配置替换轨道并重新加载；未知 ID 为空操作
    pub fn add_or_replace_track(&mut self, track: TrackState) {
        if self.destroyed {
            return;
        }
        let Some(index) = self.index_of(track.id) else {
            log::debug!("No track with id {}, ignoring replace", track.id);
            return;
        };
        log::info!("Replacing track {}", track.id);

        self.subscriptions.dispose_track(track.id);
        if let Some(mut old) = self.sources[index].take() {
            if !old.paused() {
                old.pause();
            }
        }
        self.envelopes[index] = None;
        self.tracks[index] = track;
        self.awaiting_can_play = true;

        self.start_loading(index);
        self.refresh_geometry();
        self.poll_loads();
    }

    /// 处理已完成的加载通知
    pub fn poll_loads(&mut self) {
        if self.destroyed {
            return;
        }
        self.drain_load_notices();
        self.flush_events();
    }

    /// 按归一化位移拖拽轨道
    ///
    /// # 参数
    ///
    /// * `index` - 轨道下标；不可拖拽的轨道不会移动
    /// * `delta` - 位移占总时长的比例
    ///
    /// # 返回
    ///
    /// 新起点通过范围校验并生效时返回 `true`，此时发出 `StartPositionChange`。
    pub fn reposition(&mut self, index: usize, delta: f64) -> bool {
        if self.destroyed || !delta.is_finite() {
            return false;
        }
        let max_duration = self.clock.max_duration();
        let Some(offset) = self
            .repositioner
            .propose(&self.tracks, index, delta, max_duration)
        else {
            log::debug!("Drag of track #{} by {:.4} rejected", index, delta);
            return false;
        };
        self.commit_offset(index, offset);
        self.flush_events();
        true
    }

    pub fn drag_track(&mut self, track_id: TrackId, delta: f64) -> bool {
        match self.index_of(track_id) {
            Some(index) => self.reposition(index, delta),
            None => false,
        }
    }

    /// 直接设置起点，不受拖拽范围限制
    pub fn set_track_offset(&mut self, index: usize, offset: f64) {
        if self.destroyed || !offset.is_finite() || index >= self.tracks.len() {
            return;
        }
        self.commit_offset(index, offset);
        self.flush_events();
    }

    pub fn set_track_volume(&mut self, index: usize, volume: f32) {
        if self.destroyed || !volume.is_finite() || index >= self.tracks.len() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        let track = &mut self.tracks[index];
        track.volume = volume;
        let id = track.id;

        if let Some(envelope) = self.envelopes[index].as_mut() {
            if envelope.set_volume(volume) {
                let points = envelope.points().to_vec();
                track.envelope = points.clone();
                self.emit(MultitrackEvent::EnvelopePointsChange { id, points });
            }
        } else if let Some(source) = self.sources[index].as_mut() {
            source.set_volume(volume);
        }
        self.emit(MultitrackEvent::VolumeChange { id, volume });
        self.reconcile();
        self.flush_events();
    }

    pub fn envelope(&self, index: usize) -> Option<&Envelope> {
        self.envelopes.get(index).and_then(Option::as_ref)
    }

    pub fn envelope_points(&self, index: usize) -> Option<&[EnvelopePoint]> {
        self.envelope(index).map(Envelope::points)
    }

    /// 整体替换包络断点
    ///
    /// # 参数
    ///
    /// * `index` - 轨道下标；轨道还没有包络时会新建一个
    /// * `points` - 以绝对音量给出的断点，同一 ID 重复时保留最后一个
    ///
    /// 淡入/淡出断点的时间变化会发出对应事件；`startCue`/`endCue` 断点被移动时
    /// 同步更新轨道的 cue。
    ///
    /// # 示例
    ///
    /// ```ignore
    /// use egui_multitrack::envelope::FADE_IN_END;
    /// use egui_multitrack::EnvelopePoint;
    ///
    /// multitrack.set_envelope_points(
    ///     0,
    ///     vec![
    ///         EnvelopePoint::new(0.0, 0.0),
    ///         EnvelopePoint::with_id(3.0, 1.0, FADE_IN_END),
    ///     ],
    /// );
    /// ```
    pub fn set_envelope_points(&mut self, index: usize, points: Vec<EnvelopePoint>) {
        if self.destroyed || index >= self.tracks.len() {
            return;
        }
        let id = self.tracks[index].id;
        if self.envelopes[index].is_none() {
            self.envelopes[index] = Some(Envelope::new(self.tracks[index].volume));
            self.bind_envelope(id);
        }
        let Some(envelope) = self.envelopes[index].as_mut() else {
            return;
        };

        let changes = envelope.set_points(points);
        let points = envelope.points().to_vec();
        let start_cue = envelope.point_time(START_CUE);
        let end_cue = envelope.point_time(END_CUE);

        let track = &mut self.tracks[index];
        track.envelope = points.clone();
        for change in changes {
            match change {
                FadeChange::FadeIn(fade_in_end) => {
                    track.fade_in_end = Some(fade_in_end);
                    self.outbox
                        .push(MultitrackEvent::FadeInChange { id, fade_in_end });
                }
                FadeChange::FadeOut(fade_out_start) => {
                    track.fade_out_start = Some(fade_out_start);
                    self.outbox
                        .push(MultitrackEvent::FadeOutChange { id, fade_out_start });
                }
            }
        }
        self.emit(MultitrackEvent::EnvelopePointsChange { id, points });

        if let Some(time) = start_cue {
            if self.tracks[index].cue_start != Some(time) {
                self.apply_cue(index, CueEdge::Start, time);
            }
        }
        if let Some(time) = end_cue {
            if self.tracks[index].cue_end != Some(time) {
                self.apply_cue(index, CueEdge::End, time);
            }
        }

        self.reconcile();
        self.flush_events();
    }

    pub fn set_start_cue(&mut self, track_id: TrackId, time: f64) {
        self.set_cue(track_id, CueEdge::Start, time);
    }

    pub fn set_end_cue(&mut self, track_id: TrackId, time: f64) {
        self.set_cue(track_id, CueEdge::End, time);
    }

    pub fn set_cue(&mut self, track_id: TrackId, edge: CueEdge, time: f64) {
        if self.destroyed || !time.is_finite() {
            return;
        }
        let Some(index) = self.index_of(track_id) else {
            return;
        };
        self.apply_cue(index, edge, time);
        self.reconcile();
        self.flush_events();
    }

    pub fn set_intro_end(&mut self, track_id: TrackId, end_time: f64) {
        if self.destroyed || !end_time.is_finite() {
            return;
        }
        let Some(index) = self.index_of(track_id) else {
            return;
        };
        let end_time = end_time.max(0.0);
        if self.tracks[index].intro_end == Some(end_time) {
            return;
        }
        self.tracks[index].intro_end = Some(end_time);
        self.emit(MultitrackEvent::IntroEndChange {
            id: track_id,
            end_time,
        });
        self.flush_events();
    }

    /// 停止循环、释放音频源、包络和订阅；可重复调用
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop_sync();
        self.destroyed = true;

        for slot in &mut self.sources {
            if let Some(mut source) = slot.take() {
                if !source.paused() {
                    source.pause();
                }
            }
        }
        for envelope in &mut self.envelopes {
            *envelope = None;
        }
        let released = self.subscriptions.clear();
        self.event_listener = None;
        self.outbox.clear();
        while self.load_receiver.try_recv().is_ok() {}
        log::info!("Multitrack destroyed, released {} subscriptions", released);
    }

    // Internals

    fn start_loading(&mut self, index: usize) {
        self.generations[index] += 1;
        let track = &mut self.tracks[index];
        track.duration = 0.0;

        let Some(url) = track.url.clone() else {
            track.load_state = LoadState::NoSource;
            self.sources[index] = None;
            return;
        };
        track.load_state = LoadState::Pending;
        log::info!("Loading track {}: {}", track.id, url);

        let mut source = self.factory.create(track);
        let notifier = LoadNotifier::new(track.id, self.generations[index], self.load_sender.clone());
        source.load(&url, notifier);
        self.sources[index] = Some(source);
    }

    fn drain_load_notices(&mut self) {
        let mut changed = false;
        while let Ok(notice) = self.load_receiver.try_recv() {
            changed |= self.apply_load_notice(notice);
        }
        if changed {
            self.refresh_geometry();
            let time = self.clock.current_time();
            self.update_position(time, false);
        }
        self.check_can_play();
    }

    fn apply_load_notice(&mut self, notice: LoadNotice) -> bool {
        let Some(index) = self.index_of(notice.track_id) else {
            return false;
        };
        if self.generations[index] != notice.generation {
            log::debug!("Dropping stale load notice for track {}", notice.track_id);
            return false;
        }

        let id = notice.track_id;
        match notice.result {
            Ok(duration) => {
                let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                let track = &mut self.tracks[index];
                track.duration = duration;
                track.load_state = LoadState::Loaded;
                log::info!("Track {} loaded, duration {:.3}s", id, duration);

                if let Some(source) = self.sources[index].as_mut() {
                    source.set_volume(track.volume);
                }
                if track.envelope_enabled() {
                    self.envelopes[index] = Some(Envelope::from_track(track));
                    self.bind_envelope(id);
                }
                self.emit(MultitrackEvent::TrackReady { id });
            }
            Err(error) => {
                log::warn!("Track {} failed to load: {}", id, error);
                let track = &mut self.tracks[index];
                track.duration = 0.0;
                track.load_state = LoadState::Failed(error);
            }
        }
        true
    }

    fn bind_envelope(&mut self, id: TrackId) {
        self.subscriptions.dispose_track(id);
        self.subscriptions.subscribe(id, Topic::StartCue);
        self.subscriptions.subscribe(id, Topic::EndCue);
    }

    fn check_can_play(&mut self) {
        if self.awaiting_can_play && self.tracks.iter().all(|t| t.load_state.is_settled()) {
            self.awaiting_can_play = false;
            self.emit(MultitrackEvent::CanPlay);
        }
    }

    fn refresh_geometry(&mut self) {
        let max_duration = self.clock.recompute_max_duration(&self.tracks);
        let durations: Vec<f64> = self.tracks.iter().map(|t| t.duration).collect();
        let offsets: Vec<f64> = self.tracks.iter().map(|t| t.offset).collect();
        self.renderer.set_main_width(&durations, max_duration);
        self.renderer.set_container_offsets(&offsets);
    }

    fn commit_offset(&mut self, index: usize, offset: f64) {
        self.tracks[index].offset = offset;
        let id = self.tracks[index].id;
        self.refresh_geometry();
        let time = self.clock.current_time();
        self.update_position(time, false);
        self.emit(MultitrackEvent::StartPositionChange {
            id,
            start_position: offset,
        });
    }

    /// 更新 cue 并通过订阅把对应的包络断点移过去
    fn apply_cue(&mut self, index: usize, edge: CueEdge, time: f64) {
        let track = &mut self.tracks[index];
        let upper = if track.is_loaded() {
            track.duration
        } else {
            f64::INFINITY
        };
        let mut time = time.clamp(0.0, upper);
        let id = track.id;

        let (topic, point_id) = match edge {
            CueEdge::Start => {
                if let Some(end) = track.cue_end {
                    time = time.min(end);
                }
                if track.cue_start == Some(time) {
                    return;
                }
                track.cue_start = Some(time);
                self.outbox
                    .push(MultitrackEvent::StartCueChange { id, start_cue: time });
                (Topic::StartCue, START_CUE)
            }
            CueEdge::End => {
                if let Some(start) = track.cue_start {
                    time = time.max(start);
                }
                if track.cue_end == Some(time) {
                    return;
                }
                track.cue_end = Some(time);
                self.outbox
                    .push(MultitrackEvent::EndCueChange { id, end_cue: time });
                (Topic::EndCue, END_CUE)
            }
        };

        if !self.subscriptions.is_subscribed(id, topic) {
            return;
        }
        if let Some(envelope) = self.envelopes[index].as_mut() {
            if envelope.move_point(point_id, time) {
                let points = envelope.points().to_vec();
                self.tracks[index].envelope = points.clone();
                self.emit(MultitrackEvent::EnvelopePointsChange { id, points });
            }
        }
    }

    /// 时间、起点或总时长变化后都要经过这里，保证渲染层的归一化光标是最新的
    fn update_position(&mut self, time: f64, auto_center: bool) {
        self.clock.set_time(time);
        self.renderer
            .update_cursor(self.clock.normalized(), auto_center);
        self.reconcile();
    }

    /// 一轮完整的逐轨校正；期间产生的事件在整轮结束后才派发
    fn reconcile(&mut self) {
        let playing = self.is_playing();
        let time = self.clock.current_time();
        let tolerance = self.options.drift_tolerance;

        let mut seeked = 0;
        let tracks = self.tracks.iter().zip(self.sources.iter_mut()).zip(&self.envelopes);
        for ((track, source), envelope) in tracks {
            if !track.is_loaded() {
                continue;
            }
            if let Some(source) = source.as_deref_mut() {
                let outcome =
                    transport::reconcile_track(track, source, envelope.as_ref(), time, playing, tolerance);
                if outcome.seeked {
                    seeked += 1;
                }
            }
        }
        if seeked > 0 {
            log::debug!("Resynced {} track(s) to {:.3}s", seeked, time);
        }
    }

    fn start_sync(&mut self) {
        if self.pending_tick.is_none() {
            self.pending_tick = Some(self.scheduler.schedule());
        }
    }

    fn stop_sync(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn click_guarded(&self) -> bool {
        let guard = Duration::from_millis(self.options.click_guard_ms);
        self.last_drag.is_some_and(|at| at.elapsed() < guard)
    }

    fn emit(&mut self, event: MultitrackEvent) {
        self.outbox.push(event);
    }

    fn flush_events(&mut self) {
        for event in std::mem::take(&mut self.outbox) {
            if let Some(listener) = self.event_listener.as_mut() {
                let delivered = panic::catch_unwind(AssertUnwindSafe(|| listener(&event)));
                if delivered.is_err() {
                    log::error!("Event listener panicked while handling {:?}", event);
                }
            }
            self.pending_events.push(event);
        }
    }
}

impl Drop for Multitrack {
    fn drop(&mut self) {
        self.destroy();
    }
}
