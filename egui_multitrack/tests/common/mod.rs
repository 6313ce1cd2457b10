#![allow(dead_code)]

use egui_multitrack::{
    AudioSource, LoadNotifier, ManualScheduler, Multitrack, MultitrackOptions, OutputContext,
    SourceError, SourceFactory, TimelineRenderer, TrackId, TrackState,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct MockState {
    pub time: f64,
    pub paused: bool,
    pub muted: bool,
    pub volume: f32,
    pub seeks: Vec<f64>,
    pub plays: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            time: 0.0,
            paused: true,
            muted: false,
            volume: 1.0,
            seeks: Vec::new(),
            plays: 0,
        }
    }
}

/// 测试侧持有的音频源句柄，与引擎中的 `MockSource` 共享状态
#[derive(Clone, Debug, Default)]
pub struct MockHandle(Rc<RefCell<MockState>>);

impl MockHandle {
    pub fn time(&self) -> f64 {
        self.0.borrow().time
    }

    /// 模拟外部时间漂移，不计入 seek
    pub fn set_time(&self, time: f64) {
        self.0.borrow_mut().time = time;
    }

    /// 播放中的音频源前进 `dt` 秒
    pub fn advance(&self, dt: f64) {
        let mut state = self.0.borrow_mut();
        if !state.paused {
            state.time += dt;
        }
    }

    /// 模拟音频源自行停止（播放到结尾）
    pub fn stop(&self) {
        self.0.borrow_mut().paused = true;
    }

    pub fn paused(&self) -> bool {
        self.0.borrow().paused
    }

    pub fn muted(&self) -> bool {
        self.0.borrow().muted
    }

    pub fn volume(&self) -> f32 {
        self.0.borrow().volume
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.0.borrow().seeks.clone()
    }

    pub fn plays(&self) -> usize {
        self.0.borrow().plays
    }
}

pub struct MockSource {
    state: MockHandle,
    plan: LoadPlan,
    deferred: Rc<RefCell<Vec<(String, LoadNotifier)>>>,
    duration: Option<f64>,
}

impl AudioSource for MockSource {
    fn play(&mut self) {
        let mut state = self.state.0.borrow_mut();
        state.paused = false;
        state.plays += 1;
    }

    fn pause(&mut self) {
        self.state.0.borrow_mut().paused = true;
    }

    fn paused(&self) -> bool {
        self.state.paused()
    }

    fn current_time(&self) -> f64 {
        self.state.time()
    }

    fn set_current_time(&mut self, time: f64) {
        let mut state = self.state.0.borrow_mut();
        state.time = time;
        state.seeks.push(time);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.state.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.0.borrow_mut().volume = volume;
    }

    fn muted(&self) -> bool {
        self.state.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.0.borrow_mut().muted = muted;
    }

    fn load(&mut self, url: &str, notifier: LoadNotifier) {
        match self.plan {
            LoadPlan::Immediate(duration) => {
                self.duration = Some(duration);
                notifier.loaded(duration);
            }
            LoadPlan::Deferred => self.deferred.borrow_mut().push((url.to_string(), notifier)),
            LoadPlan::Fail => notifier.failed(SourceError::Decode(format!("cannot decode {url}"))),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum LoadPlan {
    Immediate(f64),
    Deferred,
    Fail,
}

/// 按 URL 决定加载结果的工厂；克隆体共享登记表
#[derive(Clone, Default)]
pub struct MockFactory {
    plans: Rc<RefCell<HashMap<String, LoadPlan>>>,
    created: Rc<RefCell<Vec<(TrackId, MockHandle)>>>,
    deferred: Rc<RefCell<Vec<(String, LoadNotifier)>>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, duration: f64) -> Self {
        self.plan(url, LoadPlan::Immediate(duration))
    }

    pub fn deferred(self, url: &str) -> Self {
        self.plan(url, LoadPlan::Deferred)
    }

    pub fn failing(self, url: &str) -> Self {
        self.plan(url, LoadPlan::Fail)
    }

    fn plan(self, url: &str, plan: LoadPlan) -> Self {
        self.plans.borrow_mut().insert(url.to_string(), plan);
        self
    }

    /// 该轨道最近一次创建的音频源
    pub fn source(&self, id: TrackId) -> MockHandle {
        self.created
            .borrow()
            .iter()
            .rev()
            .find(|(track_id, _)| *track_id == id)
            .map(|(_, handle)| handle.clone())
            .expect("no source created for track")
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    /// 完成一个延迟加载
    pub fn complete(&self, url: &str, duration: f64) {
        let mut deferred = self.deferred.borrow_mut();
        let index = deferred
            .iter()
            .position(|(u, _)| u == url)
            .expect("no deferred load for url");
        let (_, notifier) = deferred.remove(index);
        notifier.loaded(duration);
    }
}

impl SourceFactory for MockFactory {
    fn create(&mut self, track: &TrackState) -> Box<dyn AudioSource> {
        let url = track.url.clone().unwrap_or_default();
        let plan = self
            .plans
            .borrow()
            .get(&url)
            .copied()
            .unwrap_or(LoadPlan::Fail);
        let handle = MockHandle::default();
        self.created.borrow_mut().push((track.id, handle.clone()));
        Box::new(MockSource {
            state: handle,
            plan,
            deferred: Rc::clone(&self.deferred),
            duration: None,
        })
    }
}

#[derive(Debug, Default)]
pub struct RenderLog {
    pub offsets: Vec<f64>,
    pub durations: Vec<f64>,
    pub max_duration: f64,
    pub cursor: Vec<f64>,
    pub zoom: Vec<f64>,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer(pub Rc<RefCell<RenderLog>>);

impl TimelineRenderer for RecordingRenderer {
    fn set_container_offsets(&mut self, offsets: &[f64]) {
        self.0.borrow_mut().offsets = offsets.to_vec();
    }

    fn set_main_width(&mut self, durations: &[f64], max_duration: f64) {
        let mut log = self.0.borrow_mut();
        log.durations = durations.to_vec();
        log.max_duration = max_duration;
    }

    fn update_cursor(&mut self, position: f64, _auto_center: bool) {
        self.0.borrow_mut().cursor.push(position);
    }

    fn zoom(&mut self, px_per_sec: f64) {
        self.0.borrow_mut().zoom.push(px_per_sec);
    }
}

/// 记录是否被恢复的输出上下文
#[derive(Clone, Default)]
pub struct MockOutput {
    pub suspended: Rc<Cell<bool>>,
    pub resumes: Rc<Cell<usize>>,
}

impl OutputContext for MockOutput {
    fn is_suspended(&self) -> bool {
        self.suspended.get()
    }

    fn resume(&mut self) {
        self.suspended.set(false);
        self.resumes.set(self.resumes.get() + 1);
    }
}

pub struct Harness {
    pub multitrack: Multitrack,
    pub factory: MockFactory,
    pub scheduler: ManualScheduler,
    pub renderer: RecordingRenderer,
}

impl Harness {
    pub fn new(tracks: Vec<TrackState>, factory: MockFactory) -> Self {
        Self::with_options(tracks, factory, MultitrackOptions::default())
    }

    pub fn with_options(
        tracks: Vec<TrackState>,
        factory: MockFactory,
        options: MultitrackOptions,
    ) -> Self {
        let scheduler = ManualScheduler::new();
        let renderer = RecordingRenderer::default();
        let multitrack = Multitrack::new(
            tracks,
            options,
            Box::new(factory.clone()),
            Box::new(renderer.clone()),
            Box::new(scheduler.clone()),
        );
        Self {
            multitrack,
            factory,
            scheduler,
            renderer,
        }
    }

    /// 所有音频源前进 `dt` 秒后触发一次到期的 tick
    pub fn advance(&mut self, ids: &[TrackId], dt: f64) -> bool {
        for id in ids {
            self.factory.source(*id).advance(dt);
        }
        if self.scheduler.fire().is_some() {
            self.multitrack.tick();
            true
        } else {
            false
        }
    }
}

pub fn track(id: u64, url: &str, offset: f64) -> TrackState {
    TrackState::with_source(TrackId(id), url, offset)
}
