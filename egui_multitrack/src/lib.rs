//! # egui_multitrack
//!
//! 多轨音频同步引擎，以及配套的 egui 时间轴组件。
//!
//! ## 功能特性
//!
//! - **主时钟**：跟随前进最远的播放中音频源，逐轨做漂移校正
//! - **轨道编排**：每条轨道有起点、cue 区域、淡入淡出和音量包络
//! - **拖拽定位**：以主轨道为锚点校验拖拽范围
//! - **事件**：cue、淡入淡出、包络、音量等变化都以事件形式通知宿主
//!
//! ## 基本使用
//!
//! ```ignore
//! use egui_multitrack::{Multitrack, MultitrackOptions, ManualScheduler, NullRenderer};
//!
//! let scheduler = ManualScheduler::new();
//! let mut multitrack = Multitrack::new(
//!     tracks,
//!     MultitrackOptions::default(),
//!     Box::new(factory),
//!     Box::new(NullRenderer),
//!     Box::new(scheduler.clone()),
//! );
//!
//! multitrack.set_event_listener(Box::new(|event| {
//!     log::info!("{:?}", event);
//! }));
//!
//! multitrack.play();
//!
//! // 宿主每帧：
//! multitrack.poll_loads();
//! if scheduler.fire().is_some() {
//!     multitrack.tick();
//! }
//! ```

pub mod bindings;
pub mod clock;
pub mod drag;
pub mod editor;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod options;
pub mod renderer;
pub mod scheduler;
pub mod source;
pub mod structure;
pub mod transport;
pub mod ui;
pub mod utils;

pub use editor::{CueEdge, MultitrackCommand, MultitrackEvent, TimelineInput};
pub use engine::Multitrack;
pub use envelope::Envelope;
pub use error::{MultitrackError, Result, SourceError};
pub use options::MultitrackOptions;
pub use renderer::{NullRenderer, TimelineRenderer};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle};
pub use source::{AudioSource, LoadNotice, LoadNotifier, OutputContext, SourceFactory};
pub use structure::{EnvelopePoint, LoadState, TrackId, TrackState};
pub use ui::{EguiTimeline, MultitrackView, MultitrackViewOptions, ViewResponse};
