mod audio;

use audio::RodioFactory;
use eframe::egui;
use egui_multitrack::utils::format_time;
use egui_multitrack::{
    EguiTimeline, ManualScheduler, Multitrack, MultitrackCommand, MultitrackOptions,
    MultitrackView, MultitrackViewOptions, TrackId, TrackState,
};
use rfd::FileDialog;
use rodio::OutputStream;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

const OPTIONS_FILE: &str = "multitrack.json";
const MAX_EVENT_LOG: usize = 50;

fn main() -> eframe::Result<()> {
    // 默认级别 info，可通过 RUST_LOG 覆盖
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "egui_multitrack Example",
        native_options,
        Box::new(|_cc| Ok(Box::new(MultitrackApp::new()))),
    )
}

/// 读取工作目录下的配置文件，缺失或格式错误时使用默认值
fn load_options() -> MultitrackOptions {
    let Ok(text) = std::fs::read_to_string(OPTIONS_FILE) else {
        return MultitrackOptions::default();
    };
    match MultitrackOptions::from_json(&text) {
        Ok(options) => {
            log::info!("Loaded options from {}", OPTIONS_FILE);
            options
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", OPTIONS_FILE, e);
            MultitrackOptions::default()
        }
    }
}

/// 命令行传入的文件依次作为轨道；第一条为主轨道，其余可拖拽。末尾附加一条占位轨道用于拖放。
fn initial_tracks() -> Vec<TrackState> {
    let mut tracks: Vec<TrackState> = std::env::args()
        .skip(1)
        .enumerate()
        .map(|(i, path)| {
            let mut track = TrackState::with_source(TrackId::next(), &path, 0.0);
            track.draggable = i > 0;
            track
        })
        .collect();
    tracks.push(TrackState::new(TrackId::next()));
    tracks
}

struct MultitrackApp {
    _stream: Option<OutputStream>,
    multitrack: Option<Multitrack>,
    scheduler: ManualScheduler,
    view: MultitrackView,
    px_per_sec: f64,
    event_log: Rc<RefCell<Vec<String>>>,
}

impl MultitrackApp {
    fn new() -> Self {
        let scheduler = ManualScheduler::new();
        let timeline = EguiTimeline::new();
        let view = MultitrackView::new(&timeline, MultitrackViewOptions::default());
        let event_log = Rc::new(RefCell::new(Vec::new()));

        let (stream, multitrack) = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                let mut multitrack = Multitrack::new(
                    initial_tracks(),
                    load_options(),
                    Box::new(RodioFactory::new(handle)),
                    Box::new(timeline),
                    Box::new(scheduler.clone()),
                );
                let sink = Rc::clone(&event_log);
                multitrack.set_event_listener(Box::new(move |event| {
                    log::info!("[MultitrackEvent] {:?}", event);
                    let mut log = sink.borrow_mut();
                    log.push(format!("{:?}", event));
                    if log.len() > MAX_EVENT_LOG {
                        log.remove(0);
                    }
                }));
                (Some(stream), Some(multitrack))
            }
            Err(e) => {
                log::error!("No audio output device: {}", e);
                (None, None)
            }
        };

        Self {
            _stream: stream,
            multitrack,
            scheduler,
            view,
            px_per_sec: 0.0,
            event_log,
        }
    }

    /// 用选中的文件替换轨道内容，除第一条外都可拖拽
    fn load_file(multitrack: &mut Multitrack, track_id: TrackId, path: &Path) {
        let Some(index) = multitrack.index_of(track_id) else {
            return;
        };
        let mut track = multitrack.tracks()[index].clone();
        track.url = Some(path.display().to_string());
        track.draggable = index > 0;
        multitrack.execute_command(MultitrackCommand::AddOrReplaceTrack { track });
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let Some(multitrack) = self.multitrack.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            let playing = multitrack.is_playing();
            if ui.button(if playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                if playing {
                    multitrack.pause();
                } else {
                    multitrack.play();
                }
            }
            if ui.button("⏮").clicked() {
                multitrack.set_time(0.0);
            }
            ui.label(format!(
                "{} / {}",
                format_time(multitrack.current_time()),
                format_time(multitrack.max_duration())
            ));

            ui.separator();
            let zoom = ui.add(
                egui::Slider::new(&mut self.px_per_sec, 0.0..=400.0)
                    .text("px/s")
                    .custom_formatter(|v, _| if v == 0.0 { "fit".into() } else { format!("{v:.0}") }),
            );
            if zoom.changed() {
                multitrack.zoom(self.px_per_sec);
            }
        });
    }

    fn track_controls(&mut self, ui: &mut egui::Ui) {
        let Some(multitrack) = self.multitrack.as_mut() else {
            return;
        };
        let tracks: Vec<(TrackId, Option<String>, f32)> = multitrack
            .tracks()
            .iter()
            .map(|t| (t.id, t.url.clone(), t.volume))
            .collect();

        for (index, (id, url, volume)) in tracks.into_iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("#{}", index + 1));
                if ui.button("Open…").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Audio", &["wav", "mp3", "flac", "ogg"])
                        .pick_file()
                    {
                        Self::load_file(multitrack, id, &path);
                    }
                }
                let mut volume = volume;
                if ui
                    .add(egui::Slider::new(&mut volume, 0.0..=1.0).text("Vol"))
                    .changed()
                {
                    multitrack.execute_command(MultitrackCommand::SetTrackVolume { index, volume });
                }
                ui.label(url.as_deref().unwrap_or("(empty)"));
            });
        }
    }
}

impl eframe::App for MultitrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(multitrack) = self.multitrack.as_mut() {
            multitrack.poll_loads();
            if self.scheduler.fire().is_some() {
                multitrack.tick();
            }
            if self.scheduler.is_pending() {
                ctx.request_repaint();
            } else {
                // 后台解码完成前保持低频刷新
                ctx.request_repaint_after(std::time::Duration::from_millis(100));
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("events")
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in self.event_log.borrow().iter() {
                            ui.monospace(line);
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.multitrack.is_none() {
                ui.label("No audio output device available.");
                return;
            }
            self.track_controls(ui);
            ui.separator();

            let Some(multitrack) = self.multitrack.as_mut() else {
                return;
            };
            let response = self.view.ui(ui, multitrack.tracks());
            for input in response.inputs {
                multitrack.handle_input(input);
            }
            for (track_id, path) in response.dropped_files {
                Self::load_file(multitrack, track_id, &path);
            }
        });
    }
}
