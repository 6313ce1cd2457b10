//! UI 模块
//!
//! 多轨时间轴的 egui 视图：按起点排布各轨道、绘制 cue 区域和光标，
//! 并把鼠标操作转换成 `TimelineInput` 交给引擎处理。视图自身不修改轨道。

mod renderer;
mod timeline;

pub use renderer::{EguiTimeline, SharedViewState, ViewState};

use crate::editor::{CueEdge, TimelineInput};
use crate::structure::{TrackId, TrackState};
use egui::*;
use std::path::PathBuf;

#[derive(Clone)]
pub struct MultitrackViewOptions {
    pub track_height: f32,
    pub ruler_height: f32,
    pub cue_handle_width: f32,
    pub track_color: Color32,
    pub cursor_color: Color32,
}

impl Default for MultitrackViewOptions {
    fn default() -> Self {
        Self {
            track_height: 64.0,
            ruler_height: 24.0,
            cue_handle_width: 6.0,
            track_color: Color32::from_rgb(70, 110, 160),
            cursor_color: Color32::from_rgb(255, 100, 100),
        }
    }
}

/// 一帧内视图产生的输出
#[derive(Default, Debug)]
pub struct ViewResponse {
    pub inputs: Vec<TimelineInput>,
    /// 拖放到某条轨道上的文件
    pub dropped_files: Vec<(TrackId, PathBuf)>,
}

#[derive(Clone, Copy)]
struct LaneGeometry {
    offset: f64,
    duration: f64,
    width: f32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DragAction {
    None,
    MoveTrack(TrackId),
    MoveCue(TrackId, CueEdge),
    MoveIntroEnd(TrackId),
}

pub struct MultitrackView {
    state: SharedViewState,
    options: MultitrackViewOptions,
    drag_action: DragAction,
    scroll_x: f32,
}

impl MultitrackView {
    pub fn new(timeline: &EguiTimeline, options: MultitrackViewOptions) -> Self {
        Self {
            state: timeline.state(),
            options,
            drag_action: DragAction::None,
            scroll_x: 0.0,
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, tracks: &[TrackState]) -> ViewResponse {
        let mut response = ViewResponse::default();
        let view = self.state.borrow().clone();
        let visible_width = ui.available_width();
        let px_per_sec = view.effective_px_per_sec(visible_width);
        let content_width = ((view.max_duration * px_per_sec) as f32).max(visible_width);
        let cursor_x = (view.cursor * view.max_duration * px_per_sec) as f32;

        // 播放时让光标保持在可见范围内
        let mut scroll_area = ScrollArea::horizontal().auto_shrink([false, true]);
        if view.auto_center
            && (cursor_x < self.scroll_x || cursor_x > self.scroll_x + visible_width)
        {
            self.scroll_x = (cursor_x - visible_width / 2.0).max(0.0);
            scroll_area = scroll_area.horizontal_scroll_offset(self.scroll_x);
        }

        let output = scroll_area.show(ui, |ui| {
            let (ruler_rect, ruler_response) = ui.allocate_exact_size(
                Vec2::new(content_width, self.options.ruler_height),
                Sense::click(),
            );
            timeline::Ruler::new(px_per_sec, view.max_duration)
                .paint(&ui.painter_at(ruler_rect), ruler_rect);
            if ruler_response.clicked() {
                if let Some(pos) = ruler_response.interact_pointer_pos() {
                    response.inputs.push(TimelineInput::Click {
                        fraction: fraction_at(pos.x - ruler_rect.min.x, view.max_duration, px_per_sec),
                    });
                }
            }

            let top = ruler_rect.min.y;
            for (index, track) in tracks.iter().enumerate() {
                let offset = view.offsets.get(index).copied().unwrap_or(track.offset);
                let duration = view.durations.get(index).copied().unwrap_or(track.duration);
                let lane = LaneGeometry {
                    offset,
                    duration,
                    width: content_width,
                };
                self.ui_track(ui, track, lane, &view, px_per_sec, &mut response);
            }

            let bottom = ui.min_rect().max.y;
            let x = ruler_rect.min.x + cursor_x;
            ui.painter().line_segment(
                [Pos2::new(x, top), Pos2::new(x, bottom)],
                Stroke::new(2.0, self.options.cursor_color),
            );
        });
        self.scroll_x = output.state.offset.x;

        if !ui.input(|i| i.pointer.primary_down()) {
            self.drag_action = DragAction::None;
        }
        response
    }

    fn ui_track(
        &mut self,
        ui: &mut Ui,
        track: &TrackState,
        lane: LaneGeometry,
        view: &ViewState,
        px_per_sec: f64,
        response: &mut ViewResponse,
    ) {
        let LaneGeometry {
            offset,
            duration,
            width,
        } = lane;
        let (lane_rect, lane_response) = ui.allocate_exact_size(
            Vec2::new(width, self.options.track_height),
            Sense::click_and_drag(),
        );
        let painter = ui.painter_at(lane_rect);
        painter.rect_filled(lane_rect, 0.0, Color32::from_gray(30));

        let to_x = |time: f64| lane_rect.min.x + (time * px_per_sec) as f32;
        let clip_rect = Rect::from_min_max(
            Pos2::new(to_x(offset), lane_rect.min.y + 2.0),
            Pos2::new(to_x(offset + duration), lane_rect.max.y - 2.0),
        );

        if track.has_source() {
            painter.rect_filled(clip_rect, 3.0, self.options.track_color);
            self.paint_cues(&painter, track, offset, clip_rect, &to_x);
            let name = track.url.as_deref().unwrap_or_default();
            painter.text(
                clip_rect.left_top() + Vec2::new(4.0, 4.0),
                Align2::LEFT_TOP,
                name,
                FontId::proportional(11.0),
                Color32::WHITE,
            );
        } else {
            painter.text(
                lane_rect.left_center() + Vec2::new(8.0, 0.0),
                Align2::LEFT_CENTER,
                "Drop an audio file here",
                FontId::proportional(12.0),
                Color32::from_gray(120),
            );
        }

        if lane_response.drag_started() {
            if let Some(pos) = lane_response.interact_pointer_pos() {
                self.drag_action = self.hit_test(track, offset, clip_rect, pos, &to_x);
            }
        }

        if lane_response.dragged() {
            let pointer = lane_response.interact_pointer_pos();
            match self.drag_action {
                DragAction::MoveTrack(id) if id == track.id => {
                    let dx = lane_response.drag_delta().x as f64;
                    let total = view.max_duration * px_per_sec;
                    if dx != 0.0 && total > 0.0 {
                        response.inputs.push(TimelineInput::Drag {
                            track_id: id,
                            delta: dx / total,
                        });
                    }
                }
                DragAction::MoveCue(id, edge) if id == track.id => {
                    if let Some(pos) = pointer {
                        let time = local_time_at(pos.x - lane_rect.min.x, offset, px_per_sec);
                        response.inputs.push(TimelineInput::MoveCue {
                            track_id: id,
                            edge,
                            time,
                        });
                    }
                }
                DragAction::MoveIntroEnd(id) if id == track.id => {
                    if let Some(pos) = pointer {
                        let time = local_time_at(pos.x - lane_rect.min.x, offset, px_per_sec);
                        response
                            .inputs
                            .push(TimelineInput::MoveIntroEnd { track_id: id, time });
                    }
                }
                _ => {}
            }
        }

        if lane_response.clicked() {
            if let Some(pos) = lane_response.interact_pointer_pos() {
                response.inputs.push(TimelineInput::Click {
                    fraction: fraction_at(pos.x - lane_rect.min.x, view.max_duration, px_per_sec),
                });
            }
        }

        if lane_response.hovered() && self.drag_action == DragAction::None {
            if let Some(pos) = lane_response.hover_pos() {
                let icon = match self.hit_test(track, offset, clip_rect, pos, &to_x) {
                    DragAction::MoveCue(..) | DragAction::MoveIntroEnd(_) => {
                        CursorIcon::ResizeHorizontal
                    }
                    DragAction::MoveTrack(_) => CursorIcon::Grab,
                    DragAction::None => CursorIcon::Default,
                };
                ui.output_mut(|o| o.cursor_icon = icon);
            }
        }

        // 拖放文件
        let hover_pos = ui.input(|i| i.pointer.hover_pos());
        if hover_pos.is_some_and(|pos| lane_rect.contains(pos)) {
            let dropped = ui.input(|i| i.raw.dropped_files.clone());
            for file in dropped {
                if let Some(path) = file.path {
                    response.inputs.push(TimelineInput::Drop { track_id: track.id });
                    response.dropped_files.push((track.id, path));
                }
            }
        }
    }

    fn paint_cues(
        &self,
        painter: &Painter,
        track: &TrackState,
        offset: f64,
        clip_rect: Rect,
        to_x: &impl Fn(f64) -> f32,
    ) {
        let shade = Color32::from_black_alpha(140);
        let handle = Color32::from_rgb(255, 200, 80);
        let half = self.options.cue_handle_width / 2.0;

        if let Some(start) = track.cue_start {
            let x = to_x(offset + start);
            painter.rect_filled(
                Rect::from_min_max(clip_rect.min, Pos2::new(x, clip_rect.max.y)),
                0.0,
                shade,
            );
            painter.rect_filled(
                Rect::from_x_y_ranges(x - half..=x + half, clip_rect.y_range()),
                0.0,
                handle,
            );
        }
        if let Some(end) = track.cue_end {
            let x = to_x(offset + end);
            painter.rect_filled(
                Rect::from_min_max(Pos2::new(x, clip_rect.min.y), clip_rect.max),
                0.0,
                shade,
            );
            painter.rect_filled(
                Rect::from_x_y_ranges(x - half..=x + half, clip_rect.y_range()),
                0.0,
                handle,
            );
        }
        if let Some(intro_end) = track.intro_end {
            let x = to_x(offset + intro_end);
            painter.line_segment(
                [Pos2::new(x, clip_rect.min.y), Pos2::new(x, clip_rect.max.y)],
                Stroke::new(1.5, Color32::from_rgb(120, 220, 120)),
            );
        }
    }

    fn hit_test(
        &self,
        track: &TrackState,
        offset: f64,
        clip_rect: Rect,
        pos: Pos2,
        to_x: &impl Fn(f64) -> f32,
    ) -> DragAction {
        if !clip_rect.contains(pos) {
            return DragAction::None;
        }
        let near = |time: Option<f64>| {
            time.is_some_and(|t| (to_x(offset + t) - pos.x).abs() <= self.options.cue_handle_width)
        };
        if near(track.cue_start) {
            DragAction::MoveCue(track.id, CueEdge::Start)
        } else if near(track.cue_end) {
            DragAction::MoveCue(track.id, CueEdge::End)
        } else if near(track.intro_end) {
            DragAction::MoveIntroEnd(track.id)
        } else if track.draggable {
            DragAction::MoveTrack(track.id)
        } else {
            DragAction::None
        }
    }
}

/// 内容区横坐标 -> 归一化位置
fn fraction_at(x: f32, max_duration: f64, px_per_sec: f64) -> f64 {
    let total = max_duration * px_per_sec;
    if total > 0.0 {
        (x as f64 / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 内容区横坐标 -> 轨道本地时间
fn local_time_at(x: f32, offset: f64, px_per_sec: f64) -> f64 {
    if px_per_sec > 0.0 {
        x as f64 / px_per_sec - offset
    } else {
        0.0
    }
}
