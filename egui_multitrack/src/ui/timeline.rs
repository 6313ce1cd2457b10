use crate::utils::format_time;
use egui::*;

/// 顶部时间标尺
pub struct Ruler {
    px_per_sec: f64,
    max_duration: f64,
}

impl Ruler {
    pub fn new(px_per_sec: f64, max_duration: f64) -> Self {
        Self {
            px_per_sec,
            max_duration,
        }
    }

    pub fn paint(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, Color32::from_gray(40));
        if self.px_per_sec <= 0.0 || self.max_duration <= 0.0 {
            return;
        }

        let major = major_interval(1.0 / self.px_per_sec);
        let minor = major / 4.0;

        let mut step = 0u64;
        loop {
            let time = step as f64 * minor;
            if time > self.max_duration {
                break;
            }
            let x = rect.min.x + (time * self.px_per_sec) as f32;
            if x > rect.max.x {
                break;
            }

            if step % 4 == 0 {
                painter.line_segment(
                    [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
                    Stroke::new(1.5, Color32::from_gray(90)),
                );
                painter.text(
                    Pos2::new(x + 4.0, rect.min.y + 4.0),
                    Align2::LEFT_TOP,
                    format_time(time),
                    FontId::proportional(11.0),
                    Color32::WHITE,
                );
            } else {
                painter.line_segment(
                    [Pos2::new(x, rect.center().y), Pos2::new(x, rect.max.y)],
                    Stroke::new(1.0, Color32::from_gray(60)),
                );
            }
            step += 1;
        }
    }
}

/// 主刻度间隔，取 0.1/0.25/0.5/1/2/5 乘以 10 的幂，目标间距约 100 像素
fn major_interval(seconds_per_pixel: f64) -> f64 {
    let target = seconds_per_pixel * 100.0;
    let magnitude = 10.0_f64.powf(target.log10().floor());
    let normalized = target / magnitude;

    let nice = if normalized <= 1.5 {
        1.0
    } else if normalized <= 3.5 {
        2.0
    } else if normalized <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
