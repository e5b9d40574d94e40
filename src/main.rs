use anyhow::Result;
use eframe::egui::{self, Color32, Pos2, Sense, Stroke, Vec2};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};

mod epicycle;

use epicycle::{Circle, Point, Preset};

const BACKGROUND: Color32 = Color32::from_gray(45);
const TRACE_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting epicycle tracer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_title("Epicycle Tracer"),
        ..Default::default()
    };

    eframe::run_native(
        "Epicycle Tracer",
        options,
        Box::new(|_cc| Ok(Box::new(EpicycleApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}

struct EpicycleApp {
    circles: Vec<Circle>,
    preset_idx: usize,
    frame: u64,
    trace: Vec<Point>,
    scale: f32,
    canvas_size: Vec2,
    paused: bool,
    show_circles: bool,

    // Export state
    csv_filename: String,
    json_filename: String,
    error_msg: String,
}

impl Default for EpicycleApp {
    fn default() -> Self {
        Self::new()
    }
}

impl EpicycleApp {
    fn new() -> Self {
        Self {
            circles: Preset::PRESETS[0].circles.to_vec(),
            preset_idx: 0,
            frame: epicycle::RECORD_START,
            trace: Vec::new(),
            scale: 1.0,
            canvas_size: Vec2::ZERO,
            paused: false,
            show_circles: true,
            csv_filename: "epicycle_trace.csv".to_string(),
            json_filename: "epicycle.json".to_string(),
            error_msg: String::new(),
        }
    }

    fn apply_preset(&mut self, idx: usize) {
        self.circles = Preset::PRESETS[idx].circles.to_vec();
        self.preset_idx = idx;
        self.frame = epicycle::RECORD_START;
        self.trace.clear();
        // Chain extent changed, so the fit changes too
        self.scale =
            epicycle::scale_factor(self.canvas_size.x, self.canvas_size.y, self.circles.len());
    }

    /// Recompute the scale factor when the canvas size changes
    fn handle_resize(&mut self, size: Vec2) {
        if size != self.canvas_size {
            self.canvas_size = size;
            self.scale = epicycle::scale_factor(size.x, size.y, self.circles.len());
        }
    }

    /// Record the tip for the current frame and advance the frame counter.
    /// Paused frames leave both untouched, so event-driven repaints while
    /// paused cannot duplicate trace points.
    fn step(&mut self) {
        if self.paused {
            return;
        }
        if epicycle::in_record_window(self.frame) {
            let t = epicycle::angle_at(self.frame);
            self.trace.push(epicycle::tip_unscaled(&self.circles, t));
        }
        self.frame += 1;
    }

    fn export_csv(&self) -> std::io::Result<()> {
        let file = File::create(&self.csv_filename)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "x,y")?;
        for p in &self.trace {
            writeln!(writer, "{},{}", p.x, p.y)?;
        }
        Ok(())
    }

    fn export_json(&self) -> Result<()> {
        let data = serde_json::json!({
            "circles": self.circles,
            "trace": self.trace,
        });
        let file = File::create(&self.json_filename)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &data)?;
        Ok(())
    }

    fn draw_chain(&self, painter: &egui::Painter, center: Pos2, t: f32) {
        let joints = epicycle::chain_joints(&self.circles, t, self.scale);
        let line_stroke = Stroke::new(1.0, Color32::WHITE);
        let circle_stroke = Stroke::new(1.0, Color32::from_white_alpha(50));

        for (i, c) in self.circles.iter().enumerate() {
            let from = center + Vec2::new(joints[i].x, joints[i].y);
            let to = center + Vec2::new(joints[i + 1].x, joints[i + 1].y);

            painter.line_segment([from, to], line_stroke);
            painter.circle_stroke(from, c.radius * self.scale, circle_stroke);
            painter.circle_filled(to, 2.5, Color32::WHITE);
        }
    }

    fn draw_trace(&self, painter: &egui::Painter, center: Pos2) {
        if self.trace.len() < 2 {
            return;
        }
        let points: Vec<Pos2> = self
            .trace
            .iter()
            .map(|p| center + Vec2::new(p.x * self.scale, p.y * self.scale))
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(2.0, TRACE_COLOR)));
    }
}

impl eframe::App for EpicycleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.paused { "Play" } else { "Pause" })
                    .clicked()
                {
                    self.paused = !self.paused;
                }

                if ui.button("Restart").clicked() {
                    self.apply_preset(self.preset_idx);
                }

                ui.separator();

                ui.label("Preset:");
                let mut selected = self.preset_idx;
                egui::ComboBox::from_label("")
                    .selected_text(Preset::PRESETS[selected].name)
                    .show_ui(ui, |ui| {
                        for (i, preset) in Preset::PRESETS.iter().enumerate() {
                            ui.selectable_value(&mut selected, i, preset.name);
                        }
                    });
                if selected != self.preset_idx {
                    self.apply_preset(selected);
                }

                ui.checkbox(&mut self.show_circles, "Show circles");

                ui.separator();

                ui.label(format!("Frame: {}", self.frame));
                ui.label(format!("Trace points: {}", self.trace.len()));
                if epicycle::in_record_window(self.frame) {
                    ui.label("Recording");
                }
            });

            ui.horizontal(|ui| {
                ui.label("CSV:");
                ui.add(egui::TextEdit::singleline(&mut self.csv_filename).desired_width(160.0));
                if ui.button("Export CSV").clicked() {
                    match self.export_csv() {
                        Ok(()) => {
                            info!(
                                "Exported {} trace points to {}",
                                self.trace.len(),
                                self.csv_filename
                            );
                            self.error_msg.clear();
                        }
                        Err(e) => self.error_msg = format!("CSV export failed: {}", e),
                    }
                }

                ui.label("JSON:");
                ui.add(egui::TextEdit::singleline(&mut self.json_filename).desired_width(160.0));
                if ui.button("Export JSON").clicked() {
                    match self.export_json() {
                        Ok(()) => {
                            info!("Exported figure to {}", self.json_filename);
                            self.error_msg.clear();
                        }
                        Err(e) => self.error_msg = format!("JSON export failed: {}", e),
                    }
                }

                if !self.error_msg.is_empty() {
                    ui.colored_label(Color32::YELLOW, &self.error_msg);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
            let rect = response.rect;

            self.handle_resize(rect.size());

            painter.rect_filled(rect, 0.0, BACKGROUND);

            let center = rect.center();
            let t = epicycle::angle_at(self.frame);

            if self.show_circles {
                self.draw_chain(&painter, center, t);
            }

            self.step();

            self.draw_trace(&painter, center);
        });

        if !self.paused {
            ctx.request_repaint();
        }
    }
}
