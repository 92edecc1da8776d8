//! Interactive 2D growth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a
//! [`GrowthEngine`] and implements [`eframe::App`] to render and control
//! the simulation. The core never renders or paces itself: each frame
//! the viewer decides whether enough time has passed, calls
//! [`GrowthEngine::step`] and paints the live cells.
//!
//! The typical per-frame update is:
//! 1. Handle UI interactions / input (pan, zoom, click-to-seed).
//! 2. If `running` and the step interval elapsed, step the engine.
//! 3. Paint the grid frame and the live cells.

use std::fmt::Write as _;

use eframe::App;
use glam::Vec2;
use growth_core::{config::GrowthConfig, engine::GrowthEngine, error::GrowthError};

/// Main application state for the interactive viewer.
///
/// ### Fields
/// - `engine` - The running simulation.
/// - `pending_cfg` - Configuration edited in the side panel; applied to a
///   fresh engine on reset.
/// - `running` - Whether the simulation is auto-advancing.
/// - `zoom` - Screen pixels per grid cell.
/// - `pan` - Screen-space pan offset in pixels.
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` / `last_step_dt` - Step timing (egui time).
pub struct Viewer {
    engine: GrowthEngine,
    pending_cfg: GrowthConfig,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer around an engine built from the default
    /// configuration (800x800 window, 4-pixel cells, one bottom-center
    /// seed under a top-heavy potential).
    pub fn new() -> Result<Self, GrowthError> {
        let cfg = GrowthConfig::default();
        let engine = GrowthEngine::new(cfg.clone())?;
        Ok(Self {
            engine,
            zoom: cfg.pixel_size as f32,
            pending_cfg: cfg,
            running: false,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Rebuilds the engine from the edited configuration.
    ///
    /// A rejected configuration keeps the current engine running and
    /// logs the error; startup configuration problems are final, never
    /// retried silently.
    fn reset(&mut self) {
        match GrowthEngine::new(self.pending_cfg.clone()) {
            Ok(engine) => {
                self.engine = engine;
                self.running = false;
            }
            Err(err) => log::error!("configuration rejected: {err}"),
        }
    }

    /// Advances the simulation by one external tick.
    fn step_once(&mut self) {
        self.engine.step();
        if self.engine.is_quiescent() {
            self.running = false;
        }
    }

    /// Converts fractional grid coordinates to screen-space.
    ///
    /// The grid is centered inside `rect`, scaled by `zoom` (pixels per
    /// cell) and offset by `pan`. Grid `j` grows downward, matching
    /// screen space, so no axis flip is needed.
    fn grid_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let cfg = self.engine.config();
        let half_x = cfg.grid_size_x() as f32 * 0.5;
        let half_y = cfg.grid_size_y() as f32 * 0.5;
        let center = rect.center();
        egui::pos2(
            center.x + (p.x - half_x) * self.zoom + self.pan.x,
            center.y + (p.y - half_y) * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::grid_to_screen`] (up to rounding).
    fn screen_to_grid(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let cfg = self.engine.config();
        let half_x = cfg.grid_size_x() as f32 * 0.5;
        let half_y = cfg.grid_size_y() as f32 * 0.5;
        let center = rect.center();
        Vec2::new(
            (p.x - center.x - self.pan.x) / self.zoom + half_x,
            (p.y - center.y - self.pan.y) / self.zoom + half_y,
        )
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(1.0));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel (run controls, stepping, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.005),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.5..=20.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timing, tick and cell counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("ticks = {}", self.engine.ticks()));
                ui.label(format!("live cells = {}", self.engine.cells().len()));
                if self.engine.is_quiescent() {
                    ui.label("growth terminated");
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    ///
    /// Edits accumulate in `pending_cfg` and take effect when the user
    /// applies them to a fresh engine.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Stepping");
                Self::labeled_drag_u32(ui, "stride:", &mut self.pending_cfg.stride, 1..=64);

                ui.separator();
                ui.label("Attraction");
                Self::labeled_drag_f32(
                    ui,
                    "factor:",
                    &mut self.pending_cfg.attract_factor,
                    1.0..=100.0,
                    0.5,
                );
                Self::labeled_drag_u32(
                    ui,
                    "radius:",
                    &mut self.pending_cfg.attract_radius,
                    0..=32,
                );

                ui.separator();
                ui.label("Deterrence");
                Self::labeled_drag_f32(
                    ui,
                    "factor:",
                    &mut self.pending_cfg.deter_factor,
                    0.0..=1.0,
                    0.01,
                );
                Self::labeled_drag_u32(ui, "radius:", &mut self.pending_cfg.deter_radius, 0..=32);
                Self::labeled_drag_u32(ui, "age:", &mut self.pending_cfg.deter_age, 0..=32);

                ui.separator();
                ui.label("Random seed");
                let mut seeded = self.pending_cfg.seed.is_some();
                ui.checkbox(&mut seeded, "fixed seed");
                if seeded {
                    let mut seed = self.pending_cfg.seed.unwrap_or(0);
                    ui.add(egui::DragValue::new(&mut seed).speed(1.0));
                    self.pending_cfg.seed = Some(seed);
                } else {
                    self.pending_cfg.seed = None;
                }

                ui.separator();
                if ui.button("Apply & restart").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.pending_cfg = GrowthConfig::default();
                }

                ui.separator();
                if ui.button("Dump potential CSV").clicked() {
                    match std::fs::write("potential_dump.csv", potential_csv(&self.engine)) {
                        Ok(()) => log::info!("potential grid written to potential_dump.csv"),
                        Err(err) => log::warn!("could not write potential dump: {err}"),
                    }
                }
            });
    }

    /// Builds the central panel: grid frame, live cells, interactions.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer = response.hover_pos().unwrap_or(rect.center());
                let grid_before = self.screen_to_grid(pointer, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.5, 20.0);

                let screen_after = self.grid_to_screen(grid_before, rect);
                self.pan += pointer - screen_after;
            }

            // Click inside the grid spawns a new seed cell.
            if response.clicked()
                && let Some(pointer) = response.hover_pos()
            {
                let grid = self.screen_to_grid(pointer, rect);
                let (i, j) = (grid.x.floor() as i32, grid.y.floor() as i32);
                if let Err(err) = self.engine.add_seed(i, j) {
                    log::warn!("seed ignored: {err}");
                }
            }

            // Grid background and frame.
            let cfg = self.engine.config();
            let grid_rect = egui::Rect::from_min_max(
                self.grid_to_screen(Vec2::ZERO, rect),
                self.grid_to_screen(
                    Vec2::new(cfg.grid_size_x() as f32, cfg.grid_size_y() as f32),
                    rect,
                ),
            );
            painter.rect_filled(grid_rect, egui::CornerRadius::ZERO, egui::Color32::BLACK);

            // Live cells as filled squares; cells spawned in the latest
            // tick have not been surveyed yet and are highlighted.
            for cell in self.engine.cells() {
                let (i, j) = cell.pos();
                let min = self.grid_to_screen(Vec2::new(i as f32, j as f32), rect);
                let cell_rect =
                    egui::Rect::from_min_size(min, egui::vec2(self.zoom, self.zoom));
                let color = if cell.age() == 0 {
                    egui::Color32::RED
                } else {
                    egui::Color32::WHITE
                };
                painter.rect_filled(cell_rect, egui::CornerRadius::ZERO, color);
            }

            // Auto-run.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

/// Renders the potential grid as comma-delimited text, one row of the
/// first grid axis per line, for inspecting the sampled potential
/// function outside the viewer.
fn potential_csv(engine: &GrowthEngine) -> String {
    let cfg = engine.config();
    let mut out = String::new();
    for i in 0..cfg.grid_size_x() {
        for j in 0..cfg.grid_size_y() {
            let _ = write!(out, "{},", engine.field().get(i, j));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn grid_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new().unwrap();
        viewer.zoom = 3.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let eps = 1e-3;
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 42.0),
            Vec2::new(13.5, 180.25),
        ] {
            let screen = viewer.grid_to_screen(p, rect);
            let back = viewer.screen_to_grid(screen, rect);
            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={p:?}, back={back:?}"
            );
        }
    }

    #[test]
    fn reset_rebuilds_the_engine_from_the_pending_config() {
        let mut viewer = Viewer::new().unwrap();
        viewer.step_once();
        viewer.step_once();
        assert!(viewer.engine.ticks() > 0);

        viewer.pending_cfg.seed = Some(99);
        viewer.reset();

        assert_eq!(viewer.engine.ticks(), 0);
        assert_eq!(viewer.engine.config().seed, Some(99));
        assert_eq!(
            viewer.engine.cells().len(),
            viewer.engine.config().initial_cells.len()
        );
        assert!(!viewer.running);
    }

    #[test]
    fn reset_keeps_the_engine_on_invalid_config() {
        let mut viewer = Viewer::new().unwrap();
        viewer.step_once();
        let ticks = viewer.engine.ticks();

        // Pixel size 3 does not divide the 800-pixel window.
        viewer.pending_cfg.pixel_size = 3;
        viewer.reset();

        assert_eq!(viewer.engine.ticks(), ticks, "running engine was replaced");
    }

    #[test]
    fn potential_csv_has_one_line_per_column() {
        let viewer = Viewer::new().unwrap();
        let csv = potential_csv(&viewer.engine);
        let cfg = viewer.engine.config();
        assert_eq!(csv.lines().count(), cfg.grid_size_x() as usize);
        let first_len = csv.lines().next().unwrap().split(',').count();
        // Trailing comma yields one empty trailing field.
        assert_eq!(first_len, cfg.grid_size_y() as usize + 1);
    }
}
