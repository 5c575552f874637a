//! # Sketchy Window
//!
//! Hosts the canvas in an eframe window and drives the input pipeline from
//! egui's repaint loop.
//!
//! ## Frame Processing
//!
//! egui calls [`SketchyUI::update`] on every repaint. Each call:
//! - accumulates pointer motion (raw mouse motion where the platform reports it)
//! - checks the [`TickClock`]; when a tick is due, polls the joysticks, runs one
//!   [`FrameLoop`] tick and renders the result
//! - paints the canvas texture across the whole window
//!
//! Input that arrives between ticks is summed, so pointer speed does not
//! depend on how often egui happens to repaint.
//!
//! ## Rendering
//!
//! The canvas lives in CPU memory. A motion event draws one line segment and
//! uploads only its dirty region with `TextureHandle::set_partial`; a shake
//! lays a fresh translucent background over the whole canvas and uploads it
//! in full.
//!
//! ## Window Behaviour
//! - Fullscreen by default, pointer hidden and confined to the window
//! - Escape or closing the window quits
//! - A size change rebuilds the canvas and pulls the cursor back inside

pub mod pacing;
pub mod pointer;

pub use pacing::{FrameStats, TickClock};
pub use pointer::{frame_motion, PointerAccumulator};

use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info};

use crate::canvas::{generate_background, Canvas, DirtyRegion};
use crate::config::SketchyConfig;
use crate::controller::frame::Waiting;
use crate::controller::{Bounds, CursorState, FrameLoop, FrameOutput, FrameSamples, JoystickSource};

// Canvas plus the GPU texture mirroring it
struct Surface {
    canvas: Canvas,
    texture: egui::TextureHandle,
}

impl Surface {
    // Upload a changed region of the canvas
    fn present(&mut self, region: DirtyRegion) {
        if region.is_empty() {
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [region.width, region.height],
            &self.canvas.region_pixels(region),
        );
        self.texture
            .set_partial([region.x, region.y], image, egui::TextureOptions::NEAREST);
    }
}

pub struct SketchyUI {
    config: SketchyConfig,
    joysticks: Box<dyn JoystickSource>,
    pointer: PointerAccumulator,
    clock: TickClock,
    stats: FrameStats,
    rng: StdRng,
    surface: Option<Surface>,
    frame_loop: Option<FrameLoop<Waiting>>,
}

impl SketchyUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SketchyConfig,
        joysticks: Box<dyn JoystickSource>,
    ) -> Self {
        cc.egui_ctx
            .send_viewport_cmd(egui::ViewportCommand::CursorVisible(false));
        cc.egui_ctx.send_viewport_cmd(egui::ViewportCommand::CursorGrab(
            egui::CursorGrab::Confined,
        ));

        let clock = TickClock::new(config.display.tick_interval());
        info!(
            "Ticking at {} Hz ({:?} per tick)",
            config.display.tick_rate_hz,
            config.display.tick_interval()
        );

        SketchyUI {
            config,
            joysticks,
            pointer: PointerAccumulator::default(),
            clock,
            stats: FrameStats::default(),
            rng: StdRng::from_entropy(),
            surface: None,
            frame_loop: None,
        }
    }

    // (Re)create the canvas when the window size in pixels changes
    fn ensure_surface(&mut self, ctx: &egui::Context, width: usize, height: usize) {
        if let Some(surface) = &self.surface {
            if surface.canvas.get_bounds() == (width, height) {
                return;
            }
        }

        info!("Creating {}x{} canvas", width, height);
        let canvas_config = &self.config.canvas;
        let background = generate_background(
            width,
            height,
            canvas_config.background_grey,
            canvas_config.background_variance,
            255,
            &mut self.rng,
        );
        let mut canvas = Canvas::new(width, height);
        canvas.fill(&background);

        let image = egui::ColorImage::from_rgba_unmultiplied([width, height], canvas.pixels());
        let texture = ctx.load_texture("sketchy-canvas", image, egui::TextureOptions::NEAREST);
        self.surface = Some(Surface { canvas, texture });

        let bounds = Bounds::new(width as f32, height as f32);
        self.frame_loop = Some(match self.frame_loop.take() {
            Some(mut frame_loop) => {
                frame_loop.resize(bounds);
                frame_loop
            }
            None => FrameLoop::create((&self.config.input).into(), CursorState::new(bounds)),
        });
    }

    fn tick(&mut self, gesture_pressed: bool) {
        let Some(frame_loop) = self.frame_loop.take() else {
            return;
        };

        let pointer = self.pointer.poll_pointer(gesture_pressed);
        let joysticks = self.joysticks.poll_joysticks();
        let (frame_loop, output) =
            frame_loop.tick(FrameSamples::with_ids(pointer, joysticks));
        self.frame_loop = Some(frame_loop);

        self.render(&output);
        self.stats.record(&output);
    }

    fn render(&mut self, output: &FrameOutput) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let canvas_config = &self.config.canvas;

        if let Some(motion) = &output.motion {
            let region = surface.canvas.draw_line_segment(
                motion.old_position,
                motion.new_position,
                canvas_config.line_colour,
                canvas_config.line_width,
            );
            surface.present(region);
        }

        if output.shake.is_some() {
            let (width, height) = surface.canvas.get_bounds();
            debug!("Shaking {}x{} canvas", width, height);
            let background = generate_background(
                width,
                height,
                canvas_config.background_grey,
                canvas_config.background_variance,
                canvas_config.shake_alpha,
                &mut self.rng,
            );
            let region = surface.canvas.blend(&background);
            surface.present(region);
        }
    }
}

impl eframe::App for SketchyUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pixels_per_point = ctx.pixels_per_point();
        let (quit, motion, gesture_pressed, screen_rect) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                frame_motion(&i.events, i.pointer.delta(), pixels_per_point),
                i.pointer.secondary_down(),
                i.screen_rect(),
            )
        });

        if quit {
            info!("Escape pressed, closing");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let pixels = screen_rect.size() * pixels_per_point;
        let (width, height) = (pixels.x.round() as usize, pixels.y.round() as usize);
        if width == 0 || height == 0 {
            ctx.request_repaint_after(self.config.display.tick_interval());
            return;
        }
        self.ensure_surface(ctx, width, height);

        self.pointer.add(motion);
        let now = Instant::now();
        if self.clock.due(now) {
            self.tick(gesture_pressed);
        }

        if let Some(surface) = &self.surface {
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.painter().image(
                        surface.texture.id(),
                        screen_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                });
        }

        ctx.set_cursor_icon(egui::CursorIcon::None);
        ctx.request_repaint_after(self.clock.until_next(now));
    }
}
