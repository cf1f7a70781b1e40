//! Game text and debug statistics rendered via egui on top of the scene.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The score line and the game-over/win banners come in as [`TextRequest`]s
//! positioned in logical game pixels; `prepare` rescales them to egui points
//! for the current window size. The debug window (toggled by F3) shows frame
//! timing and draw statistics on top.

use cart_core::frame::{TextColor, TextRequest, TextSize};
use cart_core::time::FrameClock;
use winit::window::Window;

const TITLE_FONT_PX: f32 = 70.0;
const SCORE_FONT_PX: f32 = 30.0;

#[derive(Debug, Clone, Default)]
pub struct HudStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub sprite_count: u32,
    /// Estimated GPU memory usage in megabytes
    pub memory_estimate_mb: f32,
    pub level: u32,
    pub score: u32,
}

pub struct GameHud {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    /// Logical game resolution that text request coordinates refer to.
    logical: (u32, u32),
    pub debug_visible: bool,
}

impl GameHud {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        logical_width: u32,
        logical_height: u32,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            logical: (logical_width, logical_height),
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        texts: &[TextRequest],
        stats: Option<HudStats>,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);

        // Logical game pixel -> egui point scale for the current window.
        let inner = window.inner_size();
        let ppp = self.egui_ctx.pixels_per_point();
        let scale_x = inner.width as f32 / ppp / self.logical.0 as f32;
        let scale_y = inner.height as f32 / ppp / self.logical.1 as f32;

        let logical = self.logical;
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("game_text"),
            ));
            for request in texts {
                let font_px = match request.size {
                    TextSize::Title => TITLE_FONT_PX,
                    TextSize::Score => SCORE_FONT_PX,
                };
                let color = match request.color {
                    TextColor::White => egui::Color32::WHITE,
                    TextColor::Blue => egui::Color32::from_rgb(0, 0, 255),
                };
                painter.text(
                    egui::pos2(request.pos.x * scale_x, request.pos.y * scale_y),
                    egui::Align2::LEFT_TOP,
                    &request.text,
                    egui::FontId::proportional(font_px * scale_y),
                    color,
                );
            }

            if debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
                        ui.label(format!("Steps this frame: {}", clock.steps_this_frame));
                        ui.label(format!("Total ticks: {}", clock.tick_count));
                        ui.label(format!("Frame: {}", clock.frame_count));
                        ui.label(format!("Logical: {}x{}", logical.0, logical.1));
                        if let Some(ref stats) = stats {
                            ui.separator();
                            ui.label(format!("Draw calls: {}", stats.draw_calls));
                            ui.label(format!("Texture binds: {}", stats.texture_binds));
                            ui.label(format!("Sprites: {}", stats.sprite_count));
                            ui.label(format!("Memory: {:.1} MB", stats.memory_estimate_mb));
                            ui.separator();
                            ui.label(format!("Level: {}", stats.level));
                            ui.label(format!("Score: {}", stats.score));
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
