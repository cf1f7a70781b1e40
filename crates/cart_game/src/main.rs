//! Cartofia -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `FrameClock`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- run whole 60 Hz game ticks against an input
//!      snapshot; each tick fills a fresh `FrameOutput`
//!   3. Rebuild the sprite mesh from the last tick's blit list
//!   4. Upload camera uniform, issue draw calls, composite the egui HUD
//!
//! The simulation works in a fixed 1000x1000 logical pixel space; the camera
//! stretches it to whatever size the window actually is, and pointer input is
//! converted back the other way before a tick samples it.

mod audio;
mod entity;
mod game;
mod level;
mod player;
mod ui;
mod world;

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use audio::{AudioSink, NullAudio};
use cart_core::frame::{Facing, FrameOutput, SpriteId};
use cart_core::input::{InputState, Key, MouseBtn, TickInput};
use cart_core::time::FrameClock;
use cart_hud::{GameHud, HudStats};
use cart_platform::window::PlatformConfig;
use cart_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex, Texture};
use game::{Game, GAME_H, GAME_W};
use level::LevelStore;

const IMAGE_DIR: &str = "assets/img";
const LEVEL_DIR: &str = "assets/levels";

/// A contiguous run of indices that share the same texture binding.
/// Draw calls are merged when consecutive quads use the same texture,
/// minimizing GPU bind-group switches during the render pass.
#[derive(Debug, Clone, Copy)]
struct DrawCall {
    sprite: SpriteId,
    index_start: u32,
    index_count: u32,
}

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state lives here. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface are
/// available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (clock, input, camera) -- updated every frame
///  - **Game** (state machine, per-tick frame output, audio sink)
///  - **GPU resources** (textures, vertex/index/camera buffers, draw calls)
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    hud: GameHud,

    game: Game,
    frame: FrameOutput,
    audio: NullAudio,
    textures: HashMap<SpriteId, GpuSpriteTexture>,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // The sprite mesh is rebuilt on the CPU after every frame that stepped,
    // then streamed into these GPU buffers. Buffers grow (power-of-two) but
    // never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let clock = FrameClock::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let hud = GameHud::new(
            &gpu.device,
            gpu.surface_format,
            &window,
            GAME_W as u32,
            GAME_H as u32,
        );

        let camera = Camera2D::new(GAME_W as u32, GAME_H as u32);
        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let textures = load_all_textures(&gpu.device, &gpu.queue, &sprite_pipeline);

        let game = Game::new(LevelStore::new(LEVEL_DIR));
        let mut audio = NullAudio::new();
        audio.start_music();

        Self {
            window,
            gpu,
            clock,
            input,
            camera,
            sprite_pipeline,
            hud,
            game,
            frame: FrameOutput::new(),
            audio,
            textures,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            sprite_count: 0,
        }
    }

    /// Pointer position in logical game pixels, derived from the current
    /// physical window size.
    fn logical_pointer(&self) -> (f32, f32) {
        let (px, py) = self.input.mouse_position;
        let (w, h) = (self.gpu.size.0.max(1) as f64, self.gpu.size.1.max(1) as f64);
        (
            (px * GAME_W as f64 / w) as f32,
            (py * GAME_H as f64 / h) as f32,
        )
    }

    fn rebuild_frame_mesh(&mut self) {
        // Build a single CPU-side mesh from the tick's blit list, then stream
        // it into GPU buffers.
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.sprite_count = vertices.len() / 4;
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
        let quad_count = self.frame.blits.len();
        let mut vertices = Vec::with_capacity(quad_count * 4);
        let mut indices = Vec::with_capacity(quad_count * 6);
        let mut draw_calls = Vec::with_capacity(16);

        for blit in &self.frame.blits {
            add_quad(&mut vertices, &mut indices, &mut draw_calls, blit);
        }

        (vertices, indices, draw_calls)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn estimate_memory_mb(&self) -> f32 {
        let mut bytes: usize = 0;
        // Texture memory (width * height * 4 bytes per pixel)
        for tex in self.textures.values() {
            let (w, h) = tex.texture.size;
            bytes += (w as usize) * (h as usize) * 4;
        }
        // GPU buffer memory
        bytes += self.mesh_vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.mesh_index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = cart_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.hud.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    match btn_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.clock.begin_frame();
                while state.clock.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        log::info!("Escape pressed, exiting.");
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.hud.toggle_debug();
                    }
                    if state.input.is_just_pressed(Key::F11) {
                        cart_platform::window::toggle_fullscreen(&state.window);
                    }

                    let tick_input = TickInput::sample(&state.input, state.logical_pointer());
                    state.frame.clear();
                    state.game.tick(&tick_input, &mut state.frame);
                    for &sound in &state.frame.sounds {
                        state.audio.play(sound);
                    }

                    if state.game.quit {
                        log::info!("Quit requested from the menu, exiting.");
                        event_loop.exit();
                        return;
                    }
                }

                if state.clock.steps_this_frame > 0 {
                    state.rebuild_frame_mesh();
                }

                // Render phase reads finalized simulation state from this frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let (egui_primitives, egui_textures_delta) = state.hud.prepare(
                    &state.window,
                    &state.clock,
                    &state.frame.texts,
                    Some(HudStats {
                        draw_calls: state.draw_calls.len() as u32,
                        texture_binds: count_texture_binds(&state.draw_calls) as u32,
                        sprite_count: state.sprite_count as u32,
                        memory_estimate_mb: state.estimate_memory_mb(),
                        level: state.game.level,
                        score: state.game.score,
                    }),
                );

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_sprite: Option<SpriteId> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Game Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.sprite) {
                            if last_bound_sprite != Some(draw.sprite) {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_sprite = Some(draw.sprite);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }

                state.hud.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .hud
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.hud.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.clock.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    blit: &cart_core::frame::Blit,
) {
    let x0 = blit.dest.x as f32;
    let y0 = blit.dest.y as f32;
    let x1 = blit.dest.right() as f32;
    let y1 = blit.dest.bottom() as f32;
    let color = [1.0f32, 1.0, 1.0, 1.0];
    let base_index = vertices.len() as u32;

    // y grows downward, so v=0 (image top) pairs with the smaller y.
    vertices.push(SpriteVertex::new([x0, y0], [0.0, 0.0], color));
    vertices.push(SpriteVertex::new([x1, y0], [1.0, 0.0], color));
    vertices.push(SpriteVertex::new([x1, y1], [1.0, 1.0], color));
    vertices.push(SpriteVertex::new([x0, y1], [0.0, 1.0], color));

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, blit.sprite, draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. Blits arrive back to front, so runs of tiles or
/// coins sharing an image collapse into a single `draw_indexed` call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    sprite: SpriteId,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.sprite == sprite && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        sprite,
        index_start,
        index_count,
    });
}

fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<SpriteId> = None;
    for draw in draw_calls {
        if current != Some(draw.sprite) {
            current = Some(draw.sprite);
            binds += 1;
        }
    }
    binds
}

/// Image file for each sprite handle. Walk-left frames reuse the walk-right
/// files, mirrored at load time.
fn sprite_image_file(sprite: SpriteId) -> &'static str {
    match sprite {
        SpriteId::Sky => "sky.png",
        SpriteId::Sun => "sun.png",
        SpriteId::Dirt => "dirt.png",
        SpriteId::Grass => "grass.png",
        SpriteId::Blob => "blob.png",
        SpriteId::Platform => "platform.png",
        SpriteId::Lava => "lava.png",
        SpriteId::Coin => "coin.png",
        SpriteId::Exit => "exit.png",
        SpriteId::Ghost => "ghost.png",
        SpriteId::Walk { frame: 0, .. } => "c1.png",
        SpriteId::Walk { frame: 1, .. } => "c2.png",
        SpriteId::Walk { frame: 2, .. } => "c3.png",
        SpriteId::Walk { .. } => "c4.png",
        SpriteId::StartButton => "start_btn.png",
        SpriteId::RestartButton => "restart_btn.png",
        SpriteId::ExitButton => "exit_btn.png",
    }
}

fn all_sprite_ids() -> Vec<SpriteId> {
    let mut ids = vec![
        SpriteId::Sky,
        SpriteId::Sun,
        SpriteId::Dirt,
        SpriteId::Grass,
        SpriteId::Blob,
        SpriteId::Platform,
        SpriteId::Lava,
        SpriteId::Coin,
        SpriteId::Exit,
        SpriteId::Ghost,
        SpriteId::StartButton,
        SpriteId::RestartButton,
        SpriteId::ExitButton,
    ];
    for frame in 0..4u8 {
        ids.push(SpriteId::Walk {
            facing: Facing::Right,
            frame,
        });
        ids.push(SpriteId::Walk {
            facing: Facing::Left,
            frame,
        });
    }
    ids
}

fn load_all_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
) -> HashMap<SpriteId, GpuSpriteTexture> {
    let mut textures = HashMap::new();
    for sprite in all_sprite_ids() {
        let path = format!("{}/{}", IMAGE_DIR, sprite_image_file(sprite));
        let mirrored = matches!(
            sprite,
            SpriteId::Walk {
                facing: Facing::Left,
                ..
            }
        );
        let texture = load_texture_asset(device, queue, &path, mirrored);
        let bind_group = pipeline.create_texture_bind_group(device, &texture);
        textures.insert(
            sprite,
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }
    textures
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    asset_path: &str,
    mirrored: bool,
) -> Texture {
    let bytes = match std::fs::read(asset_path) {
        Ok(data) => data,
        Err(err) => {
            log::warn!(
                "Failed to read texture '{}': {}. Falling back to placeholder.",
                asset_path,
                err
            );
            // 1x1 magenta stand-in so a missing asset is visible, not fatal.
            return Texture::from_rgba8(device, queue, &[255, 0, 255, 255], 1, 1, asset_path);
        }
    };
    if mirrored {
        match image::load_from_memory(&bytes) {
            Ok(img) => {
                let flipped = img.fliph().to_rgba8();
                let (w, h) = flipped.dimensions();
                Texture::from_rgba8(device, queue, &flipped, w, h, asset_path)
            }
            Err(err) => {
                log::error!("Failed to decode image '{}': {}", asset_path, err);
                Texture::from_rgba8(device, queue, &[255, 0, 255, 255], 1, 1, asset_path)
            }
        }
    } else {
        Texture::from_bytes(device, queue, &bytes, asset_path)
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F11 => Some(Key::F11),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Cartofia starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
