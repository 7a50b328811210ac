use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{DRAG_AMPLITUDE, DRAG_SPACING_PX, GRID_SIZE, PRESS_AMPLITUDE};
use crate::gpu::{FieldBuffers, GpuContext, SurfacePipeline};
use crate::simulation::WaveField;

/// Pointer tracking for ripple input.
///
/// A press drops a full-strength ripple; dragging drops softer ones,
/// throttled by pixel distance so a fast swipe doesn't flood the
/// simulator's bounded source list.
#[derive(Default)]
struct PointerState {
    position: Option<PhysicalPosition<f64>>,
    pressed: bool,
    last_drop: Option<PhysicalPosition<f64>>,
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    buffers: Option<FieldBuffers>,
    pipeline: Option<SurfacePipeline>,
    field: WaveField,
    /// Monotonic clock started at init; elapsed seconds drive the simulation
    started: Option<Instant>,
    pointer: PointerState,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            buffers: None,
            pipeline: None,
            field: WaveField::new_default(),
            started: None,
            pointer: PointerState::default(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn render(&mut self) {
        let gpu = self.gpu.as_ref().unwrap();
        let buffers = self.buffers.as_ref().unwrap();
        let pipeline = self.pipeline.as_ref().unwrap();
        let time = self.started.map_or(0.0, |t| t.elapsed().as_secs_f32());

        // Advance the simulation one tick, then hand the fresh heights
        // to the GPU
        let heights = self.field.step(time);
        buffers.upload_heights(&gpu.queue, heights);
        buffers.update_params(&gpu.queue, time, (gpu.config.width, gpu.config.height));

        let Some(output) = gpu.acquire_frame() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        pipeline.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Update and display FPS
        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Mercury Lake - {:.0} FPS - {} ripples",
                    fps,
                    self.field.active_sources()
                ));
            }
        }
    }

    /// Map a cursor position in pixels to the normalized [-1, 1] square
    /// the simulator expects, mirroring the shader's square-cell crop so
    /// a ripple lands exactly under the cursor.
    fn normalized_from_pixels(&self, pos: PhysicalPosition<f64>) -> (f32, f32) {
        let gpu = self.gpu.as_ref().unwrap();
        let (w, h) = (gpu.config.width as f64, gpu.config.height.max(1) as f64);
        let aspect = w / h;
        let mut u = pos.x / w;
        let mut v = pos.y / h;
        if aspect > 1.0 {
            v = (v - 0.5) / aspect + 0.5;
        } else {
            u = (u - 0.5) * aspect + 0.5;
        }
        ((u * 2.0 - 1.0) as f32, (v * 2.0 - 1.0) as f32)
    }

    fn drop_ripple(&mut self, pos: PhysicalPosition<f64>, amplitude: f32) {
        let (x_norm, y_norm) = self.normalized_from_pixels(pos);
        self.field.add_source(x_norm, y_norm, amplitude);
        self.pointer.last_drop = Some(pos);
    }

    fn handle_pointer_moved(&mut self, pos: PhysicalPosition<f64>) {
        self.pointer.position = Some(pos);
        if !self.pointer.pressed {
            return;
        }
        let travelled = self
            .pointer
            .last_drop
            .map_or(f64::INFINITY, |last| {
                ((pos.x - last.x).powi(2) + (pos.y - last.y).powi(2)).sqrt()
            });
        if travelled >= DRAG_SPACING_PX {
            self.drop_ripple(pos, DRAG_AMPLITUDE);
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            // Calm the lake
            KeyCode::KeyR => {
                self.field.reset();
                log::info!("Surface reset");
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Mercury Lake...");
        log::info!("Wave grid: {}x{}", GRID_SIZE, GRID_SIZE);

        // Create window
        let window_attrs = Window::default_attributes()
            .with_title("Mercury Lake")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        // Initialize GPU
        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));

        log::info!("Creating field buffers...");
        let buffers = FieldBuffers::new(&gpu.device, GRID_SIZE as u32);

        log::info!("Creating surface pipeline...");
        let pipeline = SurfacePipeline::new(&gpu.device, gpu.format(), &buffers);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Click/drag: drop ripples");
        log::info!("  R: reset the surface");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.buffers = Some(buffers);
        self.pipeline = Some(pipeline);
        self.started = Some(Instant::now());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.gpu.is_some() {
                    self.handle_pointer_moved(position);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && self.gpu.is_some() {
                    match state {
                        ElementState::Pressed => {
                            self.pointer.pressed = true;
                            if let Some(pos) = self.pointer.position {
                                self.drop_ripple(pos, PRESS_AMPLITUDE);
                            }
                        }
                        ElementState::Released => {
                            self.pointer.pressed = false;
                            self.pointer.last_drop = None;
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.gpu.is_some() {
                    self.render();
                }
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Frame counter reporting the average FPS once per second
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
        }
    }

    fn tick(&mut self) -> Option<f64> {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = Instant::now();
        Some(fps)
    }
}
