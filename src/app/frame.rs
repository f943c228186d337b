//! The application window: a winit window with a wgpu surface rendering one
//! egui context.
//!
//! A [`DeskFrame`] is created per window state. Decoration and transparency
//! are fixed at creation, so switching states destroys the frame and builds
//! a new one; the content (terminal widget, settings) lives outside it.

use super::window_state::{FrameOps, FrameStyle, Geometry};
use crate::platform::desktop;
use anyhow::{Context, Result};
use deskterminal_terminal::{CellMetrics, TerminalFonts};
use std::sync::Arc;
use tokio::runtime::Runtime;
use wgpu::SurfaceError;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId, WindowLevel};

/// Clear color behind the terminal: fully transparent
pub const CLEAR_EMBEDDED: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Clear color behind the settings editor
pub const CLEAR_DECORATED: wgpu::Color = wgpu::Color {
    r: 0.094,
    g: 0.094,
    b: 0.094,
    a: 1.0,
};

/// One window with its GPU surface and egui integration
pub struct DeskFrame {
    /// wgpu surface (holds its own reference to the window)
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    /// Texture updates from passes that were not painted
    pending_textures: egui::TexturesDelta,
    style: FrameStyle,
    window: Arc<Window>,
}

impl DeskFrame {
    /// Create and show a window with `style` at `geometry`.
    pub async fn new(
        event_loop: &ActiveEventLoop,
        style: FrameStyle,
        geometry: Geometry,
    ) -> Result<Self> {
        let level = match style {
            FrameStyle::Embedded => WindowLevel::AlwaysOnBottom,
            FrameStyle::Decorated => WindowLevel::Normal,
        };
        let window_attrs = Window::default_attributes()
            .with_title("Deskterminal")
            .with_position(PhysicalPosition::new(geometry.x, geometry.y))
            .with_inner_size(PhysicalSize::new(
                geometry.width.max(1) as u32,
                geometry.height.max(1) as u32,
            ))
            .with_min_inner_size(LogicalSize::new(120, 80))
            .with_decorations(style.decorated())
            .with_transparent(style.transparent())
            .with_window_level(level)
            .with_resizable(true);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();

        // Platform-specific backend selection for better VM compatibility
        #[cfg(target_os = "windows")]
        let backends = wgpu::Backends::DX12;
        #[cfg(target_os = "macos")]
        let backends = wgpu::Backends::all();
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let backends = wgpu::Backends::VULKAN | wgpu::Backends::GL;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("Failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no texture formats")?;

        // egui emits premultiplied colors; the compositor must honour alpha
        // for the embedded window to show the wallpaper through.
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
            wgpu::CompositeAlphaMode::Auto,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("Surface {surface_format:?}, alpha mode {alpha_mode:?}, style {style:?}");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let scale_factor = window.scale_factor() as f32;
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_format,
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: None,
                dithering: false,
                predictable_texture_filtering: false,
            },
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            egui_ctx,
            egui_state,
            egui_renderer,
            pending_textures: egui::TexturesDelta::default(),
            style,
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn style(&self) -> FrameStyle {
        self.style
    }

    pub fn egui_ctx(&self) -> &egui::Context {
        &self.egui_ctx
    }

    /// Outer position and client size, the measures the window is
    /// created with
    pub fn geometry(&self) -> Option<Geometry> {
        let position = self.window.outer_position().ok()?;
        let size = self.window.inner_size();
        Some(Geometry::from_window(
            (position.x, position.y),
            (size.width, size.height),
        ))
    }

    /// Client area in egui points
    pub fn inner_size_points(&self) -> (f32, f32) {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor() as f32;
        (size.width as f32 / scale, size.height as f32 / scale)
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Feed a window event to egui. Returns true when a repaint is needed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(&self.window, event);

        if let WindowEvent::Resized(new_size) = event
            && new_size.width > 0
            && new_size.height > 0
        {
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            return true;
        }

        response.repaint
    }

    /// Run an egui pass without painting it and measure terminal cells with
    /// the fonts installed in this frame's context.
    pub fn measure(&mut self, font_id: &egui::FontId) -> CellMetrics {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let mut metrics = None;
        let output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            metrics = Some(CellMetrics::measure(&painter, font_id));
        });
        // The font atlas produced here must still reach the GPU
        self.pending_textures.append(output.textures_delta);

        metrics.unwrap_or(CellMetrics {
            char_width: font_id.size * 0.6,
            line_height: font_id.size * 1.2,
        })
    }

    /// Run `run_ui` and present the result over `clear`.
    pub fn render(&mut self, clear: wgpu::Color, run_ui: impl FnMut(&egui::Context)) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.window.request_redraw();
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to acquire surface texture"),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);

        let mut textures = std::mem::take(&mut self.pending_textures);
        textures.append(egui_output.textures_delta);

        let paint_jobs = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        for (id, delta) in &textures.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Deskterminal Encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Deskterminal Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui_renderer.render() wants a 'static pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &textures.free {
            self.egui_renderer.free_texture(id);
        }

        let repaint_now = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|v| v.repaint_delay.is_zero());
        if repaint_now {
            self.window.request_redraw();
        }

        Ok(())
    }
}

/// [`FrameOps`] over the controller's frame slot, valid for one event
pub struct FrameHost<'a> {
    pub event_loop: &'a ActiveEventLoop,
    pub runtime: &'a Runtime,
    pub frame: &'a mut Option<DeskFrame>,
    pub fonts: &'a mut TerminalFonts,
}

impl FrameOps for FrameHost<'_> {
    fn geometry(&self) -> Option<Geometry> {
        self.frame.as_ref()?.geometry()
    }

    fn dispose(&mut self) {
        if let Some(frame) = self.frame.take() {
            log::debug!("Disposing {:?} window", frame.style());
        }
    }

    fn show(&mut self, style: FrameStyle, geometry: Geometry) -> Result<()> {
        let frame = self
            .runtime
            .block_on(DeskFrame::new(self.event_loop, style, geometry))?;
        // New egui context: fonts have to be registered again
        self.fonts.invalidate();
        frame.request_redraw();
        *self.frame = Some(frame);
        Ok(())
    }

    fn unstyle(&mut self) -> bool {
        self.frame
            .as_ref()
            .is_some_and(|frame| desktop::unstyle(frame.window()))
    }

    fn send_to_bottom(&mut self) {
        if let Some(frame) = self.frame.as_ref() {
            desktop::send_to_bottom(frame.window());
        }
    }

    fn restyle(&mut self) {
        if let Some(frame) = self.frame.as_ref() {
            desktop::restyle(frame.window());
        }
    }
}
