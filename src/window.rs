use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::LogicalSize;
use winit::event::{Event, KeyEvent, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::config::WindowConfig;
use crate::input::{InputHandler, KeyAction};
use crate::render::frame_loop::FramePlatform;
use crate::render::gl_api::GlApi;
use crate::render::gpu::GpuApi;
use crate::utils::StartupError;

/// A winit window with a current OpenGL context on it.
pub struct GlWindow {
    event_loop: EventLoop<()>,
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    started: Instant,
}

impl GlWindow {
    /// Opens the window, makes its context current, loads GL and sets the
    /// viewport to the framebuffer size.
    pub fn create(config: &WindowConfig) -> Result<(Self, GlApi), StartupError> {
        let failed = |what: &str, e: &dyn std::fmt::Display| {
            StartupError::WindowCreationFailed(format!("{}: {}", what, e))
        };

        let event_loop = EventLoopBuilder::new()
            .build()
            .map_err(|e| failed("event loop", &e))?;

        let window_builder = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    // glutin reports an error instead of calling us with no configs
                    .expect("display builder offered no GL configs")
            })
            .map_err(|e| failed("display", &e))?;

        let window = window.ok_or_else(|| {
            StartupError::WindowCreationFailed("display builder returned no window".to_string())
        })?;
        log::debug!("Window created ({}x{})", config.width, config.height);

        let [major, minor] = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| failed("GL context", &e))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| failed("GL surface", &e))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| failed("make current", &e))?;

        if config.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("Could not enable vsync: {}", e);
            }
        }

        let gl = GlApi::load(|symbol| gl_display.get_proc_address(symbol))?;

        let size = window.inner_size();
        gl.viewport(0, 0, size.width as i32, size.height as i32);
        log::debug!("Viewport set to {}x{}", size.width, size.height);

        Ok((
            Self {
                event_loop,
                window,
                gl_context,
                gl_surface,
                started: Instant::now(),
            },
            gl,
        ))
    }
}

impl FramePlatform for GlWindow {
    fn poll_events(&mut self, input: &mut InputHandler) {
        let window_id = self.window.id();
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| {
                let Event::WindowEvent { window_id: id, event } = event else {
                    return;
                };
                if id != window_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => input.on_close_requested(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                repeat,
                                ..
                            },
                        ..
                    } => input.on_key_event(key, KeyAction::from_winit(state, repeat)),
                    _ => {}
                }
            });

        if let PumpStatus::Exit(code) = status {
            log::debug!("Event loop exited with code {}", code);
            input.on_close_requested();
        }
    }

    fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn present(&mut self) {
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("Failed to present frame: {}", e);
        }
    }
}
