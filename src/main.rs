//! autism-recover: the AutismRecover site as a native window.
//!
//! A GPU-rendered shell (vello/wgpu on winit) around the `autism_recover`
//! library: home, research and the four-step demo, with the simulated backend
//! and panel timers running on a tokio runtime.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use vello::kurbo::Point;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, Renderer, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window};

use vello::wgpu;

use autism_recover::backend::MockBackend;
use autism_recover::config::{AppConfig, WindowConfig};
use autism_recover::logging;
use autism_recover::paths::AppPaths;
use autism_recover::route::Route;
use autism_recover::theme::Theme;
use autism_recover::theme_watcher::{self, ThemeWatcher};
use autism_recover::ui::Shell;
use autism_recover::ui::paint::Fonts;

/// AutismRecover: draw a friend, meet it, talk to it.
#[derive(Parser, Debug)]
#[command(name = "autism-recover", version, about = "AutismRecover companion demo")]
struct Args {
    /// Start in windowed mode instead of fullscreen
    #[arg(short, long)]
    windowed: bool,

    /// Page to open first: /, /demo or /research
    #[arg(short, long, default_value = "/")]
    route: String,

    /// Config file (defaults to config.toml in the config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Make every character generation fail, to exercise the retry path
    #[arg(long)]
    fail_generation: bool,
}

#[derive(Debug)]
enum RenderState {
    Active {
        surface: Box<RenderSurface<'static>>,
        valid_surface: bool,
        window: Arc<Window>,
    },
    Suspended(Option<Arc<Window>>),
}

struct App {
    context: RenderContext,
    renderers: Vec<Option<Renderer>>,
    state: RenderState,
    scene: Scene,
    window_config: WindowConfig,
    shell: Shell,
    fonts: Fonts,
    theme_watcher: Option<ThemeWatcher>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let RenderState::Suspended(cached_window) = &mut self.state else {
            return;
        };

        let window = match cached_window.take() {
            Some(window) => window,
            None => match create_window(event_loop, &self.window_config) {
                Ok(window) => window,
                Err(e) => {
                    error!("could not create window: {e:#}");
                    event_loop.exit();
                    return;
                }
            },
        };

        let size = window.inner_size();
        let surface_future = self.context.create_surface(
            window.clone(),
            size.width,
            size.height,
            wgpu::PresentMode::AutoVsync,
        );
        let surface = match pollster::block_on(surface_future) {
            Ok(surface) => surface,
            Err(e) => {
                error!("could not create surface: {e}");
                event_loop.exit();
                return;
            }
        };

        self.renderers
            .resize_with(self.context.devices.len(), || None);
        if self.renderers[surface.dev_id].is_none() {
            match create_renderer(&self.context, &surface) {
                Ok(renderer) => self.renderers[surface.dev_id] = Some(renderer),
                Err(e) => {
                    error!("could not create renderer: {e:#}");
                    event_loop.exit();
                    return;
                }
            }
        }

        self.state = RenderState::Active {
            surface: Box::new(surface),
            valid_surface: true,
            window,
        };
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let RenderState::Active { window, .. } = &self.state {
            self.state = RenderState::Suspended(Some(window.clone()));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (surface, valid_surface, window) = match &mut self.state {
            RenderState::Active {
                surface,
                valid_surface,
                window,
            } if window.id() == window_id => (surface, valid_surface, window.clone()),
            _ => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Backspace),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shell.backspace(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Enter),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shell.submit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        text: Some(ref text),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shell.type_text(text),

            WindowEvent::CursorMoved { position, .. } => {
                self.shell.pointer_moved(Point::new(position.x, position.y));
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.shell.pointer_pressed(),
                ElementState::Released => self.shell.pointer_released(),
            },

            WindowEvent::CursorLeft { .. } => self.shell.pointer_left(),

            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, lines) => self.shell.scroll_lines(-f64::from(lines)),
                MouseScrollDelta::PixelDelta(pos) => self.shell.scroll_pixels(-pos.y),
            },

            WindowEvent::Touch(touch) => {
                let point = Point::new(touch.location.x, touch.location.y);
                match touch.phase {
                    TouchPhase::Started => {
                        self.shell.pointer_moved(point);
                        self.shell.pointer_pressed();
                    }
                    TouchPhase::Moved => self.shell.pointer_moved(point),
                    TouchPhase::Ended | TouchPhase::Cancelled => self.shell.pointer_released(),
                }
            }

            WindowEvent::Resized(size) => {
                if size.width != 0 && size.height != 0 {
                    self.context
                        .resize_surface(surface, size.width, size.height);
                    *valid_surface = true;
                } else {
                    *valid_surface = false;
                }
            }

            WindowEvent::RedrawRequested => {
                if !*valid_surface {
                    return;
                }

                if let Some(theme) = self.theme_watcher.as_ref().and_then(ThemeWatcher::poll) {
                    info!(target: "theme", "applying reloaded theme");
                    self.shell.set_theme(theme);
                }
                self.shell.tick();

                self.scene.reset();
                let width = f64::from(surface.config.width);
                let height = f64::from(surface.config.height);
                self.shell.paint(&mut self.scene, &self.fonts, width, height);

                let device_handle = &self.context.devices[surface.dev_id];
                let Some(renderer) = self.renderers[surface.dev_id].as_mut() else {
                    return;
                };
                if let Err(e) = renderer.render_to_texture(
                    &device_handle.device,
                    &device_handle.queue,
                    &self.scene,
                    &surface.target_view,
                    &vello::RenderParams {
                        base_color: self.shell.theme().background(),
                        width: surface.config.width,
                        height: surface.config.height,
                        antialiasing_method: AaConfig::Msaa16,
                    },
                ) {
                    error!("failed to render to surface: {e}");
                    return;
                }

                let surface_texture = match surface.surface.get_current_texture() {
                    Ok(texture) => texture,
                    Err(e) => {
                        warn!("failed to get surface texture: {e}");
                        window.request_redraw();
                        return;
                    }
                };

                let mut encoder =
                    device_handle
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Surface Blit"),
                        });
                surface.blitter.copy(
                    &device_handle.device,
                    &mut encoder,
                    &surface.target_view,
                    &surface_texture
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default()),
                );
                device_handle.queue.submit([encoder.finish()]);
                surface_texture.present();
                if let Err(e) = device_handle.device.poll(wgpu::PollType::Poll) {
                    warn!("device poll failed: {e}");
                }

                // Timers and animations need a steady frame clock.
                window.request_redraw();
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let paths = AppPaths::resolve();
    let _log_guard = logging::init(paths.as_ref().map(|p| p.logs.as_path()));
    if let Some(paths) = &paths {
        if let Err(e) = paths.ensure() {
            warn!("could not create app directories: {e}");
        }
    }

    let config_path = args
        .config
        .clone()
        .or_else(|| paths.as_ref().map(AppPaths::config_file));
    let mut config = match &config_path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.window.windowed |= args.windowed;

    let route = Route::from_path(&args.route).unwrap_or_else(|| {
        warn!(route = %args.route, "unknown route, opening home");
        Route::Home
    });

    let (theme, theme_watcher) = match paths.as_ref().map(AppPaths::theme_file) {
        Some(theme_path) => {
            let watcher = ThemeWatcher::start(theme_path.clone())
                .inspect_err(|e| warn!(target: "theme", "theme hot-reload disabled: {e:#}"))
                .ok();
            let theme = theme_watcher::load_theme(&theme_path).unwrap_or_else(|e| {
                warn!(target: "theme", "using default theme: {e}");
                Theme::default()
            });
            (theme, watcher)
        }
        None => (Theme::default(), None),
    };

    // Simulated backend calls and panel timers run here.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create Tokio runtime")?;

    let backend = MockBackend::new(&config.timing).with_failing_generation(args.fail_generation);

    let fonts = Fonts::load();
    if fonts.regular.is_none() {
        warn!("no system font found; text is drawn as placeholder blocks");
    }

    info!(version = env!("CARGO_PKG_VERSION"), %route, "starting autism-recover");

    let window_config = config.window.clone();
    let shell = Shell::new(runtime.handle().clone(), backend, config, theme, route);

    let mut app = App {
        context: RenderContext::new(),
        renderers: vec![],
        state: RenderState::Suspended(None),
        scene: Scene::new(),
        window_config,
        shell,
        fonts,
        theme_watcher,
    };

    let event_loop = EventLoop::new()?;
    event_loop
        .run_app(&mut app)
        .context("event loop failed")?;

    // Dropping the shell aborts any pending panel timers before shutdown.
    drop(app);
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));

    Ok(())
}

fn create_window(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Arc<Window>> {
    let mut attr = Window::default_attributes().with_title("AutismRecover");

    if !config.windowed {
        attr = attr.with_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        attr = attr.with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
    }

    Ok(Arc::new(event_loop.create_window(attr)?))
}

fn create_renderer(render_cx: &RenderContext, surface: &RenderSurface<'_>) -> Result<Renderer> {
    Renderer::new(
        &render_cx.devices[surface.dev_id].device,
        RendererOptions::default(),
    )
    .map_err(|e| anyhow::anyhow!("couldn't create renderer: {e}"))
}
