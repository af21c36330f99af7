//! Demo: an animated Mandelbrot rendered offscreen on a dedicated render
//! thread, carried through the frame bridge, and presented onto a plain CPU
//! window surface.
//!
//! The window side never touches the GPU: it owns a [`CanvasView`] and a
//! softbuffer surface, and pumps the latest completed frame every redraw.
//! Window resizes flow view → size listener → render thread, which resizes
//! the offscreen target and notifies the capture side.

mod present;
mod scene;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use vitrine_bridge::coords::{DisplayBounds, SurfaceSize};
use vitrine_bridge::logging::{self, LoggingConfig};
use vitrine_bridge::time::FramePacer;
use vitrine_bridge::transfer::{BridgeConfig, FrameBridge, FrameCapture, PumpOutcome};
use vitrine_bridge::view::CanvasView;

use crate::present::SoftTarget;
use crate::scene::MandelbrotScene;

const RENDER_FPS: u32 = 60;
const BACKDROP: u32 = 0xFF00_0000;

fn main() -> Result<()> {
    logging::init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = App::default();
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;
    Ok(())
}

#[derive(Default)]
struct App {
    session: Option<Session>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match Session::new(event_loop) {
            Ok(session) => {
                session.window.request_redraw();
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("failed to start demo session: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the redraw pulse is the UI cadence that drains
        // the bridge.
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                session.resize(new_size.width, new_size.height);
                session.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = session.window.inner_size();
                session.resize(new_size.width, new_size.height);
                session.window.request_redraw();
            }

            WindowEvent::Occluded(occluded) => {
                // A fully covered window stops pumping; the render loop then
                // idles after one pending frame.
                session.view.set_visible(!occluded);
            }

            WindowEvent::RedrawRequested => {
                session.redraw();
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
    }
}

struct Session {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    surface_size: SurfaceSize,
    view: CanvasView,
    stop: Arc<AtomicBool>,
    render_thread: Option<JoinHandle<()>>,
}

impl Session {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("vitrine — offscreen mandelbrot")
            .with_inner_size(LogicalSize::new(800.0, 600.0));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let context = softbuffer::Context::new(Arc::clone(&window))
            .map_err(|e| anyhow::anyhow!("failed to create softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, Arc::clone(&window))
            .map_err(|e| anyhow::anyhow!("failed to create softbuffer surface: {e}"))?;

        // The pool is sized once, from the monitors present at startup.
        let monitors: Vec<(u32, u32)> = event_loop
            .available_monitors()
            .map(|m| (m.size().width, m.size().height))
            .collect();
        let bounds = if monitors.is_empty() {
            log::warn!("no monitors reported; sizing the frame pool for 1920x1080");
            DisplayBounds::new(1920, 1080)
        } else {
            DisplayBounds::from_monitors(monitors)
        };

        let (capture, presenter) = FrameBridge::split(BridgeConfig::new(bounds))?;

        let mut view = CanvasView::new(presenter);
        let (resize_tx, resize_rx) = mpsc::channel::<SurfaceSize>();
        view.set_size_listener(move |size| {
            let _ = resize_tx.send(size);
        });
        view.set_attached(true);

        let stop = Arc::new(AtomicBool::new(false));
        let render_thread = {
            let stop = Arc::clone(&stop);
            std::thread::Builder::new()
                .name("vitrine-render".into())
                .spawn(move || render_loop(capture, resize_rx, stop))
                .context("failed to spawn render thread")?
        };

        let initial = window.inner_size();
        let mut session = Session {
            window,
            surface,
            surface_size: SurfaceSize::MIN,
            view,
            stop,
            render_thread: Some(render_thread),
        };
        session.resize(initial.width, initial.height);
        Ok(session)
    }

    /// Tracks the window size: resizes the presentation surface, repaints
    /// the backdrop, and runs the view's layout pass.
    fn resize(&mut self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        let (Some(w), Some(h)) = (
            NonZeroU32::new(size.width()),
            NonZeroU32::new(size.height()),
        ) else {
            return;
        };
        if let Err(e) = self.surface.resize(w, h) {
            log::error!("presentation surface resize failed: {e}");
            return;
        }
        self.surface_size = size;
        if let Ok(mut buffer) = self.surface.buffer_mut() {
            buffer.fill(BACKDROP);
            if let Err(e) = buffer.present() {
                log::error!("backdrop present failed: {e}");
            }
        }

        self.view.layout(size.width() as f64, size.height() as f64);
    }

    /// One repaint pulse: pump the bridge into the window's frame buffer.
    fn redraw(&mut self) {
        let mut buffer = match self.surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("presentation buffer unavailable: {e}");
                return;
            }
        };

        let outcome = {
            let mut target = SoftTarget::new(
                &mut buffer,
                self.surface_size.width(),
                self.surface_size.height(),
            );
            self.view.on_pulse(&mut target)
        };

        if outcome == PumpOutcome::Drawn {
            if let Err(e) = buffer.present() {
                log::error!("frame present failed: {e}");
            }
        }
    }

    fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.render_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Render-thread body: bring up the offscreen renderer, then run the fixed-
/// rate loop — apply queued resizes, render, hand the frame to the bridge.
fn render_loop(
    mut capture: FrameCapture,
    resize_rx: mpsc::Receiver<SurfaceSize>,
    stop: Arc<AtomicBool>,
) {
    let mut scene = match pollster::block_on(MandelbrotScene::new(SurfaceSize::new(800, 600))) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("offscreen renderer unavailable: {e:#}");
            return;
        }
    };

    let mut pacer = FramePacer::new(RENDER_FPS);
    while !stop.load(Ordering::Relaxed) {
        pacer.tick();

        // A resize burst collapses to its last entry.
        let mut resized = None;
        while let Ok(size) = resize_rx.try_recv() {
            resized = Some(size);
        }
        if let Some(size) = resized {
            scene.set_size(size);
            capture.surface_resized(size.width() as i32, size.height() as i32);
        }

        scene.render();
        capture.frame(&mut scene);
    }

    log::debug!("render loop stopped");
}
