use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::graphics::{rasterize_grid, raster_size};
use crate::input::{KeyRepeat, KeyboardState, SCANCODE_RELEASE_BIT, scancode};
use crate::surface::{SurfaceSize, TEXT_COLUMNS, TEXT_ROWS, TextGrid};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Integer zoom applied to the 8x12-pixel character tiles.
    pub zoom: u32,
    pub frame_interval: Duration,
    pub key_repeat: KeyRepeat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "vgatris".to_string(),
            zoom: 1,
            frame_interval: Duration::from_millis(33),
            key_repeat: KeyRepeat::Hardware,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    Continue,
    /// Stop calling the handler; the last grid stays on screen until the window closes.
    Halt,
}

/// One frame of host-driven work: read the keyboard, update, draw into the grid.
///
/// The host owns pacing, so handlers must not sleep.
pub trait FrameHandler {
    fn frame(&mut self, input: &mut KeyboardState, surface: &mut TextGrid) -> FrameFlow;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to set up pixel surface: {0}")]
    Pixels(#[from] pixels::Error),
}

/// Keys map onto the scan codes a PS/2 keyboard would send; arrows alias WASD.
pub fn scancode_for_key(key: VirtualKeyCode) -> Option<u8> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(scancode::W),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(scancode::A),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(scancode::S),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(scancode::D),
        VirtualKeyCode::Space => Some(scancode::SPACE),
        VirtualKeyCode::P => Some(scancode::P),
        _ => None,
    }
}

/// Opens a window showing an 80x25 text grid and drives `handler` at `frame_interval`.
///
/// Returns only on setup failure; once the event loop starts, closing the window (or Escape)
/// exits the process.
pub fn run_app<H: FrameHandler + 'static>(config: AppConfig, mut handler: H) -> Result<(), AppError> {
    let event_loop = EventLoop::new();
    let zoom = config.zoom.max(1);
    let pixel_size = raster_size(SurfaceSize::new(TEXT_COLUMNS, TEXT_ROWS), zoom);

    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(pixel_size.width, pixel_size.height))
        .with_resizable(false)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels = Pixels::new(pixel_size.width, pixel_size.height, surface_texture)?;

    let mut grid = TextGrid::new();
    let mut keyboard = KeyboardState::new(config.key_repeat);
    let mut halted = false;
    let mut next_frame = Instant::now();
    log::info!(
        "window {}x{} px, frame interval {:?}, key repeat {:?}",
        pixel_size.width,
        pixel_size.height,
        config.frame_interval,
        config.key_repeat
    );

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                *control_flow = ControlFlow::Exit;
            }
            WindowEvent::Resized(size) => {
                if let Err(err) = pixels.resize_surface(size.width, size.height) {
                    log::error!("resize failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            WindowEvent::Focused(false) => keyboard.release_all(),
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(key),
                        state,
                        ..
                    },
                ..
            } => {
                if key == VirtualKeyCode::Escape && state == ElementState::Pressed {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                if let Some(code) = scancode_for_key(key) {
                    let code = match state {
                        ElementState::Pressed => code,
                        ElementState::Released => code | SCANCODE_RELEASE_BIT,
                    };
                    keyboard.push_scancode(code);
                }
            }
            _ => {}
        },
        Event::MainEventsCleared => {
            let now = Instant::now();
            if now >= next_frame {
                if !halted && handler.frame(&mut keyboard, &mut grid) == FrameFlow::Halt {
                    halted = true;
                    log::info!("frame handler halted; close the window to exit");
                }
                next_frame = now + config.frame_interval;
                window.request_redraw();
            }
            *control_flow = ControlFlow::WaitUntil(next_frame);
        }
        Event::RedrawRequested(_) => {
            rasterize_grid(&grid, pixels.frame_mut(), zoom);
            if let Err(err) = pixels.render() {
                log::error!("present failed: {err}");
                *control_flow = ControlFlow::Exit;
            }
        }
        _ => {}
    })
}
