//! SDL2 window management and event handling.
//!
//! Provides the [`Window`] struct for creating and managing the display
//! window, translating input events into per-frame snapshots, and
//! presenting rendered frames through an ARGB8888 streaming texture.

use std::time::Instant;

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Quit,
    KeyPress(Key),
}

/// Option-toggle keys forwarded to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    C,
    G,
    N,
    L,
}

/// Snapshot of the movement-relevant input for one frame.
///
/// Movement booleans come from the keyboard state, mouse deltas
/// accumulate only while the left button is held (drag-look), and the
/// wheel value is the sum of this frame's scroll ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub mouse_delta: (i32, i32),
    pub wheel: i32,
}

/// Sleeps at the end of a frame to enforce the FPS cap and reports the
/// elapsed frame time.
pub struct FrameLimiter {
    previous_frame_time: u64,
    pub fps_cap: u64,
    pub enabled: bool,
}

impl FrameLimiter {
    pub fn new(window: &Window, fps_cap: u64) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
            fps_cap,
            enabled: true,
        }
    }

    /// Waits if necessary to maintain the target frame rate and returns
    /// the delta time in milliseconds since the previous call.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let target_frame_time = 1000 / self.fps_cap.max(1);
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if self.enabled && delta_time < target_frame_time {
            let time_to_wait = target_frame_time - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

/// Tracks frames per second with once-per-second updates.
pub struct FpsCounter {
    frame_count: u32,
    last_update: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_update: Instant::now(),
        }
    }

    /// Call each frame. Returns `Some(fps)` once per second, `None` otherwise.
    pub fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();
        if elapsed.as_secs() >= 1 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Never read after construction, but must stay alive for as long as
    // `texture` exists (see the SAFETY note in `new`).
    #[allow(dead_code)]
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
    mouse_held: bool,
    mouse_delta: (i32, i32),
    wheel: i32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            timer_subsystem,
            width,
            height,
            mouse_held: false,
            mouse_delta: (0, 0),
            wheel: 0,
        })
    }

    /// Drain the event queue, collecting quit/toggle events and
    /// accumulating mouse state for [`Window::input_state`].
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => events.push(WindowEvent::Quit),
                Event::MouseButtonDown { .. } => self.mouse_held = true,
                Event::MouseButtonUp { .. } => self.mouse_held = false,
                Event::MouseMotion { xrel, yrel, .. } => {
                    if self.mouse_held {
                        self.mouse_delta.0 += xrel;
                        self.mouse_delta.1 += yrel;
                    }
                }
                Event::MouseWheel { y, .. } => self.wheel += y,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    let key = match keycode {
                        Keycode::Num1 => Some(Key::Num1),
                        Keycode::Num2 => Some(Key::Num2),
                        Keycode::Num3 => Some(Key::Num3),
                        Keycode::Num4 => Some(Key::Num4),
                        Keycode::C => Some(Key::C),
                        Keycode::G => Some(Key::G),
                        Keycode::N => Some(Key::N),
                        Keycode::L => Some(Key::L),
                        _ => None,
                    };
                    if let Some(k) = key {
                        events.push(WindowEvent::KeyPress(k));
                    }
                }
                _ => {}
            }
        }

        events
    }

    /// Build this frame's input snapshot and reset the accumulated mouse
    /// state. Call once per frame, after [`Window::poll_events`].
    pub fn input_state(&mut self) -> InputState {
        let keyboard = self.event_pump.keyboard_state();
        let state = InputState {
            forward: keyboard.is_scancode_pressed(Scancode::W),
            back: keyboard.is_scancode_pressed(Scancode::S),
            left: keyboard.is_scancode_pressed(Scancode::A),
            right: keyboard.is_scancode_pressed(Scancode::D),
            up: keyboard.is_scancode_pressed(Scancode::E),
            down: keyboard.is_scancode_pressed(Scancode::Q),
            mouse_delta: self.mouse_delta,
            wheel: self.wheel,
        };
        self.mouse_delta = (0, 0);
        self.wheel = 0;
        state
    }

    /// Upload the ARGB color buffer and present it.
    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(
            &self.texture,
            None,
            Some(Rect::new(0, 0, self.width, self.height)),
        )?;
        self.canvas.present();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }

    pub fn set_title(&mut self, title: &str) {
        let _ = self.canvas.window_mut().set_title(title);
    }
}
