// Window + input translation.
// Visual effects provided here:
// 1) A window showing the canvas with the toolbar strip underneath.
// 2) Mouse and keyboard state turned into `InputEvent`s for the app.

use crate::app::InputEvent;
use crate::error::Error;
use crate::input::PointerTracker;
use crate::toolbar::{self, TOOLBAR_HEIGHT};
use crate::types::{BACKGROUND, FrameBuffer};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
    canvas_w: usize,
    canvas_h: usize,
    screen: FrameBuffer,  // canvas + toolbar, what gets pushed to the window
    toolbar: FrameBuffer, // toolbar strip scratch
    pointer: PointerTracker,
}

impl Drawer {
    /// Create a window with room for the canvas and the toolbar below it.
    /// Visual: a new black window appears with your chosen title.
    pub fn new(title: &str, canvas_w: usize, canvas_h: usize) -> Result<Self, Error> {
        let height = canvas_h + TOOLBAR_HEIGHT;
        let mut window = Window::new(title, canvas_w, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self {
            window,
            canvas_w,
            canvas_h,
            screen: FrameBuffer::filled(canvas_w, height, BACKGROUND),
            toolbar: FrameBuffer::filled(canvas_w, TOOLBAR_HEIGHT, BACKGROUND),
            pointer: PointerTracker::new(canvas_w, canvas_h),
        })
    }

    /// Push canvas + toolbar to the screen.
    /// Visual: the window immediately shows the latest strokes and status.
    pub fn present(&mut self, canvas: &FrameBuffer, status: &str) -> Result<(), Error> {
        let canvas_len = self.canvas_w * self.canvas_h;
        if canvas.pixels.len() != canvas_len {
            return Err(Error::WindowUpdate(format!(
                "canvas is {}x{}, window expects {}x{}",
                canvas.width, canvas.height, self.canvas_w, self.canvas_h
            )));
        }
        toolbar::render(&mut self.toolbar, self.pointer.pressed(), status);
        self.screen.pixels[..canvas_len].copy_from_slice(&canvas.pixels);
        self.screen.pixels[canvas_len..].copy_from_slice(&self.toolbar.pixels);

        self.window
            .update_with_buffer(&self.screen.pixels, self.screen.width, self.screen.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Everything that happened since the last frame, in order: mouse first,
    /// then keys.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let mut events = self.pointer.update(down, self.mouse_pos());

        if self.undo_pressed_once() {
            events.push(InputEvent::Undo);
        }
        if self.enter_pressed_once() {
            events.push(InputEvent::Submit);
        }
        events
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as i32, y.max(0.0) as i32))
    }

    /// Ctrl+Z, or Cmd+Z on macOS.
    fn undo_pressed_once(&self) -> bool {
        let modifier = [Key::LeftCtrl, Key::RightCtrl, Key::LeftSuper, Key::RightSuper]
            .iter()
            .any(|&k| self.window.is_key_down(k));
        modifier && self.window.is_key_pressed(Key::Z, KeyRepeat::No)
    }

    fn enter_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
            || self.window.is_key_pressed(Key::NumPadEnter, KeyRepeat::No)
    }
}
