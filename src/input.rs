// Mouse state -> InputEvents, one frame at a time.
// The window only reports "is the left button down" and "where is the mouse";
// this turns that into presses, drags, releases and toolbar clicks.

use crate::app::InputEvent;
use crate::toolbar::{self, ToolbarCommand};
use crate::types::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTracker {
    canvas_w: i32,
    canvas_h: i32,
    was_down: bool,
    stroking: bool,
    last_pos: Option<Point>,
    pressed: Option<ToolbarCommand>,
}

impl PointerTracker {
    /// The toolbar sits directly under a `canvas_w` x `canvas_h` canvas.
    pub fn new(canvas_w: usize, canvas_h: usize) -> Self {
        Self {
            canvas_w: canvas_w as i32,
            canvas_h: canvas_h as i32,
            was_down: false,
            stroking: false,
            last_pos: None,
            pressed: None,
        }
    }

    /// Toolbar button currently held down, for the pressed look.
    pub fn pressed(&self) -> Option<ToolbarCommand> {
        self.pressed
    }

    /// Feed one frame of mouse state (window coordinates).
    pub fn update(&mut self, down: bool, pos: Option<(i32, i32)>) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match (self.was_down, down) {
            // press
            (false, true) => {
                if let Some((x, y)) = pos {
                    if y >= self.canvas_h {
                        self.pressed = toolbar::hit_test((x, y - self.canvas_h));
                    } else {
                        let p = self.clamp_to_canvas(x, y);
                        self.stroking = true;
                        self.last_pos = Some(p);
                        events.push(InputEvent::PointerDown(p));
                    }
                }
            }
            // drag
            (true, true) => {
                if let (true, Some((x, y))) = (self.stroking, pos) {
                    let p = self.clamp_to_canvas(x, y);
                    if self.last_pos != Some(p) {
                        self.last_pos = Some(p);
                        events.push(InputEvent::PointerMove(p));
                    }
                }
            }
            // release
            (true, false) => {
                if self.stroking {
                    self.stroking = false;
                    self.last_pos = None;
                    events.push(InputEvent::PointerUp);
                } else if let Some(cmd) = self.pressed.take() {
                    // a button fires only if released over itself
                    let released_on = pos.and_then(|(x, y)| toolbar::hit_test((x, y - self.canvas_h)));
                    if released_on == Some(cmd) {
                        events.push(cmd.into());
                    }
                }
            }
            (false, false) => {}
        }
        self.was_down = down;
        events
    }

    fn clamp_to_canvas(&self, x: i32, y: i32) -> Point {
        Point::new(x.clamp(0, self.canvas_w - 1), y.clamp(0, self.canvas_h - 1))
    }
}
