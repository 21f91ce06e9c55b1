// Button strip under the canvas: CLEAR, UNDO, CALCULATE and a status line.
// Visual: a dark bar with three outlined buttons; the status text sits at the right.

use crate::raster::{self, PixelTarget};

pub const TOOLBAR_HEIGHT: usize = 44;
const BUTTON_Y: i32 = 6;
const BUTTON_H: i32 = 32;
const BUTTON_GAP: i32 = 8;
const LABEL_SCALE: i32 = 2;
const PAD_X: i32 = 12;

const BAR_BG: [u8; 3] = [0x20, 0x20, 0x20];
const BUTTON_BG: [u8; 3] = [0x38, 0x38, 0x38];
const BUTTON_BG_PRESSED: [u8; 3] = [0x55, 0x55, 0x55];
const BUTTON_EDGE: [u8; 3] = [0x90, 0x90, 0x90];
const LABEL: [u8; 3] = [0xEE, 0xEE, 0xEE];
const STATUS: [u8; 3] = [0xFF, 0x95, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    Clear,
    Undo,
    Calculate,
}

impl ToolbarCommand {
    pub const ALL: [ToolbarCommand; 3] = [ToolbarCommand::Clear, ToolbarCommand::Undo, ToolbarCommand::Calculate];

    pub fn label(self) -> &'static str {
        match self {
            ToolbarCommand::Clear => "CLEAR",
            ToolbarCommand::Undo => "UNDO (CTRL/CMD Z)",
            ToolbarCommand::Calculate => "CALCULATE (ENTER)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ToolbarRect {
    pub fn contains(self, point: (i32, i32)) -> bool {
        point.0 >= self.x && point.0 < self.x + self.w && point.1 >= self.y && point.1 < self.y + self.h
    }
}

/// Button rectangles in toolbar-local coordinates, laid out left to right.
pub fn layout() -> Vec<(ToolbarCommand, ToolbarRect)> {
    let mut x = BUTTON_GAP;
    ToolbarCommand::ALL
        .iter()
        .map(|&cmd| {
            let (label_w, _) = raster::text_extent(cmd.label(), LABEL_SCALE);
            let rect = ToolbarRect { x, y: BUTTON_Y, w: label_w + 2 * PAD_X, h: BUTTON_H };
            x += rect.w + BUTTON_GAP;
            (cmd, rect)
        })
        .collect()
}

/// Which button (if any) sits under a toolbar-local point.
pub fn hit_test(point: (i32, i32)) -> Option<ToolbarCommand> {
    layout().into_iter().find(|(_, rect)| rect.contains(point)).map(|(cmd, _)| cmd)
}

/// Paint the bar into `target`, whose top row is the toolbar's y = 0.
pub fn render<T: PixelTarget + ?Sized>(target: &mut T, pressed: Option<ToolbarCommand>, status: &str) {
    let (w, h) = target.dimensions();
    raster::fill_rect(target, 0, 0, w as i32, h as i32, BAR_BG);

    let mut right_of_buttons = 0;
    for (cmd, rect) in layout() {
        let bg = if pressed == Some(cmd) { BUTTON_BG_PRESSED } else { BUTTON_BG };
        raster::fill_rect(target, rect.x, rect.y, rect.w, rect.h, bg);
        raster::stroke_rect(target, rect.x, rect.y, rect.w, rect.h, BUTTON_EDGE);
        let (_, label_h) = raster::text_extent(cmd.label(), LABEL_SCALE);
        let ty = rect.y + (rect.h - label_h) / 2;
        raster::draw_text(target, rect.x + PAD_X, ty, cmd.label(), LABEL_SCALE, LABEL);
        right_of_buttons = rect.x + rect.w;
    }

    // Status is one line; keep it clear of the buttons.
    let line = status.lines().next().unwrap_or("");
    let (sw, sh) = raster::text_extent(line, LABEL_SCALE);
    let sx = (w as i32 - sw - PAD_X).max(right_of_buttons + 2 * BUTTON_GAP);
    raster::draw_text(target, sx, (h as i32 - sh) / 2, line, LABEL_SCALE, STATUS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameBuffer, pack_rgb};

    #[test]
    fn buttons_are_ordered_and_disjoint() {
        let rects = layout();
        let cmds: Vec<_> = rects.iter().map(|(c, _)| *c).collect();
        assert_eq!(cmds, ToolbarCommand::ALL.to_vec());
        for pair in rects.windows(2) {
            assert!(pair[0].1.x + pair[0].1.w < pair[1].1.x);
        }
    }

    #[test]
    fn hit_test_finds_each_button_center() {
        for (cmd, rect) in layout() {
            assert_eq!(hit_test((rect.x + rect.w / 2, rect.y + rect.h / 2)), Some(cmd));
        }
        assert_eq!(hit_test((0, 0)), None);
        assert_eq!(hit_test((BUTTON_GAP, BUTTON_Y + BUTTON_H)), None);
    }

    #[test]
    fn render_paints_background_and_outlines() {
        let mut fb = FrameBuffer::filled(1200, TOOLBAR_HEIGHT, [0, 0, 0]);
        render(&mut fb, None, "READY");
        assert_eq!(fb.get(0, 0), Some(pack_rgb(BAR_BG)));
        let (_, first) = layout()[0];
        assert_eq!(fb.get(first.x as usize, first.y as usize), Some(pack_rgb(BUTTON_EDGE)));
    }
}
