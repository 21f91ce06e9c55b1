// Software drawing shared by every surface: pixels, lines, thick pen strokes and a
// tiny scalable bitmap font.
// Visual effects provided here:
// 1) White pen strokes with round ends.
// 2) The big orange answer text.
// 3) Toolbar labels and button outlines.
//
// Both the on-screen canvas and the export bitmap go through these functions, so
// the same call sequence always yields the same pixels on both.

use crate::types::{FrameBuffer, Point, pack_rgb};
use image::{Rgb, RgbImage};

/// Anything we can paint RGB pixels into.
pub trait PixelTarget {
    fn dimensions(&self) -> (u32, u32);
    /// Caller guarantees (x, y) is inside `dimensions()`.
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

impl PixelTarget for FrameBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = pack_rgb(rgb);
    }
}

impl PixelTarget for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.put_pixel(x, y, Rgb(rgb));
    }
}

/// Put a pixel on the target if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel<T: PixelTarget + ?Sized>(target: &mut T, x: i32, y: i32, rgb: [u8; 3]) {
    if x < 0 || y < 0 {
        return;
    }
    let (w, h) = target.dimensions();
    let (x, y) = (x as u32, y as u32);
    if x >= w || y >= h {
        return;
    }
    target.set_rgb(x, y, rgb);
}

/// Fill an axis-aligned rectangle, clipped to the target.
pub fn fill_rect<T: PixelTarget + ?Sized>(target: &mut T, x: i32, y: i32, w: i32, h: i32, rgb: [u8; 3]) {
    let (tw, th) = target.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(tw as i32);
    let y1 = (y + h).min(th as i32);
    for py in y0..y1 {
        for px in x0..x1 {
            target.set_rgb(px as u32, py as u32, rgb);
        }
    }
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line.
pub fn draw_line<T: PixelTarget + ?Sized>(target: &mut T, x0: i32, y0: i32, x1: i32, y1: i32, rgb: [u8; 3]) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(target, x0, y0, rgb);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Outline of a rectangle, 1 pixel wide.
pub fn stroke_rect<T: PixelTarget + ?Sized>(target: &mut T, x: i32, y: i32, w: i32, h: i32, rgb: [u8; 3]) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (x1, y1) = (x + w - 1, y + h - 1);
    draw_line(target, x, y, x1, y, rgb);
    draw_line(target, x, y1, x1, y1, rgb);
    draw_line(target, x, y, x, y1, rgb);
    draw_line(target, x1, y, x1, y1, rgb);
}

/// Pen stroke from `start` to `end` with round caps.
/// Visual: a `width`-pixel thick line; consecutive segments join seamlessly.
pub fn draw_thick_line<T: PixelTarget + ?Sized>(target: &mut T, start: Point, end: Point, width: u32, rgb: [u8; 3]) {
    if width <= 1 {
        draw_line(target, start.x, start.y, end.x, end.y, rgb);
        return;
    }

    // Every pixel whose center lies within `radius` of the segment (a capsule).
    let radius = (width.saturating_sub(1) / 2) as f32;
    let radius_sq = radius * radius;
    let pad = radius.ceil() as i32 + 1;
    let (tw, th) = target.dimensions();
    let x0 = (start.x.min(end.x) - pad).max(0);
    let y0 = (start.y.min(end.y) - pad).max(0);
    let x1 = (start.x.max(end.x) + pad).min(tw as i32 - 1);
    let y1 = (start.y.max(end.y) + pad).min(th as i32 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            if point_segment_distance_sq(Point::new(x, y), start, end) <= radius_sq {
                target.set_rgb(x as u32, y as u32, rgb);
            }
        }
    }
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let (px, py) = (point.x as f32, point.y as f32);
    let (x0, y0) = (start.x as f32, start.y as f32);
    let (vx, vy) = (end.x as f32 - x0, end.y as f32 - y0);
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        let (dx, dy) = (px - x0, py - y0);
        return dx * dx + dy * dy;
    }
    let t = (((px - x0) * vx + (py - y0) * vy) / len_sq).clamp(0.0, 1.0);
    let (dx, dy) = (px - (x0 + vx * t), py - (y0 + vy * t));
    dx * dx + dy * dy
}

/* ---------- 5x7 bitmap font ---------- */

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;
/// Horizontal advance per character in font cells (glyph + 1 cell spacing).
pub const ADVANCE: i32 = GLYPH_W + 1;
/// Vertical advance per line in font cells.
pub const LINE_ADVANCE: i32 = GLYPH_H + 2;

/// Return a 5x7 glyph bitmap.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Math and punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '*' => g!(0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '^' => g!(0b00100,0b01010,0b10001,0b00000,0b00000,0b00000,0b00000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),

        _ => None,
    }
}

/// Draw one character with each font cell blown up to `scale`x`scale` pixels.
/// Unknown characters come out as '?'.
fn draw_char<T: PixelTarget + ?Sized>(target: &mut T, x: i32, y: i32, ch: char, scale: i32, rgb: [u8; 3]) {
    let Some(rows) = glyph5x7(ch).or_else(|| glyph5x7('?')) else {
        return;
    };
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..GLYPH_W {
            if (rowbits & (1 << (GLYPH_W - 1 - rx))) != 0 {
                fill_rect(target, x + rx * scale, y + ry as i32 * scale, scale, scale, rgb);
            }
        }
    }
}

/// Draw a (possibly multi-line) string; (x,y) is the top-left of the first glyph.
/// Visual: blocky uppercase text, `6*scale` pixels per character.
pub fn draw_text<T: PixelTarget + ?Sized>(target: &mut T, x: i32, y: i32, text: &str, scale: i32, rgb: [u8; 3]) {
    let scale = scale.max(1);
    for (line_no, line) in text.lines().enumerate() {
        let ly = y + line_no as i32 * LINE_ADVANCE * scale;
        let mut cx = x;
        for ch in line.chars() {
            if !ch.is_control() {
                draw_char(target, cx, ly, ch, scale, rgb);
            }
            cx += ADVANCE * scale;
        }
    }
}

/// Width and height in pixels that `draw_text` would cover.
pub fn text_extent(text: &str, scale: i32) -> (i32, i32) {
    let scale = scale.max(1);
    let lines = text.lines().count().max(1) as i32;
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let w = if longest == 0 { 0 } else { (longest * ADVANCE - 1) * scale };
    let h = ((lines - 1) * LINE_ADVANCE + GLYPH_H) * scale;
    (w, h)
}
