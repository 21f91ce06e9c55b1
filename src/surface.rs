// The two pictures we keep in lock-step:
// • `Canvas` is what the window shows: a display list of line/text items plus the
//   framebuffer they rasterise into.
// • The bitmap is an `RgbImage` we hand to the solver as PNG.
// Visual expectation: at any moment, both look exactly the same pixel for pixel.

use crate::error::Error;
use crate::ledger::StrokeLedger;
use crate::raster::{self, PixelTarget};
use crate::types::{
    ANSWER_COLOR, BACKGROUND, FrameBuffer, Point, STROKE_COLOR, STROKE_WIDTH, Segment, SegmentHandle,
};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Where the answer goes relative to the anchor (end of the last stroke).
pub const ANSWER_OFFSET: (i32, i32) = (70, -20);
/// Font cell size for the answer. Visual: digits about 84px tall.
pub const ANSWER_SCALE: i32 = 12;

/// A retained item on the interactive surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasItem {
    Line { handle: SegmentHandle, start: Point, end: Point },
    Text { origin: Point, text: String },
}

/// Interactive surface: display list + the framebuffer the window presents.
pub struct Canvas {
    items: Vec<CanvasItem>,
    frame: FrameBuffer,
    next_handle: u64,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { items: Vec::new(), frame: FrameBuffer::filled(width, height, BACKGROUND), next_handle: 0 }
    }

    /// Add a new line item. Visual: the line appears right away.
    pub fn create_line(&mut self, start: Point, end: Point) -> SegmentHandle {
        let handle = SegmentHandle(self.next_handle);
        self.next_handle += 1;
        self.insert_line(handle, start, end);
        handle
    }

    /// Re-add a line under an existing handle (used when replaying the ledger).
    fn insert_line(&mut self, handle: SegmentHandle, start: Point, end: Point) {
        raster::draw_thick_line(&mut self.frame, start, end, STROKE_WIDTH, STROKE_COLOR);
        self.items.push(CanvasItem::Line { handle, start, end });
    }

    fn create_text(&mut self, origin: Point, text: &str) {
        raster::draw_text(&mut self.frame, origin.x, origin.y, text, ANSWER_SCALE, ANSWER_COLOR);
        self.items.push(CanvasItem::Text { origin, text: text.to_owned() });
    }

    /// Remove every item. Handles are never reused afterwards.
    fn delete_all(&mut self) {
        self.items.clear();
        self.frame = FrameBuffer::filled(self.frame.width, self.frame.height, BACKGROUND);
    }

    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

/// An answer composited onto both surfaces. Not part of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub text: String,
    pub origin: Point,
}

pub struct DualSurface {
    canvas: Canvas,
    bitmap: RgbImage,
    overlays: Vec<Overlay>,
}

impl DualSurface {
    /// Both surfaces start as a blank background-colored sheet.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width as usize, height as usize),
            bitmap: blank_bitmap(width, height),
            overlays: Vec::new(),
        }
    }

    /// Draw one pen increment on both surfaces and hand back the segment
    /// (carrying its canvas handle) for the ledger.
    pub fn draw_segment(&mut self, start: Point, end: Point) -> Segment {
        let handle = self.canvas.create_line(start, end);
        raster::draw_thick_line(&mut self.bitmap, start, end, STROKE_WIDTH, STROKE_COLOR);
        Segment::new(start, end, handle)
    }

    /// Throw everything away and replay the ledger: action order, then segment
    /// order. Overlays are dropped too.
    pub fn rebuild_from(&mut self, ledger: &StrokeLedger) {
        let (w, h) = self.bitmap.dimensions();
        self.canvas.delete_all();
        self.bitmap = blank_bitmap(w, h);
        self.overlays.clear();
        for segment in ledger.segments() {
            self.canvas.insert_line(segment.handle(), segment.start(), segment.end());
            raster::draw_thick_line(&mut self.bitmap, segment.start(), segment.end(), STROKE_WIDTH, STROKE_COLOR);
        }
    }

    /// Paint the answer at `anchor + ANSWER_OFFSET` on both surfaces.
    /// Returns the overlay that was placed.
    pub fn composite_answer(&mut self, text: &str, anchor: Point) -> &Overlay {
        let origin = anchor.offset(ANSWER_OFFSET.0, ANSWER_OFFSET.1);
        self.canvas.create_text(origin, text);
        raster::draw_text(&mut self.bitmap, origin.x, origin.y, text, ANSWER_SCALE, ANSWER_COLOR);
        self.overlays.push(Overlay { text: text.to_owned(), origin });
        &self.overlays[self.overlays.len() - 1]
    }

    /// Serialize the bitmap as PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>, Error> {
        let mut out = Cursor::new(Vec::new());
        self.bitmap.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// True when every canvas pixel equals the matching bitmap pixel.
    pub fn surfaces_match(&self) -> bool {
        let frame = self.canvas.frame();
        let (w, h) = self.bitmap.dimensions();
        if (frame.width as u32, frame.height as u32) != (w, h) {
            return false;
        }
        self.bitmap
            .pixels()
            .zip(frame.pixels.iter())
            .all(|(px, &packed)| crate::types::pack_rgb(px.0) == packed)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn bitmap(&self) -> &RgbImage {
        &self.bitmap
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn dimensions(&self) -> (u32, u32) {
        PixelTarget::dimensions(&self.bitmap)
    }
}

fn blank_bitmap(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(BACKGROUND))
}
