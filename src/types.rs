// Core types shared by the ledger and the two surfaces.

/// Canvas background. Visual: the black sheet you draw on.
pub const BACKGROUND: [u8; 3] = [0, 0, 0];
/// Pen color. Visual: white ink.
pub const STROKE_COLOR: [u8; 3] = [255, 255, 255];
/// Pen width in pixels.
pub const STROKE_WIDTH: u32 = 5;
/// Color of the composited answer (#FF9500).
pub const ANSWER_COLOR: [u8; 3] = [0xFF, 0x95, 0x00];

/// Pack an RGB triplet into minifb's 0x00RRGGBB layout.
#[inline]
pub const fn pack_rgb(rgb: [u8; 3]) -> u32 {
    ((rgb[0] as u32) << 16) | ((rgb[1] as u32) << 8) | rgb[2] as u32
}

/// A pixel position in canvas coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Id of a line item in the interactive surface's display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentHandle(pub u64);

/// One straight increment of a drag. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    start: Point,
    end: Point,
    handle: SegmentHandle,
}

impl Segment {
    pub fn new(start: Point, end: Point, handle: SegmentHandle) -> Self {
        Self { start, end, handle }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn handle(&self) -> SegmentHandle {
        self.handle
    }
}

/// Everything drawn between one pointer-down and its pointer-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    segments: Vec<Segment>,
}

impl Action {
    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer filled with one color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self { width, height, pixels: vec![pack_rgb(rgb); width * height] }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}
