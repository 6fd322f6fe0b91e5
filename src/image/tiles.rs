//! Rectangles and block partitioning for tiled detection.

/// Axis-aligned integer rectangle `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true when the real-valued point `(px, py)` lies inside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && py >= self.y as f32
            && px < (self.x + self.width) as f32
            && py < (self.y + self.height) as f32
    }
}

/// Partitions a `width x height` image into non-overlapping blocks of at most
/// `block_width x block_height`, in row-major order.
///
/// Blocks on the right and bottom edges are clipped to the image. A zero block
/// dimension yields a single block covering the whole image.
pub fn image_blocks(
    width: usize,
    height: usize,
    block_width: usize,
    block_height: usize,
) -> Vec<Rect> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    if block_width == 0 || block_height == 0 {
        return vec![Rect::new(0, 0, width, height)];
    }

    let mut blocks = Vec::new();
    let mut y = 0;
    while y < height {
        let h = block_height.min(height - y);
        let mut x = 0;
        while x < width {
            let w = block_width.min(width - x);
            blocks.push(Rect::new(x, y, w, h));
            x += block_width;
        }
        y += block_height;
    }
    blocks
}
