//! Pixel frame with per-block dirty tracking and orientation geometry.

use crate::Rotation;
use crate::color::Rgb;

/// In-RAM pixel frame partitioned into a `G x G` grid of dirty-tracked
/// blocks.
///
/// The pixel storage is caller-provided and sized for the native (rotation
/// 0) width times height; rotations reuse the same storage with swapped
/// geometry. Width and height must both be divisible by `G`; this is a
/// caller contract, checked only by `debug_assert`.
pub struct Frame<'a, const G: usize> {
    pixels: &'a mut [Rgb],
    /// Native dimensions (rotation 0).
    init_width: u16,
    init_height: u16,
    /// Active dimensions under the current rotation.
    width: u16,
    height: u16,
    init_block_width: u16,
    init_block_height: u16,
    block_width: u16,
    block_height: u16,
    /// One dirty flag per block, indexed `[block_y][block_x]`.
    dirty: [[bool; G]; G],
    rotation: Rotation,
}

impl<'a, const G: usize> Frame<'a, G> {
    /// Wraps `pixels` as a `width x height` frame in rotation 0.
    ///
    /// The frame starts black with every block marked dirty, so the first
    /// flush paints the whole panel.
    pub fn new(pixels: &'a mut [Rgb], width: u16, height: u16) -> Self {
        debug_assert!(width as usize % G == 0 && height as usize % G == 0);
        debug_assert!(pixels.len() >= width as usize * height as usize);

        let block_width = width / G as u16;
        let block_height = height / G as u16;
        let mut frame = Self {
            pixels,
            init_width: width,
            init_height: height,
            width,
            height,
            init_block_width: block_width,
            init_block_height: block_height,
            block_width,
            block_height,
            dirty: [[false; G]; G],
            rotation: Rotation::Deg0,
        };
        frame.reset();
        frame
    }

    /// Active frame width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Active frame height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn block_width(&self) -> u16 {
        self.block_width
    }

    pub fn block_height(&self) -> u16 {
        self.block_height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Total number of blocks in the grid.
    pub const fn block_count(&self) -> usize {
        G * G
    }

    /// Writes one pixel and marks its owning block dirty.
    ///
    /// Writes outside the active dimensions are silently dropped. This is
    /// the single mutation entry point for pixel data.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        self.pixels[x + y * self.width as usize] = color;
        let bx = x / self.block_width as usize;
        let by = y / self.block_height as usize;
        self.dirty[by][bx] = true;
    }

    /// Returns the pixel at the given coordinates, clamped to the nearest
    /// edge when out of range.
    ///
    /// The clamping lets geometry code overshoot the frame slightly without
    /// panicking, at the cost of silently distorting shapes at the edges.
    /// Callers needing strict bounds must check before calling.
    pub fn pixel(&self, x: i32, y: i32) -> &Rgb {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        &self.pixels[x + y * self.width as usize]
    }

    /// Whether the given block has unflushed changes.
    pub fn is_dirty(&self, block: usize) -> bool {
        self.dirty[block / G][block % G]
    }

    pub(crate) fn clear_dirty(&mut self, block: usize) {
        self.dirty[block / G][block % G] = false;
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        self.dirty = [[true; G]; G];
    }

    /// Top-left pixel coordinates of a block, in row-major block order
    /// (index = block_x + block_y * G).
    pub fn block_origin(&self, block: usize) -> (u16, u16) {
        let x = (block % G) as u16 * self.block_width;
        let y = (block / G) as u16 * self.block_height;
        (x, y)
    }

    /// Applies a new orientation: swaps the native geometry for 90/270,
    /// restores it for 0/180, resets every pixel to black and marks all
    /// blocks dirty so the next flush repaints the full panel.
    ///
    /// Must not run while a transfer referencing the old geometry is in
    /// flight; [`crate::Panel::set_rotation`] waits for the engine to idle
    /// before calling this.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotation.is_swapped() {
            self.width = self.init_height;
            self.height = self.init_width;
            self.block_width = self.init_block_height;
            self.block_height = self.init_block_width;
        } else {
            self.width = self.init_width;
            self.height = self.init_height;
            self.block_width = self.init_block_width;
            self.block_height = self.init_block_height;
        }
        self.rotation = rotation;
        self.reset();
    }

    /// Baseline state: all pixels black, all blocks dirty.
    fn reset(&mut self) {
        let len = self.init_width as usize * self.init_height as usize;
        self.pixels[..len].fill(Rgb::BLACK);
        self.mark_all_dirty();
    }
}
