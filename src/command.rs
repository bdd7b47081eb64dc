//! Controller opcodes and per-block transfer descriptors.
//!
//! The opcodes are the common subset shared by the ST77xx controller family;
//! panel bring-up commands live in the application.

use crate::color::ColorDepth;
use crate::frame::Frame;

/// Column address set.
pub const CASET: u8 = 0x2A;
/// Row address set.
pub const RASET: u8 = 0x2B;
/// Memory write.
pub const RAMWR: u8 = 0x2C;

/// Immutable snapshot of one block transfer, captured at enqueue time.
///
/// Holds the exact bytes the engine puts on the wire: the window commands
/// with their big-endian coordinate ranges and the packed pixel payload.
/// `N` is the payload capacity in bytes and must cover one block at the
/// configured depth; a 16-bit depth in a 24-bit-sized slot simply leaves the
/// tail unused. Command bytes are stored inline so DMA can source every
/// phase from this memory.
pub struct Descriptor<const N: usize> {
    pub(crate) col_cmd: [u8; 1],
    pub(crate) col_data: [u8; 4],
    pub(crate) row_cmd: [u8; 1],
    pub(crate) row_data: [u8; 4],
    pub(crate) px_cmd: [u8; 1],
    pub(crate) payload: [u8; N],
    pub(crate) payload_len: usize,
}

impl<const N: usize> Descriptor<N> {
    pub(crate) const EMPTY: Self = Self {
        col_cmd: [CASET],
        col_data: [0; 4],
        row_cmd: [RASET],
        row_data: [0; 4],
        px_cmd: [RAMWR],
        payload: [0; N],
        payload_len: 0,
    };

    /// Snapshots `block` of `frame`: window ranges plus the block's pixels
    /// packed row-major, top-to-bottom, left-to-right.
    pub(crate) fn capture<const G: usize>(
        &mut self,
        frame: &Frame<'_, G>,
        block: usize,
        depth: ColorDepth,
    ) {
        let (x, y) = frame.block_origin(block);
        let x_end = x + frame.block_width() - 1;
        let y_end = y + frame.block_height() - 1;
        debug_assert!(
            frame.block_width() as usize * frame.block_height() as usize * depth.bytes_per_pixel()
                <= N
        );

        self.col_data = [(x >> 8) as u8, x as u8, (x_end >> 8) as u8, x_end as u8];
        self.row_data = [(y >> 8) as u8, y as u8, (y_end >> 8) as u8, y_end as u8];

        let mut len = 0;
        for py in y..=y_end {
            for px in x..=x_end {
                let pixel = frame.pixel(px as i32, py as i32);
                len += depth.pack(*pixel, &mut self.payload[len..]);
            }
        }
        self.payload_len = len;
    }

    /// The serialized pixel payload for this block.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len]
    }

    /// Column window as `[x_start_hi, x_start_lo, x_end_hi, x_end_lo]`.
    pub fn column_window(&self) -> &[u8; 4] {
        &self.col_data
    }

    /// Row window as `[y_start_hi, y_start_lo, y_end_hi, y_end_lo]`.
    pub fn row_window(&self) -> &[u8; 4] {
        &self.row_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn capture_encodes_big_endian_windows() {
        let mut px = vec![Rgb::BLACK; 128 * 160];
        let frame: Frame<'_, 8> = Frame::new(&mut px, 128, 160);

        let mut desc: Descriptor<640> = Descriptor::EMPTY;
        // Block 63: x in [112, 127], y in [140, 159].
        desc.capture(&frame, 63, ColorDepth::Bpp16);
        assert_eq!(desc.column_window(), &[0, 112, 0, 127]);
        assert_eq!(desc.row_window(), &[0, 140, 0, 159]);
        assert_eq!(desc.payload().len(), 16 * 20 * 2);
    }

    #[test]
    fn capture_packs_block_pixels_row_major() {
        let mut px = vec![Rgb::BLACK; 128 * 160];
        let mut frame: Frame<'_, 8> = Frame::new(&mut px, 128, 160);
        // Second pixel of the second row inside block 0.
        frame.set_pixel(1, 1, Rgb::new(10, 20, 30));

        let mut desc: Descriptor<960> = Descriptor::EMPTY;
        desc.capture(&frame, 0, ColorDepth::Bpp24);
        let payload = desc.payload();
        assert_eq!(payload.len(), 16 * 20 * 3);

        let offset = (16 + 1) * 3;
        assert_eq!(&payload[offset..offset + 3], &[10, 20, 30]);
        // Everything before it is still black.
        assert!(payload[..offset].iter().all(|&b| b == 0));
    }

    #[test]
    fn sixteen_bit_payload_fills_two_thirds_of_a_24bit_slot() {
        let mut px = vec![Rgb::BLACK; 128 * 160];
        let frame: Frame<'_, 8> = Frame::new(&mut px, 128, 160);

        let mut desc: Descriptor<960> = Descriptor::EMPTY;
        desc.capture(&frame, 0, ColorDepth::Bpp16);
        assert_eq!(desc.payload().len(), 16 * 20 * 2);
    }
}
