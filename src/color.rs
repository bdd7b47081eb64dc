//! Pixel representation and wire packing.

/// One frame pixel, 8 bits per channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color depth of the serialized pixel payload.
///
/// The frame always stores 8:8:8 pixels; the depth only selects how they are
/// packed onto the wire when a block is snapshot into a descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorDepth {
    /// 5-6-5, two bytes per pixel, channels truncated.
    Bpp16,
    /// 8-8-8, three bytes per pixel.
    Bpp24,
}

impl ColorDepth {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorDepth::Bpp16 => 2,
            ColorDepth::Bpp24 => 3,
        }
    }

    /// Packs one pixel into `out` and returns the number of bytes written.
    pub(crate) fn pack(self, px: Rgb, out: &mut [u8]) -> usize {
        match self {
            ColorDepth::Bpp16 => {
                out[0] = (px.r & 0xF8) | (px.g >> 5);
                out[1] = (px.b >> 3) | ((px.g << 3) & 0xE0);
                2
            }
            ColorDepth::Bpp24 => {
                out[0] = px.r;
                out[1] = px.g;
                out[2] = px.b;
                3
            }
        }
    }
}
