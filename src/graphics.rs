//! `embedded-graphics` integration.
//!
//! Lets the whole embedded-graphics ecosystem (primitives, fonts, images)
//! rasterize into the dirty-tracked frame: every drawn pixel goes through
//! [`Panel::set_pixel`], so only the touched blocks are transmitted on the
//! next flush. Out-of-bounds pixels are dropped, which is what `DrawTarget`
//! expects.

use embedded_graphics_core::Pixel;
use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};

use crate::color::Rgb;
use crate::engine::PanelBus;
use crate::panel::Panel;

impl<B: PanelBus, const G: usize, const K: usize, const N: usize> OriginDimensions
    for Panel<'_, B, G, K, N>
{
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}

impl<B: PanelBus, const G: usize, const K: usize, const N: usize> DrawTarget
    for Panel<'_, B, G, K, N>
{
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, Rgb::new(color.r(), color.g(), color.b()));
        }
        Ok(())
    }
}
