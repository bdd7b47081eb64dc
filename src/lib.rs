//! Dirty-block frame driver for SPI TFT panels
//! =============================================================================================
//!
//! Keeps a full frame of RGB pixels in RAM, tracks which rectangular blocks
//! of the frame changed since the last transmission, and pushes only the
//! changed blocks to the panel controller over a single DMA-driven SPI
//! channel.
//!
//! The frame is partitioned into a `G x G` grid of equally sized blocks.
//! Every pixel write marks its owning block dirty. [`Panel::flush`] walks the
//! grid in row-major block order, snapshots each dirty block into a transfer
//! descriptor (column window, row window, packed pixel payload) and places it
//! in a bounded FIFO. The [`TransferEngine`] drains that FIFO one hardware
//! operation at a time: each descriptor is transmitted as six chained phases
//! (`CASET` command, window data, `RASET` command, window data, `RAMWR`
//! command, pixel payload), and the next descriptor starts directly from the
//! completion of the previous one with no idle gap.
//!
//! Completions arrive from the platform's DMA transfer-complete interrupt,
//! so the engine lives in a `critical_section::Mutex<RefCell<..>>` shared
//! between mainline code and the interrupt handler. The handler calls
//! [`TransferEngine::on_transfer_complete`] once per finished transfer.
//!
//! The crate talks to hardware only through the [`PanelBus`] trait; panel
//! bring-up (reset sequencing, init commands, `MADCTL` rotation) stays in the
//! application.
//!
//! ```no_run
//! use core::cell::RefCell;
//! use critical_section::Mutex;
//! use static_cell::StaticCell;
//! use tft_frame::{ColorDepth, Panel, PanelBus, Rgb, TransferEngine};
//!
//! // Wraps the platform SPI handle and the data/command pin.
//! struct SpiDmaBus;
//!
//! impl PanelBus for SpiDmaBus {
//!     fn start_command(&mut self, _cmd: &[u8]) { /* DC low, start DMA */ }
//!     fn start_data(&mut self, _data: &[u8]) { /* DC high, start DMA */ }
//! }
//!
//! // 128x160 panel, 8x8 block grid of 16x20 px blocks, 2 bytes per pixel,
//! // 10-deep FIFO. Place the engine in DMA-reachable RAM.
//! static ENGINE: StaticCell<Mutex<RefCell<TransferEngine<SpiDmaBus, 10, 640>>>> =
//!     StaticCell::new();
//! static PIXELS: StaticCell<[Rgb; 128 * 160]> = StaticCell::new();
//!
//! let engine = ENGINE.init(Mutex::new(RefCell::new(TransferEngine::new(SpiDmaBus))));
//! let pixels = PIXELS.init([Rgb::BLACK; 128 * 160]);
//!
//! let mut panel: Panel<SpiDmaBus, 8, 10, 640> =
//!     Panel::new(pixels.as_mut_slice(), engine, 128, 160, ColorDepth::Bpp16);
//!
//! panel.set_pixel(10, 10, Rgb::new(255, 0, 0));
//! // panel.flush(&mut delay);
//! //
//! // In the SPI DMA transfer-complete interrupt:
//! // critical_section::with(|cs| {
//! //     engine.borrow_ref_mut(cs).on_transfer_complete(TransferResult::Complete)
//! // });
//! ```
//!
//! Cargo features:
//! - `async` (default): `flush_async` / `set_rotation_async` over
//!   `embedded-hal-async` delays.
//! - `graphics` (default): `embedded-graphics` `DrawTarget` impl for
//!   [`Panel`].
//! - `defmt`: derive `defmt::Format` on public types and warn on failed
//!   hardware completions.

#![cfg_attr(not(test), no_std)]

mod color;
mod command;
mod engine;
mod frame;
mod panel;
mod queue;

#[cfg(feature = "graphics")]
mod graphics;

pub use color::{ColorDepth, Rgb};
pub use command::{CASET, Descriptor, RAMWR, RASET};
pub use engine::{PanelBus, Phase, TransferEngine, TransferResult};
pub use frame::Frame;
pub use panel::{Panel, SharedEngine};
pub use queue::TransferQueue;

/// Frame and display orientation.
///
/// 0 and 180 degrees keep the native portrait geometry, 90 and 270 swap
/// width and height. The matching `MADCTL` command for the panel itself is
/// the application's responsibility.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Whether this orientation swaps the native width/height pair.
    pub const fn is_swapped(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}
