//! Drawing-facing panel handle: flush orchestration and rotation.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::Rotation;
use crate::color::{ColorDepth, Rgb};
use crate::engine::{PanelBus, TransferEngine};
use crate::frame::Frame;

/// A [`TransferEngine`] shared between mainline code and the hardware
/// completion interrupt.
pub type SharedEngine<B, const K: usize, const N: usize> = Mutex<RefCell<TransferEngine<B, K, N>>>;

/// How long the retry/wait loops sleep between attempts.
const POLL_DELAY_US: u32 = 1_000;

/// Mainline handle tying the pixel [`Frame`] to the shared transfer engine.
///
/// Drawing code writes pixels through [`Panel::set_pixel`] (or the
/// `embedded-graphics` `DrawTarget` impl behind the `graphics` feature) and
/// calls [`Panel::flush`] to push the changed blocks to the display.
///
/// Const parameters: `G` blocks per axis, `K` FIFO capacity, `N` payload
/// bytes per descriptor slot (at least block width x block height x bytes
/// per pixel).
pub struct Panel<'a, B: PanelBus, const G: usize, const K: usize, const N: usize> {
    frame: Frame<'a, G>,
    engine: &'a SharedEngine<B, K, N>,
    depth: ColorDepth,
}

impl<'a, B: PanelBus, const G: usize, const K: usize, const N: usize> Panel<'a, B, G, K, N> {
    /// Builds a panel over caller-provided pixel storage and a shared
    /// engine.
    ///
    /// `width` and `height` are the native (rotation 0) dimensions; both
    /// must be divisible by `G` and `pixels` must hold at least
    /// `width * height` entries. The engine embeds the descriptor FIFO and
    /// must therefore sit in DMA-reachable memory.
    pub fn new(
        pixels: &'a mut [Rgb],
        engine: &'a SharedEngine<B, K, N>,
        width: u16,
        height: u16,
        depth: ColorDepth,
    ) -> Self {
        debug_assert!(
            (width as usize / G) * (height as usize / G) * depth.bytes_per_pixel() <= N,
            "descriptor slots too small for one block"
        );
        Self {
            frame: Frame::new(pixels, width, height),
            engine,
            depth,
        }
    }

    /// Writes one pixel; out-of-range writes are silently dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.frame.set_pixel(x, y, color);
    }

    /// Reads one pixel with coordinates clamped to the frame edges.
    pub fn pixel(&self, x: i32, y: i32) -> &Rgb {
        self.frame.pixel(x, y)
    }

    pub fn width(&self) -> u16 {
        self.frame.width()
    }

    pub fn height(&self) -> u16 {
        self.frame.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.frame.rotation()
    }

    pub fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    /// Read access to the underlying frame, mostly for inspecting dirty
    /// state.
    pub fn frame(&self) -> &Frame<'a, G> {
        &self.frame
    }

    /// Pushes every dirty block to the display.
    ///
    /// Blocks are scanned in row-major block order, which is therefore also
    /// the transmission order. Each dirty block is snapshot into the FIFO,
    /// retrying with a short sleep while the FIFO is full. On acceptance the
    /// dirty flag is cleared and the engine kicked (a no-op while a chain is
    /// already running). The snapshot is taken at enqueue time: pixel writes
    /// landing after a block was queued re-dirty it for the next flush
    /// instead of altering the in-flight payload.
    ///
    /// Returns once every dirty block is queued; transmission itself
    /// finishes asynchronously. The retry loop has no deadline, so a stalled
    /// bus stalls the caller.
    pub fn flush(&mut self, delay: &mut impl DelayNs) {
        for block in 0..self.frame.block_count() {
            if !self.frame.is_dirty(block) {
                continue;
            }
            loop {
                let queued = critical_section::with(|cs| {
                    self.engine
                        .borrow_ref_mut(cs)
                        .enqueue_block(&self.frame, block, self.depth)
                });
                if queued {
                    break;
                }
                delay.delay_us(POLL_DELAY_US);
            }
            self.frame.clear_dirty(block);
            critical_section::with(|cs| self.engine.borrow_ref_mut(cs).kick());
        }
    }

    /// Changes the frame orientation.
    ///
    /// Waits (polling with a short sleep) until the engine is idle so no
    /// in-flight transfer references the old geometry, then swaps the
    /// active dimensions, resets the frame to black and marks every block
    /// dirty. The next [`Panel::flush`] repaints the whole panel. Sending
    /// the matching `MADCTL` command to the controller is the caller's job.
    pub fn set_rotation(&mut self, rotation: Rotation, delay: &mut impl DelayNs) {
        while critical_section::with(|cs| self.engine.borrow_ref(cs).is_busy()) {
            delay.delay_us(POLL_DELAY_US);
        }
        self.frame.set_rotation(rotation);
    }
}

#[cfg(feature = "async")]
impl<'a, B: PanelBus, const G: usize, const K: usize, const N: usize> Panel<'a, B, G, K, N> {
    /// [`Panel::flush`] for async firmware: the full-FIFO retry sleeps via
    /// an async delay so other tasks keep running while the engine drains.
    pub async fn flush_async(&mut self, delay: &mut impl embedded_hal_async::delay::DelayNs) {
        for block in 0..self.frame.block_count() {
            if !self.frame.is_dirty(block) {
                continue;
            }
            loop {
                let queued = critical_section::with(|cs| {
                    self.engine
                        .borrow_ref_mut(cs)
                        .enqueue_block(&self.frame, block, self.depth)
                });
                if queued {
                    break;
                }
                delay.delay_us(POLL_DELAY_US).await;
            }
            self.frame.clear_dirty(block);
            critical_section::with(|cs| self.engine.borrow_ref_mut(cs).kick());
        }
    }

    /// [`Panel::set_rotation`] with an async wait for engine idle.
    pub async fn set_rotation_async(
        &mut self,
        rotation: Rotation,
        delay: &mut impl embedded_hal_async::delay::DelayNs,
    ) {
        while critical_section::with(|cs| self.engine.borrow_ref(cs).is_busy()) {
            delay.delay_us(POLL_DELAY_US).await;
        }
        self.frame.set_rotation(rotation);
    }
}
