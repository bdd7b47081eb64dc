//! Chained asynchronous transfer engine.
//!
//! Drains the descriptor FIFO over a single hardware channel. Every
//! descriptor is transmitted as six phases, each of which is exactly one
//! asynchronous bus operation; the next phase is only issued from the
//! completion of the previous one, so at most one operation is ever
//! outstanding. When a descriptor retires and the queue is non-empty, the
//! next descriptor's first phase starts directly from the same completion,
//! so back-to-back blocks chain with no idle gap.
//!
//! The engine is shared between mainline code (enqueue, kick) and the DMA
//! transfer-complete interrupt (completion delivery), so applications wrap
//! it in a `critical_section::Mutex<RefCell<..>>` (see [`crate::SharedEngine`])
//! and call [`TransferEngine::on_transfer_complete`] from the interrupt:
//!
//! ```ignore
//! // SPI DMA transfer-complete interrupt handler
//! critical_section::with(|cs| {
//!     ENGINE.borrow_ref_mut(cs).on_transfer_complete(TransferResult::Complete);
//! });
//! ```

use crate::color::ColorDepth;
use crate::command::Descriptor;
use crate::frame::Frame;
use crate::queue::TransferQueue;

/// Asynchronous panel bus, typically SPI + a data/command pin driven by DMA.
///
/// Each method starts exactly one hardware transfer and returns without
/// blocking. The platform must report its completion exactly once via
/// [`TransferEngine::on_transfer_complete`]. The buffer passed in stays
/// valid until that completion arrives (it lives in the engine's descriptor
/// queue), so implementations may hand its address straight to the DMA
/// controller.
pub trait PanelBus {
    /// Starts transmission of a command (data/command pin low).
    fn start_command(&mut self, cmd: &[u8]);
    /// Starts transmission of data bytes (data/command pin high).
    fn start_data(&mut self, data: &[u8]);
}

/// Outcome of one hardware transfer, as reported by the platform.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferResult {
    Complete,
    Error,
}

/// Transmission phase of the front descriptor.
///
/// `Idle` means no descriptor chain is in flight; every other variant names
/// the bus operation currently outstanding.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Idle,
    ColumnCommand,
    ColumnData,
    RowCommand,
    RowData,
    PixelCommand,
    PixelPayload,
}

/// Callback-driven state machine draining the transfer FIFO.
///
/// Owns the bus handle and the descriptor queue; generic over the bus so
/// tests can substitute a recording fake.
pub struct TransferEngine<B, const K: usize, const N: usize> {
    bus: B,
    queue: TransferQueue<K, N>,
    phase: Phase,
}

impl<B: PanelBus, const K: usize, const N: usize> TransferEngine<B, K, N> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            queue: TransferQueue::new(),
            phase: Phase::Idle,
        }
    }

    /// Whether a descriptor chain currently occupies the bus.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of descriptors waiting in the FIFO, the in-flight one
    /// included.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The descriptor currently in transmission, if any.
    pub fn front(&self) -> Option<&Descriptor<N>> {
        self.queue.front()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Snapshots `block` of `frame` into the tail FIFO slot.
    ///
    /// Returns `false` when the FIFO is full; nothing is captured in that
    /// case and the caller retries later.
    pub fn enqueue_block<const G: usize>(
        &mut self,
        frame: &Frame<'_, G>,
        block: usize,
        depth: ColorDepth,
    ) -> bool {
        self.queue
            .enqueue_with(|slot| slot.capture(frame, block, depth))
    }

    /// Starts draining the FIFO if it is non-empty and the bus is free.
    ///
    /// Returns `false` (and does nothing) when there is nothing to send or a
    /// chain is already in flight, so it is safe to call after every enqueue.
    pub fn kick(&mut self) -> bool {
        if self.is_busy() || self.queue.is_empty() {
            return false;
        }
        self.start_phase(Phase::ColumnCommand);
        true
    }

    /// Advances the state machine by one completed hardware transfer.
    ///
    /// Call exactly once per started bus operation, from the platform's
    /// transfer-complete context. An error outcome abandons the rest of the
    /// current descriptor and moves on to the next one; the following
    /// descriptor re-establishes the address window with its own `CASET`, so
    /// the damage stays confined to the failed block.
    pub fn on_transfer_complete(&mut self, result: TransferResult) {
        if self.phase == Phase::Idle {
            // Spurious completion, nothing was outstanding.
            return;
        }
        if result == TransferResult::Error {
            #[cfg(feature = "defmt")]
            defmt::warn!("bus error in {}, abandoning block transfer", self.phase);
            self.retire();
            return;
        }
        match self.phase {
            Phase::Idle => unreachable!(),
            Phase::ColumnCommand => self.start_phase(Phase::ColumnData),
            Phase::ColumnData => self.start_phase(Phase::RowCommand),
            Phase::RowCommand => self.start_phase(Phase::RowData),
            Phase::RowData => self.start_phase(Phase::PixelCommand),
            Phase::PixelCommand => self.start_phase(Phase::PixelPayload),
            Phase::PixelPayload => self.retire(),
        }
    }

    /// Issues the single bus operation belonging to `phase` for the front
    /// descriptor.
    fn start_phase(&mut self, phase: Phase) {
        let Some(front) = self.queue.front() else {
            self.phase = Phase::Idle;
            return;
        };
        self.phase = phase;
        match phase {
            Phase::Idle => unreachable!(),
            Phase::ColumnCommand => self.bus.start_command(&front.col_cmd),
            Phase::ColumnData => self.bus.start_data(&front.col_data),
            Phase::RowCommand => self.bus.start_command(&front.row_cmd),
            Phase::RowData => self.bus.start_data(&front.row_data),
            Phase::PixelCommand => self.bus.start_command(&front.px_cmd),
            Phase::PixelPayload => self.bus.start_data(front.payload()),
        }
    }

    /// Drops the front descriptor and either chains into the next one or
    /// goes idle.
    fn retire(&mut self) {
        if self.queue.dequeue() {
            self.phase = Phase::Idle;
        } else {
            self.start_phase(Phase::ColumnCommand);
        }
    }
}
