use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

use super::image::ImageSurface;

/// Single-slot handoff cell between the capture and presenter sides.
///
/// Two flags gate access to the slot, one transition writer each:
///
/// - `awaiting` — set by the presenter (release), cleared by the capture side
///   when it claims the slot. True means the capture side may produce.
/// - `ready` — set by the capture side when a frame is published, cleared by
///   the presenter when it consumes. True means the slot holds an unconsumed
///   frame.
///
/// Exclusivity protocol:
///
/// - The capture side touches the slot only between a successful [`claim`]
///   (`ready` observed false, `awaiting` observed true and cleared) and the
///   matching [`ProducerLease::publish`] (`ready` set, release).
/// - The presenter touches the slot only between [`take_ready`] (`ready`
///   observed true, acquire) and [`ConsumerLease::consume`] (`ready` cleared,
///   then `awaiting` set, both release).
///
/// `ready` stays false for the whole capture window (only the capture side
/// sets it) so the presenter cannot enter, and a claim requires `ready` to be
/// false so the capture side cannot enter while the presenter holds a frame.
/// The presenter's release after an idle pulse happens while it holds no
/// slot access at all. Each side is driven from a single scheduling context;
/// the halves owning these flags are not clonable, which upholds that.
///
/// Acquire/release pairs on the flags order the pixel writes: everything the
/// capture side wrote is visible to the presenter that observes `ready`, and
/// everything the presenter read is complete before a later claim writes.
pub(crate) struct FrameSlot {
    surface: UnsafeCell<Option<ImageSurface>>,
    awaiting: AtomicBool,
    ready: AtomicBool,
}

// SAFETY: `surface` is only dereferenced inside the lease windows described
// above, and the flag protocol keeps those windows from overlapping.
unsafe impl Sync for FrameSlot {}

impl FrameSlot {
    /// A fresh slot: no surface yet, capture side allowed to produce.
    pub fn new() -> Self {
        Self {
            surface: UnsafeCell::new(None),
            awaiting: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    /// True when the presenter has consumed the previous frame and nothing
    /// is pending, i.e. a [`claim`] would succeed.
    pub fn producer_released(&self) -> bool {
        self.awaiting.load(Ordering::Acquire) && !self.ready.load(Ordering::Acquire)
    }

    /// Claims the slot for producing one frame.
    ///
    /// Fails (frame in flight) when the previous frame is unconsumed or the
    /// presenter has not pulsed since the last publish.
    pub fn claim(&self) -> Option<ProducerLease<'_>> {
        if self.ready.load(Ordering::Acquire) {
            return None;
        }
        if self
            .awaiting
            .compare_exchange(true, false, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }
        Some(ProducerLease { slot: self })
    }

    /// Takes the published frame for one presenter pulse, if there is one.
    pub fn take_ready(&self) -> Option<ConsumerLease<'_>> {
        if self.ready.load(Ordering::Acquire) {
            Some(ConsumerLease { slot: self })
        } else {
            None
        }
    }

    /// Releases the capture side without consuming anything — the idle-pulse
    /// path, run by the presenter when no frame is ready.
    pub fn release(&self) {
        self.awaiting.store(true, Ordering::Release);
    }
}

/// Exclusive write access to the slot for one capture cycle.
///
/// Dropping the lease without publishing leaves the slot unreadable until the
/// next presenter pulse re-releases it; the capture side always publishes.
pub(crate) struct ProducerLease<'a> {
    slot: &'a FrameSlot,
}

impl ProducerLease<'_> {
    pub fn surface_mut(&mut self) -> &mut Option<ImageSurface> {
        // SAFETY: a live ProducerLease is the exclusivity window documented
        // on FrameSlot; no other reference to the cell exists.
        unsafe { &mut *self.slot.surface.get() }
    }

    /// Publishes the written frame and ends the window.
    pub fn publish(self) {
        self.slot.ready.store(true, Ordering::Release);
    }
}

/// Shared read access to the published frame for one presenter pulse.
pub(crate) struct ConsumerLease<'a> {
    slot: &'a FrameSlot,
}

impl ConsumerLease<'_> {
    pub fn surface(&self) -> Option<&ImageSurface> {
        // SAFETY: `ready` was observed true with acquire ordering and the
        // capture side cannot claim until `consume` below re-releases it.
        unsafe { (*self.slot.surface.get()).as_ref() }
    }

    /// Marks the frame consumed and releases the capture side, ending the
    /// window.
    pub fn consume(self) {
        self.slot.ready.store(false, Ordering::Release);
        self.slot.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::coords::SurfaceSize;

    fn publish_filled(slot: &FrameSlot, value: u8) -> bool {
        let Some(mut lease) = slot.claim() else {
            return false;
        };
        let surface = lease.surface_mut();
        if surface.is_none() {
            *surface = Some(ImageSurface::new(SurfaceSize::new(64, 64)));
        }
        let Some(image) = surface.as_mut() else {
            return false;
        };
        let w = image.width();
        let h = image.height();
        image.write_region(w, h, &vec![value; w as usize * h as usize * 4]);
        lease.publish();
        true
    }

    // ── handshake sequencing ──────────────────────────────────────────────

    #[test]
    fn fresh_slot_allows_one_claim() {
        let slot = FrameSlot::new();
        assert!(slot.producer_released());
        assert!(publish_filled(&slot, 1));
        assert!(!slot.producer_released());
        assert!(slot.claim().is_none());
    }

    #[test]
    fn consume_reopens_the_producer() {
        let slot = FrameSlot::new();
        publish_filled(&slot, 1);
        let lease = slot.take_ready().expect("published frame");
        assert!(lease.surface().is_some());
        lease.consume();
        assert!(slot.producer_released());
        assert!(publish_filled(&slot, 2));
    }

    #[test]
    fn take_ready_is_empty_after_consume() {
        let slot = FrameSlot::new();
        publish_filled(&slot, 1);
        slot.take_ready().expect("published frame").consume();
        assert!(slot.take_ready().is_none());
    }

    #[test]
    fn release_alone_does_not_fabricate_a_frame() {
        let slot = FrameSlot::new();
        slot.release();
        assert!(slot.take_ready().is_none());
        assert!(slot.producer_released());
    }

    #[test]
    fn claim_blocked_while_consumer_holds_the_frame() {
        let slot = FrameSlot::new();
        publish_filled(&slot, 1);
        let lease = slot.take_ready().expect("published frame");
        // `ready` is still set until consume: a claim must fail even if a
        // stray release happened in between.
        slot.release();
        assert!(slot.claim().is_none());
        lease.consume();
        assert!(slot.claim().is_some());
    }

    // ── cross-thread handoff ──────────────────────────────────────────────

    #[test]
    fn concurrent_producer_and_consumer_never_see_torn_frames() {
        const ROUNDS: u32 = 2_000;

        let slot = Arc::new(FrameSlot::new());
        let stop = Arc::new(AtomicBool::new(false));

        let producer = {
            let slot = Arc::clone(&slot);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut value = 0u8;
                while !stop.load(Ordering::Relaxed) {
                    if publish_filled(&slot, value) {
                        value = value.wrapping_add(1);
                    } else {
                        std::hint::spin_loop();
                    }
                }
            })
        };

        let mut consumed = 0u32;
        while consumed < ROUNDS {
            let Some(lease) = slot.take_ready() else {
                std::hint::spin_loop();
                continue;
            };
            {
                let image = lease.surface().expect("published frame has a surface");
                let bytes = image.bytes();
                // Every byte of a consumed frame must belong to the same
                // generation: a mix means the producer wrote during the read.
                let first = bytes[0];
                assert!(
                    bytes.iter().all(|&b| b == first),
                    "torn frame observed at generation {first}"
                );
            }
            lease.consume();
            consumed += 1;
        }

        stop.store(true, Ordering::Relaxed);
        producer.join().expect("producer thread panicked");
    }
}
