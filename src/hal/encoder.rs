//! Quadrature encoder counting.
//!
//! The count cell is the only state shared between the edge interrupt
//! (writer) and the control loop (reader), so it is an atomic integer.
//! Relaxed ordering is sufficient: there is a single writer and the reader
//! tolerates any interleaving.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::config::units::Counts;

/// Capability interface for a position encoder.
///
/// All operations take `&self` so a handle can be shared with an interrupt
/// context; implementations must be interrupt-safe.
pub trait Encoder {
    /// Current cumulative count.
    fn count(&self) -> Counts;

    /// Overwrite the count.
    fn set_count(&self, value: Counts);

    /// Zero the count.
    fn reset_count(&self) {
        self.set_count(Counts::new(0));
    }

    /// Add one count.
    fn increment(&self);

    /// Subtract one count.
    fn decrement(&self);
}

/// Edge-counting quadrature decoder cell.
///
/// `const`-constructible so it can live in a `static` that both the
/// interrupt handler and the control loop reference:
///
/// ```rust
/// use servo_motion::hal::QuadratureCounter;
///
/// static LIFT_ENCODER: QuadratureCounter = QuadratureCounter::new();
///
/// // interrupt handler for the A-channel edge:
/// fn on_edge(b_high: bool) {
///     LIFT_ENCODER.record_edge(b_high);
/// }
/// ```
#[derive(Debug, Default)]
pub struct QuadratureCounter {
    count: AtomicI32,
}

impl QuadratureCounter {
    /// Create a counter at zero.
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
        }
    }

    /// Record an A-channel edge; `b_high` is the B-channel level at the edge.
    ///
    /// O(1) and non-blocking: safe to call from an interrupt arbitrarily
    /// often between control ticks.
    #[inline]
    pub fn record_edge(&self, b_high: bool) {
        if b_high {
            self.count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.count.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// [`record_edge`](Self::record_edge) with the count sense inverted,
    /// for encoders mounted mirror-image.
    #[inline]
    pub fn record_edge_flipped(&self, b_high: bool) {
        if b_high {
            self.count.fetch_sub(1, Ordering::Relaxed);
        } else {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Encoder for QuadratureCounter {
    #[inline]
    fn count(&self) -> Counts {
        Counts::new(self.count.load(Ordering::Relaxed))
    }

    #[inline]
    fn set_count(&self, value: Counts) {
        self.count.store(value.value(), Ordering::Relaxed);
    }

    #[inline]
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn decrement(&self) {
        self.count.fetch_sub(1, Ordering::Relaxed);
    }
}

/// A shared reference to an encoder is itself an encoder, so a controller
/// can hold `&'static QuadratureCounter` while the interrupt keeps its own.
impl<T: Encoder> Encoder for &T {
    #[inline]
    fn count(&self) -> Counts {
        T::count(self)
    }

    #[inline]
    fn set_count(&self, value: Counts) {
        T::set_count(self, value);
    }

    #[inline]
    fn increment(&self) {
        T::increment(self);
    }

    #[inline]
    fn decrement(&self) {
        T::decrement(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_count_both_ways() {
        let counter = QuadratureCounter::new();

        counter.record_edge(true);
        counter.record_edge(true);
        counter.record_edge(false);
        assert_eq!(counter.count().value(), 1);

        counter.record_edge_flipped(true);
        assert_eq!(counter.count().value(), 0);
    }

    #[test]
    fn test_set_and_reset() {
        let counter = QuadratureCounter::new();
        counter.set_count(Counts::new(-250));
        assert_eq!(counter.count().value(), -250);

        counter.reset_count();
        assert_eq!(counter.count().value(), 0);
    }

    #[test]
    fn test_shared_reference_handle() {
        static COUNTER: QuadratureCounter = QuadratureCounter::new();

        let handle: &QuadratureCounter = &COUNTER;
        COUNTER.record_edge(true);
        assert_eq!(handle.count().value(), 1);
        handle.reset_count();
        assert_eq!(COUNTER.count().value(), 0);
    }
}
