//! Monotonic time source for the speed sampler.
//!
//! embedded-hal 1.0 provides delays but no clock, and the rate regulator
//! needs timestamps, so the crate defines its own seam. On an MCU this is
//! typically a wrapper over a free-running timer; on a host it is
//! [`StdClock`].

/// A monotonic microsecond clock.
pub trait Clock {
    /// Microseconds elapsed since an arbitrary fixed origin.
    ///
    /// Readings are expected to be monotonic; the regulator tolerates a
    /// backwards step by discarding that sample.
    fn now_micros(&mut self) -> u64;
}

/// Clock backed by `std::time::Instant` (std only).
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_micros(&mut self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
