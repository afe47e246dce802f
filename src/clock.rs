use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of "now" in seconds. All windowing in the crate is relative to the
/// value read at call time.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock, seconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Simulated clock shared between clones, advanced explicitly by the caller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    #[inline]
    pub fn set(&self, ts: f64) {
        self.bits.store(ts.to_bits(), Ordering::SeqCst);
    }

    #[inline]
    pub fn advance(&self, secs: f64) {
        self.set(self.now() + secs);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> f64 {
        (**self).now()
    }
}
