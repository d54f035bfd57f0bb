//! Timer service seam for the data-ready poll loop
//!
//! The driver never blocks waiting for data. Instead it asks a system timer
//! service for a repeating timer while the magnetometer is in use, and the
//! integrator forwards every expiry to
//! [`Mmc5603njDriver::on_poll_timer`](crate::Mmc5603njDriver::on_poll_timer).
//!
//! # Example
//!
//! ```ignore
//! // Inside the timer service's expiry handler:
//! fn on_timer_fired(id: TimerId) {
//!     if id == MAG_POLL_TIMER {
//!         MAG.on_poll_timer();
//!     }
//! }
//! ```

use fugit::MillisDurationU32;

/// A one-shot/repeating timer service
///
/// Handles are owned by the caller between `create` and `delete`. Stopping a
/// timer that is not running must be harmless.
pub trait TimerService {
    /// Identifies one created timer
    type Timer: Copy;

    /// Allocate a new, stopped timer
    ///
    /// Returns `None` if the service has no timer left.
    fn create(&mut self) -> Option<Self::Timer>;

    /// Start `timer` so that it fires every `interval` until stopped
    ///
    /// Returns `false` if the service refused to start the timer.
    fn start_repeating(&mut self, timer: Self::Timer, interval: MillisDurationU32) -> bool;

    /// Stop `timer` without freeing it
    fn stop(&mut self, timer: Self::Timer);

    /// Free `timer`; the handle must not be used afterwards
    fn delete(&mut self, timer: Self::Timer);
}

impl<T: TimerService> TimerService for &mut T {
    type Timer = T::Timer;

    fn create(&mut self) -> Option<Self::Timer> {
        T::create(self)
    }

    fn start_repeating(&mut self, timer: Self::Timer, interval: MillisDurationU32) -> bool {
        T::start_repeating(self, timer, interval)
    }

    fn stop(&mut self, timer: Self::Timer) {
        T::stop(self, timer);
    }

    fn delete(&mut self, timer: Self::Timer) {
        T::delete(self, timer);
    }
}

/// The repeating poll timer owned by the driver
///
/// A handle is held exactly while polling is active.
pub(crate) struct PollTimer<T: TimerService> {
    service: T,
    active: Option<T::Timer>,
    interval: MillisDurationU32,
}

impl<T: TimerService> PollTimer<T> {
    pub(crate) const fn new(service: T, interval: MillisDurationU32) -> Self {
        Self {
            service,
            active: None,
            interval,
        }
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub(crate) const fn interval(&self) -> MillisDurationU32 {
        self.interval
    }

    /// Start polling at the current interval; no-op if already polling
    pub(crate) fn start(&mut self) -> bool {
        if self.active.is_some() {
            return true;
        }
        let Some(timer) = self.service.create() else {
            return false;
        };
        if !self.service.start_repeating(timer, self.interval) {
            self.service.delete(timer);
            return false;
        }
        self.active = Some(timer);
        true
    }

    /// Stop and free the timer; no-op if not polling
    pub(crate) fn stop(&mut self) {
        if let Some(timer) = self.active.take() {
            self.service.stop(timer);
            self.service.delete(timer);
        }
    }

    /// Replace the running timer with one firing at `interval`
    pub(crate) fn restart(&mut self, interval: MillisDurationU32) -> bool {
        self.stop();
        self.interval = interval;
        self.start()
    }
}
