//! Power state of the magnetometer
//!
//! The MMC5603NJ is shared between consumers through a use count:
//! - **Uninitialized**: `init()` has not run yet; every use is a programming error
//! - **Idle**: no users, sensor in standby, poll timer stopped
//! - **Active**: at least one user, poll timer running at the sample rate
//!
//! Continuous measurement is only commanded by
//! [`change_sample_rate`](crate::Mmc5603njDriver::change_sample_rate) (or
//! [`start_sampling`](crate::Mmc5603njDriver::start_sampling)); `acquire()`
//! on its own only starts polling.

use crate::sensors::MagSampleRate;
use crate::timer::{PollTimer, TimerService};

/// Snapshot of the magnetometer power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// `init()` has not been called
    Uninitialized,
    /// Nobody is using the sensor; it is in standby
    Idle,
    /// The sensor is in use
    Active {
        /// Number of outstanding `acquire()` calls
        users: usize,
        /// Last sample rate configured while in use
        rate: MagSampleRate,
    },
}

impl PowerState {
    /// Check if at least one consumer holds the sensor
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// State guarded by the driver mutex
pub(crate) struct UseState<T: TimerService, D> {
    pub(crate) poll: PollTimer<T>,
    pub(crate) rate: MagSampleRate,
    pub(crate) delay: D,
}

impl<T: TimerService, D> UseState<T, D> {
    pub(crate) const fn new(timer: T, delay: D) -> Self {
        let rate = MagSampleRate::Hz5;
        Self {
            poll: PollTimer::new(timer, rate.poll_interval()),
            rate,
            delay,
        }
    }
}
