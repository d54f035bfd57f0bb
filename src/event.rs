//! Notifications posted to downstream consumers

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

/// Event raised by the poll timer
///
/// Carries no payload; consumers call
/// [`Mmc5603njDriver::read_data`](crate::Mmc5603njDriver::read_data) to fetch
/// the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagEvent {
    /// The magnetometer reports a new sample
    DataReady,
}

/// Destination for [`MagEvent`]s
///
/// Called from the timer service context, so implementations must not block.
pub trait EventSink {
    /// Queue `event`; returns `false` if it was dropped
    fn post(&self, event: MagEvent) -> bool;
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn post(&self, event: MagEvent) -> bool {
        T::post(self, event)
    }
}

impl<M: RawMutex, const N: usize> EventSink for Channel<M, MagEvent, N> {
    fn post(&self, event: MagEvent) -> bool {
        self.try_send(event).is_ok()
    }
}
