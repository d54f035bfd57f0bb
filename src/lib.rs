#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

// Must come first so the logging macros are visible in every module.
mod fmt;

pub mod board;
pub mod device;
pub mod event;
pub mod interface;
pub mod power;
pub mod probe;
pub mod registers;
pub mod sensors;
pub mod sync;
pub mod timer;

// Re-export main types
pub use board::BoardConfig;
pub use device::Mmc5603njDriver;
pub use event::{EventSink, MagEvent};
pub use interface::I2cInterface;
pub use power::PowerState;
pub use probe::{probe_sensors, Chip, ProbeOutcome, ProbeReport};
pub use sensors::{AxisConfig, MagConfig, MagData, MagSample, MagSampleRate};
pub use sync::ControllerLock;
pub use timer::TimerService;

/// Expected value of the MMC5603NJ `PRODUCT_ID` register
pub const WHO_AM_I_VALUE: u8 = sensors::magnetometer::MMC5603NJ_PRODUCT_ID_VALUE;

/// Driver errors
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Identity register held an unexpected value (contains the value read)
    IdentityMismatch(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// No new measurement is available yet
    NotReady,
    /// Nobody holds the magnetometer, so it is not sampling
    SensorOff,
    /// The timer service could not provide the poll timer
    Timer,
    /// The standby write went through but standby entry was reported as
    /// unconfirmed (see [`MagConfig::legacy_standby_status`])
    StandbyUnconfirmed,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
