//! Magnetometer sensor types and configuration
//!
//! Provides types, enums, constants, and the raw sample decoding for the
//! MMC5603NJ 3-axis magnetometer.

use fugit::MillisDurationU32;

use crate::registers::BURST_LEN;
use crate::Error;

/// MMC5603NJ I2C address
pub const MMC5603NJ_I2C_ADDRESS: u8 = 0x30;

/// MMC5603NJ `PRODUCT_ID` register address
pub const MMC5603NJ_REG_PRODUCT_ID: u8 = 0x39;

/// Expected `PRODUCT_ID` value for MMC5603NJ
pub const MMC5603NJ_PRODUCT_ID_VALUE: u8 = 0x10;

/// MMC5603NJ Internal Control 2 register address (continuous mode control)
pub const MMC5603NJ_REG_INTERNAL_CONTROL_2: u8 = 0x1D;

/// Offset subtracted from the unsigned output code to center it on zero field
pub const ZERO_FIELD_OFFSET: u16 = 32768;

/// Magnetometer continuous-mode sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagSampleRate {
    /// 5 Hz, polled every 200 ms
    #[default]
    Hz5,
    /// 20 Hz, polled every 50 ms
    Hz20,
}

impl MagSampleRate {
    /// Get the sample rate in Hz
    #[must_use]
    pub const fn rate_hz(self) -> u8 {
        match self {
            Self::Hz5 => 5,
            Self::Hz20 => 20,
        }
    }

    /// Get the value written to the ODR register
    ///
    /// The ODR register holds the rate in Hz directly.
    #[must_use]
    pub const fn odr_value(self) -> u8 {
        self.rate_hz()
    }

    /// Get the interval of the data-ready poll timer for this rate
    #[must_use]
    pub const fn poll_interval(self) -> MillisDurationU32 {
        match self {
            Self::Hz5 => MillisDurationU32::from_ticks(200),
            Self::Hz20 => MillisDurationU32::from_ticks(50),
        }
    }
}

/// Board-specific mapping from sensor axes to watch axes
///
/// `offsets[axis]` selects which of the three raw axis pairs feeds watch axis
/// `axis` (0 = x, 1 = y, 2 = z); `inverts[axis]` negates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    offsets: [u8; 3],
    inverts: [bool; 3],
}

impl AxisConfig {
    /// Sensor axes map one-to-one onto watch axes, no inversion
    pub const IDENTITY: Self = Self {
        offsets: [0, 1, 2],
        inverts: [false, false, false],
    };

    /// Create an axis mapping
    ///
    /// # Errors
    /// Returns `InvalidConfig` if any offset is not 0, 1 or 2
    pub const fn new(offsets: [u8; 3], inverts: [bool; 3]) -> Result<Self, Error<()>> {
        if offsets[0] > 2 || offsets[1] > 2 || offsets[2] > 2 {
            return Err(Error::InvalidConfig);
        }
        Ok(Self { offsets, inverts })
    }

    /// Raw axis pair index feeding each watch axis
    #[must_use]
    pub const fn offsets(&self) -> [u8; 3] {
        self.offsets
    }

    /// Per-axis inversion flags
    #[must_use]
    pub const fn inverts(&self) -> [bool; 3] {
        self.inverts
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Magnetometer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagConfig {
    /// Mapping of sensor axes onto the watch coordinate system
    pub axes: AxisConfig,
    /// Delay before the identity check in `init()`, in milliseconds
    pub power_on_delay_ms: u32,
    /// Settling delay after leaving continuous mode, in milliseconds
    pub standby_settle_ms: u32,
    /// Report standby entry as unconfirmed even when the write succeeded
    ///
    /// Reproduces the behaviour of the shipped firmware, where a sample rate
    /// change never gets past the standby step.
    pub legacy_standby_status: bool,
}

impl MagConfig {
    /// Create a configuration with the given axis mapping and default timings
    pub const fn new(axes: AxisConfig) -> Self {
        Self {
            axes,
            power_on_delay_ms: 50,
            standby_settle_ms: 200,
            legacy_standby_status: false,
        }
    }
}

impl Default for MagConfig {
    fn default() -> Self {
        Self::new(AxisConfig::IDENTITY)
    }
}

/// Magnetometer data (centered 16-bit values in the watch coordinate system)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagData {
    /// X-axis magnetic field (raw)
    pub x: i16,
    /// Y-axis magnetic field (raw)
    pub y: i16,
    /// Z-axis magnetic field (raw)
    pub z: i16,
}

/// A sample returned by a successful read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagSample {
    /// A complete, fresh sample
    Fresh(MagData),
    /// The sample may have been partially overwritten by a newer one
    Clobbered(MagData),
}

impl MagSample {
    /// Get the decoded data regardless of whether it was clobbered
    #[must_use]
    pub const fn data(&self) -> MagData {
        match self {
            Self::Fresh(data) | Self::Clobbered(data) => *data,
        }
    }

    /// Check if the sample was flagged as possibly overwritten
    #[must_use]
    pub const fn is_clobbered(&self) -> bool {
        matches!(self, Self::Clobbered(_))
    }
}

/// Check the overflow nibble of the first burst byte
#[must_use]
pub const fn is_clobbered(raw: &[u8; BURST_LEN]) -> bool {
    raw[0] & 0xF0 != 0
}

/// Decode a measurement burst into the watch coordinate system
///
/// The first byte carries the overflow nibble; axis pair `k` occupies bytes
/// `1 + 2k` (high) and `2 + 2k` (low).
#[must_use]
pub fn decode(raw: &[u8; BURST_LEN], axes: &AxisConfig) -> MagData {
    let axis = |index: usize| -> i16 {
        let offset = 1 + 2 * usize::from(axes.offsets[index]);
        let unsigned = u16::from_be_bytes([raw[offset], raw[offset + 1]]);
        let signed = unsigned.wrapping_sub(ZERO_FIELD_OFFSET) as i16;
        if axes.inverts[index] {
            signed.wrapping_neg()
        } else {
            signed
        }
    };

    MagData {
        x: axis(0),
        y: axis(1),
        z: axis(2),
    }
}
