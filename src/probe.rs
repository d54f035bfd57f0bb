//! Boot-time sensor probing
//!
//! Checks each known chip on the bus for its identity and parks every chip it
//! finds in its lowest-power state. This runs once during boot, before the
//! magnetometer driver is initialized:
//!
//! ```ignore
//! let report = asterix_imu::probe_sensors(&mut mag_if, &mut baro_if, &mut imu_if);
//! let mag = Mmc5603njDriver::new(mag_if, timers, delay, &MAG_EVENTS, MagConfig::default());
//! mag.init();
//! ```
//!
//! Nothing here fails: an absent chip or a bus error is logged and probing
//! moves on to the next chip. Every bus operation is bounded by the
//! transport's own timeout.

use device_driver::RegisterInterface;

use crate::sensors::accel_gyro::{
    LSM6DSO_LOW_POWER_SEQUENCE, LSM6DSO_REG_WHO_AM_I, LSM6DSO_WHO_AM_I_VALUE,
};
use crate::sensors::barometer::{BMP390_CHIP_ID_VALUE, BMP390_REG_CHIP_ID, BMP390_REG_PWR_CTRL};
use crate::sensors::magnetometer::{
    MMC5603NJ_PRODUCT_ID_VALUE, MMC5603NJ_REG_INTERNAL_CONTROL_2, MMC5603NJ_REG_PRODUCT_ID,
};

/// Sensor chips known to the prober
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chip {
    /// MMC5603NJ magnetometer
    Magnetometer,
    /// BMP390 barometer
    Barometer,
    /// LSM6DSO accelerometer/gyroscope
    AccelGyro,
}

impl Chip {
    /// Identity register and its expected value
    #[must_use]
    pub const fn identity(self) -> (u8, u8) {
        match self {
            Self::Magnetometer => (MMC5603NJ_REG_PRODUCT_ID, MMC5603NJ_PRODUCT_ID_VALUE),
            Self::Barometer => (BMP390_REG_CHIP_ID, BMP390_CHIP_ID_VALUE),
            Self::AccelGyro => (LSM6DSO_REG_WHO_AM_I, LSM6DSO_WHO_AM_I_VALUE),
        }
    }

    /// Register writes that put the chip into its lowest-power state
    #[must_use]
    pub const fn low_power_sequence(self) -> &'static [(u8, u8)] {
        match self {
            Self::Magnetometer => &[(MMC5603NJ_REG_INTERNAL_CONTROL_2, 0x00)],
            Self::Barometer => &[(BMP390_REG_PWR_CTRL, 0x00)],
            Self::AccelGyro => &LSM6DSO_LOW_POWER_SEQUENCE,
        }
    }
}

/// Result of probing one chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeOutcome {
    /// Identity matched and every low-power write succeeded
    Parked,
    /// Identity matched but at least one low-power write failed
    ParkFailed,
    /// The identity register held an unexpected value
    Mismatch(u8),
    /// The identity register could not be read
    BusFailure,
}

impl ProbeOutcome {
    /// Check if the chip answered with the expected identity
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Parked | Self::ParkFailed)
    }
}

/// Outcome of [`probe_sensors`] for each chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeReport {
    /// MMC5603NJ outcome
    pub magnetometer: ProbeOutcome,
    /// BMP390 outcome
    pub barometer: ProbeOutcome,
    /// LSM6DSO outcome
    pub accel_gyro: ProbeOutcome,
}

impl ProbeReport {
    /// Check if every chip was found and parked
    #[must_use]
    pub const fn all_parked(&self) -> bool {
        matches!(self.magnetometer, ProbeOutcome::Parked)
            && matches!(self.barometer, ProbeOutcome::Parked)
            && matches!(self.accel_gyro, ProbeOutcome::Parked)
    }
}

/// Probe the magnetometer, barometer and accelerometer/gyroscope in that order
///
/// Each chip found is parked in its lowest-power state. Failures never stop
/// the remaining probes; the report is informational and may be ignored.
pub fn probe_sensors<MAG, BARO, IMU>(
    magnetometer: &mut MAG,
    barometer: &mut BARO,
    accel_gyro: &mut IMU,
) -> ProbeReport
where
    MAG: RegisterInterface<AddressType = u8>,
    BARO: RegisterInterface<AddressType = u8>,
    IMU: RegisterInterface<AddressType = u8>,
{
    ProbeReport {
        magnetometer: probe_chip(magnetometer, Chip::Magnetometer),
        barometer: probe_chip(barometer, Chip::Barometer),
        accel_gyro: probe_chip(accel_gyro, Chip::AccelGyro),
    }
}

/// Probe one chip and park it if its identity matches
pub fn probe_chip<I>(interface: &mut I, chip: Chip) -> ProbeOutcome
where
    I: RegisterInterface<AddressType = u8>,
{
    let (register, expected) = chip.identity();
    info!("Probing {:?} at register {:#x}...", chip, register);

    let found = match read_register(interface, register) {
        Ok(value) => value,
        Err(_) => {
            warn!("{:?} probe failed; identity read error", chip);
            return ProbeOutcome::BusFailure;
        }
    };
    if found != expected {
        warn!(
            "{:?} probe failed; result {:#x}, expected {:#x}",
            chip,
            found,
            expected
        );
        return ProbeOutcome::Mismatch(found);
    }

    info!("{:?} probe successful; setting to low power", chip);
    // Every write is attempted, even after a failure.
    let mut parked = true;
    for &(register, value) in chip.low_power_sequence() {
        let written = write_register(interface, register, value).is_ok();
        debug!(
            "I2C write: reg={:#x}, value={:#x}, success={}",
            register,
            value,
            written
        );
        parked &= written;
    }

    if parked {
        ProbeOutcome::Parked
    } else {
        warn!("{:?} low-power sequence incomplete", chip);
        ProbeOutcome::ParkFailed
    }
}

fn read_register<I>(interface: &mut I, register: u8) -> Result<u8, I::Error>
where
    I: RegisterInterface<AddressType = u8>,
{
    let mut value = [0u8; 1];
    interface.read_register(register, 8, &mut value)?;
    debug!("I2C read: reg={:#x}, value={:#x}", register, value[0]);
    Ok(value[0])
}

fn write_register<I>(interface: &mut I, register: u8, value: u8) -> Result<(), I::Error>
where
    I: RegisterInterface<AddressType = u8>,
{
    interface.write_register(register, 8, &[value])
}
