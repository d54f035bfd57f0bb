//! High-level driver API for the MMC5603NJ
//!
//! This module provides the shared, use-counted magnetometer driver. One
//! [`Mmc5603njDriver`] exists per board; it is created at startup and every
//! consumer talks to it through `&self`.
//!
//! # Concurrency
//!
//! Two locks are involved, always taken in this order:
//! 1. the controller lock `C`, held for the whole of each public operation
//!    including its settle delays (see [`crate::sync`])
//! 2. the bus mutex `M`, held for each register transaction
//!
//! No delay runs while the bus mutex is held.
//! [`on_poll_timer`](Mmc5603njDriver::on_poll_timer) runs in the timer
//! service context and only ever takes the bus mutex. It checks the use count
//! with a relaxed atomic load first; if a `release()` races with that check
//! the worst outcome is one stray [`MagEvent::DataReady`] after the sensor
//! went idle, which `read_data` then answers with `SensorOff` or `NotReady`.
//!
//! # Example
//!
//! ```ignore
//! use asterix_imu::{I2cInterface, MagConfig, MagSampleRate, Mmc5603njDriver};
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//!
//! // `RtosLock` is the firmware's sleeping mutex, see `asterix_imu::sync`
//! let mag: Mmc5603njDriver<CriticalSectionRawMutex, RtosLock, _, _, _, _> = Mmc5603njDriver::new(
//!     I2cInterface::magnetometer(bus),
//!     timers,
//!     delay,
//!     &MAG_EVENTS,
//!     MagConfig::default(),
//! );
//! mag.init();
//!
//! mag.start_sampling()?;
//! // ... on MagEvent::DataReady:
//! let sample = mag.read_data()?;
//! mag.release()?;
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use device_driver::RegisterInterface;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use fugit::MillisDurationU32;

use crate::event::{EventSink, MagEvent};
use crate::power::{PowerState, UseState};
use crate::registers::{RegisterDevice, BURST_LEN, XOUT0};
use crate::sensors::magnetometer::{decode, is_clobbered, MMC5603NJ_PRODUCT_ID_VALUE};
use crate::sensors::{MagConfig, MagSample, MagSampleRate};
use crate::sync::ControllerLock;
use crate::timer::TimerService;
use crate::Error;

/// Size of the measurement burst in bits
const BURST_BITS: u32 = (BURST_LEN * 8) as u32;

/// Main driver for the MMC5603NJ
///
/// `M` is the bus mutex and `C` the controller lock; see [`crate::sync`].
pub struct Mmc5603njDriver<M, C, I, T, D, E>
where
    M: RawMutex,
    C: ControllerLock,
    T: TimerService,
{
    device: Mutex<M, RefCell<RegisterDevice<I>>>,
    state: C::Cell<UseState<T, D>>,
    // Only written with `state` held; read lock-free by the poll callback.
    users: AtomicUsize,
    initialized: AtomicBool,
    events: E,
    config: MagConfig,
}

impl<M, C, I, T, D, E> Mmc5603njDriver<M, C, I, T, D, E>
where
    M: RawMutex,
    C: ControllerLock,
    I: RegisterInterface<AddressType = u8>,
    T: TimerService,
    D: DelayNs,
    E: EventSink,
{
    /// Create a new MMC5603NJ driver instance
    ///
    /// No bus traffic happens here. Call [`init()`](Self::init) once before
    /// any other operation.
    ///
    /// # Arguments
    /// * `interface` - Register interface for the magnetometer
    /// * `timer` - Timer service providing the repeating poll timer
    /// * `delay` - Delay provider for power-on and standby settling
    /// * `events` - Sink receiving [`MagEvent::DataReady`]
    /// * `config` - Board axis mapping and timings
    pub fn new(interface: I, timer: T, delay: D, events: E, config: MagConfig) -> Self {
        Self {
            device: Mutex::new(RefCell::new(RegisterDevice::new(interface))),
            state: C::new_cell(UseState::new(timer, delay)),
            users: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
            events,
            config,
        }
    }

    /// Initialize the driver
    ///
    /// Marks the driver initialized, waits for the sensor to power up and
    /// checks its product ID. A missing or misbehaving sensor is only logged so
    /// that the rest of the system still boots; sampling is not started.
    ///
    /// Calling `init()` again is a no-op.
    pub fn init(&self) {
        if self.is_initialized() {
            debug!("MMC5603NJ already initialized");
            return;
        }
        info!("Initializing MMC5603NJ magnetometer...");
        self.initialized.store(true, Ordering::Release);

        self.with_state(|state| state.delay.delay_ms(self.config.power_on_delay_ms));

        match self.check_who_am_i() {
            Ok(()) => info!("WHO_AM_I check passed - device responding"),
            Err(Error::IdentityMismatch(_)) => {
                error!("Failed to query Mag - WHO_AM_I check failed");
            }
            Err(_) => error!("Failed to read WHO_AM_I register"),
        }
        info!("MMC5603NJ initialization completed");
    }

    /// Check the factory-programmed product ID
    ///
    /// Holds the sensor for the duration of the read, so an idle sensor is put
    /// back into standby afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PRODUCT_ID` register contains an unexpected value
    ///
    /// # Panics
    ///
    /// Panics if called before [`init()`](Self::init).
    pub fn check_who_am_i(&self) -> Result<(), Error<I::Error>> {
        info!("Checking WHO_AM_I register (0x39)...");
        self.acquire()?;
        let read = self.with_device(|device| device.product_id().read());
        let released = self.release();
        let who_am_i = read?.product_id();
        released?;

        info!(
            "Read compass whoami byte {:#x}, expecting {:#x}",
            who_am_i,
            MMC5603NJ_PRODUCT_ID_VALUE
        );
        if who_am_i != MMC5603NJ_PRODUCT_ID_VALUE {
            error!("WHO_AM_I check FAILED - wrong device or communication issue");
            return Err(Error::IdentityMismatch(who_am_i));
        }
        info!("WHO_AM_I check PASSED");
        Ok(())
    }

    /// Register as a user of the magnetometer
    ///
    /// The first user starts the data-ready poll timer at the current poll
    /// interval (200 ms until a rate is configured). Continuous measurement is
    /// not commanded here; see [`start_sampling()`](Self::start_sampling).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timer`] if the poll timer cannot be started; the use
    /// count is left unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if called before [`init()`](Self::init).
    pub fn acquire(&self) -> Result<(), Error<I::Error>> {
        assert!(self.is_initialized(), "magnetometer used before init()");

        self.with_state(|state| -> Result<(), Error<I::Error>> {
            let users = self.users.load(Ordering::Relaxed);
            if users == 0 && !state.poll.start() {
                error!("Failed to start magnetometer poll timer");
                return Err(Error::Timer);
            }
            self.users.store(users + 1, Ordering::Relaxed);
            Ok(())
        })
    }

    /// Drop one use of the magnetometer
    ///
    /// The last user puts the sensor into standby, performs one discard read
    /// of the output registers to clear latched state and stops polling. All
    /// three steps are carried out even if one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first bus error hit while shutting the sensor down.
    ///
    /// # Panics
    ///
    /// Panics if called before [`init()`](Self::init) or without a matching
    /// [`acquire()`](Self::acquire).
    pub fn release(&self) -> Result<(), Error<I::Error>> {
        assert!(self.is_initialized(), "magnetometer used before init()");

        self.with_state(|state| -> Result<(), Error<I::Error>> {
            let users = self.users.load(Ordering::Relaxed);
            assert!(users != 0, "magnetometer released more often than acquired");
            self.users.store(users - 1, Ordering::Relaxed);
            if users != 1 {
                return Ok(());
            }

            let standby = self.enter_standby(&mut state.delay);
            let mut raw = [0u8; BURST_LEN];
            let discard = self.with_device(|device| {
                device.interface.read_register(XOUT0, BURST_BITS, &mut raw)
            });
            state.poll.stop();
            debug!("Magnetometer idle, polling stopped");

            match standby {
                Ok(()) | Err(Error::StandbyUnconfirmed) => {}
                Err(e) => return Err(e),
            }
            discard.map_err(Error::Bus)
        })
    }

    /// Acquire the magnetometer and start continuous measurement at 5 Hz
    ///
    /// Enables automatic set/reset before configuring the rate. A failure to
    /// enable set/reset is logged and sampling continues.
    ///
    /// # Errors
    ///
    /// Returns an error if acquiring fails or if the rate change fails. The
    /// sensor stays acquired when the rate change fails.
    ///
    /// # Panics
    ///
    /// Panics if called before [`init()`](Self::init).
    pub fn start_sampling(&self) -> Result<(), Error<I::Error>> {
        info!("Starting magnetometer sampling...");
        self.acquire()?;

        info!("Enabling auto set/reset (reg 0x1B = 0x20)...");
        let auto_sr = self.with_device(|device| {
            device.internal_control_0().write(|w| {
                w.set_auto_sr_en(true);
            })
        });
        if auto_sr.is_err() {
            error!("Failed to enable auto set/reset");
        } else {
            info!("Auto set/reset enabled successfully");
        }

        info!("Setting sample rate to 5Hz...");
        let result = self.change_sample_rate(MagSampleRate::Hz5);
        info!("Magnetometer sampling started");
        result
    }

    /// Change the continuous-measurement sample rate
    ///
    /// Does nothing (and succeeds) when nobody holds the sensor. Otherwise the
    /// sensor is taken out of continuous mode, reprogrammed, put back into
    /// continuous mode and the poll timer is recreated at the matching
    /// interval.
    ///
    /// A failed step aborts the sequence without undoing earlier steps, so the
    /// sensor may be left in standby.
    ///
    /// # Errors
    ///
    /// Returns an error if any register write fails, if standby entry is
    /// unconfirmed (see [`MagConfig::legacy_standby_status`]) or if the new
    /// poll timer cannot be started.
    ///
    /// On [`Error::Timer`] the sensor already runs at `rate`, but nothing
    /// polls it: no [`MagEvent::DataReady`] is posted until the use count
    /// drops to zero and the next `acquire()` starts a timer again.
    /// [`read_data`](Self::read_data) keeps working in the meantime.
    pub fn change_sample_rate(&self, rate: MagSampleRate) -> Result<(), Error<I::Error>> {
        self.with_state(|state| -> Result<(), Error<I::Error>> {
            if self.users.load(Ordering::Relaxed) == 0 {
                return Ok(());
            }

            self.enter_standby(&mut state.delay)?;

            self.with_device(|device| -> Result<(), I::Error> {
                device.odr().write(|w| {
                    w.set_odr(rate.odr_value());
                })?;
                device.internal_control_0().write(|w| {
                    w.set_cmm_freq_en(true);
                })?;
                device.internal_control_2().write(|w| {
                    w.set_cmm_en(true);
                })
            })?;
            state.rate = rate;

            if !state.poll.restart(rate.poll_interval()) {
                error!("Failed to restart magnetometer poll timer");
                return Err(Error::Timer);
            }
            debug!("Magnetometer sample rate set to {} Hz", rate.rate_hz());
            Ok(())
        })
    }

    /// Poll timer expiry handler
    ///
    /// Call this from the timer service every time the poll timer fires.
    /// Posts [`MagEvent::DataReady`] when the sensor reports new data. Never
    /// takes the driver mutex; bus errors are ignored until the next firing.
    pub fn on_poll_timer(&self) {
        // Relaxed is enough: a stale non-zero count only costs a stray event.
        if self.users.load(Ordering::Relaxed) == 0 {
            return;
        }

        let Ok(status) = self.with_device(|device| device.status_1().read()) else {
            return;
        };
        if status.mag_ready() && !self.events.post(MagEvent::DataReady) {
            warn!("Magnetometer event queue full, dropping DataReady");
        }
    }

    /// Read the latest magnetometer sample
    ///
    /// Returns the sample in the watch coordinate system. A sample whose
    /// overflow nibble is set is still returned, as
    /// [`MagSample::Clobbered`].
    ///
    /// # Errors
    ///
    /// - [`Error::SensorOff`] if nobody holds the sensor (no bus traffic)
    /// - [`Error::NotReady`] if no new measurement is available
    /// - [`Error::Bus`] if communication with the device fails
    pub fn read_data(&self) -> Result<MagSample, Error<I::Error>> {
        self.with_state(|_| -> Result<MagSample, Error<I::Error>> {
            if self.users.load(Ordering::Relaxed) == 0 {
                return Err(Error::SensorOff);
            }

            let status = self.with_device(|device| device.status_1().read())?;
            if !status.meas_m_done() {
                return Err(Error::NotReady);
            }

            let mut raw = [0u8; BURST_LEN];
            self.with_device(|device| {
                device.interface.read_register(XOUT0, BURST_BITS, &mut raw)
            })?;

            let data = decode(&raw, &self.config.axes);
            if is_clobbered(&raw) {
                info!(
                    "Some Mag Sample Data was overwritten, dr_status={:#x}",
                    raw[0]
                );
                Ok(MagSample::Clobbered(data))
            } else {
                Ok(MagSample::Fresh(data))
            }
        })
    }

    /// Check if [`init()`](Self::init) has run
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Get the number of outstanding [`acquire()`](Self::acquire) calls
    pub fn use_count(&self) -> usize {
        self.with_state(|_| self.users.load(Ordering::Relaxed))
    }

    /// Get the last sample rate configured while in use
    pub fn sample_rate(&self) -> MagSampleRate {
        self.with_state(|state| state.rate)
    }

    /// Get the interval of the running poll timer, if polling
    pub fn poll_interval(&self) -> Option<MillisDurationU32> {
        self.with_state(|state| state.poll.is_active().then(|| state.poll.interval()))
    }

    /// Get a snapshot of the power state
    pub fn power_state(&self) -> PowerState {
        if !self.is_initialized() {
            return PowerState::Uninitialized;
        }
        self.with_state(|state| match self.users.load(Ordering::Relaxed) {
            0 => PowerState::Idle,
            users => PowerState::Active {
                users,
                rate: state.rate,
            },
        })
    }

    /// Get the driver configuration
    pub fn config(&self) -> &MagConfig {
        &self.config
    }

    /// Leave continuous mode and wait for the sensor to settle
    ///
    /// The settle delay runs with the bus mutex released.
    fn enter_standby(&self, delay: &mut D) -> Result<(), Error<I::Error>> {
        self.with_device(|device| {
            device.internal_control_2().write(|w| {
                w.set_cmm_en(false);
            })
        })?;
        delay.delay_ms(self.config.standby_settle_ms);

        if self.config.legacy_standby_status {
            return Err(Error::StandbyUnconfirmed);
        }
        Ok(())
    }

    /// Run `f` holding the controller lock
    fn with_state<R>(&self, f: impl FnOnce(&mut UseState<T, D>) -> R) -> R {
        C::with_mut(&self.state, f)
    }

    /// Run `f` with exclusive access to the register device
    fn with_device<R>(&self, f: impl FnOnce(&mut RegisterDevice<I>) -> R) -> R {
        self.device.lock(|device| f(&mut *device.borrow_mut()))
    }
}
