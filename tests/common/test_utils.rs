//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use crate::common::mock_timer::MockTimer;
use asterix_imu::{MagConfig, MagEvent, Mmc5603njDriver};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use std::cell::Cell;
use std::rc::Rc;

/// Event queue used by the tests
pub type EventQueue = Channel<NoopRawMutex, MagEvent, 4>;

/// Driver type used by the tests
pub type TestDriver = Mmc5603njDriver<
    NoopRawMutex,
    NoopRawMutex,
    MockInterface,
    MockTimer,
    MockDelay,
    &'static EventQueue,
>;

/// Mock delay implementation for testing
///
/// Does not sleep; records the total requested delay instead.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    /// Total delay requested so far, in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_ns
            .set(self.elapsed_ns.get() + u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns
            .set(self.elapsed_ns.get() + u64::from(ms) * 1_000_000);
    }
}

/// Everything a test needs to drive and observe the magnetometer driver
pub struct Harness {
    /// Driver under test
    pub driver: TestDriver,
    /// Shares register state with the driver
    pub interface: MockInterface,
    /// Shares timer state with the driver
    pub timer: MockTimer,
    /// Shares the delay counter with the driver
    pub delay: MockDelay,
    /// Queue the driver posts to
    pub events: &'static EventQueue,
}

impl Harness {
    /// Drain the event queue
    pub fn drain_events(&self) -> Vec<MagEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_receive() {
            events.push(event);
        }
        events
    }

    /// Clear bus and timer logs
    pub fn clear_logs(&self) {
        self.interface.clear_operations();
        self.timer.clear_operations();
    }
}

/// Create a driver on a mock magnetometer without calling `init()`
pub fn create_mock_driver_with(interface: MockInterface, config: MagConfig) -> Harness {
    let timer = MockTimer::new();
    let delay = MockDelay::default();
    let events: &'static EventQueue = Box::leak(Box::new(Channel::new()));
    let driver = Mmc5603njDriver::new(
        interface.clone(),
        timer.clone(),
        delay.clone(),
        events,
        config,
    );
    Harness {
        driver,
        interface,
        timer,
        delay,
        events,
    }
}

/// Create a driver on a mock magnetometer without calling `init()`
pub fn create_mock_driver() -> Harness {
    create_mock_driver_with(MockInterface::magnetometer(), MagConfig::default())
}

/// Create an initialized driver with empty bus and timer logs
pub fn create_initialized_driver() -> Harness {
    create_initialized_driver_with(MagConfig::default())
}

/// Create an initialized driver with the given config and empty logs
pub fn create_initialized_driver_with(config: MagConfig) -> Harness {
    let harness = create_mock_driver_with(MockInterface::magnetometer(), config);
    harness.driver.init();
    harness.clear_logs();
    harness
}

/// Measurement burst with X/Y/Z codes 0x1000/0x2000/0x3000 and a clear status nibble
pub const SAMPLE_BURST: [u8; 9] = [0x00, 0x10, 0x00, 0x20, 0x00, 0x30, 0x00, 0x00, 0x00];

/// STATUS1 with the poll-timer "mag ready" bit set
pub const STATUS_MAG_READY: u8 = 0x02;

/// STATUS1 with the "measurement done" bit set
pub const STATUS_MEAS_M_DONE: u8 = 0x40;
