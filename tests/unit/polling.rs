//! Unit tests for the data-ready poll callback

use crate::common::test_utils::{SAMPLE_BURST, STATUS_MAG_READY, STATUS_MEAS_M_DONE};
use crate::common::{create_initialized_driver, create_mock_driver, Operation};
use asterix_imu::MagEvent;

#[test]
fn test_poll_before_init_is_noop() {
    let harness = create_mock_driver();
    harness.interface.set_status(STATUS_MAG_READY);

    harness.driver.on_poll_timer();

    assert!(harness.interface.operations().is_empty());
    assert!(harness.drain_events().is_empty());
}

#[test]
fn test_poll_while_idle_is_noop() {
    let harness = create_initialized_driver();
    harness.interface.set_status(STATUS_MAG_READY);

    harness.driver.on_poll_timer();

    assert!(harness.interface.operations().is_empty());
    assert!(harness.drain_events().is_empty());
}

#[test]
fn test_poll_posts_data_ready() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.interface.set_status(STATUS_MAG_READY);

    harness.driver.on_poll_timer();

    assert_eq!(harness.drain_events(), vec![MagEvent::DataReady]);
    assert_eq!(
        harness.interface.operations(),
        vec![Operation::Read {
            address: 0x18,
            len: 1
        }]
    );
}

#[test]
fn test_poll_ignores_measurement_done_bit() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.interface.set_status(STATUS_MEAS_M_DONE);

    harness.driver.on_poll_timer();

    assert!(harness.drain_events().is_empty());
}

#[test]
fn test_poll_without_new_data() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.interface.set_status(0x00);

    for _ in 0..3 {
        harness.driver.on_poll_timer();
    }

    assert!(harness.drain_events().is_empty());
    assert_eq!(harness.interface.read_count(0x18), 3);
}

#[test]
fn test_poll_ignores_bus_failure() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.interface.set_status(STATUS_MAG_READY);
    harness.interface.fail_next_read();

    harness.driver.on_poll_timer();
    assert!(harness.drain_events().is_empty());

    // The next firing picks the data up
    harness.driver.on_poll_timer();
    assert_eq!(harness.drain_events(), vec![MagEvent::DataReady]);
}

#[test]
fn test_poll_tolerates_full_queue() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.interface.set_status(STATUS_MAG_READY);

    for _ in 0..6 {
        harness.driver.on_poll_timer();
    }

    // Queue capacity is 4; the rest are dropped
    assert_eq!(harness.drain_events().len(), 4);
    harness.driver.on_poll_timer();
    assert_eq!(harness.drain_events(), vec![MagEvent::DataReady]);
}

#[test]
fn test_stale_poll_after_release_is_noop() {
    let harness = create_initialized_driver();
    harness.driver.acquire().unwrap();
    harness.driver.release().unwrap();
    harness.interface.set_status(STATUS_MAG_READY);
    harness.clear_logs();

    harness.driver.on_poll_timer();

    assert!(harness.interface.operations().is_empty());
    assert!(harness.drain_events().is_empty());
}

#[test]
fn test_poll_event_leads_to_read() {
    let harness = create_initialized_driver();
    harness.driver.start_sampling().unwrap();
    harness.interface.set_status(STATUS_MAG_READY | STATUS_MEAS_M_DONE);
    harness.interface.set_burst(SAMPLE_BURST);

    harness.driver.on_poll_timer();

    for event in harness.drain_events() {
        match event {
            MagEvent::DataReady => {
                let sample = harness.driver.read_data().unwrap();
                assert!(!sample.is_clobbered());
            }
        }
    }
}
